/// Upper-cases the first character of `text`.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Joins names the way a sentence lists them: "a", "a and b", "a, b and c".
pub fn list_to_string<S: AsRef<str>>(items: &[S]) -> String {
    match items {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|s| s.as_ref()).collect();
            format!("{} and {}", head.join(", "), last.as_ref())
        }
    }
}

/// Greedy word wrap. Existing line breaks are kept.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            if !line.is_empty() && line.len() + 1 + word.len() > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }
    lines
}

/// Case-insensitive match of `query` against a name or one of its aliases.
/// A query also matches when it is a prefix of any word of the name.
pub fn name_matches(query: &str, name: &str, aliases: &[String]) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return false;
    }
    let name = name.to_lowercase();
    if name == query || aliases.iter().any(|a| a.to_lowercase() == query) {
        return true;
    }
    name.split_whitespace().any(|word| word.starts_with(&query))
        || name.starts_with(&query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("someone waves."), "Someone waves.");
        assert_eq!(capitalize(""), "");
        assert_eq!(capitalize("Already"), "Already");
    }

    #[test]
    fn test_list_to_string() {
        let empty: [&str; 0] = [];
        assert_eq!(list_to_string(&empty), "");
        assert_eq!(list_to_string(&["a hat"]), "a hat");
        assert_eq!(list_to_string(&["a hat", "boots"]), "a hat and boots");
        assert_eq!(
            list_to_string(&["a hat", "a shirt", "boots"]),
            "a hat, a shirt and boots"
        );
    }

    #[test]
    fn test_wrap_breaks_on_width() {
        let lines = wrap("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_name_matches() {
        let aliases = vec!["cap".to_string()];
        assert!(name_matches("hat", "a red hat", &aliases));
        assert!(name_matches("RED", "a red hat", &aliases));
        assert!(name_matches("cap", "a red hat", &aliases));
        assert!(!name_matches("boots", "a red hat", &aliases));
        assert!(!name_matches("  ", "a red hat", &aliases));
    }
}
