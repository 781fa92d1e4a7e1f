/// Compass direction in which `p1` lies as seen from `p2`, ignoring height.
///
/// The sectors leave narrow gaps on their boundaries; a point exactly on one
/// of them has no direction.
pub fn get_direction(p1: (i32, i32, i32), p2: (i32, i32, i32)) -> Option<&'static str> {
    let dx = f64::from(p1.0 - p2.0);
    let dy = f64::from(p1.1 - p2.1);
    let angle = dy.atan2(dx).to_degrees();
    let angle360 = angle.rem_euclid(360.0);

    let dir = if angle > 65.0 && angle < 120.0 {
        "north"
    } else if angle > -110.0 && angle < -70.0 {
        "south"
    } else if angle < 25.0 && angle > -25.0 {
        "east"
    } else if angle360 > 160.0 && angle360 < 205.0 {
        "west"
    } else if angle > 25.0 && angle < 65.0 {
        "northeast"
    } else if angle360 > 205.0 && angle360 < 245.0 {
        "southwest"
    } else if angle > 110.0 && angle < 155.0 {
        "northwest"
    } else if angle360 > 295.0 && angle360 < 335.0 {
        "southeast"
    } else {
        return None;
    };
    Some(dir)
}

/// Splits "name;alias1;alias2" into the name and its aliases.
pub fn split_aliases(spec: &str) -> (String, Vec<String>) {
    let mut parts = spec
        .split(';')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string);
    let name = parts.next().unwrap_or_default();
    (name, parts.collect())
}

/// Splits `text` around the first standalone occurrence of `keyword`,
/// e.g. "apple in bag" on "in" gives ("apple", "bag").
pub fn split_on_keyword<'a>(text: &'a str, keyword: &str) -> Option<(&'a str, &'a str)> {
    let needle = format!(" {} ", keyword);
    let lower = text.to_ascii_lowercase();
    let at = lower.find(&needle)?;
    let left = text[..at].trim();
    let right = text[at + needle.len()..].trim();
    if left.is_empty() || right.is_empty() {
        return None;
    }
    Some((left, right))
}
