//! Player input: parsing a line into a command and dispatching it to the
//! rules in the rest of `State`.

use gloaming_core::types::{Location, ObjectId};
use gloaming_core::RuleError;

use crate::helpers::split_on_keyword;
use crate::state::State;

const HELP_TEXT: &str = "Commands:
  look [<target>]            inventory
  get <item> [from <container>]    drop <item>
  put <item> in <container>  give <item> to <character>
  wear <item> [= <style>]    remove <item>
  cover <item> with <item>   uncover <item>
  fill <container> from <source>   pour <container>
  drink <liquid>             eat <food>
  say <text>   pose <text>   yell <text>
  <direction>  stop          time   sheet
Building: dig, @detail, @desc";

/// One line of player input split into its parts.
///
/// `look/brief sword = shiny` has verb `look`, switches `["brief"]`, args
/// `sword = shiny`, lhs `sword` and rhs `Some("shiny")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub verb: String,
    pub switches: Vec<String>,
    pub args: String,
    pub lhs: String,
    pub rhs: Option<String>,
}

/// Splits a line of input. Returns `None` for blank lines. A leading `:` is
/// shorthand for `pose`.
pub fn parse_command(line: &str) -> Option<ParsedCommand> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (head, rest) = match line.strip_prefix(':') {
        Some(pose) => ("pose", pose),
        None => line.split_once(char::is_whitespace).unwrap_or((line, "")),
    };

    let mut parts = head.split('/');
    let verb = parts.next().unwrap_or_default().to_lowercase();
    let switches = parts
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let args = rest.trim().to_string();
    let (lhs, rhs) = match args.split_once('=') {
        Some((l, r)) => (l.trim().to_string(), Some(r.trim().to_string())),
        None => (args.clone(), None),
    };

    Some(ParsedCommand {
        verb,
        switches,
        args,
        lhs,
        rhs,
    })
}

/// `args`, or a usage error asking for them.
fn require<'a>(args: &'a str, what: &str) -> Result<&'a str, RuleError> {
    if args.is_empty() {
        Err(RuleError::Usage(what.to_string()))
    } else {
        Ok(args)
    }
}

impl State {
    /// Runs one line of input for `character`. Failures are reported to the
    /// character and never propagate.
    pub fn execute_command(&mut self, character: ObjectId, line: &str) {
        let Some(command) = parse_command(line) else {
            return;
        };
        log::trace!("{} > {}", character, line.trim());

        if let Err(e) = self.dispatch(character, &command) {
            log::debug!("{} '{}' failed: {}", character, command.verb, e);
            self.msg(character, e.to_string());
        }
    }

    fn dispatch(&mut self, character: ObjectId, command: &ParsedCommand) -> Result<(), RuleError> {
        let args = command.args.as_str();
        let need = |what: &str| require(args, what);

        match command.verb.as_str() {
            "look" | "l" => self.look(character, Some(args).filter(|a| !a.is_empty())),
            "inventory" | "inv" | "i" => {
                let listing = self.inventory_listing(character);
                self.msg(character, listing);
                Ok(())
            }
            "get" | "take" => {
                let args = need("Get what?")?;
                match split_on_keyword(args, "from") {
                    Some((item, container)) => {
                        let container = self.find_near(character, container)?;
                        let item = self.find_at(item, Location::Inside(container))?;
                        self.get_from(character, item, container)
                    }
                    None => {
                        let room = self.location_of(character)?;
                        let item = self.find_at(args, Location::Room(room))?;
                        self.get(character, item)
                    }
                }
            }
            "drop" => {
                let item = self.find_carried(character, need("Drop what?")?)?;
                self.drop(character, item)
            }
            "put" => {
                let (item, container) = split_on_keyword(args, "in")
                    .ok_or_else(|| RuleError::Usage("Put what in what?".to_string()))?;
                let item = self.find_carried(character, item)?;
                let container = self.find_near(character, container)?;
                self.put(character, item, container)
            }
            "give" => {
                let (item, target) = split_on_keyword(args, "to")
                    .ok_or_else(|| RuleError::Usage("Give what to whom?".to_string()))?;
                let item = self.find_carried(character, item)?;
                let room = self.location_of(character)?;
                let target = self
                    .repository
                    .find_character_in(room, target)
                    .ok_or_else(|| RuleError::NotFound(target.to_string()))?;
                self.give(character, item, target)
            }
            "wear" => {
                need("Wear what?")?;
                let item = self.find_carried(character, &command.lhs)?;
                let style = command.rhs.as_deref().filter(|s| !s.is_empty());
                self.wear(character, item, style)
            }
            "remove" => {
                let item = self.find_carried(character, need("Remove what?")?)?;
                self.remove(character, item)
            }
            "cover" => {
                let (target, cover) = split_on_keyword(args, "with")
                    .ok_or_else(|| RuleError::Usage("Cover what with what?".to_string()))?;
                let target = self.find_carried(character, target)?;
                let cover = self.find_carried(character, cover)?;
                self.cover(character, target, cover)
            }
            "uncover" => {
                let item = self.find_carried(character, need("Uncover what?")?)?;
                self.uncover(character, item)
            }
            "fill" => {
                let (container, source) = split_on_keyword(args, "from")
                    .ok_or_else(|| RuleError::Usage("Fill what from what?".to_string()))?;
                let container = self.find_near(character, container)?;
                let source = self.find_near(character, source)?;
                self.fill(character, container, source).map(|_| ())
            }
            "pour" | "empty" | "dump" => {
                let container = self.find_near(character, need("Pour out what?")?)?;
                self.dump(character, container)
            }
            "drink" => {
                let target = self.find_near(character, need("Drink what?")?)?;
                self.drink(character, target)
            }
            "eat" | "use" => {
                let target = self.find_near(character, need("Eat what?")?)?;
                self.consume(character, target, &command.verb)
            }
            "say" => self.say(character, args),
            "pose" | "emote" => self.pose(character, args),
            "yell" | "shout" => self.yell(character, args),
            "stop" => self.stop(character),
            "time" => {
                self.time_report(character);
                Ok(())
            }
            "sheet" | "score" | "stats" => {
                let sheet = self.sheet(character);
                self.msg(character, sheet);
                Ok(())
            }
            "dig" => self
                .dig(
                    character,
                    &command.switches,
                    &command.lhs,
                    command.rhs.as_deref(),
                )
                .map(|_| ()),
            "@detail" => self.detail(
                character,
                &command.switches,
                &command.lhs,
                command.rhs.as_deref(),
            ),
            "@desc" | "@describe" | "desc" => self.describe(
                character,
                &command.switches,
                args,
                &command.lhs,
                command.rhs.as_deref(),
            ),
            "help" | "?" => {
                self.msg(character, HELP_TEXT);
                Ok(())
            }
            verb => {
                let room = self.repository.character(character).and_then(|c| c.location);
                if self.is_movement_command(room, verb) {
                    self.move_command(character, verb)
                } else {
                    Err(RuleError::Usage(format!(
                        "Unknown command '{}'. Type 'help' for a list of commands.",
                        verb
                    )))
                }
            }
        }
    }

    fn location_of(&self, character: ObjectId) -> Result<ObjectId, RuleError> {
        self.repository
            .character(character)
            .and_then(|c| c.location)
            .ok_or_else(|| RuleError::Usage("You are nowhere.".to_string()))
    }

    fn find_at(&self, query: &str, location: Location) -> Result<ObjectId, RuleError> {
        self.repository
            .find_item(query, &[location])
            .ok_or_else(|| RuleError::NotFound(query.to_string()))
    }

    fn find_carried(&self, character: ObjectId, query: &str) -> Result<ObjectId, RuleError> {
        self.repository
            .find_item(query, &[Location::Carried(character)])
            .ok_or_else(|| RuleError::NotCarrying(query.to_string()))
    }

    /// An item carried by `character` or, failing that, lying in its room.
    fn find_near(&self, character: ObjectId, query: &str) -> Result<ObjectId, RuleError> {
        let mut locations = vec![Location::Carried(character)];
        if let Some(room) = self.repository.character(character).and_then(|c| c.location) {
            locations.push(Location::Room(room));
        }
        self.repository
            .find_item(query, &locations)
            .ok_or_else(|| RuleError::NotFound(query.to_string()))
    }
}
