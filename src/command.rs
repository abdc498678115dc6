//! The command-message interface (spec §6.6): parses the VGAP "Command
//! Messages" grammar (`verb [id] argument`) and manages the per-player
//! set of pending commands. Grounded on
//! `examples/original_source/game/interface/*.hpp` for the
//! parse/add/delete/get contract shape.

use crate::error::CoreError;

/// One parsed command message: a verb (`give`, `remind`, `language`,
/// ...), an optional numeric id (ship/planet number), and the raw
/// argument text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: String,
    pub id: Option<u32>,
    pub arg: String,
}

impl Command {
    fn parse(text: &str) -> Result<Self, CoreError> {
        let verb = text.split_whitespace().next().ok_or_else(|| CoreError::Script("empty command message".into()))?.to_string();
        let rest = text.splitn(2, char::is_whitespace).nth(1).unwrap_or("").trim();
        match rest.split_whitespace().next() {
            Some(first) if parse_id(first).is_some() => {
                let id = parse_id(first);
                let arg = rest.splitn(2, char::is_whitespace).nth(1).unwrap_or("").trim().to_string();
                Ok(Self { verb, id, arg })
            }
            _ => Ok(Self { verb, id: None, arg: rest.to_string() }),
        }
    }

    fn matches(&self, verb: &str, id: Option<u32>) -> bool {
        self.verb.eq_ignore_ascii_case(verb) && self.id == id
    }
}

fn parse_id(token: &str) -> Option<u32> {
    token.parse::<u32>().ok()
}

/// The current player's set of pending command messages. A later
/// `AddCommand` for the same verb+id replaces the earlier one, matching
/// VGAP's "one order per unit per verb" semantics.
#[derive(Debug, Clone, Default)]
pub struct CommandContainer {
    commands: Vec<Command>,
}

impl CommandContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, cmd: Command) {
        self.commands.retain(|c| !c.matches(&cmd.verb, cmd.id));
        self.commands.push(cmd);
    }

    pub fn remove_matching(&mut self, verb: &str, id: Option<u32>) -> bool {
        let before = self.commands.len();
        self.commands.retain(|c| !c.matches(verb, id));
        self.commands.len() != before
    }

    pub fn find(&self, verb: &str, id: Option<u32>) -> Option<&Command> {
        self.commands.iter().find(|c| c.matches(verb, id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// `AddCommand(text)`: fails if no game is loaded (no container given) or
/// the text doesn't parse as a command message.
pub fn add_command(container: Option<&mut CommandContainer>, text: &str) -> Result<(), CoreError> {
    let container = container.ok_or_else(|| CoreError::Script("no game loaded".into()))?;
    let cmd = Command::parse(text)?;
    container.add(cmd);
    Ok(())
}

/// `DeleteCommand(text)`: parses and removes a matching command, silently
/// ignored when no container exists or nothing matches.
pub fn delete_command(container: Option<&mut CommandContainer>, text: &str) {
    let Some(container) = container else { return };
    if let Ok(cmd) = Command::parse(text) {
        container.remove_matching(&cmd.verb, cmd.id);
    }
}

/// `GetCommand(text) -> text|null`: parses and returns the argument of a
/// matching command, or `None`.
pub fn get_command(container: Option<&CommandContainer>, text: &str) -> Option<String> {
    let container = container?;
    let cmd = Command::parse(text).ok()?;
    container.find(&cmd.verb, cmd.id).map(|c| c.arg.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_verb_id_and_argument() {
        let cmd = Command::parse("give 5 7").unwrap();
        assert_eq!(cmd.verb, "give");
        assert_eq!(cmd.id, Some(5));
        assert_eq!(cmd.arg, "7");
    }

    #[test]
    fn parses_verb_only_argument_when_second_token_is_not_numeric() {
        let cmd = Command::parse("language English").unwrap();
        assert_eq!(cmd.verb, "language");
        assert_eq!(cmd.id, None);
        assert_eq!(cmd.arg, "English");
    }

    #[test]
    fn empty_text_fails_to_parse() {
        assert!(Command::parse("   ").is_err());
    }

    #[test]
    fn add_command_requires_a_loaded_game() {
        assert!(add_command(None, "give ship 5 7").is_err());
    }

    #[test]
    fn add_replaces_an_existing_command_for_the_same_verb_and_id() {
        let mut container = CommandContainer::new();
        add_command(Some(&mut container), "give 5 7").unwrap();
        add_command(Some(&mut container), "give 5 9").unwrap();
        assert_eq!(container.len(), 1);
        assert_eq!(get_command(Some(&container), "give 5 0"), Some("9".to_string()));
    }

    #[test]
    fn delete_command_is_a_no_op_without_a_container() {
        delete_command(None, "give 5 7");
    }

    #[test]
    fn delete_command_removes_the_matching_entry() {
        let mut container = CommandContainer::new();
        add_command(Some(&mut container), "remind 5 go").unwrap();
        delete_command(Some(&mut container), "remind 5");
        assert!(container.is_empty());
    }

    #[test]
    fn get_command_returns_none_when_nothing_matches() {
        let container = CommandContainer::new();
        assert_eq!(get_command(Some(&container), "give 5 0"), None);
    }
}
