use std::collections::HashSet;

/// Flags carried by a single message (spec §4.5 `getMessageMetadata`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageFlags {
    pub confirmed: bool,
    pub replied: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageMetadata {
    pub turn_number: u32,
    pub flags: MessageFlags,
}

/// Verbs `performMessageAction` understands (spec §4.5
/// `getMessageActions`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageAction {
    Confirm,
    Delete,
    MarkRead,
    Reply,
    Forward,
}

/// A single parsed heading line (`(-r1000)<<< Sub Space Message >>>`
/// style headers are out of scope here; this is the semantic result).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageHeading {
    pub text: String,
}

/// Player-names table used to resolve `%N`-style substitutions in message
/// text (spec §4.1's template mechanism, reused here for message bodies).
#[derive(Debug, Clone, Default)]
pub struct PlayerNames {
    names: std::collections::BTreeMap<u8, String>,
}

impl PlayerNames {
    pub fn set(&mut self, player: u8, name: impl Into<String>) {
        self.names.insert(player, name.into());
    }

    pub fn get(&self, player: u8) -> Option<&str> {
        self.names.get(&player).map(|s| s.as_str())
    }
}

/// Abstract read interface over a collection of messages (spec §4.5
/// `Mailbox`). `Inbox`, `Outbox`, and `SubsetMailbox` all implement it;
/// callers never need to know which.
pub trait Mailbox {
    fn num_messages(&self) -> usize;
    fn message_body_text(&self, index: usize) -> Option<&str>;
    fn message_heading(&self, index: usize) -> Option<MessageHeading>;
    fn message_metadata(&self, index: usize) -> Option<MessageMetadata>;
    fn message_actions(&self, index: usize) -> HashSet<MessageAction>;
    fn perform_message_action(&mut self, index: usize, action: MessageAction);

    /// Substitutes `%N` player-number placeholders with `players`' names,
    /// leaving unresolved placeholders untouched (matches the friendly-code
    /// template substitution rule in spec §4.1).
    fn message_display_text(&self, index: usize, players: &PlayerNames) -> Option<String> {
        let body = self.message_body_text(index)?;
        Some(substitute_player_placeholders(body, players))
    }

    fn message_header_text(&self, index: usize) -> Option<String> {
        self.message_heading(index).map(|h| h.text)
    }

    fn message_reply_text(&self, index: usize) -> Option<String> {
        self.message_body_text(index).map(|body| format!("> {}", body.replace('\n', "\n> ")))
    }

    fn message_forward_text(&self, index: usize) -> Option<String> {
        self.message_body_text(index).map(|body| format!("--- Forwarded Message ---\n{body}"))
    }
}

fn substitute_player_placeholders(template: &str, players: &PlayerNames) -> String {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();
    let bytes = template.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let mut j = i + 1;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            if j > i + 1 {
                let n: u8 = template[i + 1..j].parse().unwrap_or(0);
                match players.get(n) {
                    Some(name) => out.push_str(name),
                    None => out.push_str(&template[i..j]),
                }
                i = j;
                continue;
            }
        }
        let ch = template[i..].chars().next().unwrap();
        out.push(ch);
        i += ch.len_utf8();
    }
    let _ = &mut chars;
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_substitution_resolves_known_players() {
        let mut players = PlayerNames::default();
        players.set(3, "The Crystal Confederation");
        let resolved = substitute_player_placeholders("Message from %3 received.", &players);
        assert_eq!(resolved, "Message from The Crystal Confederation received.");
    }

    #[test]
    fn placeholder_substitution_leaves_unknown_player_untouched() {
        let players = PlayerNames::default();
        let resolved = substitute_player_placeholders("Message from %9 received.", &players);
        assert_eq!(resolved, "Message from %9 received.");
    }
}
