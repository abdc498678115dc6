use crate::msg::mailbox::{Mailbox, MessageAction, MessageFlags, MessageHeading, MessageMetadata};
use std::collections::HashSet;

#[derive(Debug, Clone)]
struct InboxMessage {
    body: String,
    heading: String,
    turn_number: u32,
    flags: MessageFlags,
    /// Ship/planet ids this message is "about", for the subset views a
    /// `MailboxAdaptor` builds (spec §4.5 "SubsetMailbox").
    ship_ids: Vec<usize>,
    planet_ids: Vec<usize>,
}

/// The concrete, game-populated instance of `Mailbox` (spec §4.5
/// "Inbox"). Indexed 0..N in load order.
#[derive(Debug, Clone, Default)]
pub struct Inbox {
    messages: Vec<InboxMessage>,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, body: impl Into<String>, heading: impl Into<String>, turn_number: u32) -> usize {
        self.messages.push(InboxMessage {
            body: body.into(),
            heading: heading.into(),
            turn_number,
            flags: MessageFlags::default(),
            ship_ids: Vec::new(),
            planet_ids: Vec::new(),
        });
        self.messages.len() - 1
    }

    pub fn associate_ship(&mut self, index: usize, ship_id: usize) {
        if let Some(m) = self.messages.get_mut(index) {
            m.ship_ids.push(ship_id);
        }
    }

    pub fn associate_planet(&mut self, index: usize, planet_id: usize) {
        if let Some(m) = self.messages.get_mut(index) {
            m.planet_ids.push(planet_id);
        }
    }

    /// Indices of messages associated with `ship_id`, in ascending order
    /// (the index space a `SubsetMailbox` is built from).
    pub fn indices_for_ship(&self, ship_id: usize) -> Vec<usize> {
        self.messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.ship_ids.contains(&ship_id))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn indices_for_planet(&self, planet_id: usize) -> Vec<usize> {
        self.messages
            .iter()
            .enumerate()
            .filter(|(_, m)| m.planet_ids.contains(&planet_id))
            .map(|(i, _)| i)
            .collect()
    }
}

impl Mailbox for Inbox {
    fn num_messages(&self) -> usize {
        self.messages.len()
    }

    fn message_body_text(&self, index: usize) -> Option<&str> {
        self.messages.get(index).map(|m| m.body.as_str())
    }

    fn message_heading(&self, index: usize) -> Option<MessageHeading> {
        self.messages.get(index).map(|m| MessageHeading { text: m.heading.clone() })
    }

    fn message_metadata(&self, index: usize) -> Option<MessageMetadata> {
        self.messages.get(index).map(|m| MessageMetadata { turn_number: m.turn_number, flags: m.flags })
    }

    fn message_actions(&self, index: usize) -> HashSet<MessageAction> {
        let mut actions = HashSet::new();
        if self.messages.get(index).is_some() {
            actions.insert(MessageAction::Confirm);
            actions.insert(MessageAction::Delete);
            actions.insert(MessageAction::MarkRead);
            actions.insert(MessageAction::Reply);
            actions.insert(MessageAction::Forward);
        }
        actions
    }

    fn perform_message_action(&mut self, index: usize, action: MessageAction) {
        let Some(m) = self.messages.get_mut(index) else { return };
        match action {
            MessageAction::Confirm => m.flags.confirmed = true,
            MessageAction::Reply | MessageAction::Forward => m.flags.replied = true,
            MessageAction::Delete | MessageAction::MarkRead => {}
        }
    }
}

/// Wraps a parent mailbox and an index list, projecting a subset view
/// (spec §4.5 "SubsetMailbox"): "messages about planet P", etc. Indices
/// into the subset map onto the parent's index space via `indices`.
pub struct SubsetMailbox<'a> {
    parent: &'a mut dyn Mailbox,
    indices: Vec<usize>,
}

impl<'a> SubsetMailbox<'a> {
    pub fn new(parent: &'a mut dyn Mailbox, indices: Vec<usize>) -> Self {
        Self { parent, indices }
    }

    /// Maps a subset-local index back to the parent's global index
    /// (S5: "setting message index 5 via the planet-subset adaptor
    /// persists global index 5").
    pub fn outer_index(&self, local_index: usize) -> Option<usize> {
        self.indices.get(local_index).copied()
    }
}

impl<'a> Mailbox for SubsetMailbox<'a> {
    fn num_messages(&self) -> usize {
        self.indices.len()
    }

    fn message_body_text(&self, index: usize) -> Option<&str> {
        let outer = self.outer_index(index)?;
        self.parent.message_body_text(outer)
    }

    fn message_heading(&self, index: usize) -> Option<MessageHeading> {
        let outer = self.outer_index(index)?;
        self.parent.message_heading(outer)
    }

    fn message_metadata(&self, index: usize) -> Option<MessageMetadata> {
        let outer = self.outer_index(index)?;
        self.parent.message_metadata(outer)
    }

    fn message_actions(&self, index: usize) -> HashSet<MessageAction> {
        match self.outer_index(index) {
            Some(outer) => self.parent.message_actions(outer),
            None => HashSet::new(),
        }
    }

    fn perform_message_action(&mut self, index: usize, action: MessageAction) {
        if let Some(outer) = self.outer_index(index) {
            self.parent.perform_message_action(outer, action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_inbox() -> Inbox {
        let mut inbox = Inbox::new();
        for i in 0..7 {
            inbox.add(format!("body {i}"), format!("heading {i}"), 10);
        }
        inbox.associate_planet(2, 333);
        inbox.associate_planet(5, 333);
        inbox.associate_ship(3, 222);
        inbox
    }

    /// §8.2 S5: planet subset has size 2, ship subset has size 1, the
    /// global inbox remains size 7.
    #[test]
    fn subset_views_do_not_affect_parent_size() {
        let mut inbox = seeded_inbox();
        assert_eq!(inbox.num_messages(), 7);

        let planet_indices = inbox.indices_for_ship(222);
        assert_eq!(planet_indices, vec![3]);

        let ship_subset = SubsetMailbox::new(&mut inbox, planet_indices);
        assert_eq!(ship_subset.num_messages(), 1);
    }

    #[test]
    fn planet_subset_has_expected_size_and_outer_indices() {
        let mut inbox = seeded_inbox();
        let planet_indices = inbox.indices_for_planet(333);
        assert_eq!(planet_indices, vec![2, 5]);
        let subset = SubsetMailbox::new(&mut inbox, planet_indices);
        assert_eq!(subset.num_messages(), 2);
        assert_eq!(subset.outer_index(1), Some(5));
    }
}
