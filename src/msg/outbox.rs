//! The player's pending-send messages (spec §4.5 "Outbox") plus the v3 /
//! v3.5 on-disk record decode: a count header, then fixed-ish records.
//! v3 stores body/sender/receiver-mask in one shot; v3.5 adds a validity
//! byte and a length-prefixed body, and needs a "Winplan fixup" pass that
//! strips the extraneous linefeeds a legacy editor used to insert.

use crate::CoreError;
use crate::msg::mailbox::{Mailbox, MessageAction, MessageFlags, MessageHeading, MessageMetadata};
use byteorder::{LittleEndian, ReadBytesExt};
use std::collections::HashSet;
use std::io::{Cursor, Read};

pub type OutboxMessageId = u32;

#[derive(Debug, Clone)]
struct OutboxMessage {
    id: OutboxMessageId,
    body: String,
    receivers: [bool; 12],
    turn_number: u32,
}

/// Messages are addressed by stable id, not index, so background
/// modification (deleting one while the UI holds a reference to another)
/// is safe (spec §4.5).
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    messages: Vec<OutboxMessage>,
    next_id: OutboxMessageId,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, body: impl Into<String>, receivers: [bool; 12], turn_number: u32) -> OutboxMessageId {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(OutboxMessage { id, body: body.into(), receivers, turn_number });
        id
    }

    pub fn remove(&mut self, id: OutboxMessageId) {
        self.messages.retain(|m| m.id != id);
    }

    fn index_of(&self, id: OutboxMessageId) -> Option<usize> {
        self.messages.iter().position(|m| m.id == id)
    }

    fn index_by_position(&self, position: usize) -> Option<usize> {
        if position < self.messages.len() { Some(position) } else { None }
    }
}

impl Mailbox for Outbox {
    fn num_messages(&self) -> usize {
        self.messages.len()
    }

    fn message_body_text(&self, index: usize) -> Option<&str> {
        self.index_by_position(index).map(|i| self.messages[i].body.as_str())
    }

    fn message_heading(&self, index: usize) -> Option<MessageHeading> {
        self.index_by_position(index).map(|i| MessageHeading { text: format!("(out) message #{}", self.messages[i].id) })
    }

    fn message_metadata(&self, index: usize) -> Option<MessageMetadata> {
        self.index_by_position(index)
            .map(|i| MessageMetadata { turn_number: self.messages[i].turn_number, flags: MessageFlags::default() })
    }

    fn message_actions(&self, index: usize) -> HashSet<MessageAction> {
        let mut actions = HashSet::new();
        if self.index_by_position(index).is_some() {
            actions.insert(MessageAction::Delete);
        }
        actions
    }

    fn perform_message_action(&mut self, index: usize, action: MessageAction) {
        if action == MessageAction::Delete {
            if let Some(i) = self.index_by_position(index) {
                let id = self.messages[i].id;
                self.remove(id);
            }
        }
    }
}

const NUM_PLAYERS: usize = 11;

/// Strips the extraneous linefeeds a legacy "Winplan" tool used to insert
/// after every wrapped line: any `\r\n` not followed by another `\n`
/// (a hard paragraph break) collapses to a single space-joined line
/// (spec §4.5 "Winplan fixup").
pub fn winplan_fixup(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut lines = raw.split('\n').peekable();
    while let Some(line) = lines.next() {
        let trimmed = line.trim_end_matches('\r');
        out.push_str(trimmed);
        if trimmed.is_empty() {
            // the hard break this blank line marks was already emitted when
            // the previous line's turn ran; nothing more to add here.
            continue;
        }
        match lines.peek() {
            Some(next) if !next.trim_end_matches('\r').is_empty() => out.push(' '),
            Some(_) => out.push('\n'),
            None => {}
        }
    }
    out
}

/// Decodes a v3 outbox file: count header, then for each record a
/// fixed-length body, sender byte, and an 11-bit receiver mask packed
/// into two bytes.
pub fn decode_v3(bytes: &[u8]) -> Result<Vec<(String, [bool; 12])>, CoreError> {
    let mut cursor = Cursor::new(bytes);
    let count = cursor.read_u16::<LittleEndian>().map_err(fmt_err)? as usize;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let len = cursor.read_u16::<LittleEndian>().map_err(fmt_err)? as usize;
        let mut body_bytes = vec![0u8; len];
        cursor.read_exact(&mut body_bytes).map_err(fmt_err)?;
        let body = latin1_to_string(&body_bytes);
        let _sender = cursor.read_u8().map_err(fmt_err)?;
        let mask_lo = cursor.read_u8().map_err(fmt_err)?;
        let mask_hi = cursor.read_u8().map_err(fmt_err)?;
        let mask = (mask_lo as u16) | ((mask_hi as u16) << 8);
        let mut receivers = [false; 12];
        for (i, slot) in receivers.iter_mut().enumerate().take(NUM_PLAYERS) {
            *slot = mask & (1 << i) != 0;
        }
        out.push((body, receivers));
    }
    Ok(out)
}

/// Decodes a v3.5 outbox file: a validity byte per record, then ASCII
/// `'0'`/`'1'` receiver flags, then a length-prefixed body subjected to
/// the Winplan fixup.
pub fn decode_v35(bytes: &[u8]) -> Result<Vec<(String, [bool; 12])>, CoreError> {
    let mut cursor = Cursor::new(bytes);
    let count = cursor.read_u16::<LittleEndian>().map_err(fmt_err)? as usize;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let valid = cursor.read_u8().map_err(fmt_err)?;
        let mut flag_bytes = [0u8; NUM_PLAYERS];
        cursor.read_exact(&mut flag_bytes).map_err(fmt_err)?;
        let len = cursor.read_u16::<LittleEndian>().map_err(fmt_err)? as usize;
        let mut body_bytes = vec![0u8; len];
        cursor.read_exact(&mut body_bytes).map_err(fmt_err)?;
        if valid == 0 {
            continue;
        }
        let body = winplan_fixup(&latin1_to_string(&body_bytes));
        let mut receivers = [false; 12];
        for (i, slot) in receivers.iter_mut().enumerate().take(NUM_PLAYERS) {
            *slot = flag_bytes[i] == b'1';
        }
        out.push((body, receivers));
    }
    Ok(out)
}

fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn fmt_err(e: std::io::Error) -> CoreError {
    CoreError::FileFormat(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::WriteBytesExt;

    fn write_v3(body: &str, sender: u8, mask: u16) -> Vec<u8> {
        let mut out = Vec::new();
        out.write_u16::<LittleEndian>(1).unwrap();
        out.write_u16::<LittleEndian>(body.len() as u16).unwrap();
        out.extend_from_slice(body.as_bytes());
        out.write_u8(sender).unwrap();
        out.write_u8((mask & 0xff) as u8).unwrap();
        out.write_u8((mask >> 8) as u8).unwrap();
        out
    }

    #[test]
    fn v3_round_trip_decodes_body_and_receiver_mask() {
        let bytes = write_v3("hello", 3, 0b101);
        let decoded = decode_v3(&bytes).unwrap();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].0, "hello");
        assert!(decoded[0].1[0]);
        assert!(!decoded[0].1[1]);
        assert!(decoded[0].1[2]);
    }

    #[test]
    fn winplan_fixup_joins_wrapped_lines_but_keeps_blank_breaks() {
        let raw = "line one\r\nline two\r\n\r\nline three";
        let fixed = winplan_fixup(raw);
        assert_eq!(fixed, "line one line two\nline three");
    }

    #[test]
    fn v35_skips_invalid_records() {
        let mut out = Vec::new();
        out.write_u16::<LittleEndian>(1).unwrap();
        out.write_u8(0).unwrap(); // invalid
        out.extend_from_slice(&[b'0'; NUM_PLAYERS]);
        out.write_u16::<LittleEndian>(4).unwrap();
        out.extend_from_slice(b"test");
        let decoded = decode_v35(&out).unwrap();
        assert!(decoded.is_empty());
    }
}
