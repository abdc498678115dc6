use crate::msg::mailbox::Mailbox;
use std::collections::HashSet;

/// Navigation mode for `Browser::browse` (spec §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseMode {
    First,
    Last,
    Next,
    Previous,
    NextUnread,
    PreviousUnread,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    Forward,
    Backward,
}

/// Per-game filter state: a set of headings flagged as filtered (hidden by
/// default). `Browser::browse` honors this unless `accept_filtered`
/// overrides it (spec §4.5 "Configuration").
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    filtered_headings: HashSet<String>,
}

impl Configuration {
    pub fn set_filtered(&mut self, heading: impl Into<String>, filtered: bool) {
        let heading = heading.into();
        if filtered {
            self.filtered_headings.insert(heading);
        } else {
            self.filtered_headings.remove(&heading);
        }
    }

    pub fn is_filtered(&self, heading: &str) -> bool {
        self.filtered_headings.contains(heading)
    }
}

/// A read position plus unread tracking. The source tracks "unread" via a
/// confirmed flag on each message; we track it the same way through
/// `Mailbox::message_metadata`.
fn is_unread(mailbox: &dyn Mailbox, index: usize) -> bool {
    mailbox.message_metadata(index).map(|m| !m.flags.confirmed).unwrap_or(false)
}

fn passes_filter(mailbox: &dyn Mailbox, config: &Configuration, index: usize, accept_filtered: bool) -> bool {
    if accept_filtered {
        return true;
    }
    match mailbox.message_heading(index) {
        Some(h) => !config.is_filtered(&h.text),
        None => true,
    }
}

/// Wraps a mailbox + filter configuration, providing semantic navigation
/// over it (spec §4.5 "Browser").
pub struct Browser<'a> {
    mailbox: &'a dyn Mailbox,
    config: &'a Configuration,
}

impl<'a> Browser<'a> {
    pub fn new(mailbox: &'a dyn Mailbox, config: &'a Configuration) -> Self {
        Self { mailbox, config }
    }

    /// First message that passes the current filter, if any.
    pub fn find_first_message(&self) -> Option<usize> {
        (0..self.mailbox.num_messages()).find(|&i| passes_filter(self.mailbox, self.config, i, false))
    }

    /// Steps `amount` messages from `current` in `mode`'s direction,
    /// honoring the filter unless `accept_filtered` is set.
    pub fn browse(&self, current: Option<usize>, mode: BrowseMode, amount: usize, accept_filtered: bool) -> Option<usize> {
        let n = self.mailbox.num_messages();
        if n == 0 {
            return None;
        }
        let candidate_ok = |i: usize| passes_filter(self.mailbox, self.config, i, accept_filtered);
        match mode {
            BrowseMode::First => (0..n).find(|&i| candidate_ok(i)),
            BrowseMode::Last => (0..n).rev().find(|&i| candidate_ok(i)),
            BrowseMode::Next => self.step(current.unwrap_or(0), amount.max(1), 1, &candidate_ok),
            BrowseMode::Previous => self.step(current.unwrap_or(0), amount.max(1), -1, &candidate_ok),
            BrowseMode::NextUnread => {
                self.step_while(current.unwrap_or(0), 1, &|i| candidate_ok(i) && is_unread(self.mailbox, i))
            }
            BrowseMode::PreviousUnread => {
                self.step_while(current.unwrap_or(0), -1, &|i| candidate_ok(i) && is_unread(self.mailbox, i))
            }
        }
    }

    fn step(&self, start: usize, amount: usize, dir: i64, ok: &dyn Fn(usize) -> bool) -> Option<usize> {
        let n = self.mailbox.num_messages() as i64;
        let mut pos = start as i64;
        let mut steps_taken = 0;
        let mut result = None;
        loop {
            pos += dir;
            if pos < 0 || pos >= n {
                break;
            }
            if ok(pos as usize) {
                steps_taken += 1;
                result = Some(pos as usize);
                if steps_taken == amount {
                    break;
                }
            }
        }
        result
    }

    fn step_while(&self, start: usize, dir: i64, ok: &dyn Fn(usize) -> bool) -> Option<usize> {
        let n = self.mailbox.num_messages() as i64;
        let mut pos = start as i64;
        loop {
            pos += dir;
            if pos < 0 || pos >= n {
                return None;
            }
            if ok(pos as usize) {
                return Some(pos as usize);
            }
        }
    }

    /// Finds the next/previous message (depending on `mode`) whose
    /// display text contains `needle` (case-insensitive).
    pub fn search(&self, current: Option<usize>, mode: SearchMode, accept_filtered: bool, needle: &str) -> Option<usize> {
        let n = self.mailbox.num_messages();
        if n == 0 || needle.is_empty() {
            return None;
        }
        let needle_lower = needle.to_lowercase();
        let candidate_ok = |i: usize| {
            passes_filter(self.mailbox, self.config, i, accept_filtered)
                && self.mailbox.message_body_text(i).is_some_and(|b| b.to_lowercase().contains(&needle_lower))
        };
        match mode {
            SearchMode::Forward => self.step(current.unwrap_or(0), usize::MAX, 1, &candidate_ok).or_else(|| {
                (0..n).find(|&i| candidate_ok(i))
            }),
            SearchMode::Backward => self.step(current.unwrap_or(n), usize::MAX, -1, &candidate_ok).or_else(|| {
                (0..n).rev().find(|&i| candidate_ok(i))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msg::inbox::Inbox;

    fn sample() -> Inbox {
        let mut inbox = Inbox::new();
        inbox.add("alpha report", "Intelligence", 1);
        inbox.add("beta report", "Intelligence", 1);
        inbox.add("routine housekeeping", "Housekeeping", 1);
        inbox
    }

    #[test]
    fn browse_next_skips_filtered_headings() {
        let inbox = sample();
        let mut config = Configuration::default();
        config.set_filtered("Housekeeping", true);
        let browser = Browser::new(&inbox, &config);
        assert_eq!(browser.browse(Some(0), BrowseMode::Next, 1, false), Some(1));
        assert_eq!(browser.browse(Some(1), BrowseMode::Next, 1, false), None);
        assert_eq!(browser.browse(Some(1), BrowseMode::Next, 1, true), Some(2));
    }

    #[test]
    fn search_forward_finds_case_insensitive_match() {
        let inbox = sample();
        let config = Configuration::default();
        let browser = Browser::new(&inbox, &config);
        assert_eq!(browser.search(Some(0), SearchMode::Forward, false, "BETA"), Some(1));
    }
}
