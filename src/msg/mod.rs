pub mod browser;
pub mod inbox;
pub mod mailbox;
pub mod outbox;

pub use browser::{Browser, BrowseMode, Configuration, SearchMode};
pub use inbox::{Inbox, SubsetMailbox};
pub use mailbox::{Mailbox, MessageAction, MessageFlags, MessageHeading, MessageMetadata, PlayerNames};
pub use outbox::{Outbox, OutboxMessageId};
