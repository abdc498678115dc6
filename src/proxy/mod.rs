//! Thread-boundary proxy protocol (spec §4.4): binds the game-thread-
//! resident session to a single-threaded UI layer. Replaces the source's
//! proxy/adaptor/trampoline triangle with message-passing primitives, per
//! spec §9's explicit instruction for languages with channels.

pub mod adaptor;
pub mod proxies;
pub mod sender;
pub mod session_thread;
pub mod stopsignal;
pub mod wait;

pub use adaptor::{Adaptor, Trampoline};
pub use proxies::{MailboxProxy, OutboxProxy, SimulationRunProxy, SimulationUpdate};
pub use sender::{RequestReceiver, RequestSender, channel};
pub use session_thread::SessionThread;
pub use stopsignal::StopSignal;
pub use wait::WaitIndicator;
