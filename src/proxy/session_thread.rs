//! The game thread itself: a real OS thread that owns a session object
//! `S` (Game + Root + ShipList, in the source; left generic here) and
//! processes nothing but posted closures (spec §5 "Scheduling": the game
//! thread has no suspension point of its own, it just serializes
//! requests off its dispatcher).

use crate::proxy::sender::{RequestSender, channel};
use std::thread::JoinHandle;

/// Owns the join handle and the sender used to post work; dropping it
/// does not itself stop the thread (callers decide shutdown semantics
/// explicitly via `shutdown`, since a proxy may still hold a clone of the
/// sender).
pub struct SessionThread<S> {
    sender: RequestSender<S>,
    handle: Option<JoinHandle<()>>,
}

impl<S: 'static> SessionThread<S> {
    /// Spawns the thread and constructs `S` on it via `build`. `S` itself
    /// need not be `Send`: only the posted closures cross the thread
    /// boundary, and `S` is built and dropped entirely within the new
    /// thread's stack.
    pub fn spawn(build: impl FnOnce() -> S + Send + 'static) -> Self {
        let (sender, receiver) = channel::<S>();
        let handle = std::thread::Builder::new()
            .name("game-thread".to_string())
            .spawn(move || {
                let mut session = build();
                while receiver.block_and_drain(&mut session) {}
            })
            .expect("spawning the game thread");
        Self { sender, handle: Some(handle) }
    }

    pub fn sender(&self) -> RequestSender<S> {
        self.sender.clone()
    }

    /// Drops every sender clone this struct holds, closing the channel
    /// so the thread's `block_and_drain` loop sees it disconnected and
    /// exits, then joins it.
    pub fn shutdown(self) {
        let SessionThread { sender, handle } = self;
        drop(sender);
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn posted_work_runs_on_the_spawned_thread() {
        let thread = SessionThread::spawn(|| 0i32);
        let sender = thread.sender();
        let (reply_tx, reply_rx) = mpsc::channel();
        sender.post(move |session| {
            *session += 41;
            let _ = reply_tx.send(*session);
        });
        assert_eq!(reply_rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap(), 41);
    }
}
