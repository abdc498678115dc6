//! A synchronous rendezvous (spec §4.4 "WaitIndicator"). `call(sender,
//! req)` posts `req` onto `sender`'s thread, then spins the *caller's own*
//! dispatcher until `req` completes — on the UI thread this means UI
//! events keep being pumped while waiting, so the call never freezes the
//! window even though it blocks logically.

use crate::proxy::sender::{RequestReceiver, RequestSender};
use std::sync::mpsc;
use std::time::Duration;

/// Binds the caller's own owner object and receiver (typically the UI's)
/// so `call` can keep pumping it while waiting for a reply.
pub struct WaitIndicator<'a, U> {
    own_owner: &'a mut U,
    own_receiver: &'a RequestReceiver<U>,
}

impl<'a, U> WaitIndicator<'a, U> {
    pub fn new(own_owner: &'a mut U, own_receiver: &'a RequestReceiver<U>) -> Self {
        Self { own_owner, own_receiver }
    }

    /// Posts `req` onto `sender`'s thread and blocks until it replies,
    /// pumping `own_receiver` against `own_owner` in the meantime so any
    /// requests posted back at the caller (e.g. progress callbacks) are
    /// not starved.
    pub fn call<T, R: Send + 'static>(&mut self, sender: &RequestSender<T>, req: impl FnOnce(&mut T) -> R + Send + 'static) -> R {
        let (reply_tx, reply_rx) = mpsc::channel();
        sender.post(move |owner| {
            let result = req(owner);
            let _ = reply_tx.send(result);
        });
        loop {
            self.own_receiver.drain(self.own_owner);
            match reply_rx.try_recv() {
                Ok(result) => return result,
                Err(mpsc::TryRecvError::Empty) => std::thread::sleep(Duration::from_micros(100)),
                Err(mpsc::TryRecvError::Disconnected) => {
                    panic!("WaitIndicator::call: owner thread dropped without replying")
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proxy::sender::channel;

    #[test]
    fn call_blocks_until_reply_while_still_pumping_own_queue() {
        let (session_tx, session_rx) = channel::<i32>();
        let mut session = 0;
        let handle = std::thread::spawn(move || {
            while session_rx.block_and_drain(&mut session) {}
        });

        let (ui_tx, ui_rx) = channel::<Vec<&'static str>>();
        let mut ui_owner = Vec::new();
        ui_tx.post(|log| log.push("queued before call"));

        let mut wait = WaitIndicator::new(&mut ui_owner, &ui_rx);
        let reply = wait.call(&session_tx, |s| {
            *s += 1;
            *s
        });
        assert_eq!(reply, 1);
        assert_eq!(ui_owner, vec!["queued before call"]);

        drop(session_tx);
        let _ = handle.join();
    }
}
