//! `RequestSender<T>`/`RequestReceiver<T>` (spec §4.4): a handle that posts
//! "do X to T" closures onto T's owner thread, and the consumer side that
//! drains them. Built on `std::sync::mpsc` rather than the teacher's
//! `tokio::sync::mpsc` (see `DESIGN.md`): the teacher's actors are async
//! tasks, ours are the plain OS threads spec §5's two-logical-thread model
//! describes, so the std channel is the direct idiomatic match.

use std::sync::mpsc;

type Closure<T> = Box<dyn FnOnce(&mut T) + Send>;

/// Posts closures onto `T`'s owner thread. Cheap to clone; every clone
/// shares the same queue (spec §5 ordering guarantee 1: requests posted
/// to a given sender execute in posting order on T's thread).
pub struct RequestSender<T> {
    tx: mpsc::Sender<Closure<T>>,
}

impl<T> Clone for RequestSender<T> {
    fn clone(&self) -> Self {
        Self { tx: self.tx.clone() }
    }
}

impl<T> RequestSender<T> {
    /// Posts `f` to run against `T` on its owner thread. Asynchronous: does
    /// not wait for `f` to run. Silently dropped if the receiver has
    /// already been torn down (the owner thread is shutting down).
    pub fn post(&self, f: impl FnOnce(&mut T) + Send + 'static) {
        let _ = self.tx.send(Box::new(f));
    }
}

/// The consumer side: bound to an owning `T`, drained by a dispatcher
/// pumping the owner thread's event loop.
pub struct RequestReceiver<T> {
    rx: mpsc::Receiver<Closure<T>>,
}

/// Constructs a fresh sender/receiver pair for some `T`.
pub fn channel<T>() -> (RequestSender<T>, RequestReceiver<T>) {
    let (tx, rx) = mpsc::channel();
    (RequestSender { tx }, RequestReceiver { rx })
}

impl<T> RequestReceiver<T> {
    /// Runs every closure currently queued against `owner`, in FIFO order,
    /// without blocking for more to arrive. This is `RequestDispatcher`'s
    /// one real job: pump pending closures on the owner thread.
    pub fn drain(&self, owner: &mut T) -> usize {
        let mut processed = 0;
        while let Ok(job) = self.rx.try_recv() {
            job(owner);
            processed += 1;
        }
        processed
    }

    /// Blocks until at least one closure is available, then drains
    /// everything queued. Used by a dedicated owner-thread loop (as
    /// opposed to `drain`, which a UI event loop calls once per tick).
    pub fn block_and_drain(&self, owner: &mut T) -> bool {
        match self.rx.recv() {
            Ok(job) => {
                job(owner);
                self.drain(owner);
                true
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posted_closures_run_in_posting_order() {
        let (tx, rx) = channel::<Vec<i32>>();
        tx.post(|v| v.push(1));
        tx.post(|v| v.push(2));
        tx.post(|v| v.push(3));
        let mut owner = Vec::new();
        assert_eq!(rx.drain(&mut owner), 3);
        assert_eq!(owner, vec![1, 2, 3]);
    }

    #[test]
    fn drain_is_a_no_op_when_queue_empty() {
        let (_tx, rx) = channel::<i32>();
        let mut owner = 0;
        assert_eq!(rx.drain(&mut owner), 0);
    }
}
