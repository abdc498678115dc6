//! `Adaptor` exposes a sub-model from a session to a proxy (spec §4.4).
//! `Trampoline<S, A>` is the game-thread-resident cache a proxy's
//! trampoline holds: built once from the session on first use, then
//! reused by every later request (`makeTemporary`).

use std::sync::Mutex;

/// Marker for a concrete sub-model type (`MailboxAdaptor`,
/// `VcrDatabaseAdaptor`, `SimulationAdaptor`, ...). No methods of its
/// own: the adaptor's actual surface is whatever the proxy that consumes
/// it needs, since every proxy exposes a different sub-model.
pub trait Adaptor: Send + 'static {}

/// Caches an `A` built lazily from `&mut S` the first time
/// `make_temporary` runs, then reuses it for every subsequent call. Lives
/// entirely inside the game thread: every call to `make_temporary` must
/// happen from a closure already running on `S`'s owner thread (e.g. from
/// inside a `RequestSender<S>::post` closure).
pub struct Trampoline<S, A> {
    cache: Mutex<Option<A>>,
    build: Box<dyn Fn(&mut S) -> A + Send + Sync>,
}

impl<S, A: Adaptor> Trampoline<S, A> {
    pub fn new(build: impl Fn(&mut S) -> A + Send + Sync + 'static) -> Self {
        Self { cache: Mutex::new(None), build: Box::new(build) }
    }

    /// Runs `f` against the cached adaptor, constructing it from
    /// `session` first if this is the first call.
    pub fn make_temporary<R>(&self, session: &mut S, f: impl FnOnce(&mut A) -> R) -> R {
        let mut guard = self.cache.lock().expect("trampoline cache mutex poisoned");
        if guard.is_none() {
            *guard = Some((self.build)(session));
        }
        f(guard.as_mut().expect("just constructed above"))
    }

    /// Like `make_temporary`, but also hands `f` the live session: the
    /// adaptor is a cache (e.g. a current-position index) while the data
    /// it's a view over — the mailbox, the VCR database — stays owned by
    /// the session and is read fresh on every call.
    pub fn make_temporary_with<R>(&self, session: &mut S, f: impl FnOnce(&mut A, &mut S) -> R) -> R {
        let mut guard = self.cache.lock().expect("trampoline cache mutex poisoned");
        if guard.is_none() {
            *guard = Some((self.build)(session));
        }
        f(guard.as_mut().expect("just constructed above"), session)
    }

    /// Drops the cached adaptor so the next call rebuilds it from the
    /// session's then-current state. Call when the proxy owning this
    /// trampoline is destroyed (spec §4.4 "destruction releases it
    /// automatically when the proxy dies").
    pub fn release(&self) {
        *self.cache.lock().expect("trampoline cache mutex poisoned") = None;
    }
}
