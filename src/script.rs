//! The embedded scripting interpreter is an external collaborator (spec
//! §6.5): this module only defines the property/context contract the UI
//! implements and the interpreter calls through. Grounded on
//! `examples/original_source/game/interface/*.hpp`; pluggability follows
//! the teacher's preference for traits as the sole variation point (see
//! `crate::proxy::adaptor::Adaptor`), no inheritance hierarchy.

/// The well-known UI-state properties a script can read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Currently active screen number.
    ScreenNumber,
    /// Position within the current object iterator (ship/planet list).
    Iterator,
    /// Whether the simulator screen is active.
    SimFlag,
    ScanX,
    ScanY,
    ChartX,
    ChartY,
}

/// A property's value, as read from or written to a
/// `UserInterfacePropertyAccessor`.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Integer(i64),
    Str(String),
}

/// One layer of UI state willing to answer for some subset of
/// `Property` values. `get`/`set` return `None`/`false` to mean "not
/// mine", letting the stack fall through to the next accessor down.
pub trait UserInterfacePropertyAccessor {
    fn get(&self, prop: Property) -> Option<PropertyValue>;
    fn set(&mut self, prop: Property, value: &PropertyValue) -> bool;
}

/// LIFO of accessors; the most recently pushed one gets first refusal on
/// every property lookup, matching nested UI contexts (e.g. a dialog
/// temporarily shadowing the screen underneath it).
#[derive(Default)]
pub struct UserInterfacePropertyStack {
    layers: Vec<Box<dyn UserInterfacePropertyAccessor>>,
}

impl UserInterfacePropertyStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, accessor: Box<dyn UserInterfacePropertyAccessor>) {
        self.layers.push(accessor);
    }

    pub fn pop(&mut self) -> Option<Box<dyn UserInterfacePropertyAccessor>> {
        self.layers.pop()
    }

    pub fn get(&self, prop: Property) -> Option<PropertyValue> {
        self.layers.iter().rev().find_map(|layer| layer.get(prop))
    }

    pub fn set(&mut self, prop: Property, value: PropertyValue) -> bool {
        self.layers.iter_mut().rev().any(|layer| layer.set(prop, &value))
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Marker for a script-visible context object a `ContextProvider`
/// contributes (a ship, a planet, the session itself). No methods of
/// its own, same as `Adaptor`: the interpreter reflects into it by
/// whatever means it uses, which this crate does not define.
pub trait ScriptContext: Send {}

/// Accumulates the contexts contributed for one script invocation, in
/// the order providers are asked.
#[derive(Default)]
pub struct ContextReceiver {
    contexts: Vec<Box<dyn ScriptContext>>,
}

impl ContextReceiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, ctx: Box<dyn ScriptContext>) {
        self.contexts.push(ctx);
    }

    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

/// A collaborator that, given the live session, adds script-visible
/// contexts to `receiver` before a user script runs. `S` is whatever
/// session type the embedding application uses; this crate is generic
/// over it since it never implements a concrete one.
pub trait ContextProvider<S> {
    fn create_context(&self, session: &mut S, receiver: &mut ContextReceiver);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Property, i64);
    impl UserInterfacePropertyAccessor for Fixed {
        fn get(&self, prop: Property) -> Option<PropertyValue> {
            (prop == self.0).then(|| PropertyValue::Integer(self.1))
        }
        fn set(&mut self, prop: Property, value: &PropertyValue) -> bool {
            if prop == self.0 {
                if let PropertyValue::Integer(v) = value {
                    self.1 = *v;
                }
                true
            } else {
                false
            }
        }
    }

    #[test]
    fn stack_falls_through_to_the_layer_that_claims_the_property() {
        let mut stack = UserInterfacePropertyStack::new();
        stack.push(Box::new(Fixed(Property::ScreenNumber, 1)));
        stack.push(Box::new(Fixed(Property::Iterator, 7)));
        assert_eq!(stack.get(Property::ScreenNumber), Some(PropertyValue::Integer(1)));
        assert_eq!(stack.get(Property::Iterator), Some(PropertyValue::Integer(7)));
        assert_eq!(stack.get(Property::SimFlag), None);
    }

    #[test]
    fn the_top_layer_is_asked_first() {
        let mut stack = UserInterfacePropertyStack::new();
        stack.push(Box::new(Fixed(Property::ScreenNumber, 1)));
        stack.push(Box::new(Fixed(Property::ScreenNumber, 99)));
        assert_eq!(stack.get(Property::ScreenNumber), Some(PropertyValue::Integer(99)));
    }

    #[test]
    fn set_updates_the_claiming_layer() {
        let mut stack = UserInterfacePropertyStack::new();
        stack.push(Box::new(Fixed(Property::ScanX, 0)));
        assert!(stack.set(Property::ScanX, PropertyValue::Integer(42)));
        assert_eq!(stack.get(Property::ScanX), Some(PropertyValue::Integer(42)));
        assert!(!stack.set(Property::ScanY, PropertyValue::Integer(1)));
    }

    struct ShipContext;
    impl ScriptContext for ShipContext {}

    struct ShipContextProvider;
    impl ContextProvider<u32> for ShipContextProvider {
        fn create_context(&self, _session: &mut u32, receiver: &mut ContextReceiver) {
            receiver.add(Box::new(ShipContext));
        }
    }

    #[test]
    fn context_provider_contributes_to_the_receiver() {
        let mut session = 0u32;
        let mut receiver = ContextReceiver::new();
        ShipContextProvider.create_context(&mut session, &mut receiver);
        assert_eq!(receiver.len(), 1);
    }
}
