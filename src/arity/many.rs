//! `Many<T>`: a stream of any number of items, then at most one terminal
//! signal (spec §4.2, arity 0..N).

use crate::emitter::Emitter;
use crate::policy::ViolationPolicy;
use crate::receiver::{ManyReceiver, Receiver};
use crate::source;
use crate::wrapper::ManyWrapper;

/// A cold, one-shot `Open · Item* · (Complete | Error)?` stream.
pub struct Many<T> {
    attach: Box<dyn FnOnce(Box<dyn Receiver<T>>)>,
}

impl<T: 'static> Many<T> {
    pub fn new(attach: impl FnOnce(Box<dyn Receiver<T>>) + 'static) -> Self {
        Self { attach: Box::new(attach) }
    }

    pub(crate) fn from_boxed(attach: Box<dyn FnOnce(Box<dyn Receiver<T>>)>) -> Self {
        Self { attach }
    }

    pub(crate) fn into_attach(self) -> Box<dyn FnOnce(Box<dyn Receiver<T>>)> {
        self.attach
    }

    /// A `Many` over `items`, delivered only as demand allows.
    pub fn iterable<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T> + 'static,
        I::IntoIter: 'static,
    {
        source::iterable(items)
    }

    /// A `Many` that opens and then never signals again.
    pub fn never() -> Self {
        source::never()
    }

    /// Subscribes `delegate`, swallowing any protocol violation.
    pub fn subscribe_many(self, delegate: impl ManyReceiver<T> + 'static) {
        self.subscribe_many_with_policy(delegate, ViolationPolicy::Ignore);
    }

    pub fn subscribe_many_with_policy(self, delegate: impl ManyReceiver<T> + 'static, policy: ViolationPolicy) {
        self.subscribe(ManyWrapper::new(delegate, policy));
    }

    /// Transforms each item with `f` (spec §4.9, C9).
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Many<U> {
        Many::from_boxed(crate::map::attach(self.attach, f))
    }

    /// Buffers upstream without bound, decoupling upstream's pace from
    /// downstream's (spec §4.7, C8).
    pub fn buffer_unbounded(self) -> Many<T> {
        Many::from_boxed(crate::buffer::unbounded_attach(self.attach))
    }

    /// Buffers up to `capacity` items, priming upstream with `capacity`
    /// units of demand at subscribe time (spec §4.7, C8).
    pub fn buffer_fixed(self, capacity: i64) -> Many<T> {
        Many::from_boxed(crate::buffer::fixed_attach(self.attach, capacity))
    }
}

impl<T> Emitter<T> for Many<T> {
    fn subscribe(self, receiver: impl Receiver<T> + 'static) {
        (self.attach)(Box::new(receiver));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedReceiver;
    use std::rc::Rc;

    #[test]
    fn iterable_emits_in_order_then_completes() {
        let receiver = Rc::new(ScriptedReceiver::new());
        Many::iterable(vec![6, 7, 4, 2]).subscribe(receiver.clone());
        receiver.request_all();
        assert_eq!(receiver.items(), vec![6, 7, 4, 2]);
        assert!(receiver.is_complete());
    }

    #[test]
    fn iterable_over_an_array_matches_iterable_over_a_vec() {
        let receiver = Rc::new(ScriptedReceiver::new());
        Many::iterable([6, 7, 4, 2]).subscribe(receiver.clone());
        receiver.request_all();
        assert_eq!(receiver.items(), vec![6, 7, 4, 2]);
        assert!(receiver.is_complete());
    }
}
