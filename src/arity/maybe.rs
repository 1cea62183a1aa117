//! `Maybe<T>`: a stream of zero or one item, then completion (spec §4.2,
//! arity 0 or 1).

use crate::emitter::Emitter;
use crate::policy::ViolationPolicy;
use crate::receiver::{MaybeReceiver, Receiver};
use crate::wrapper::MaybeWrapper;

/// A cold, one-shot `Open · Item? · Complete` stream (or `Open · Error`).
pub struct Maybe<T> {
    attach: Box<dyn FnOnce(Box<dyn Receiver<T>>)>,
}

impl<T: 'static> Maybe<T> {
    pub fn new(attach: impl FnOnce(Box<dyn Receiver<T>>) + 'static) -> Self {
        Self { attach: Box::new(attach) }
    }

    pub(crate) fn from_boxed(attach: Box<dyn FnOnce(Box<dyn Receiver<T>>)>) -> Self {
        Self { attach }
    }

    pub(crate) fn into_attach(self) -> Box<dyn FnOnce(Box<dyn Receiver<T>>)> {
        self.attach
    }

    /// A `Maybe` that completes immediately with no item.
    pub fn empty() -> Self {
        Maybe::new(|receiver: Box<dyn Receiver<T>>| {
            receiver.open(std::rc::Rc::new(crate::pipe::NoopPipe));
            receiver.complete();
        })
    }

    /// A `Maybe` that delivers exactly `item`.
    pub fn just(item: T) -> Self {
        crate::arity::Mono::just(item).widen_to_maybe()
    }

    /// Subscribes `delegate`, swallowing any protocol violation.
    pub fn subscribe_maybe(self, delegate: impl MaybeReceiver<T> + 'static) {
        self.subscribe_maybe_with_policy(delegate, ViolationPolicy::Ignore);
    }

    pub fn subscribe_maybe_with_policy(self, delegate: impl MaybeReceiver<T> + 'static, policy: ViolationPolicy) {
        self.subscribe(MaybeWrapper::new(delegate, policy));
    }

    /// Transforms the item, if any, with `f` (spec §4.9, C9).
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Maybe<U> {
        Maybe::from_boxed(crate::map::attach(self.attach, f))
    }
}

impl<T> Emitter<T> for Maybe<T> {
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
    fn empty_completes_with_no_item() {
        let receiver = Rc::new(ScriptedReceiver::new());
        Maybe::<i32>::empty().subscribe(receiver.clone());
        receiver.request_all();
        assert_eq!(receiver.item_count(), 0);
        assert!(receiver.is_complete());
    }

    #[test]
    fn just_emits_then_completes() {
        let receiver = Rc::new(ScriptedReceiver::new());
        Maybe::just(3).subscribe(receiver.clone());
        receiver.request_all();
        assert_eq!(receiver.items(), vec![3]);
        assert!(receiver.is_complete());
    }
}
