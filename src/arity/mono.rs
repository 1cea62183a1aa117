//! `Mono<T>`: a stream of exactly one item, then completion (spec §4.2,
//! arity 1).

use crate::emitter::Emitter;
use crate::policy::ViolationPolicy;
use crate::receiver::{MonoReceiver, Receiver};
use crate::source;
use crate::wrapper::MonoWrapper;

/// A cold, one-shot `Open · Item · Complete` stream (or `Open · Error`).
pub struct Mono<T> {
    attach: Box<dyn FnOnce(Box<dyn Receiver<T>>)>,
}

impl<T: 'static> Mono<T> {
    pub fn new(attach: impl FnOnce(Box<dyn Receiver<T>>) + 'static) -> Self {
        Self { attach: Box::new(attach) }
    }

    pub(crate) fn from_boxed(attach: Box<dyn FnOnce(Box<dyn Receiver<T>>)>) -> Self {
        Self { attach }
    }

    pub(crate) fn into_attach(self) -> Box<dyn FnOnce(Box<dyn Receiver<T>>)> {
        self.attach
    }

    /// A `Mono` that delivers exactly `item`.
    pub fn just(item: T) -> Self {
        source::single(item)
    }

    /// Subscribes `delegate`, swallowing any protocol violation.
    pub fn subscribe_mono(self, delegate: impl MonoReceiver<T> + 'static) {
        self.subscribe_mono_with_policy(delegate, ViolationPolicy::Ignore);
    }

    pub fn subscribe_mono_with_policy(self, delegate: impl MonoReceiver<T> + 'static, policy: ViolationPolicy) {
        self.subscribe(MonoWrapper::new(delegate, policy));
    }

    /// Transforms the item with `f` (spec §4.9, C9). A panic from `f` is
    /// caught and delivered as an `Error` rather than unwinding through
    /// the emitter.
    pub fn map<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Mono<U> {
        Mono::from_boxed(crate::map::attach(self.attach, f))
    }
}

impl<T> Emitter<T> for Mono<T> {
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
    fn just_emits_then_completes() {
        let receiver = Rc::new(ScriptedReceiver::new());
        Mono::just(3).subscribe(receiver.clone());
        receiver.request_all();
        assert_eq!(receiver.items(), vec![3]);
        assert!(receiver.is_complete());
    }
}
