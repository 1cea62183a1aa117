//! `Mute`: a stream of exactly one terminal signal and no items (spec
//! §4.2, arity 0).

use std::convert::Infallible;

use crate::emitter::Emitter;
use crate::policy::ViolationPolicy;
use crate::receiver::{MuteReceiver, Receiver};
use crate::source;
use crate::wrapper::MuteWrapper;

/// A cold, one-shot `Open · (Complete | Error)` stream.
pub struct Mute {
    attach: Box<dyn FnOnce(Box<dyn Receiver<Infallible>>)>,
}

impl Mute {
    /// Builds a `Mute` from a raw attach recipe: given the general
    /// receiver a subscriber eventually supplies, wire up whatever
    /// source or operator chain produces its signals.
    pub fn new(attach: impl FnOnce(Box<dyn Receiver<Infallible>>) + 'static) -> Self {
        Self { attach: Box::new(attach) }
    }

    pub(crate) fn into_attach(self) -> Box<dyn FnOnce(Box<dyn Receiver<Infallible>>)> {
        self.attach
    }

    /// A `Mute` that completes immediately.
    pub fn empty() -> Self {
        source::empty()
    }

    /// Subscribes `delegate`, swallowing any protocol violation.
    pub fn subscribe_mute(self, delegate: impl MuteReceiver + 'static) {
        self.subscribe_mute_with_policy(delegate, ViolationPolicy::Ignore);
    }

    pub fn subscribe_mute_with_policy(self, delegate: impl MuteReceiver + 'static, policy: ViolationPolicy) {
        self.subscribe(MuteWrapper::new(delegate, policy));
    }
}

impl Emitter<Infallible> for Mute {
    fn subscribe(self, receiver: impl Receiver<Infallible> + 'static) {
        (self.attach)(Box::new(receiver));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedReceiver;
    use std::rc::Rc;

    #[test]
    fn empty_completes_with_no_items() {
        let receiver = Rc::new(ScriptedReceiver::new());
        Mute::empty().subscribe(receiver.clone());
        receiver.request_all();
        assert_eq!(receiver.item_count(), 0);
        assert!(receiver.is_complete());
    }
}
