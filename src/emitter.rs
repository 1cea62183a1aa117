//! The `Emitter` trait (spec §6): a source of a typed signal stream with
//! a single operation, `subscribe`.

use crate::receiver::Receiver;

/// A source of signals conforming to `Open · Item* · (Complete | Error)?`.
///
/// Every `subscribe` call builds a fresh, private chain (spec §3: "There
/// is no shared mutable fan-out in the core"), which is why `subscribe`
/// takes `self` by value: an emitter is a one-shot recipe, not a hot,
/// re-subscribable source.
pub trait Emitter<T> {
    fn subscribe(self, receiver: impl Receiver<T> + 'static)
    where
        Self: Sized;
}
