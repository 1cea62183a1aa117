//! Arity conversions (spec §4.11, C11).
//!
//! Widening — `Mono`/`Maybe`/`Many` into each other's superset arity —
//! needs no adapter at all: all three share the same general
//! `Receiver<T>`-based attach-closure signature, so a `Mono<T>` is
//! already, structurally, a `Many<T>` that happens to deliver one item.
//! Only conversions touching `Mute` need a real adapter, because `Mute`'s
//! protocol is keyed to `Receiver<Infallible>` rather than `Receiver<T>`.

use std::convert::Infallible;
use std::rc::Rc;

use crate::arity::{Many, Maybe, Mono, Mute};
use crate::emitter::Emitter;
use crate::error::BoxError;
use crate::pipe::Pipe;
use crate::receiver::Receiver;

/// Adapts a `Receiver<T>` into `Receiver<Infallible>`: `receive` is
/// unreachable by construction, since `Infallible` has no values.
struct WidenFromMute<T> {
    downstream: Box<dyn Receiver<T>>,
}

impl<T> Receiver<Infallible> for WidenFromMute<T> {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        self.downstream.open(pipe);
    }
    fn receive(&self, item: Infallible) {
        match item {}
    }
    fn complete(&self) {
        self.downstream.complete();
    }
    fn error(&self, err: BoxError) {
        self.downstream.error(err);
    }
}

impl Mute {
    /// Widens a `Mute` into a `Maybe<T>` that always completes empty.
    pub fn widen_to_maybe<T: 'static>(self) -> Maybe<T> {
        Maybe::new(move |downstream: Box<dyn Receiver<T>>| {
            let adapter: Box<dyn Receiver<Infallible>> = Box::new(WidenFromMute { downstream });
            (self.into_attach())(adapter);
        })
    }

    /// Widens a `Mute` into a `Many<T>` that never delivers an item.
    pub fn widen_to_many<T: 'static>(self) -> Many<T> {
        Many::new(move |downstream: Box<dyn Receiver<T>>| {
            let adapter: Box<dyn Receiver<Infallible>> = Box::new(WidenFromMute { downstream });
            (self.into_attach())(adapter);
        })
    }

    /// Narrows a `Mute` into a `Mono<T>`: on completion, synthesizes the
    /// single item by calling `completer`. An upstream error still
    /// short-circuits straight to `Error`, without calling `completer`.
    pub fn as_mono<T: 'static>(self, completer: impl FnOnce() -> T + 'static) -> Mono<T> {
        Mono::new(move |downstream: Box<dyn Receiver<T>>| {
            let adapter: Box<dyn Receiver<Infallible>> = Box::new(MuteAsMono {
                downstream,
                completer: std::cell::RefCell::new(Some(completer)),
            });
            (self.into_attach())(adapter);
        })
    }
}

struct MuteAsMono<T, F> {
    downstream: Box<dyn Receiver<T>>,
    completer: std::cell::RefCell<Option<F>>,
}

impl<T, F: FnOnce() -> T> Receiver<Infallible> for MuteAsMono<T, F> {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        self.downstream.open(pipe);
    }
    fn receive(&self, item: Infallible) {
        match item {}
    }
    fn complete(&self) {
        if let Some(completer) = self.completer.borrow_mut().take() {
            self.downstream.receive(completer());
        }
        self.downstream.complete();
    }
    fn error(&self, err: BoxError) {
        self.downstream.error(err);
    }
}

impl<T: 'static> Mono<T> {
    /// Widens a `Mono<T>` into a `Maybe<T>`: pure re-tag.
    pub fn widen_to_maybe(self) -> Maybe<T> {
        Maybe::from_boxed(self.into_attach())
    }

    /// Widens a `Mono<T>` into a `Many<T>`: pure re-tag.
    pub fn widen_to_many(self) -> Many<T> {
        Many::from_boxed(self.into_attach())
    }
}

impl<T: 'static> Maybe<T> {
    /// Widens a `Maybe<T>` into a `Many<T>`: pure re-tag.
    pub fn widen_to_many(self) -> Many<T> {
        Many::from_boxed(self.into_attach())
    }

    /// Narrows a `Maybe<T>` into a `Mono<T>`, synthesizing `absent()` in
    /// place of a missing item.
    pub fn as_mono_with(self, absent: impl FnOnce() -> T + 'static) -> Mono<T> {
        Mono::new(move |downstream: Box<dyn Receiver<T>>| {
            let adapter: Box<dyn Receiver<T>> = Box::new(MaybeAsMono {
                downstream,
                absent: std::cell::RefCell::new(Some(absent)),
                seen: std::cell::Cell::new(false),
            });
            (self.into_attach())(adapter);
        })
    }

    /// Narrows a `Maybe<T>` into a `Mono<Option<T>>`: absence becomes
    /// `None`, presence becomes `Some`. Never violates the `Mono`
    /// contract, since "zero or one" collapses into "exactly one" by
    /// making absence itself the value.
    pub fn as_mono_option(self) -> Mono<Option<T>> {
        Mono::new(move |downstream: Box<dyn Receiver<Option<T>>>| {
            let adapter: Box<dyn Receiver<T>> = Box::new(MaybeAsMonoOption { downstream });
            (self.into_attach())(adapter);
        })
    }
}

struct MaybeAsMono<T, F> {
    downstream: Box<dyn Receiver<T>>,
    absent: std::cell::RefCell<Option<F>>,
    seen: std::cell::Cell<bool>,
}

impl<T, F: FnOnce() -> T> Receiver<T> for MaybeAsMono<T, F> {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        self.downstream.open(pipe);
    }
    fn receive(&self, item: T) {
        self.seen.set(true);
        self.downstream.receive(item);
    }
    fn complete(&self) {
        if !self.seen.get() {
            if let Some(absent) = self.absent.borrow_mut().take() {
                self.downstream.receive(absent());
            }
        }
        self.downstream.complete();
    }
    fn error(&self, err: BoxError) {
        self.downstream.error(err);
    }
}

struct MaybeAsMonoOption<T> {
    downstream: Box<dyn Receiver<Option<T>>>,
}

impl<T> Receiver<T> for MaybeAsMonoOption<T> {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        self.downstream.open(pipe);
    }
    fn receive(&self, item: T) {
        self.downstream.receive(Some(item));
    }
    fn complete(&self) {
        self.downstream.complete();
    }
    fn error(&self, err: BoxError) {
        self.downstream.error(err);
    }
}

struct DiscardItems {
    downstream: Box<dyn Receiver<Infallible>>,
}

impl<T> Receiver<T> for DiscardItems {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        self.downstream.open(pipe);
    }
    fn receive(&self, _item: T) {}
    fn complete(&self) {
        self.downstream.complete();
    }
    fn error(&self, err: BoxError) {
        self.downstream.error(err);
    }
}

/// Discards every item from any arity, keeping only completion/error —
/// the `Emitter -> Mute` conversion. A free function rather than a
/// method, since it applies uniformly across `Mono`/`Maybe`/`Many`
/// rather than belonging to any one of them.
pub fn mute<T: 'static>(source: impl Emitter<T> + 'static) -> Mute {
    Mute::new(move |downstream: Box<dyn Receiver<Infallible>>| {
        let adapter: Box<dyn Receiver<T>> = Box::new(DiscardItems { downstream });
        source.subscribe(adapter);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source;
    use crate::testing::ScriptedReceiver;

    #[test]
    fn maybe_as_mono_option_wraps_presence() {
        let receiver = Rc::new(ScriptedReceiver::new());
        source::single(5).widen_to_maybe().as_mono_option().subscribe(receiver.clone());
        receiver.request_all();
        assert_eq!(receiver.items(), vec![Some(5)]);
        assert!(receiver.is_complete());
    }

    #[test]
    fn mute_as_mono_synthesizes_on_complete() {
        let receiver = Rc::new(ScriptedReceiver::new());
        Mute::empty().as_mono(|| 42).subscribe(receiver.clone());
        receiver.request_all();
        assert_eq!(receiver.items(), vec![42]);
        assert!(receiver.is_complete());
    }

    #[test]
    fn mute_discards_items_from_many() {
        let receiver = Rc::new(ScriptedReceiver::new());
        mute(source::iterable(vec![1, 2, 3])).subscribe(receiver.clone());
        receiver.request_all();
        assert_eq!(receiver.item_count(), 0);
        assert!(receiver.is_complete());
    }
}
