//! An opt-in reactive-streams-shaped bridge (spec §4.12 supplement),
//! gated behind the `interop` feature and off by default. `fluxion`'s own
//! protocol already lines up one-for-one with the reactive-streams
//! `Publisher`/`Subscriber`/`Subscription` triad — [`crate::emitter::Emitter`]
//! is a `Publisher`, [`crate::receiver::Receiver`] a `Subscriber`,
//! [`crate::pipe::Pipe`] a `Subscription` — so these adapters exist only
//! to let code already written against that vocabulary talk to a
//! `fluxion` stream without learning a second one.

use std::marker::PhantomData;
use std::rc::Rc;

use crate::emitter::Emitter;
use crate::error::BoxError;
use crate::pipe::Pipe;
use crate::receiver::Receiver;

/// The reactive-streams subscriber vocabulary.
pub trait Subscriber<T> {
    fn on_subscribe(&self, subscription: Rc<dyn Pipe>);
    fn on_next(&self, item: T);
    fn on_complete(&self);
    fn on_error(&self, err: BoxError);
}

/// Adapts any [`Subscriber`] into a [`Receiver`], for use with
/// [`Emitter::subscribe`].
pub struct AsReceiver<T, S: Subscriber<T>> {
    subscriber: S,
    _marker: PhantomData<T>,
}

impl<T, S: Subscriber<T>> AsReceiver<T, S> {
    pub fn new(subscriber: S) -> Self {
        Self {
            subscriber,
            _marker: PhantomData,
        }
    }
}

impl<T, S: Subscriber<T>> Receiver<T> for AsReceiver<T, S> {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        self.subscriber.on_subscribe(pipe);
    }

    fn receive(&self, item: T) {
        self.subscriber.on_next(item);
    }

    fn complete(&self) {
        self.subscriber.on_complete();
    }

    fn error(&self, err: BoxError) {
        self.subscriber.on_error(err);
    }
}

/// The reactive-streams publisher vocabulary, implemented by every
/// [`Emitter`].
pub trait Publisher<T> {
    fn subscribe_rs(self, subscriber: impl Subscriber<T> + 'static);
}

impl<T: 'static, E: Emitter<T>> Publisher<T> for E {
    fn subscribe_rs(self, subscriber: impl Subscriber<T> + 'static) {
        self.subscribe(AsReceiver::new(subscriber));
    }
}
