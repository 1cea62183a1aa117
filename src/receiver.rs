//! The general receiver and the four arity-specialized receivers
//! (spec §4.2). The general [`Receiver`] is the union of every callback
//! and is the adapter target any arity wrapper produces.

use std::rc::Rc;

use crate::error::BoxError;
use crate::pipe::Pipe;

/// The union of every signal callback. Every emitter ultimately talks to
/// one of these; arity wrappers (see [`crate::wrapper`]) are how a
/// specialized receiver becomes one.
pub trait Receiver<T> {
    /// Delivered exactly once, before any other callback.
    fn open(&self, pipe: Rc<dyn Pipe>);
    /// Delivered zero or more times, never exceeding outstanding demand.
    fn receive(&self, item: T);
    /// Delivered at most once, and never after `error`.
    fn complete(&self);
    /// Delivered at most once, and never after `complete`.
    fn error(&self, err: BoxError);
}

impl<T, R: Receiver<T> + ?Sized> Receiver<T> for Rc<R> {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        (**self).open(pipe)
    }
    fn receive(&self, item: T) {
        (**self).receive(item)
    }
    fn complete(&self) {
        (**self).complete()
    }
    fn error(&self, err: BoxError) {
        (**self).error(err)
    }
}

impl<T, R: Receiver<T> + ?Sized> Receiver<T> for Box<R> {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        (**self).open(pipe)
    }
    fn receive(&self, item: T) {
        (**self).receive(item)
    }
    fn complete(&self) {
        (**self).complete()
    }
    fn error(&self, err: BoxError) {
        (**self).error(err)
    }
}

/// A receiver for a stream that never carries an item: `Mute`.
///
/// `T` is left generic (rather than hard-coding `Infallible`) so the
/// trait can also back the `interop` adapters; [`crate::arity::Mute`]
/// itself always instantiates it over [`std::convert::Infallible`], which
/// makes "no item callback" a type-level guarantee rather than merely a
/// documented one.
pub trait MuteReceiver {
    /// Default requests infinite demand: a `Mute` stream never delivers
    /// items, so there is nothing to pace.
    fn open(&self, pipe: Rc<dyn Pipe>) {
        pipe.request_all();
    }
    fn complete(&self);
    fn error(&self, err: BoxError);
}

/// A receiver for a stream that delivers exactly one item, then
/// completes. Completion *combines* the item with termination.
pub trait MonoReceiver<T> {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        pipe.request_all();
    }
    /// Delivered instead of a separate `receive`+`complete` pair.
    fn complete_with(&self, item: T);
    fn error(&self, err: BoxError);
}

/// A receiver for a stream that delivers zero or one item.
pub trait MaybeReceiver<T> {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        pipe.request_all();
    }
    fn complete_with(&self, item: T);
    /// Delivered when the stream completes without ever emitting.
    fn complete_empty(&self);
    fn error(&self, err: BoxError);
}

/// A receiver for a stream that delivers any number of items, then at
/// most one terminal signal.
pub trait ManyReceiver<T> {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        pipe.request_all();
    }
    fn receive(&self, item: T);
    fn complete(&self);
    fn error(&self, err: BoxError);
}
