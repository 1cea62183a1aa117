//! `fluxion` — a reactive dataflow core.
//!
//! This crate supplies the *protocol* by which asynchronous producers
//! ([`Emitter`]) and consumers ([`Receiver`]) coordinate: a three-party
//! contract (emitter, receiver, [`Pipe`]) with strict signal ordering and
//! demand-driven backpressure. It is deliberately not a scheduler or an
//! event loop — every [`Pipe::request`] call drives production
//! synchronously, on the caller's thread.
//!
//! ## Layout
//!
//! - [`signal`], [`pipe`], [`receiver`], [`emitter`] — the core protocol.
//! - [`arity`] — the four arity markers (`Mute`, `Mono<T>`, `Maybe<T>`,
//!   `Many<T>`) and their specialized receivers.
//! - [`wrapper`] — arity-enforcing adapters from a specialized receiver to
//!   the general [`Receiver`] trait.
//! - [`source`] — leaf generators (`empty`, `just`, iterable, `never`).
//! - [`buffer`] — unbounded and fixed-capacity buffering operators.
//! - [`map`] — the synchronous passthrough operator.
//! - [`generate`] — the coroutine-style generator (gated by the `async`
//!   feature; it needs `futures`' `Waker` plumbing to drive suspension).
//! - [`convert`] — arity widening/narrowing conversions.
//!
//! Enable the `test-util` feature for [`testing::ScriptedReceiver`], an
//! assertion receiver used by this crate's own test suite and usable by
//! downstream crates that build on `fluxion`.

mod demand;
mod error;
mod policy;
mod stage;

pub mod arity;
pub mod buffer;
pub mod convert;
pub mod emitter;
pub mod map;
pub mod pipe;
pub mod receiver;
pub mod signal;
pub mod source;
pub mod wrapper;

#[cfg(feature = "async")]
pub mod generate;

#[cfg(feature = "interop")]
pub mod interop;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub mod prelude;

pub use demand::RequestCount;
pub use error::{BoxError, IllegalStateError};
pub use policy::ViolationPolicy;
