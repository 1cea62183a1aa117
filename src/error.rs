//! Opaque failure values and the protocol-violation error type.
//!
//! The teacher crate has no error-handling crate in its dependency graph
//! (`TrySendErr<T>`/`TryRecvError` are plain `#[derive(Debug)]` enums with
//! hand-written `Display`/`Error` impls); `fluxion` follows the same
//! convention rather than pulling in `thiserror`.

use std::borrow::Cow;
use std::fmt;

/// An opaque failure value carried by an `Error` terminal signal.
///
/// The protocol (spec §3) only requires that `Error` carry *some* failure
/// value; it never inspects it. A boxed trait object lets every stage
/// forward upstream failures without knowing their concrete type, the way
/// `anyhow`/`eyre`-style error handling is used throughout the ecosystem.
pub type BoxError = Box<dyn std::error::Error + 'static>;

/// Synthesized by an arity-enforcing wrapper (see [`crate::wrapper`]) when
/// it detects a contract breach and its [`ViolationPolicy`](crate::ViolationPolicy)
/// is `Delegate`.
#[derive(Debug)]
pub struct IllegalStateError {
    description: Cow<'static, str>,
}

impl IllegalStateError {
    pub fn new(description: impl Into<Cow<'static, str>>) -> Self {
        Self {
            description: description.into(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for IllegalStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "illegal state: {}", self.description)
    }
}

impl std::error::Error for IllegalStateError {}

/// Synthesized by [`crate::map::Map`] when the transform panics (spec §7,
/// category 1: "user-raised errors from upstream bodies").
#[derive(Debug)]
pub struct TransformPanic {
    message: String,
}

impl TransformPanic {
    pub(crate) fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { message }
    }
}

impl fmt::Display for TransformPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "map function panicked: {}", self.message)
    }
}

impl std::error::Error for TransformPanic {}

/// Synthesized by [`crate::generate::Generate`] when the coroutine body
/// panics for a reason other than cancellation (spec §7, category 1; §4.9:
/// "if it escapes with any exception other than cancellation, the stage
/// emits Error").
#[derive(Debug)]
pub struct GeneratorPanic {
    message: String,
}

impl GeneratorPanic {
    pub(crate) fn from_payload(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self { message }
    }
}

impl fmt::Display for GeneratorPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "generator body panicked: {}", self.message)
    }
}

impl std::error::Error for GeneratorPanic {}
