//! The violation-policy enumeration an arity-enforcing wrapper applies
//! when it catches an upstream contract breach (spec §4.3).

/// What an arity-enforcing wrapper does when it detects an illegal
/// signal (an item after a terminal, two terminals, an item on a `Mute`
/// receiver, a second item on a `Mono` receiver, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ViolationPolicy {
    /// Silently swallow the offending signal. The default on every
    /// `subscribe_*` convenience method.
    #[default]
    Ignore,
    /// Synthesize an `Error` describing the violation and deliver it to
    /// the delegate, then transition to the terminal state. A violation
    /// observed after the delegate is already done is dropped.
    Delegate,
    /// Panic on the calling thread. Intended for debugging: this
    /// propagates out of whichever `emit`/`complete`/`error` call
    /// triggered it.
    Throw,
}
