//! Arity-enforcing wrappers (spec §4.3, C3): adapt a specialized receiver
//! ([`crate::receiver::MuteReceiver`] and friends) into the general
//! [`crate::receiver::Receiver`] while policing the state machine that
//! arity implies. Every wrapper applies the same
//! [`crate::ViolationPolicy`] on a detected contract breach.

pub mod many;
pub mod maybe;
pub mod mono;
pub mod mute;

pub use many::ManyWrapper;
pub use maybe::MaybeWrapper;
pub use mono::MonoWrapper;
pub use mute::MuteWrapper;

use crate::error::{BoxError, IllegalStateError};
use crate::policy::ViolationPolicy;

/// Applies `policy` to a detected protocol violation.
///
/// `already_done` reflects whether the wrapper had already reached its
/// terminal state *before* this violation — under `Delegate`, a
/// violation observed after termination is simply dropped rather than
/// delivering a second error (spec §4.3: "If already DONE, drop").
/// `on_delegate` is only invoked for the `Delegate` branch, and is
/// responsible for transitioning the wrapper's own state to `Done` in
/// addition to forwarding the synthesized error — `Ignore` leaves state
/// untouched entirely, per spec.
pub(crate) fn apply_violation(
    policy: ViolationPolicy,
    already_done: bool,
    description: &'static str,
    on_delegate: impl FnOnce(BoxError),
) {
    match policy {
        ViolationPolicy::Ignore => {}
        ViolationPolicy::Delegate => {
            if !already_done {
                on_delegate(Box::new(IllegalStateError::new(description)));
            }
        }
        ViolationPolicy::Throw => panic!("fluxion: protocol violation: {description}"),
    }
}
