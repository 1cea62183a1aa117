//! Glob-importable surface for downstream crates: `use fluxion::prelude::*;`
//! pulls in the arity types, the core traits, and the leaf-source
//! constructors, without reaching into `wrapper`/`stage` internals.

pub use crate::arity::{Many, Maybe, Mono, Mute};
pub use crate::emitter::Emitter;
pub use crate::error::BoxError;
pub use crate::pipe::Pipe;
pub use crate::policy::ViolationPolicy;
pub use crate::receiver::{ManyReceiver, MaybeReceiver, MonoReceiver, MuteReceiver, Receiver};
pub use crate::source;
