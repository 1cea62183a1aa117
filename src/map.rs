//! The synchronous transform operator (spec §4.9, C9): one item in, one
//! item out, arity-preserving. A panic from the transform function is
//! caught and reported as an `Error` rather than unwinding through the
//! emitter — the only place in the crate that installs a panic boundary.

use std::panic::{self, AssertUnwindSafe};
use std::rc::{Rc, Weak};

use crate::error::{BoxError, TransformPanic};
use crate::pipe::Pipe;
use crate::receiver::Receiver;
use crate::stage::OperatorCore;

/// Simultaneously the downstream's [`Pipe`] and the upstream's
/// [`Receiver`] (spec §4.4). Holds a [`Weak`] to itself so `open` can
/// hand downstream an `Rc<dyn Pipe>` that routes back through this same
/// stage (see [`crate::stage`] for why `Rc::new_cyclic` rather than a
/// manual weak-registration table).
pub struct Map<T, U> {
    core: OperatorCore<U>,
    f: Box<dyn Fn(T) -> U>,
    weak_self: Weak<Map<T, U>>,
}

impl<T: 'static, U: 'static> Receiver<T> for Map<T, U> {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        self.core.set_upstream(pipe);
        let self_pipe: Rc<dyn Pipe> = self
            .weak_self
            .upgrade()
            .expect("Map is always reached through the Rc that owns weak_self");
        self.core.downstream().open(self_pipe);
    }

    fn receive(&self, item: T) {
        match panic::catch_unwind(AssertUnwindSafe(|| (self.f)(item))) {
            Ok(value) => {
                self.core.emit(value);
            }
            Err(payload) => {
                self.core.emit_error(Box::new(TransformPanic::from_payload(payload)));
            }
        }
    }

    fn complete(&self) {
        self.core.emit_complete();
    }

    fn error(&self, err: BoxError) {
        self.core.emit_error(err);
    }
}

impl<T, U> Pipe for Map<T, U> {
    fn request(&self, n: i64) {
        self.core.take(n);
    }

    fn close(&self) {
        self.core.close();
    }
}

/// Wraps `upstream_attach` with a `Map` stage that applies `f` to every
/// item. Arity-agnostic: every arity type's `map` method delegates here,
/// since one item in becomes one item out regardless of how many items
/// the stream carries overall.
pub(crate) fn attach<T: 'static, U: 'static>(
    upstream_attach: Box<dyn FnOnce(Box<dyn Receiver<T>>)>,
    f: impl Fn(T) -> U + 'static,
) -> Box<dyn FnOnce(Box<dyn Receiver<U>>)> {
    Box::new(move |downstream: Box<dyn Receiver<U>>| {
        let stage = Rc::new_cyclic(|weak| Map {
            core: OperatorCore::new(downstream),
            f: Box::new(f),
            weak_self: weak.clone(),
        });
        upstream_attach(Box::new(stage));
    })
}
