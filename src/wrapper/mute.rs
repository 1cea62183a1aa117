use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use super::apply_violation;
use crate::error::BoxError;
use crate::pipe::Pipe;
use crate::policy::ViolationPolicy;
use crate::receiver::{MuteReceiver, Receiver};

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    Done,
}

/// Adapts a [`MuteReceiver`] into `Receiver<Infallible>`, policing the
/// `{INIT, DONE}` state machine of spec §3.
///
/// `receive` is unreachable by construction: `Infallible` has no values,
/// so the match below is already exhaustive without a violation branch.
pub struct MuteWrapper<R: MuteReceiver> {
    delegate: R,
    policy: ViolationPolicy,
    state: Cell<State>,
}

impl<R: MuteReceiver> MuteWrapper<R> {
    pub fn new(delegate: R, policy: ViolationPolicy) -> Self {
        Self {
            delegate,
            policy,
            state: Cell::new(State::Init),
        }
    }
}

impl<R: MuteReceiver> Receiver<Infallible> for MuteWrapper<R> {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        self.delegate.open(pipe);
    }

    fn receive(&self, item: Infallible) {
        match item {}
    }

    fn complete(&self) {
        let already_done = self.state.get() == State::Done;
        if already_done {
            apply_violation(self.policy, true, "duplicate terminal signal on a Mute receiver", |_| {});
            return;
        }
        self.state.set(State::Done);
        self.delegate.complete();
    }

    fn error(&self, err: BoxError) {
        let already_done = self.state.get() == State::Done;
        if already_done {
            apply_violation(self.policy, true, "duplicate terminal signal on a Mute receiver", |_| {});
            return;
        }
        self.state.set(State::Done);
        self.delegate.error(err);
    }
}
