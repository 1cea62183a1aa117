use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::apply_violation;
use crate::error::BoxError;
use crate::pipe::Pipe;
use crate::policy::ViolationPolicy;
use crate::receiver::{MaybeReceiver, Receiver};

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    Received,
    Done,
}

/// Adapts a [`MaybeReceiver`] into the general `Receiver<T>`. Unlike
/// [`super::MonoWrapper`], `Complete` from `Init` is legitimate here
/// (spec §4.3): it is delivered as `complete_empty` rather than a
/// violation.
pub struct MaybeWrapper<T, R: MaybeReceiver<T>> {
    delegate: R,
    policy: ViolationPolicy,
    state: Cell<State>,
    buffered: RefCell<Option<T>>,
}

impl<T, R: MaybeReceiver<T>> MaybeWrapper<T, R> {
    pub fn new(delegate: R, policy: ViolationPolicy) -> Self {
        Self {
            delegate,
            policy,
            state: Cell::new(State::Init),
            buffered: RefCell::new(None),
        }
    }
}

impl<T, R: MaybeReceiver<T>> Receiver<T> for MaybeWrapper<T, R> {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        self.delegate.open(pipe);
    }

    fn receive(&self, item: T) {
        match self.state.get() {
            State::Init => {
                *self.buffered.borrow_mut() = Some(item);
                self.state.set(State::Received);
            }
            State::Received => {
                apply_violation(
                    self.policy,
                    false,
                    "second item delivered to a Maybe receiver",
                    |err| {
                        self.state.set(State::Done);
                        self.buffered.borrow_mut().take();
                        self.delegate.error(err);
                    },
                );
            }
            State::Done => {
                apply_violation(self.policy, true, "item delivered after terminal signal", |_| {});
            }
        }
    }

    fn complete(&self) {
        match self.state.get() {
            State::Init => {
                self.state.set(State::Done);
                self.delegate.complete_empty();
            }
            State::Received => {
                self.state.set(State::Done);
                let item = self
                    .buffered
                    .borrow_mut()
                    .take()
                    .expect("Received state implies a buffered item");
                self.delegate.complete_with(item);
            }
            State::Done => {
                apply_violation(self.policy, true, "duplicate terminal signal", |_| {});
            }
        }
    }

    fn error(&self, err: BoxError) {
        let already_done = self.state.get() == State::Done;
        if already_done {
            apply_violation(self.policy, true, "duplicate terminal signal", |_| {});
            return;
        }
        self.state.set(State::Done);
        self.buffered.borrow_mut().take();
        self.delegate.error(err);
    }
}
