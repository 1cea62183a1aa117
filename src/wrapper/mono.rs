use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::apply_violation;
use crate::error::BoxError;
use crate::pipe::Pipe;
use crate::policy::ViolationPolicy;
use crate::receiver::{MonoReceiver, Receiver};

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Init,
    Received,
    Done,
}

/// Adapts a [`MonoReceiver`] into the general `Receiver<T>`, policing the
/// `{INIT, RECEIVED, DONE}` state machine of spec §3. The item is
/// buffered until the terminal signal arrives, then delivered combined
/// as `complete_with(item)`.
pub struct MonoWrapper<T, R: MonoReceiver<T>> {
    delegate: R,
    policy: ViolationPolicy,
    state: Cell<State>,
    buffered: RefCell<Option<T>>,
}

impl<T, R: MonoReceiver<T>> MonoWrapper<T, R> {
    pub fn new(delegate: R, policy: ViolationPolicy) -> Self {
        Self {
            delegate,
            policy,
            state: Cell::new(State::Init),
            buffered: RefCell::new(None),
        }
    }
}

impl<T, R: MonoReceiver<T>> Receiver<T> for MonoWrapper<T, R> {
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
                    "second item delivered to a Mono receiver",
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
            State::Received => {
                self.state.set(State::Done);
                let item = self
                    .buffered
                    .borrow_mut()
                    .take()
                    .expect("Received state implies a buffered item");
                self.delegate.complete_with(item);
            }
            State::Init => {
                apply_violation(self.policy, false, "complete received before any item", |err| {
                    self.state.set(State::Done);
                    self.delegate.error(err);
                });
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arity::Many;
    use crate::emitter::Emitter;

    #[derive(Clone, Default)]
    struct RecordingMono {
        completed_with: Rc<RefCell<Option<i32>>>,
        errored: Rc<Cell<bool>>,
    }

    impl MonoReceiver<i32> for RecordingMono {
        fn complete_with(&self, item: i32) {
            *self.completed_with.borrow_mut() = Some(item);
        }
        fn error(&self, _err: BoxError) {
            self.errored.set(true);
        }
    }

    /// A `Many` stream subscribed through a `Mono` wrapper: the second
    /// item is a contract breach. `Delegate` surfaces it as an error;
    /// `Ignore` keeps only the first item and drops the rest silently.
    #[test]
    fn second_item_is_a_violation_under_delegate_and_ignored_under_ignore() {
        let delegate = RecordingMono::default();
        Many::iterable(vec![1, 2]).subscribe(MonoWrapper::new(delegate.clone(), ViolationPolicy::Delegate));
        assert!(delegate.errored.get());
        assert!(delegate.completed_with.borrow().is_none());

        let delegate = RecordingMono::default();
        Many::iterable(vec![1, 2]).subscribe(MonoWrapper::new(delegate.clone(), ViolationPolicy::Ignore));
        assert!(!delegate.errored.get());
        assert_eq!(*delegate.completed_with.borrow(), Some(1));
    }
}
