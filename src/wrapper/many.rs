use std::cell::Cell;
use std::marker::PhantomData;
use std::rc::Rc;

use super::apply_violation;
use crate::error::BoxError;
use crate::pipe::Pipe;
use crate::policy::ViolationPolicy;
use crate::receiver::{ManyReceiver, Receiver};

/// Adapts a [`ManyReceiver`] into the general `Receiver<T>`, policing the
/// `{BUSY, DONE}` state machine of spec §3: any number of items, then at
/// most one terminator. No buffering is needed — items dispatch
/// immediately.
pub struct ManyWrapper<T, R: ManyReceiver<T>> {
    delegate: R,
    policy: ViolationPolicy,
    done: Cell<bool>,
    _marker: PhantomData<T>,
}

impl<T, R: ManyReceiver<T>> ManyWrapper<T, R> {
    pub fn new(delegate: R, policy: ViolationPolicy) -> Self {
        Self {
            delegate,
            policy,
            done: Cell::new(false),
            _marker: PhantomData,
        }
    }
}

impl<T, R: ManyReceiver<T>> Receiver<T> for ManyWrapper<T, R> {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        self.delegate.open(pipe);
    }

    fn receive(&self, item: T) {
        if self.done.get() {
            apply_violation(self.policy, true, "item delivered after terminal signal", |_| {});
            return;
        }
        self.delegate.receive(item);
    }

    fn complete(&self) {
        let already_done = self.done.replace(true);
        if already_done {
            apply_violation(self.policy, true, "duplicate terminal signal", |_| {});
            return;
        }
        self.delegate.complete();
    }

    fn error(&self, err: BoxError) {
        let already_done = self.done.replace(true);
        if already_done {
            apply_violation(self.policy, true, "duplicate terminal signal", |_| {});
            return;
        }
        self.delegate.error(err);
    }
}
