use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::error::BoxError;
use crate::pipe::Pipe;
use crate::receiver::Receiver;
use crate::signal::Signal;
use crate::stage::OperatorCore;

/// An unbounded buffer: requests all remaining demand from upstream at
/// `open` and queues whatever arrives, regardless of downstream's pace.
pub struct Unbounded<T> {
    core: OperatorCore<T>,
    queue: RefCell<VecDeque<Signal<T>>>,
    draining: Cell<bool>,
    weak_self: Weak<Unbounded<T>>,
}

impl<T: 'static> Unbounded<T> {
    fn drain(&self) {
        if self.draining.get() {
            return;
        }
        self.draining.set(true);
        while self.core.has_demand() {
            let next = self.queue.borrow_mut().pop_front();
            match next {
                Some(Signal::Item(item)) => {
                    self.core.withdraw_demand(1);
                    if !self.core.emit(item) {
                        break;
                    }
                }
                Some(Signal::Complete) => {
                    self.core.emit_complete();
                    break;
                }
                Some(Signal::Error(err)) => {
                    self.core.emit_error(err);
                    break;
                }
                None => break,
            }
        }
        self.draining.set(false);
    }
}

impl<T: 'static> Receiver<T> for Unbounded<T> {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        self.core.set_upstream(pipe);
        let self_pipe: Rc<dyn Pipe> = self
            .weak_self
            .upgrade()
            .expect("Unbounded is always reached through the Rc that owns weak_self");
        self.core.downstream().open(self_pipe);
        self.core.take_all();
    }

    fn receive(&self, item: T) {
        self.queue.borrow_mut().push_back(Signal::Item(item));
        self.drain();
    }

    fn complete(&self) {
        self.queue.borrow_mut().push_back(Signal::Complete);
        self.drain();
    }

    fn error(&self, err: BoxError) {
        self.queue.borrow_mut().push_back(Signal::Error(err));
        self.drain();
    }
}

impl<T: 'static> Pipe for Unbounded<T> {
    fn request(&self, n: i64) {
        self.core.request_downstream_demand(n);
        self.drain();
    }

    fn close(&self) {
        self.core.close();
    }
}

pub(crate) fn attach<T: 'static>(
    upstream_attach: Box<dyn FnOnce(Box<dyn Receiver<T>>)>,
) -> Box<dyn FnOnce(Box<dyn Receiver<T>>)> {
    Box::new(move |downstream: Box<dyn Receiver<T>>| {
        let stage = Rc::new_cyclic(|weak| Unbounded {
            core: OperatorCore::new(downstream),
            queue: RefCell::new(VecDeque::new()),
            draining: Cell::new(false),
            weak_self: weak.clone(),
        });
        upstream_attach(Box::new(stage));
    })
}
