use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::error::BoxError;
use crate::pipe::Pipe;
use crate::receiver::Receiver;
use crate::signal::Signal;
use crate::stage::OperatorCore;

/// A fixed-capacity buffer: primes upstream with `capacity` units of
/// demand at `open`, then tops back up after each downstream `request(k)`
/// by `k + (capacity - queueSize)` (spec §4.7/§8 scenario 7), `queueSize`
/// taken after this call's own drain — replenishing both what downstream
/// just consumed and whatever headroom the buffer fell short of.
pub struct Fixed<T> {
    core: OperatorCore<T>,
    capacity: i64,
    queue: RefCell<VecDeque<Signal<T>>>,
    draining: Cell<bool>,
    weak_self: Weak<Fixed<T>>,
}

impl<T: 'static> Fixed<T> {
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

impl<T: 'static> Receiver<T> for Fixed<T> {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        self.core.set_upstream(pipe);
        let self_pipe: Rc<dyn Pipe> = self
            .weak_self
            .upgrade()
            .expect("Fixed is always reached through the Rc that owns weak_self");
        self.core.downstream().open(self_pipe);
        self.core.take(self.capacity);
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

impl<T: 'static> Pipe for Fixed<T> {
    fn request(&self, n: i64) {
        self.core.request_downstream_demand(n);
        self.drain();
        if n < 0 {
            self.core.take_all();
        } else if n > 0 {
            let queue_size = self.queue.borrow().len() as i64;
            let top_up = n + (self.capacity - queue_size);
            if top_up > 0 {
                self.core.take(top_up);
            }
        }
    }

    fn close(&self) {
        self.core.close();
    }
}

pub(crate) fn attach<T: 'static>(
    upstream_attach: Box<dyn FnOnce(Box<dyn Receiver<T>>)>,
    capacity: i64,
) -> Box<dyn FnOnce(Box<dyn Receiver<T>>)> {
    assert!(capacity > 0, "fixed buffer capacity must be positive");
    Box::new(move |downstream: Box<dyn Receiver<T>>| {
        let stage = Rc::new_cyclic(|weak| Fixed {
            core: OperatorCore::new(downstream),
            capacity,
            queue: RefCell::new(VecDeque::new()),
            draining: Cell::new(false),
            weak_self: weak.clone(),
        });
        upstream_attach(Box::new(stage));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arity::Many;
    use crate::emitter::Emitter;
    use crate::testing::ScriptedReceiver;

    /// An upstream that records every `n` passed to `request`, delivering
    /// up to `n` queued items synchronously, so a test can observe the
    /// exact lump-sum top-up a downstream `request` triggers.
    struct TrackedSource<T> {
        downstream: Box<dyn Receiver<T>>,
        queue: RefCell<VecDeque<T>>,
        requests: Rc<RefCell<Vec<i64>>>,
    }

    impl<T> Pipe for TrackedSource<T> {
        fn request(&self, n: i64) {
            self.requests.borrow_mut().push(n);
            let take = if n < 0 { self.queue.borrow().len() } else { n as usize };
            for _ in 0..take {
                match self.queue.borrow_mut().pop_front() {
                    Some(item) => self.downstream.receive(item),
                    None => break,
                }
            }
        }

        fn close(&self) {}
    }

    /// Scenario: capacity 4, queue 3 after drain, a downstream `request(1)`
    /// tops up by `1 + (4 - 3) = 2`.
    #[test]
    fn request_tops_up_by_k_plus_capacity_minus_queue_size() {
        let requests = Rc::new(RefCell::new(Vec::new()));
        let requests_for_source = requests.clone();
        let many = Many::new(move |downstream: Box<dyn Receiver<i32>>| {
            let stage = Rc::new(TrackedSource {
                downstream,
                queue: RefCell::new((1..=20).collect()),
                requests: requests_for_source,
            });
            let pipe: Rc<dyn Pipe> = stage.clone();
            stage.downstream.open(pipe);
        });

        let receiver = Rc::new(ScriptedReceiver::new());
        many.buffer_fixed(4).subscribe(receiver.clone());

        // Priming at open: requests all 4 units of capacity up front.
        assert_eq!(*requests.borrow(), vec![4]);
        assert_eq!(receiver.item_count(), 0);

        // Draining one item leaves the queue at 3; the top-up is 1 + (4 - 3) = 2.
        receiver.request(1);
        assert_eq!(receiver.items(), vec![1]);
        assert_eq!(*requests.borrow(), vec![4, 2]);
    }
}
