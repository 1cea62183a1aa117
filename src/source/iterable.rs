use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::arity::Many;
use crate::demand::RequestCount;
use crate::pipe::Pipe;
use crate::receiver::Receiver;
use crate::stage::SinkCore;

struct Iterable<T, I: Iterator<Item = T>> {
    sink: SinkCore<T>,
    iter: RefCell<I>,
    demand: RequestCount,
    draining: Cell<bool>,
}

impl<T: 'static, I: Iterator<Item = T>> Iterable<T, I> {
    fn drain(&self) {
        if self.draining.get() {
            return;
        }
        self.draining.set(true);
        while self.demand.has(1) && !self.sink.is_closed() {
            match self.iter.borrow_mut().next() {
                Some(item) => {
                    self.demand.withdraw(1);
                    if !self.sink.emit(item) {
                        break;
                    }
                }
                None => {
                    self.sink.emit_complete();
                    break;
                }
            }
        }
        self.draining.set(false);
    }
}

impl<T: 'static, I: Iterator<Item = T>> Pipe for Iterable<T, I> {
    fn request(&self, n: i64) {
        if self.sink.is_closed() {
            return;
        }
        self.demand.request(n);
        self.drain();
    }

    fn close(&self) {
        self.sink.close();
    }
}

/// A `Many` stream over `items`, delivering elements only as demand
/// allows (spec §4.5). Exhausting the iterator delivers `Complete`.
pub fn iterable<T: 'static, I>(items: I) -> Many<T>
where
    I: IntoIterator<Item = T> + 'static,
    I::IntoIter: 'static,
{
    Many::new(move |receiver: Box<dyn Receiver<T>>| {
        let stage = Rc::new(Iterable {
            sink: SinkCore::new(receiver),
            iter: RefCell::new(items.into_iter()),
            demand: RequestCount::new(),
            draining: Cell::new(false),
        });
        let pipe: Rc<dyn Pipe> = stage.clone();
        stage.sink.downstream().open(pipe);
    })
}
