use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::arity::Mono;
use crate::demand::RequestCount;
use crate::pipe::Pipe;
use crate::receiver::Receiver;
use crate::stage::SinkCore;

struct Single<T> {
    sink: SinkCore<T>,
    item: RefCell<Option<T>>,
    demand: RequestCount,
    emitted: Cell<bool>,
}

impl<T: 'static> Single<T> {
    fn emit_if_ready(&self) {
        if self.emitted.get() || self.sink.is_closed() || !self.demand.has(1) {
            return;
        }
        self.emitted.set(true);
        self.demand.withdraw(1);
        if let Some(item) = self.item.borrow_mut().take() {
            self.sink.emit(item);
        }
        self.sink.emit_complete();
    }
}

impl<T: 'static> Pipe for Single<T> {
    fn request(&self, n: i64) {
        if self.sink.is_closed() {
            return;
        }
        self.demand.request(n);
        self.emit_if_ready();
    }

    fn close(&self) {
        self.sink.close();
    }
}

/// A `Mono` stream that delivers exactly `item`, waiting for at least one
/// unit of demand before delivering it (spec §4.5: a generator never
/// emits ahead of demand, even when it has no upstream to relieve).
pub fn single<T: 'static>(item: T) -> Mono<T> {
    Mono::new(move |receiver: Box<dyn Receiver<T>>| {
        let stage = Rc::new(Single {
            sink: SinkCore::new(receiver),
            item: RefCell::new(Some(item)),
            demand: RequestCount::new(),
            emitted: Cell::new(false),
        });
        let pipe: Rc<dyn Pipe> = stage.clone();
        stage.sink.downstream().open(pipe);
    })
}
