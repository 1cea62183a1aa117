//! A scripted, recording receiver for exercising emitters in tests (spec
//! §12, C12). Enabled by the `test-util` feature, and always available
//! to this crate's own test suite.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::BoxError;
use crate::pipe::Pipe;
use crate::receiver::Receiver;
use crate::signal::Signal;

/// Records every `Item`/`Complete`/`Error` signal it observes, in order,
/// and exposes the pipe captured at `Open` so a test can drive demand
/// explicitly rather than relying on a `subscribe_*` convenience method
/// that auto-requests everything up front.
pub struct ScriptedReceiver<T> {
    pipe: RefCell<Option<Rc<dyn Pipe>>>,
    signals: RefCell<Vec<Signal<T>>>,
}

impl<T> Default for ScriptedReceiver<T> {
    fn default() -> Self {
        Self {
            pipe: RefCell::new(None),
            signals: RefCell::new(Vec::new()),
        }
    }
}

impl<T> ScriptedReceiver<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests `n` more items through the pipe captured at `Open`.
    ///
    /// # Panics
    /// Panics if called before `Open` has been observed.
    pub fn request(&self, n: i64) {
        self.pipe
            .borrow()
            .as_ref()
            .expect("ScriptedReceiver::request called before Open")
            .request(n);
    }

    pub fn request_all(&self) {
        self.request(-1);
    }

    pub fn close(&self) {
        if let Some(pipe) = self.pipe.borrow().as_ref() {
            pipe.close();
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.signals.borrow().last(), Some(Signal::Complete))
    }

    pub fn is_error(&self) -> bool {
        matches!(self.signals.borrow().last(), Some(Signal::Error(_)))
    }

    pub fn item_count(&self) -> usize {
        self.signals.borrow().iter().filter(|s| matches!(s, Signal::Item(_))).count()
    }
}

impl<T: Clone> ScriptedReceiver<T> {
    /// Snapshots every item observed so far, in delivery order.
    pub fn items(&self) -> Vec<T> {
        self.signals
            .borrow()
            .iter()
            .filter_map(|s| match s {
                Signal::Item(item) => Some(item.clone()),
                _ => None,
            })
            .collect()
    }
}

impl<T> Receiver<T> for ScriptedReceiver<T> {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        *self.pipe.borrow_mut() = Some(pipe);
    }

    fn receive(&self, item: T) {
        self.signals.borrow_mut().push(Signal::Item(item));
    }

    fn complete(&self) {
        self.signals.borrow_mut().push(Signal::Complete);
    }

    fn error(&self, err: BoxError) {
        self.signals.borrow_mut().push(Signal::Error(err));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::Emitter;
    use crate::source;

    #[test]
    fn records_items_only_as_demand_allows() {
        let receiver = Rc::new(ScriptedReceiver::new());
        source::iterable(vec![1, 2, 3]).subscribe(receiver.clone());
        assert_eq!(receiver.item_count(), 0);
        receiver.request(2);
        assert_eq!(receiver.items(), vec![1, 2]);
        assert!(!receiver.is_complete());
        receiver.request_all();
        assert_eq!(receiver.items(), vec![1, 2, 3]);
        assert!(receiver.is_complete());
    }
}
