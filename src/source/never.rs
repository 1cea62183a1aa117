use std::rc::Rc;

use crate::arity::Many;
use crate::pipe::NoopPipe;
use crate::receiver::Receiver;

/// A stream that opens and then never signals again (spec §4.5): a
/// pending source useful for exercising consumers against a producer
/// that never terminates.
pub fn never<T: 'static>() -> Many<T> {
    Many::new(|receiver: Box<dyn Receiver<T>>| {
        receiver.open(Rc::new(NoopPipe));
    })
}
