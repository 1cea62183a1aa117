use std::convert::Infallible;
use std::rc::Rc;

use crate::arity::Mute;
use crate::pipe::NoopPipe;
use crate::receiver::Receiver;

/// A `Mute` stream that opens, then completes immediately — there is
/// nothing to pace, so it never waits on demand (spec §4.5).
pub fn empty() -> Mute {
    Mute::new(|receiver: Box<dyn Receiver<Infallible>>| {
        receiver.open(Rc::new(NoopPipe));
        receiver.complete();
    })
}
