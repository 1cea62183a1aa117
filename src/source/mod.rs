//! Leaf generators (spec §4.5, C6): sources with no upstream of their
//! own. Each waits for demand exactly the way an operator would, even
//! though there is no real backpressure to relieve upstream of.

mod empty;
mod iterable;
mod never;
mod single;

pub use empty::empty;
pub use iterable::iterable;
pub use never::never;
pub use single::single;
