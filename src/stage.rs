//! Shared machinery behind the generator framework (spec §4.4, C4) and
//! the operator framework (spec §4.4, C5): every stage owns a downstream
//! [`Receiver`], tracks whether it has already terminated, and forwards
//! through the same three primitives (`emit`, `emit_complete`/`emit_error`,
//! and — for operators, which have an upstream — `take`/`take_all`).
//!
//! Nothing here is public API; [`crate::source`], [`crate::buffer`],
//! [`crate::map`] and [`crate::generate`] build on it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::demand::RequestCount;
use crate::error::BoxError;
use crate::pipe::Pipe;
use crate::receiver::Receiver;

/// Downstream-facing state common to every generator and operator: a
/// boxed destination and a single `closed` flag.
///
/// Re-entrancy (spec §5): `closed` is always updated *before* the
/// downstream callback that observes it, so a receiver that calls back
/// into this stage from within `receive`/`complete`/`error` sees
/// consistent state.
pub(crate) struct SinkCore<T> {
    downstream: Box<dyn Receiver<T>>,
    closed: Cell<bool>,
}

impl<T> SinkCore<T> {
    pub(crate) fn new(downstream: Box<dyn Receiver<T>>) -> Self {
        Self {
            downstream,
            closed: Cell::new(false),
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.get()
    }

    pub(crate) fn downstream(&self) -> &dyn Receiver<T> {
        self.downstream.as_ref()
    }

    /// Flips `closed` to `true` and reports whether this call was the one
    /// that did it (i.e. whether the caller should actually forward a
    /// terminal signal or a close).
    pub(crate) fn mark_closed(&self) -> bool {
        !self.closed.replace(true)
    }

    /// Forwards `item` downstream unless already closed. The return value
    /// is the "still open" indicator a producer can short-circuit on.
    pub(crate) fn emit(&self, item: T) -> bool {
        if self.closed.get() {
            return false;
        }
        self.downstream.receive(item);
        !self.closed.get()
    }

    pub(crate) fn emit_complete(&self) {
        if self.mark_closed() {
            self.downstream.complete();
        }
    }

    pub(crate) fn emit_error(&self, err: BoxError) {
        if self.mark_closed() {
            self.downstream.error(err);
        }
    }

    /// Closes without notifying downstream — used when the *downstream*
    /// is the one that asked for `close`.
    pub(crate) fn close(&self) {
        self.closed.set(true);
    }
}

/// [`SinkCore`] plus the upstream [`Pipe`] an operator acquires at `open`
/// (spec §4.4: "simultaneously the downstream's pipe and the upstream's
/// receiver").
pub(crate) struct OperatorCore<T> {
    sink: SinkCore<T>,
    upstream: RefCell<Option<Rc<dyn Pipe>>>,
    /// Downstream demand tracked locally, for operators (the buffering
    /// operators) that decouple what they request from upstream from
    /// what they owe downstream. A pure passthrough operator like `Map`
    /// never touches this and forwards `take`/`take_all` directly.
    demand: RequestCount,
}

impl<T> OperatorCore<T> {
    pub(crate) fn new(downstream: Box<dyn Receiver<T>>) -> Self {
        Self {
            sink: SinkCore::new(downstream),
            upstream: RefCell::new(None),
            demand: RequestCount::new(),
        }
    }

    /// Records `n` more units of downstream demand locally.
    pub(crate) fn request_downstream_demand(&self, n: i64) {
        self.demand.request(n);
    }

    /// True if at least one item's worth of locally tracked demand is
    /// outstanding.
    pub(crate) fn has_demand(&self) -> bool {
        self.demand.has(1)
    }

    /// Consumes up to `k` units of locally tracked demand.
    pub(crate) fn withdraw_demand(&self, k: i64) -> i64 {
        self.demand.withdraw(k)
    }

    pub(crate) fn set_upstream(&self, pipe: Rc<dyn Pipe>) {
        *self.upstream.borrow_mut() = Some(pipe);
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.sink.is_closed()
    }

    pub(crate) fn downstream(&self) -> &dyn Receiver<T> {
        self.sink.downstream()
    }

    pub(crate) fn emit(&self, item: T) -> bool {
        self.sink.emit(item)
    }

    /// Forwards `complete` downstream, then closes upstream: once an
    /// operator has delivered its own terminal signal, continuing to pull
    /// from upstream would only produce items nobody can observe.
    pub(crate) fn emit_complete(&self) {
        if self.sink.mark_closed() {
            self.sink.downstream().complete();
            self.close_upstream();
        }
    }

    pub(crate) fn emit_error(&self, err: BoxError) {
        if self.sink.mark_closed() {
            self.sink.downstream().error(err);
            self.close_upstream();
        }
    }

    /// Forwards demand upstream, unless already closed.
    pub(crate) fn take(&self, n: i64) {
        if self.sink.is_closed() {
            return;
        }
        if let Some(upstream) = self.upstream.borrow().as_ref() {
            upstream.request(n);
        }
    }

    pub(crate) fn take_all(&self) {
        self.take(-1);
    }

    fn close_upstream(&self) {
        if let Some(upstream) = self.upstream.borrow_mut().take() {
            upstream.close();
        }
    }

    /// Closing an operator must close the upstream pipe (spec §4.4); the
    /// `mark_closed` guard keeps this idempotent under re-entrant close
    /// calls.
    pub(crate) fn close(&self) {
        if self.sink.mark_closed() {
            self.close_upstream();
        }
    }
}
