//! The coroutine-style generator (spec §4.9, C10): a user-supplied
//! `async fn(Sink<T>) -> ()` drives its own emission, suspending at
//! `sink.emit(item).await` until downstream demand is available.
//!
//! Gated behind the `async` feature because driving the future needs
//! `futures`' no-op waker to satisfy [`Future::poll`]'s signature — there
//! is no executor and no thread hop here. Every suspension point is
//! resolved synchronously, inline in [`crate::pipe::Pipe::request`], on
//! whatever thread called it (spec §5: single-threaded cooperative).

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::task::{Context, Poll};

use futures::task::noop_waker_ref;

use crate::arity::{Many, Maybe, Mono};
use crate::demand::RequestCount;
use crate::error::{BoxError, GeneratorPanic, IllegalStateError};
use crate::pipe::Pipe;
use crate::receiver::Receiver;
use crate::stage::{OperatorCore, SinkCore};

/// The panic payload `EmitFuture` raises to unwind a suspended coroutine
/// once downstream has closed (spec §4.9: "`emit` raises a cancellation
/// signal that the coroutine body must propagate"). `Generate::drive`
/// recognizes this payload and treats it as a quiet shutdown rather than
/// an `Error` signal — the only panic payload in the crate that is not a
/// genuine failure.
struct GeneratorCancelled;

/// Handed to the generator body; the only way it can produce signals.
pub struct Sink<T> {
    state: Weak<Generate<T>>,
}

impl<T: 'static> Sink<T> {
    /// Suspends until at least one unit of downstream demand is
    /// available, then delivers `item`. If downstream has closed by the
    /// time this suspension is resumed, `emit` never returns: it unwinds
    /// the coroutine body with a cancellation instead.
    pub async fn emit(&self, item: T) {
        EmitFuture {
            state: self.state.clone(),
            item: RefCell::new(Some(item)),
        }
        .await
    }

    /// Completes the generator with `err` instead of returning normally.
    /// Idempotent: a generator that has already finished (by returning,
    /// or by a previous `error` call) ignores further calls.
    pub fn error(&self, err: BoxError) {
        if let Some(state) = self.state.upgrade() {
            if !state.finished.replace(true) {
                state.sink.emit_error(err);
            }
        }
    }
}

struct EmitFuture<T> {
    state: Weak<Generate<T>>,
    item: RefCell<Option<T>>,
}

impl<T: 'static> Future for EmitFuture<T> {
    type Output = ();

    fn poll(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
        let Some(state) = self.state.upgrade() else {
            std::panic::panic_any(GeneratorCancelled);
        };
        if state.finished.get() || state.sink.is_closed() {
            std::panic::panic_any(GeneratorCancelled);
        }
        if !state.demand.has(1) {
            return Poll::Pending;
        }
        state.demand.withdraw(1);
        if let Some(item) = self.item.borrow_mut().take() {
            state.sink.emit(item);
        }
        Poll::Ready(())
    }
}

struct Generate<T> {
    sink: SinkCore<T>,
    demand: RequestCount,
    future: RefCell<Option<Pin<Box<dyn Future<Output = ()>>>>>,
    finished: Cell<bool>,
    /// Set the first time the coroutine is actually polled. `close`
    /// consults this: a generator never started (spec §4.9: "at open,
    /// the coroutine is not started; it starts on the first nonzero
    /// request") is simply abandoned rather than woken up just to be
    /// cancelled.
    started: Cell<bool>,
    /// Re-entrancy guard (spec §4.9's own clause: "a request arriving
    /// while running... must not attempt to resume it again; it simply
    /// updates demand and returns"). Without this, a receiver that calls
    /// `pipe.request` back into this stage from inside `receive` — sanctioned
    /// by spec §5 — would re-enter `drive` while `future` is still
    /// mutably borrowed by the outer call, panicking with a borrow error.
    driving: Cell<bool>,
}

impl<T: 'static> Generate<T> {
    fn drive(&self) {
        if self.driving.replace(true) {
            return;
        }
        self.started.set(true);
        let outcome = {
            let mut slot = self.future.borrow_mut();
            match slot.as_mut() {
                None => None,
                Some(future) => {
                    let waker = noop_waker_ref();
                    let mut cx = Context::from_waker(waker);
                    Some(std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                        future.as_mut().poll(&mut cx)
                    })))
                }
            }
        };
        match outcome {
            None => {}
            Some(Ok(Poll::Pending)) => {}
            Some(Ok(Poll::Ready(()))) => {
                self.future.borrow_mut().take();
                if !self.finished.replace(true) {
                    self.sink.emit_complete();
                }
            }
            Some(Err(payload)) => {
                self.future.borrow_mut().take();
                if payload.downcast_ref::<GeneratorCancelled>().is_some() {
                    self.finished.set(true);
                } else if !self.finished.replace(true) {
                    self.sink.emit_error(Box::new(GeneratorPanic::from_payload(payload)));
                }
            }
        }
        self.driving.set(false);
    }
}

impl<T: 'static> Pipe for Generate<T> {
    fn request(&self, n: i64) {
        if self.sink.is_closed() || self.finished.get() {
            return;
        }
        self.demand.request(n);
        self.drive();
    }

    fn close(&self) {
        if !self.sink.mark_closed() {
            return;
        }
        self.finished.set(true);
        if self.started.get() {
            self.drive();
        } else {
            self.future.borrow_mut().take();
        }
    }
}

/// Builds a `Many<T>` whose signals come from running `body` to
/// completion, one `sink.emit` at a time, as demand allows.
pub fn generate<T, F, Fut>(body: F) -> Many<T>
where
    T: 'static,
    F: FnOnce(Sink<T>) -> Fut + 'static,
    Fut: Future<Output = ()> + 'static,
{
    Many::new(move |receiver: Box<dyn Receiver<T>>| {
        let stage = Rc::new_cyclic(|weak| {
            let future: Pin<Box<dyn Future<Output = ()>>> = Box::pin(body(Sink { state: weak.clone() }));
            Generate {
                sink: SinkCore::new(receiver),
                demand: RequestCount::new(),
                future: RefCell::new(Some(future)),
                finished: Cell::new(false),
                started: Cell::new(false),
                driving: Cell::new(false),
            }
        });
        let pipe: Rc<dyn Pipe> = stage.clone();
        stage.sink.downstream().open(pipe);
    })
}

/// Polices a generated stream down to at most one item (spec §4.9:
/// "wraps the output sink to forbid a second `emit`"), converting a
/// second item into `Error` instead of delivering it. When `require_one`
/// is set, completing without ever having emitted is *also* an `Error`
/// (the `Mono.generate` variant: "as `Maybe`, plus checks that exactly
/// one `emit` occurred before normal return").
struct EnforceAtMostOne<T> {
    core: OperatorCore<T>,
    require_one: bool,
    seen: Cell<bool>,
    weak_self: Weak<EnforceAtMostOne<T>>,
}

impl<T: 'static> Receiver<T> for EnforceAtMostOne<T> {
    fn open(&self, pipe: Rc<dyn Pipe>) {
        self.core.set_upstream(pipe);
        let self_pipe: Rc<dyn Pipe> = self
            .weak_self
            .upgrade()
            .expect("EnforceAtMostOne is always reached through the Rc that owns weak_self");
        self.core.downstream().open(self_pipe);
    }

    fn receive(&self, item: T) {
        if self.seen.replace(true) {
            self.core
                .emit_error(Box::new(IllegalStateError::new("second item emitted by a Maybe/Mono generator")));
            return;
        }
        self.core.emit(item);
    }

    fn complete(&self) {
        if self.require_one && !self.seen.get() {
            self.core
                .emit_error(Box::new(IllegalStateError::new("Mono generator returned without emitting")));
            return;
        }
        self.core.emit_complete();
    }

    fn error(&self, err: BoxError) {
        self.core.emit_error(err);
    }
}

impl<T> Pipe for EnforceAtMostOne<T> {
    fn request(&self, n: i64) {
        self.core.take(n);
    }

    fn close(&self) {
        self.core.close();
    }
}

pub(crate) fn enforce_at_most_one<T: 'static>(
    upstream_attach: Box<dyn FnOnce(Box<dyn Receiver<T>>)>,
    require_one: bool,
) -> Box<dyn FnOnce(Box<dyn Receiver<T>>)> {
    Box::new(move |downstream: Box<dyn Receiver<T>>| {
        let stage = Rc::new_cyclic(|weak| EnforceAtMostOne {
            core: OperatorCore::new(downstream),
            require_one,
            seen: Cell::new(false),
            weak_self: weak.clone(),
        });
        upstream_attach(Box::new(stage));
    })
}

impl<T: 'static> Maybe<T> {
    /// Drives `body` as a coroutine generator that may emit at most one
    /// item; a second `emit` becomes an `Error` instead of being
    /// delivered (spec §4.9).
    pub fn generate<F, Fut>(body: F) -> Self
    where
        F: FnOnce(Sink<T>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let many = generate(body);
        Maybe::from_boxed(enforce_at_most_one(many.into_attach(), false))
    }
}

impl<T: 'static> Mono<T> {
    /// Drives `body` as a coroutine generator that must emit exactly one
    /// item: a second `emit`, or returning without ever emitting, both
    /// become `Error` (spec §4.9: "as `Maybe`, plus checks that exactly
    /// one `emit` occurred before normal return").
    pub fn generate<F, Fut>(body: F) -> Self
    where
        F: FnOnce(Sink<T>) -> Fut + 'static,
        Fut: Future<Output = ()> + 'static,
    {
        let many = generate(body);
        Mono::from_boxed(enforce_at_most_one(many.into_attach(), true))
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::emitter::Emitter;
    use crate::testing::ScriptedReceiver;

    #[test]
    fn emits_in_order_and_completes() {
        let receiver = Rc::new(ScriptedReceiver::new());
        generate(|sink: Sink<i32>| async move {
            sink.emit(1).await;
            sink.emit(2).await;
            sink.emit(3).await;
        })
        .subscribe(receiver.clone());
        receiver.request_all();
        assert_eq!(receiver.items(), vec![1, 2, 3]);
        assert!(receiver.is_complete());
    }

    #[test]
    fn suspends_until_demand_then_resumes_in_two_batches() {
        let receiver = Rc::new(ScriptedReceiver::new());
        generate(|sink: Sink<i32>| async move {
            sink.emit(1).await;
            sink.emit(2).await;
            sink.emit(3).await;
        })
        .subscribe(receiver.clone());
        receiver.request(2);
        assert_eq!(receiver.items(), vec![1, 2]);
        assert!(!receiver.is_complete());
        receiver.request_all();
        assert_eq!(receiver.items(), vec![1, 2, 3]);
        assert!(receiver.is_complete());
    }

    #[test]
    fn closing_while_suspended_cancels_without_completing() {
        let receiver = Rc::new(ScriptedReceiver::new());
        generate(|sink: Sink<i32>| async move {
            sink.emit(1).await;
            sink.emit(2).await;
        })
        .subscribe(receiver.clone());
        receiver.request(1);
        assert_eq!(receiver.items(), vec![1]);
        receiver.close();
        assert!(!receiver.is_complete());
        assert!(!receiver.is_error());
    }

    #[test]
    fn closing_before_any_request_never_starts_the_body() {
        let receiver = Rc::new(ScriptedReceiver::new());
        let ran = Rc::new(Cell::new(false));
        let ran_in_body = ran.clone();
        generate(move |_sink: Sink<i32>| {
            let ran_in_body = ran_in_body.clone();
            async move {
                ran_in_body.set(true);
            }
        })
        .subscribe(receiver.clone());
        receiver.close();
        assert!(!ran.get());
    }

    /// A receiver that re-enters `request` from inside `receive`, the
    /// pattern spec §5 explicitly sanctions. Exercises the re-entrancy
    /// guard in `Generate::drive`.
    struct ReentrantReceiver {
        pipe: RefCell<Option<Rc<dyn Pipe>>>,
        items: RefCell<Vec<i32>>,
        remaining: Cell<i64>,
    }

    impl Receiver<i32> for ReentrantReceiver {
        fn open(&self, pipe: Rc<dyn Pipe>) {
            *self.pipe.borrow_mut() = Some(pipe.clone());
            pipe.request(1);
        }

        fn receive(&self, item: i32) {
            self.items.borrow_mut().push(item);
            if self.remaining.get() > 0 {
                self.remaining.set(self.remaining.get() - 1);
                self.pipe.borrow().as_ref().unwrap().request(1);
            }
        }

        fn complete(&self) {}
        fn error(&self, _err: BoxError) {}
    }

    #[test]
    fn reentrant_request_from_receive_does_not_panic() {
        let receiver = Rc::new(ReentrantReceiver {
            pipe: RefCell::new(None),
            items: RefCell::new(Vec::new()),
            remaining: Cell::new(2),
        });
        generate(|sink: Sink<i32>| async move {
            sink.emit(1).await;
            sink.emit(2).await;
            sink.emit(3).await;
        })
        .subscribe(receiver.clone());
        assert_eq!(*receiver.items.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn maybe_generate_rejects_a_second_emit() {
        let receiver = Rc::new(ScriptedReceiver::new());
        Maybe::generate(|sink: Sink<i32>| async move {
            sink.emit(1).await;
            sink.emit(2).await;
        })
        .subscribe(receiver.clone());
        receiver.request_all();
        assert_eq!(receiver.items(), vec![1]);
        assert!(receiver.is_error());
    }

    #[test]
    fn maybe_generate_allows_completing_empty() {
        let receiver = Rc::new(ScriptedReceiver::new());
        Maybe::generate(|_sink: Sink<i32>| async move {}).subscribe(receiver.clone());
        receiver.request_all();
        assert_eq!(receiver.item_count(), 0);
        assert!(receiver.is_complete());
    }

    #[test]
    fn mono_generate_requires_exactly_one_emit() {
        let receiver = Rc::new(ScriptedReceiver::new());
        Mono::generate(|_sink: Sink<i32>| async move {}).subscribe(receiver.clone());
        receiver.request_all();
        assert_eq!(receiver.item_count(), 0);
        assert!(receiver.is_error());
    }

    #[test]
    fn mono_generate_succeeds_with_exactly_one_emit() {
        let receiver = Rc::new(ScriptedReceiver::new());
        Mono::generate(|sink: Sink<i32>| async move {
            sink.emit(7).await;
        })
        .subscribe(receiver.clone());
        receiver.request_all();
        assert_eq!(receiver.items(), vec![7]);
        assert!(receiver.is_complete());
    }
}
