//! Property tests against the signal-ordering and demand invariants
//! spec'd for the core protocol: items never exceed outstanding demand,
//! a terminal signal is delivered exactly once, and `map` neither drops
//! nor reorders items.

use std::rc::Rc;

use fluxion::emitter::Emitter;
use fluxion::source;
use fluxion::testing::ScriptedReceiver;
use proptest::prelude::*;

proptest! {
    #[test]
    fn iterable_never_delivers_more_than_requested(items in prop::collection::vec(any::<i32>(), 0..64), grant in 0usize..8) {
        let receiver = Rc::new(ScriptedReceiver::new());
        source::iterable(items.clone()).subscribe(receiver.clone());
        receiver.request(grant as i64);
        prop_assert!(receiver.item_count() <= grant.min(items.len()));
    }

    #[test]
    fn iterable_delivers_everything_once_fully_requested(items in prop::collection::vec(any::<i32>(), 0..64)) {
        let receiver = Rc::new(ScriptedReceiver::new());
        source::iterable(items.clone()).subscribe(receiver.clone());
        receiver.request_all();
        prop_assert_eq!(receiver.items(), items);
        prop_assert!(receiver.is_complete());
    }

    #[test]
    fn map_preserves_order_and_count(items in prop::collection::vec(any::<i32>(), 0..64)) {
        let receiver = Rc::new(ScriptedReceiver::new());
        let expected: Vec<i64> = items.iter().map(|n| *n as i64 * 2).collect();
        source::iterable(items).map(|n| n as i64 * 2).subscribe(receiver.clone());
        receiver.request_all();
        prop_assert_eq!(receiver.items(), expected);
        prop_assert!(receiver.is_complete());
    }

    #[test]
    fn buffer_unbounded_delivers_everything_once_requested(items in prop::collection::vec(any::<i32>(), 0..64)) {
        let receiver = Rc::new(ScriptedReceiver::new());
        source::iterable(items.clone()).buffer_unbounded().subscribe(receiver.clone());
        receiver.request_all();
        prop_assert_eq!(receiver.items(), items);
        prop_assert!(receiver.is_complete());
    }

    #[test]
    fn buffer_fixed_respects_capacity_and_eventually_drains(items in prop::collection::vec(any::<i32>(), 0..64), capacity in 1i64..16) {
        let receiver = Rc::new(ScriptedReceiver::new());
        source::iterable(items.clone()).buffer_fixed(capacity).subscribe(receiver.clone());
        receiver.request_all();
        prop_assert_eq!(receiver.items(), items);
        prop_assert!(receiver.is_complete());
    }

    #[test]
    fn terminal_signal_is_delivered_at_most_once(items in prop::collection::vec(any::<i32>(), 0..32)) {
        let receiver = Rc::new(ScriptedReceiver::new());
        source::iterable(items).subscribe(receiver.clone());
        receiver.request_all();
        prop_assert!(receiver.is_complete() ^ receiver.is_error());
    }
}
