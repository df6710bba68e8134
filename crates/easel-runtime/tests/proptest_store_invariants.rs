//! Property tests for store publish ordering.
//!
//! 1. Every subscriber's first observation is the value current when it
//!    subscribed.
//! 2. Every subscriber observes every `set`, in order, with no coalescing.
//! 3. `version()` equals the number of `set` calls.

#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;

use easel_runtime::Store;
use proptest::prelude::*;

fn record(store: &Store<i32>) -> Rc<RefCell<Vec<i32>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    store.subscribe(move |v: &i32| sink.borrow_mut().push(*v));
    log
}

proptest! {
    #[test]
    fn first_observation_is_initial_value(initial in any::<i32>(), subscribers in 1usize..8) {
        let store = Store::new(initial);
        let logs: Vec<_> = (0..subscribers).map(|_| record(&store)).collect();
        for log in logs {
            prop_assert_eq!(log.borrow().first().copied(), Some(initial));
        }
    }

    #[test]
    fn every_subscriber_sees_every_set(
        initial in any::<i32>(),
        values in prop::collection::vec(any::<i32>(), 0..32),
        subscribers in 1usize..5,
    ) {
        let store = Store::new(initial);
        let logs: Vec<_> = (0..subscribers).map(|_| record(&store)).collect();
        for v in &values {
            store.set(*v);
        }

        let mut expected = vec![initial];
        expected.extend(values.iter().copied());
        for log in logs {
            prop_assert_eq!(&*log.borrow(), &expected);
        }
        prop_assert_eq!(store.version(), values.len() as u64);
    }

    #[test]
    fn repeated_values_are_not_deduplicated(v in any::<i32>(), repeats in 1usize..10) {
        let store = Store::new(v);
        let log = record(&store);
        for _ in 0..repeats {
            store.set(v);
        }
        prop_assert_eq!(log.borrow().len(), repeats + 1);
    }

    #[test]
    fn late_subscriber_starts_at_current(
        before in prop::collection::vec(any::<i32>(), 1..16),
        after in prop::collection::vec(any::<i32>(), 0..16),
    ) {
        let store = Store::new(0);
        for v in &before {
            store.set(*v);
        }
        let log = record(&store);
        for v in &after {
            store.set(*v);
        }

        let mut expected = vec![*before.last().unwrap()];
        expected.extend(after.iter().copied());
        prop_assert_eq!(&*log.borrow(), &expected);
    }
}
