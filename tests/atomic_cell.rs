#![cfg(not(feature = "loom"))]

use std::sync::Arc;
use std::thread;

use wordsync::{AtomicCell, CasOutcome};

const THREADS: usize = 8;
const ITERS: usize = 10_000;

#[test]
fn concurrent_increments_are_not_lost() {
    let cell = AtomicCell::<i64>::new(0);

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..ITERS {
                    cell.increment();
                }
            });
        }
    });

    assert_eq!(cell.read(), (THREADS * ITERS) as i64);
}

#[test]
fn concurrent_mixed_updates_balance_out() {
    let cell = AtomicCell::<isize>::new(100);

    thread::scope(|s| {
        for t in 0..THREADS {
            let cell = &cell;
            s.spawn(move || {
                for i in 0..ITERS {
                    match (t + i) % 4 {
                        0 => {
                            cell.increment();
                        }
                        1 => {
                            cell.decrement();
                        }
                        2 => {
                            cell.add(7);
                        }
                        _ => {
                            cell.sub(7);
                        }
                    }
                }
            });
        }
    });

    assert_eq!(cell.read(), 100);
}

#[test]
fn add_and_sub_scenario() {
    let cell = Arc::new(AtomicCell::<i32>::new(10));

    let adder = {
        let cell = Arc::clone(&cell);
        thread::spawn(move || cell.add(5))
    };
    let subber = {
        let cell = Arc::clone(&cell);
        thread::spawn(move || cell.sub(3))
    };

    let added = adder.join().unwrap();
    let subbed = subber.join().unwrap();

    // Either order is a valid linearization.
    assert!(
        (added == 15 && subbed == 12) || (subbed == 7 && added == 12),
        "added={added} subbed={subbed}"
    );
    assert_eq!(cell.read(), 12);
    assert_eq!(cell.read(), 12);
}

#[test]
fn cas_succeeds_only_on_expected() {
    let cell = AtomicCell::<i64>::new(5);
    assert_eq!(
        cell.compare_and_swap(5, 7),
        CasOutcome { succeeded: true, previous: 5 }
    );
    assert_eq!(cell.read(), 7);

    for held in [-1, 0, 4, 6, i64::MAX] {
        let cell = AtomicCell::<i64>::new(held);
        let outcome = cell.compare_and_swap(5, 7);
        assert!(!outcome.succeeded);
        assert_eq!(outcome.previous, held);
        assert_eq!(cell.read(), held);
    }
}

#[test]
fn cas_to_same_value_succeeds() {
    let cell = AtomicCell::<i32>::new(1);
    let outcome = cell.compare_and_swap(1, 1);
    assert_eq!(outcome.into_result(), Ok(1));
    assert_eq!(cell.read(), 1);
}

#[test]
fn cas_has_exactly_one_winner() {
    let cell = AtomicCell::<i64>::new(0);

    let winners: usize = thread::scope(|s| {
        let handles: Vec<_> = (1..=THREADS as i64)
            .map(|t| {
                let cell = &cell;
                s.spawn(move || usize::from(cell.compare_and_swap(0, t).succeeded))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(winners, 1);
    assert_ne!(cell.read(), 0);
}

#[test]
fn caller_retry_loop_on_cas() {
    let cell = AtomicCell::<i64>::new(1);

    // Each thread adds 2 through its own compare-and-retry loop.
    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..1000 {
                    let mut seen = cell.read();
                    loop {
                        let outcome = cell.compare_and_swap(seen, seen + 2);
                        if outcome.succeeded {
                            break;
                        }
                        seen = outcome.previous;
                    }
                }
            });
        }
    });

    assert_eq!(cell.read(), 1 + 4 * 1000 * 2);
}

#[test]
fn read_never_observes_unwritten_values() {
    // Writers only ever publish multiples of 3 through CAS.
    let cell = AtomicCell::<i64>::new(0);

    thread::scope(|s| {
        for _ in 0..2 {
            s.spawn(|| {
                for _ in 0..ITERS {
                    let seen = cell.read();
                    cell.compare_and_swap(seen, seen + 3);
                }
            });
        }
        s.spawn(|| {
            let mut last = 0;
            for _ in 0..ITERS {
                let v = cell.read();
                assert_eq!(v % 3, 0, "observed a value no writer produced: {v}");
                assert!(v >= last, "value went backwards: {last} -> {v}");
                last = v;
            }
        });
    });
}

#[test]
fn wrapping_at_the_edges() {
    let cell = AtomicCell::<isize>::new(isize::MAX);
    assert_eq!(cell.add(1), isize::MIN);
    assert_eq!(cell.sub(1), isize::MAX);

    let cell = AtomicCell::<i32>::new(i32::MIN);
    assert_eq!(cell.decrement(), i32::MAX);
}

#[test]
fn cells_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<AtomicCell<i32>>();
    assert_send_sync::<AtomicCell<i64>>();
    assert_send_sync::<AtomicCell>();
}
