#![cfg(not(feature = "loom"))]

use proptest::prelude::*;
use wordsync::AtomicCell;

#[derive(Debug, Clone)]
enum Operation {
    Read,
    Increment,
    Decrement,
    Add(i32),
    Sub(i32),
    Cas(i32, i32),
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        Just(Operation::Read),
        Just(Operation::Increment),
        Just(Operation::Decrement),
        any::<i32>().prop_map(Operation::Add),
        any::<i32>().prop_map(Operation::Sub),
        // Bias expected values towards small numbers so CAS actually hits.
        (-4i32..4, any::<i32>()).prop_map(|(e, n)| Operation::Cas(e, n)),
    ]
}

proptest! {
    #[test]
    fn cell_matches_wrapping_model(
        initial in -4i32..4,
        ops in proptest::collection::vec(operation(), 1..200),
    ) {
        let cell = AtomicCell::<i32>::new(initial);
        let mut model = initial;

        for op in ops {
            match op {
                Operation::Read => {
                    prop_assert_eq!(cell.read(), model);
                }
                Operation::Increment => {
                    model = model.wrapping_add(1);
                    prop_assert_eq!(cell.increment(), model);
                }
                Operation::Decrement => {
                    model = model.wrapping_sub(1);
                    prop_assert_eq!(cell.decrement(), model);
                }
                Operation::Add(d) => {
                    model = model.wrapping_add(d);
                    prop_assert_eq!(cell.add(d), model);
                }
                Operation::Sub(d) => {
                    model = model.wrapping_sub(d);
                    prop_assert_eq!(cell.sub(d), model);
                }
                Operation::Cas(expected, new) => {
                    let outcome = cell.compare_and_swap(expected, new);
                    prop_assert_eq!(outcome.previous, model);
                    prop_assert_eq!(outcome.succeeded, model == expected);
                    if model == expected {
                        model = new;
                    }
                }
            }
        }

        prop_assert_eq!(cell.into_inner(), model);
    }

    #[test]
    fn add_then_sub_restores(initial in any::<i64>(), delta in any::<i64>()) {
        let cell = AtomicCell::<i64>::new(initial);
        cell.add(delta);
        prop_assert_eq!(cell.sub(delta), initial);
    }
}
