//! Property-based tests for the run loop.
//!
//! Generates random lines and order books, runs them to the end and checks
//! stock, serial and accounting invariants.

use linesim_core::engine::Engine;
use linesim_core::order::CustomerOrder;
use linesim_core::query::station_snapshots;
use linesim_core::test_utils::*;
use proptest::prelude::*;
use std::collections::HashMap;

const NAMES: [&str; 6] = ["Bed", "Desk", "Chair", "Lamp", "Shelf", "Sofa"];

// ===========================================================================
// Generators
// ===========================================================================

/// `(name, serial start, quantity)` for 1 to 6 distinct stations.
fn arb_stations() -> impl Strategy<Value = Vec<(&'static str, u64, u32)>> {
    (1..=NAMES.len()).prop_flat_map(|n| {
        proptest::collection::vec((0..1000u64, 0..4u32), n).prop_map(move |params| {
            params
                .into_iter()
                .enumerate()
                .map(|(i, (serial, quantity))| (NAMES[i], serial, quantity))
                .collect()
        })
    })
}

/// Item lists drawn from the station names plus one name no station stocks.
fn arb_orders() -> impl Strategy<Value = Vec<Vec<&'static str>>> {
    let item = prop_oneof![
        4 => (0..NAMES.len()).prop_map(|i| NAMES[i]),
        1 => Just("Ghost"),
    ];
    proptest::collection::vec(proptest::collection::vec(item, 0..5), 0..8)
}

fn build_orders(items: &[Vec<&str>]) -> Vec<CustomerOrder> {
    items
        .iter()
        .enumerate()
        .map(|(i, list)| order(&format!("c{i}"), list))
        .collect()
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every order leaves the line, and completed/incomplete match fill state.
    #[test]
    fn every_order_is_accounted_for(specs in arb_stations(), items in arb_orders()) {
        let line = chain_line(&specs);
        let mut engine = Engine::new(line, build_orders(&items));
        let summary = engine.run(Some(10_000)).unwrap();

        prop_assert_eq!(summary.completed + summary.incomplete, items.len());
        for order in engine.state().completed() {
            prop_assert!(order.is_order_filled());
            prop_assert!(order.items().iter().all(|i| i.is_filled()));
        }
        for order in engine.state().incomplete() {
            prop_assert!(!order.is_order_filled());
            prop_assert!(order.items().iter().any(|i| !i.is_filled()));
        }
    }

    /// Stock used equals units filled, and each station's serials are a
    /// gap-free run from its start value.
    #[test]
    fn stock_and_serials_are_conserved(specs in arb_stations(), items in arb_orders()) {
        let line = chain_line(&specs);
        let mut engine = Engine::new(line, build_orders(&items));
        engine.run(Some(10_000)).unwrap();

        let mut serials: HashMap<&str, Vec<u64>> = HashMap::new();
        let state = engine.state();
        for order in state.completed().iter().chain(state.incomplete()) {
            for item in order.items() {
                if let Some(serial) = item.serial_number() {
                    serials.entry(item.name()).or_default().push(serial);
                }
            }
        }

        let snapshots = station_snapshots(engine.line());
        for (snapshot, &(name, start, quantity)) in snapshots.iter().zip(&specs) {
            prop_assert_eq!(snapshot.name.as_str(), name);
            prop_assert_eq!(quantity - snapshot.quantity, snapshot.filled_count);
            prop_assert_eq!(snapshot.next_serial_number, start + u64::from(snapshot.filled_count));

            let mut used = serials.remove(name).unwrap_or_default();
            used.sort_unstable();
            let expected: Vec<u64> = (start..snapshot.next_serial_number).collect();
            prop_assert_eq!(used, expected);
        }
        prop_assert!(serials.is_empty());
    }

    /// Cycle over cycle, stock never rises, serial cursors never fall and the
    /// finished count never drops.
    #[test]
    fn counters_move_one_way(specs in arb_stations(), items in arb_orders()) {
        let line = chain_line(&specs);
        let mut engine = Engine::new(line, build_orders(&items));

        let mut before = station_snapshots(engine.line());
        let mut finished = 0;
        loop {
            let done = engine.step();
            let after = station_snapshots(engine.line());
            for (b, a) in before.iter().zip(&after) {
                prop_assert!(a.quantity <= b.quantity);
                prop_assert!(a.next_serial_number >= b.next_serial_number);
                // One fill per station per cycle at most.
                prop_assert!(a.filled_count - b.filled_count <= 1);
            }
            let now = engine.state().finished_count();
            prop_assert!(now >= finished);
            finished = now;
            before = after;

            if done {
                break;
            }
            prop_assert!(engine.state().cycle() < 10_000);
        }
        prop_assert_eq!(finished, items.len());
    }

    /// Taking an order leaves an empty husk behind.
    #[test]
    fn take_empties_source(list in proptest::collection::vec(0..NAMES.len(), 0..6)) {
        let names: Vec<&str> = list.iter().map(|&i| NAMES[i]).collect();
        let mut source = order("c", &names);
        let moved = source.take();
        prop_assert_eq!(moved.item_count(), names.len());
        prop_assert_eq!(source.item_count(), 0);
        prop_assert_eq!(source.filled_item_count(), 0);
    }
}
