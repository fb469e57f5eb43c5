//! Shared test helpers for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::id::StationNumbering;
use crate::line::{LineTopology, StationLink};
use crate::order::CustomerOrder;
use crate::station::Station;
use std::path::PathBuf;

// ===========================================================================
// Constructors
// ===========================================================================

/// Stations numbered from 1 in the given order, from `(name, serial, quantity)`.
pub fn stations(specs: &[(&str, u64, u32)]) -> Vec<Station> {
    let mut numbering = StationNumbering::new();
    specs
        .iter()
        .map(|&(name, serial, quantity)| {
            Station::new(numbering.next_number(), name, serial, quantity, "")
        })
        .collect()
}

/// A straight line through `specs`, first to last.
pub fn chain_line(specs: &[(&str, u64, u32)]) -> LineTopology {
    let links: Vec<StationLink> = specs
        .iter()
        .enumerate()
        .map(|(i, (name, ..))| StationLink::new(*name, specs.get(i + 1).map(|next| next.0)))
        .collect();
    LineTopology::build(stations(specs), &links).expect("chain_line: invalid line")
}

/// An order for product `"Product"`.
pub fn order(customer: &str, items: &[&str]) -> CustomerOrder {
    CustomerOrder::new(customer, "Product", items.iter().copied())
}

// ===========================================================================
// Files
// ===========================================================================

/// A fresh, empty directory under the system temp dir.
pub fn make_test_dir(suffix: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "linesim_test_{suffix}_{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).expect("make_test_dir: cannot create directory");
    dir
}
