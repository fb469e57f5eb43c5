//! Linesim Core -- an assembly-line order-fulfillment simulator.
//!
//! Customer orders, each a list of named items, flow through a chain of
//! workstations. Every station stocks one item, fills at most one unit per
//! order per cycle and stamps each unit with its own serial number. When the
//! last order has left the line, every order is either completed or
//! incomplete.
//!
//! # Cycle
//!
//! Each call to [`engine::Engine::step`] runs one cycle:
//!
//! 1. **Admit** -- one pending order enters the entry station.
//! 2. **Fill** -- each active station tries to fill its front order.
//! 3. **Forward** -- each active station releases a ready front order to its
//!    successor, or off the line at the terminal station.
//! 4. **Deliver** -- the cycle's events go to the event bus listeners.
//!
//! # Example
//!
//! ```
//! use linesim_core::data_loader::{build_topology_from_str, load_orders_from_str, load_stations_from_str};
//! use linesim_core::engine::Engine;
//! use linesim_core::id::StationNumbering;
//!
//! let mut numbering = StationNumbering::new();
//! let stations = load_stations_from_str("Desk,100,2\nChair,1,2\n", ',', &mut numbering).unwrap();
//! let line = build_topology_from_str("Desk|Chair\nChair|\n", stations, '|').unwrap();
//! let orders = load_orders_from_str("Ann|Office|Desk|Chair\n", '|').unwrap();
//!
//! let mut engine = Engine::new(line, orders);
//! let summary = engine.run(Some(100)).unwrap();
//! assert_eq!(summary.completed, 1);
//! ```
//!
//! # Key Types
//!
//! - [`tokenizer::Tokenizer`] -- splits delimited records into fields.
//! - [`station::Station`] -- item stock with a serial-number generator.
//! - [`order::CustomerOrder`] -- move-only order owning its items.
//! - [`workstation::Workstation`] -- a station with an order queue.
//! - [`line::LineTopology`] -- the validated chain of workstations.
//! - [`event::EventBus`] -- buffered per-cycle notices.
//! - [`query::RunReport`] -- serializable end-of-run results.

pub mod data_loader;
pub mod engine;
pub mod error;
pub mod event;
pub mod id;
pub mod line;
pub mod order;
pub mod query;
pub mod sim;
pub mod station;
pub mod tokenizer;
pub mod workstation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
