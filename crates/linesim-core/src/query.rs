//! Read-only snapshots of orders, stations and run results.
//!
//! All types are owned copies with no references into the engine, and all
//! serialize with serde so a host can write them out as a report.

use crate::event::Cycle;
use crate::id::StationNumber;
use crate::line::LineTopology;
use crate::order::CustomerOrder;
use crate::sim::SimState;
use crate::workstation::Workstation;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Order snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemSnapshot {
    pub name: String,
    /// Assigned serial number. `None` while unfilled.
    pub serial_number: Option<u64>,
    pub filled: bool,
}

/// A copy of one order's progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSnapshot {
    pub customer: String,
    pub product: String,
    pub item_count: usize,
    pub filled_item_count: usize,
    pub items: Vec<ItemSnapshot>,
}

impl From<&CustomerOrder> for OrderSnapshot {
    fn from(order: &CustomerOrder) -> Self {
        Self {
            customer: order.customer_name().to_string(),
            product: order.product().to_string(),
            item_count: order.item_count(),
            filled_item_count: order.filled_item_count(),
            items: order
                .items()
                .iter()
                .map(|item| ItemSnapshot {
                    name: item.name().to_string(),
                    serial_number: item.serial_number(),
                    filled: item.is_filled(),
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Station snapshot
// ---------------------------------------------------------------------------

/// A copy of one station's stock and queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationSnapshot {
    pub number: StationNumber,
    pub name: String,
    /// Remaining stock.
    pub quantity: u32,
    pub next_serial_number: u64,
    /// Units handed out during the run.
    pub filled_count: u32,
    pub queued_orders: usize,
    /// `None` for the terminal station and for inactive stations.
    pub next_station: Option<String>,
    /// Whether the station is part of the chain.
    pub active: bool,
}

impl StationSnapshot {
    fn capture(ws: &Workstation, line: &LineTopology) -> Self {
        let station = ws.station();
        let id = line.find(ws.name());
        Self {
            number: station.number(),
            name: station.name().to_string(),
            quantity: station.quantity(),
            next_serial_number: station.peek_serial_number(),
            filled_count: station.filled_count(),
            queued_orders: ws.queue_len(),
            next_station: id.and_then(|id| line.next_name(id)).map(str::to_string),
            active: id.is_some_and(|id| line.chain().contains(&id)),
        }
    }
}

/// Every loaded station, ordered by station number.
pub fn station_snapshots(line: &LineTopology) -> Vec<StationSnapshot> {
    line.all_stations()
        .into_iter()
        .map(|ws| StationSnapshot::capture(ws, line))
        .collect()
}

// ---------------------------------------------------------------------------
// Run summary & report
// ---------------------------------------------------------------------------

/// Counts at the end of (or during) a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub cycles: Cycle,
    pub total_orders: usize,
    pub completed: usize,
    pub incomplete: usize,
}

impl RunSummary {
    pub fn new(state: &SimState) -> Self {
        Self {
            cycles: state.cycle(),
            total_orders: state.total_orders(),
            completed: state.completed().len(),
            incomplete: state.incomplete().len(),
        }
    }

    /// Completed orders as a percentage of all orders; 0 with no orders.
    pub fn completion_rate(&self) -> f64 {
        if self.total_orders == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total_orders as f64 * 100.0
    }
}

/// Everything a host needs to report on a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub summary: RunSummary,
    pub completion_rate: f64,
    /// Station that handed out the most units. Ties go to the lower station
    /// number; `None` when nothing was filled.
    pub most_active_station: Option<String>,
    pub stations: Vec<StationSnapshot>,
    pub completed: Vec<OrderSnapshot>,
    pub incomplete: Vec<OrderSnapshot>,
}

impl RunReport {
    pub fn new(line: &LineTopology, state: &SimState) -> Self {
        let summary = RunSummary::new(state);
        let stations = station_snapshots(line);
        let most_active_station = stations
            .iter()
            .filter(|s| s.filled_count > 0)
            .fold(None::<&StationSnapshot>, |best, s| match best {
                Some(b) if b.filled_count >= s.filled_count => Some(b),
                _ => Some(s),
            })
            .map(|s| s.name.clone());

        Self {
            completion_rate: summary.completion_rate(),
            summary,
            most_active_station,
            stations,
            completed: state.completed().iter().map(OrderSnapshot::from).collect(),
            incomplete: state.incomplete().iter().map(OrderSnapshot::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::test_utils::*;

    #[test]
    fn order_snapshot_copies_items() {
        let mut order = order("Ann", &["Desk", "Chair"]);
        let mut desk = crate::station::Station::new(StationNumber(1), "Desk", 5, 1, "");
        order.fill_item(&mut desk);

        let snap = OrderSnapshot::from(&order);
        assert_eq!(snap.item_count, 2);
        assert_eq!(snap.filled_item_count, 1);
        assert_eq!(snap.items[0].serial_number, Some(5));
        assert_eq!(snap.items[1].serial_number, None);
    }

    #[test]
    fn completion_rate_handles_zero_orders() {
        let summary = RunSummary {
            cycles: 1,
            total_orders: 0,
            completed: 0,
            incomplete: 0,
        };
        assert_eq!(summary.completion_rate(), 0.0);

        let summary = RunSummary {
            cycles: 4,
            total_orders: 4,
            completed: 3,
            incomplete: 1,
        };
        assert_eq!(summary.completion_rate(), 75.0);
    }

    #[test]
    fn report_after_run() {
        let line = chain_line(&[("Desk", 100, 1), ("Chair", 7, 5)]);
        let mut engine = Engine::new(
            line,
            vec![
                order("Ann", &["Desk", "Chair"]),
                order("Bob", &["Desk", "Chair", "Chair"]),
            ],
        );
        engine.run(Some(20)).unwrap();
        let report = engine.report();

        assert_eq!(report.summary.completed, 1);
        assert_eq!(report.summary.incomplete, 1);
        assert_eq!(report.completion_rate, 50.0);
        assert_eq!(report.most_active_station.as_deref(), Some("Chair"));

        let desk = &report.stations[0];
        assert_eq!(desk.name, "Desk");
        assert_eq!(desk.quantity, 0);
        assert_eq!(desk.filled_count, 1);
        assert_eq!(desk.next_station.as_deref(), Some("Chair"));
        assert!(desk.active);

        let chair = &report.stations[1];
        assert_eq!(chair.filled_count, 3);
        assert_eq!(chair.next_serial_number, 10);
        assert_eq!(chair.next_station, None);
    }

    #[test]
    fn no_fills_means_no_most_active_station() {
        let line = chain_line(&[("Desk", 1, 0)]);
        let mut engine = Engine::new(line, vec![order("Ann", &["Desk"])]);
        engine.run(Some(5)).unwrap();
        assert_eq!(engine.report().most_active_station, None);
    }
}
