//! The run loop and the engine that drives it.
//!
//! # Cycle phases
//!
//! Each cycle runs, in order:
//! 1. **Admit** -- move one pending order onto the entry station's queue.
//! 2. **Fill** -- every active station, in chain order, tries to fill its
//!    front order.
//! 3. **Forward** -- every active station, in chain order, releases its front
//!    order if it is ready. Departures are decided first; the released
//!    orders are appended to their next station afterwards, so an order moves
//!    at most one station per cycle. Orders released by the terminal station
//!    leave the line as completed or incomplete.
//!
//! [`Engine::step`] then delivers the cycle's events.

use crate::error::LineError;
use crate::event::{Cycle, Event, EventBus};
use crate::id::StationId;
use crate::line::LineTopology;
use crate::order::CustomerOrder;
use crate::query::{RunReport, RunSummary};
use crate::sim::SimState;

// ---------------------------------------------------------------------------
// Run loop
// ---------------------------------------------------------------------------

/// Advance the line by one cycle.
///
/// Returns `true` once every order has left the line. Call repeatedly until
/// it does.
pub fn run_cycle(line: &mut LineTopology, state: &mut SimState, events: &mut EventBus) -> bool {
    state.cycle += 1;
    let cycle = state.cycle;
    events.emit(Event::CycleStarted { cycle });

    phase_admit(line, state, events, cycle);
    phase_fill(line, events, cycle);
    phase_forward(line, state, events, cycle);

    log::debug!(
        "cycle {cycle}: {} pending, {} in flight, {} completed, {} incomplete",
        state.pending.len(),
        line.orders_in_flight(),
        state.completed.len(),
        state.incomplete.len()
    );

    state.is_finished()
}

fn phase_admit(
    line: &mut LineTopology,
    state: &mut SimState,
    events: &mut EventBus,
    cycle: Cycle,
) {
    let Some(order) = state.pending.pop_front() else {
        return;
    };
    let entry = &mut line.stations[line.chain[0]];
    events.emit(Event::OrderAdmitted {
        customer: order.customer_name().to_string(),
        product: order.product().to_string(),
        station: entry.name().to_string(),
        cycle,
    });
    *entry += order;
}

fn phase_fill(line: &mut LineTopology, events: &mut EventBus, cycle: Cycle) {
    let LineTopology { stations, chain, .. } = line;
    for id in chain.iter() {
        stations[*id].fill(events, cycle);
    }
}

fn phase_forward(
    line: &mut LineTopology,
    state: &mut SimState,
    events: &mut EventBus,
    cycle: Cycle,
) {
    let LineTopology { stations, chain, .. } = line;

    let mut arrivals: Vec<(StationId, CustomerOrder)> = Vec::new();
    for id in chain.iter() {
        let ws = &mut stations[*id];
        let Some(order) = ws.take_ready() else {
            continue;
        };
        let from = ws.name().to_string();

        match ws.next() {
            Some(next) => {
                events.emit(Event::OrderForwarded {
                    customer: order.customer_name().to_string(),
                    product: order.product().to_string(),
                    from,
                    to: stations[next].name().to_string(),
                    cycle,
                });
                arrivals.push((next, order));
            }
            None => {
                let customer = order.customer_name().to_string();
                let product = order.product().to_string();
                if state.retire(order) {
                    events.emit(Event::OrderCompleted {
                        customer,
                        product,
                        cycle,
                    });
                } else {
                    events.emit(Event::OrderIncomplete {
                        customer,
                        product,
                        cycle,
                    });
                }
            }
        }
    }

    for (id, order) in arrivals {
        stations[id] += order;
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// A line, its order queues and the event bus, run together.
#[derive(Debug)]
pub struct Engine {
    line: LineTopology,
    state: SimState,
    events: EventBus,
}

impl Engine {
    pub fn new(line: LineTopology, orders: Vec<CustomerOrder>) -> Self {
        Self::with_event_bus(line, orders, EventBus::default())
    }

    /// Use `events` for notices. Its buffers are grown to hold one cycle's
    /// worth of events of any kind, so delivery never loses a notice.
    pub fn with_event_bus(
        line: LineTopology,
        orders: Vec<CustomerOrder>,
        mut events: EventBus,
    ) -> Self {
        events.ensure_capacity(line.chain().len());
        log::info!(
            "engine ready: {} orders, {} active stations",
            orders.len(),
            line.chain().len()
        );
        Self {
            line,
            state: SimState::new(orders),
            events,
        }
    }

    /// Run one cycle and deliver its events. Returns `true` when finished.
    pub fn step(&mut self) -> bool {
        let finished = run_cycle(&mut self.line, &mut self.state, &mut self.events);
        self.events.deliver();
        finished
    }

    /// Step until every order has left the line.
    ///
    /// At least one cycle always runs. With a `limit`, gives up with
    /// [`LineError::CycleLimitExceeded`] once that many cycles have run
    /// without finishing.
    pub fn run(&mut self, limit: Option<u64>) -> Result<RunSummary, LineError> {
        loop {
            if let Some(limit) = limit
                && self.state.cycle() >= limit
            {
                log::warn!("giving up after {limit} cycles");
                return Err(LineError::CycleLimitExceeded { limit });
            }
            if self.step() {
                break;
            }
        }

        let summary = self.summary();
        log::info!(
            "all orders processed in {} cycles: {} completed, {} incomplete",
            summary.cycles,
            summary.completed,
            summary.incomplete
        );
        Ok(summary)
    }

    pub fn line(&self) -> &LineTopology {
        &self.line
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.events
    }

    /// For registering listeners and suppressing kinds.
    pub fn event_bus_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::new(&self.state)
    }

    pub fn report(&self) -> RunReport {
        RunReport::new(&self.line, &self.state)
    }

    /// Give back the line and queues, e.g. to hand the results on.
    pub fn into_parts(self) -> (LineTopology, SimState) {
        (self.line, self.state)
    }
}
