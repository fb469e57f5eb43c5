//! Queues of orders outside the line, and the cycle counter.

use crate::event::Cycle;
use crate::order::CustomerOrder;
use std::collections::VecDeque;

/// Orders waiting to enter the line and orders that have left it.
///
/// Passed explicitly into the run loop. `completed + incomplete` only ever
/// grows, one order at a time, and reaches `total_orders` exactly when the
/// run is over.
#[derive(Debug, Default)]
pub struct SimState {
    pub(crate) pending: VecDeque<CustomerOrder>,
    pub(crate) completed: Vec<CustomerOrder>,
    pub(crate) incomplete: Vec<CustomerOrder>,
    total_orders: usize,
    pub(crate) cycle: Cycle,
}

impl SimState {
    pub fn new(orders: Vec<CustomerOrder>) -> Self {
        Self {
            total_orders: orders.len(),
            pending: orders.into(),
            ..Self::default()
        }
    }

    pub fn pending(&self) -> impl ExactSizeIterator<Item = &CustomerOrder> + '_ {
        self.pending.iter()
    }

    /// Orders that left the line with every item filled.
    pub fn completed(&self) -> &[CustomerOrder] {
        &self.completed
    }

    /// Orders that left the line with at least one item unfilled.
    pub fn incomplete(&self) -> &[CustomerOrder] {
        &self.incomplete
    }

    pub fn total_orders(&self) -> usize {
        self.total_orders
    }

    /// Cycles run so far.
    pub fn cycle(&self) -> Cycle {
        self.cycle
    }

    /// Orders no longer in circulation.
    pub fn finished_count(&self) -> usize {
        self.completed.len() + self.incomplete.len()
    }

    pub fn is_finished(&self) -> bool {
        self.finished_count() == self.total_orders
    }

    /// Route an order leaving the terminal station.
    pub(crate) fn retire(&mut self, order: CustomerOrder) -> bool {
        let filled = order.is_order_filled();
        if filled {
            self.completed.push(order);
        } else {
            self.incomplete.push(order);
        }
        filled
    }
}
