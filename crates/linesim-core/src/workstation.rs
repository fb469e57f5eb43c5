//! A station placed on the line: stock plus a FIFO of orders in flight.

use crate::event::{Cycle, Event, EventBus};
use crate::id::StationId;
use crate::order::{CustomerOrder, FillOutcome};
use crate::station::Station;
use std::collections::VecDeque;
use std::fmt;
use std::ops::AddAssign;

/// A [`Station`] with an order queue and an optional successor.
///
/// Only the front order is worked on. A `next` of `None` marks the terminal
/// station, where orders leave the line.
#[derive(Debug)]
pub struct Workstation {
    station: Station,
    orders: VecDeque<CustomerOrder>,
    next: Option<StationId>,
}

impl Workstation {
    pub fn new(station: Station) -> Self {
        Self {
            station,
            orders: VecDeque::new(),
            next: None,
        }
    }

    pub fn station(&self) -> &Station {
        &self.station
    }

    pub fn name(&self) -> &str {
        self.station.name()
    }

    pub fn next(&self) -> Option<StationId> {
        self.next
    }

    pub(crate) fn set_next(&mut self, next: Option<StationId>) {
        self.next = next;
    }

    pub fn is_terminal(&self) -> bool {
        self.next.is_none()
    }

    /// Move an order onto the back of the queue.
    pub fn push_order(&mut self, order: CustomerOrder) {
        self.orders.push_back(order);
    }

    pub fn front_order(&self) -> Option<&CustomerOrder> {
        self.orders.front()
    }

    pub fn orders(&self) -> impl ExactSizeIterator<Item = &CustomerOrder> + '_ {
        self.orders.iter()
    }

    pub fn queue_len(&self) -> usize {
        self.orders.len()
    }

    /// Try to fill the front order's item for this station.
    ///
    /// Emits `ItemFilled` or `UnableToFill`. Returns `None` when the queue is
    /// empty.
    pub fn fill(&mut self, events: &mut EventBus, cycle: Cycle) -> Option<FillOutcome> {
        let order = self.orders.front_mut()?;
        let outcome = order.fill_item(&mut self.station);

        match outcome {
            FillOutcome::Filled { serial } => events.emit(Event::ItemFilled {
                customer: order.customer_name().to_string(),
                product: order.product().to_string(),
                item: self.station.name().to_string(),
                serial,
                cycle,
            }),
            FillOutcome::OutOfStock => events.emit(Event::UnableToFill {
                customer: order.customer_name().to_string(),
                product: order.product().to_string(),
                item: self.station.name().to_string(),
                cycle,
            }),
            FillOutcome::NotNeeded => {}
        }
        Some(outcome)
    }

    /// Whether the front order may leave this station.
    ///
    /// It may once it no longer needs this station's item, or once the
    /// station has run out of stock.
    pub fn front_ready(&self) -> bool {
        self.orders.front().is_some_and(|order| {
            order.is_item_filled(self.station.name()) || !self.station.has_stock()
        })
    }

    /// Pop the front order if it is ready to leave.
    pub fn take_ready(&mut self) -> Option<CustomerOrder> {
        if self.front_ready() {
            self.orders.pop_front()
        } else {
            None
        }
    }

    /// `NAME --> NEXT`, or `NAME --> End of Line` for the terminal station.
    pub fn display_link<'a>(&'a self, next_name: Option<&'a str>) -> LinkDisplay<'a> {
        LinkDisplay {
            name: self.station.name(),
            next: next_name,
        }
    }
}

impl AddAssign<CustomerOrder> for Workstation {
    fn add_assign(&mut self, order: CustomerOrder) {
        self.push_order(order);
    }
}

/// Formatter returned by [`Workstation::display_link`].
pub struct LinkDisplay<'a> {
    name: &'a str,
    next: Option<&'a str>,
}

impl fmt::Display for LinkDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --> {}", self.name, self.next.unwrap_or("End of Line"))
    }
}
