//! Typed event bus for per-cycle notices.
//!
//! The run loop emits events while it admits, fills and forwards orders, and
//! the engine delivers them in one batch at the end of every cycle. Each event
//! kind has its own bounded [`EventBuffer`]; delivery merges the buffers back
//! into emission order before calling listeners, so a listener that prints
//! every kind sees the notices in the order they happened.
//!
//! A station that cannot fill an item is reported here, never as an error.
//!
//! # Suppression
//!
//! Kinds can be switched off with [`EventBus::suppress`]. A suppressed kind is
//! never buffered, counted or delivered.

use std::collections::VecDeque;
use std::fmt;

/// Cycle counter. The first cycle is 1.
pub type Cycle = u64;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// Something that happened on the line. Every event carries its cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    CycleStarted {
        cycle: Cycle,
    },
    /// A pending order entered the line at the entry station.
    OrderAdmitted {
        customer: String,
        product: String,
        station: String,
        cycle: Cycle,
    },
    ItemFilled {
        customer: String,
        product: String,
        item: String,
        serial: u64,
        cycle: Cycle,
    },
    /// The order needs the item but the station is out of stock.
    UnableToFill {
        customer: String,
        product: String,
        item: String,
        cycle: Cycle,
    },
    OrderForwarded {
        customer: String,
        product: String,
        from: String,
        to: String,
        cycle: Cycle,
    },
    OrderCompleted {
        customer: String,
        product: String,
        cycle: Cycle,
    },
    OrderIncomplete {
        customer: String,
        product: String,
        cycle: Cycle,
    },
}

/// Discriminant tag for events, used for suppression and subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CycleStarted,
    OrderAdmitted,
    ItemFilled,
    UnableToFill,
    OrderForwarded,
    OrderCompleted,
    OrderIncomplete,
}

const EVENT_KIND_COUNT: usize = 7;

impl EventKind {
    pub const ALL: [EventKind; EVENT_KIND_COUNT] = [
        EventKind::CycleStarted,
        EventKind::OrderAdmitted,
        EventKind::ItemFilled,
        EventKind::UnableToFill,
        EventKind::OrderForwarded,
        EventKind::OrderCompleted,
        EventKind::OrderIncomplete,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::CycleStarted { .. } => EventKind::CycleStarted,
            Event::OrderAdmitted { .. } => EventKind::OrderAdmitted,
            Event::ItemFilled { .. } => EventKind::ItemFilled,
            Event::UnableToFill { .. } => EventKind::UnableToFill,
            Event::OrderForwarded { .. } => EventKind::OrderForwarded,
            Event::OrderCompleted { .. } => EventKind::OrderCompleted,
            Event::OrderIncomplete { .. } => EventKind::OrderIncomplete,
        }
    }

    pub fn cycle(&self) -> Cycle {
        match self {
            Event::CycleStarted { cycle }
            | Event::OrderAdmitted { cycle, .. }
            | Event::ItemFilled { cycle, .. }
            | Event::UnableToFill { cycle, .. }
            | Event::OrderForwarded { cycle, .. }
            | Event::OrderCompleted { cycle, .. }
            | Event::OrderIncomplete { cycle, .. } => *cycle,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::CycleStarted { cycle } => write!(f, "Line Manager Iteration: {cycle}"),
            Event::OrderAdmitted {
                customer,
                product,
                station,
                ..
            } => write!(f, "    Admitted {customer}, {product} at {station}"),
            Event::ItemFilled {
                customer,
                product,
                item,
                ..
            } => write!(f, "    Filled {customer}, {product} [{item}]"),
            Event::UnableToFill {
                customer,
                product,
                item,
                ..
            } => write!(f, "    Unable to fill {customer}, {product} [{item}]"),
            Event::OrderForwarded {
                customer,
                product,
                from,
                to,
                ..
            } => write!(f, "    Moved {customer}, {product} from {from} to {to}"),
            Event::OrderCompleted {
                customer, product, ..
            } => write!(f, "    Completed {customer}, {product}"),
            Event::OrderIncomplete {
                customer, product, ..
            } => write!(f, "    Incomplete {customer}, {product}"),
        }
    }
}

// ---------------------------------------------------------------------------
// EventBuffer
// ---------------------------------------------------------------------------

/// Bounded FIFO of events for one kind. When full, the oldest entry is
/// dropped. Each entry keeps the bus-wide sequence number it was emitted with.
#[derive(Debug)]
pub struct EventBuffer {
    entries: VecDeque<(u64, Event)>,
    capacity: usize,
    total_written: u64,
}

impl EventBuffer {
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            total_written: 0,
        }
    }

    fn push(&mut self, sequence: u64, event: Event) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back((sequence, event));
        self.total_written += 1;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn grow_to(&mut self, capacity: usize) {
        if capacity > self.capacity {
            self.entries.reserve(capacity - self.entries.len());
            self.capacity = capacity;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Events written since creation, including dropped ones.
    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Oldest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Event> + '_ {
        self.entries.iter().map(|(_, event)| event)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn drain_into(&mut self, out: &mut Vec<(u64, Event)>) {
        out.extend(self.entries.drain(..));
    }
}

// ---------------------------------------------------------------------------
// Listeners
// ---------------------------------------------------------------------------

/// A passive listener receives events read-only.
pub type PassiveListener = Box<dyn FnMut(&Event)>;

/// Optional predicate deciding whether a listener sees an event.
pub type EventFilter = Box<dyn Fn(&Event) -> bool>;

struct Listener {
    callback: PassiveListener,
    filter: Option<EventFilter>,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("filtered", &self.filter.is_some())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Per-kind buffers, listeners and suppression flags.
pub struct EventBus {
    buffers: [Option<EventBuffer>; EVENT_KIND_COUNT],
    suppressed: [bool; EVENT_KIND_COUNT],
    listeners: [Vec<Listener>; EVENT_KIND_COUNT],
    capacity: usize,
    next_sequence: u64,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("buffers", &self.buffers)
            .field("suppressed", &self.suppressed)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl EventBus {
    /// Create a bus whose buffers hold up to `capacity` events per kind.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffers: Default::default(),
            suppressed: [false; EVENT_KIND_COUNT],
            listeners: Default::default(),
            capacity,
            next_sequence: 0,
        }
    }

    /// Per-kind buffer capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Raise every buffer to hold at least `capacity` events. Never shrinks.
    pub fn ensure_capacity(&mut self, capacity: usize) {
        if capacity <= self.capacity {
            return;
        }
        self.capacity = capacity;
        for buffer in self.buffers.iter_mut().flatten() {
            buffer.grow_to(capacity);
        }
    }

    /// Stop recording `kind`. Anything already buffered for it is dropped.
    pub fn suppress(&mut self, kind: EventKind) {
        self.suppressed[kind.index()] = true;
        self.buffers[kind.index()] = None;
    }

    pub fn is_suppressed(&self, kind: EventKind) -> bool {
        self.suppressed[kind.index()]
    }

    /// Buffer an event until the next [`deliver`](Self::deliver).
    pub fn emit(&mut self, event: Event) {
        let idx = event.kind().index();
        if self.suppressed[idx] {
            return;
        }
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        let capacity = self.capacity;
        self.buffers[idx]
            .get_or_insert_with(|| EventBuffer::new(capacity))
            .push(sequence, event);
    }

    /// Subscribe to one kind. Listeners run in registration order.
    pub fn on_passive(&mut self, kind: EventKind, listener: PassiveListener) {
        self.on_passive_filtered(kind, None, listener);
    }

    pub fn on_passive_filtered(
        &mut self,
        kind: EventKind,
        filter: Option<EventFilter>,
        listener: PassiveListener,
    ) {
        self.listeners[kind.index()].push(Listener {
            callback: listener,
            filter,
        });
    }

    /// Hand every buffered event to its listeners and empty the buffers.
    ///
    /// Events are delivered in emission order across all kinds. For each
    /// event, that kind's listeners run in registration order, skipping any
    /// whose filter rejects it.
    pub fn deliver(&mut self) {
        let mut pending = Vec::new();
        for buffer in self.buffers.iter_mut().flatten() {
            buffer.drain_into(&mut pending);
        }
        if pending.is_empty() {
            return;
        }
        pending.sort_by_key(|(sequence, _)| *sequence);

        for (_, event) in &pending {
            for listener in &mut self.listeners[event.kind().index()] {
                if let Some(filter) = &listener.filter
                    && !filter(event)
                {
                    continue;
                }
                (listener.callback)(event);
            }
        }
    }

    pub fn buffer(&self, kind: EventKind) -> Option<&EventBuffer> {
        self.buffers[kind.index()].as_ref()
    }

    /// Events of `kind` waiting for delivery.
    pub fn buffered_count(&self, kind: EventKind) -> usize {
        self.buffer(kind).map_or(0, EventBuffer::len)
    }

    /// Events of `kind` emitted since creation, including dropped ones.
    pub fn total_emitted(&self, kind: EventKind) -> u64 {
        self.buffer(kind).map_or(0, EventBuffer::total_written)
    }

    /// Empty every buffer. Listeners and suppression are kept.
    pub fn clear_all(&mut self) {
        for buffer in self.buffers.iter_mut().flatten() {
            buffer.clear();
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
