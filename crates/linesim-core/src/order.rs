//! Customer orders and the items they request.
//!
//! A [`CustomerOrder`] owns its [`Item`]s outright and has exactly one owner
//! at any time: it is moved from the pending queue into workstation queues
//! and finally into the completed or incomplete queue. The type deliberately
//! does not implement `Clone`.
//!
//! ```compile_fail
//! use linesim_core::order::CustomerOrder;
//! use linesim_core::tokenizer::Tokenizer;
//!
//! let mut tokenizer = Tokenizer::new('|');
//! let order = CustomerOrder::from_record("Ann|Desk set|Desk", &mut tokenizer).unwrap();
//! let copy = order.clone();
//! ```

use crate::error::ParseError;
use crate::station::Station;
use crate::tokenizer::{RecordCursor, Tokenizer};
use std::fmt;

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// One requested unit. Filled at most once, by the station whose name matches.
#[derive(Debug, PartialEq, Eq)]
pub struct Item {
    name: String,
    serial_number: u64,
    filled: bool,
}

impl Item {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            serial_number: 0,
            filled: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// The serial number assigned by the filling station, once filled.
    pub fn serial_number(&self) -> Option<u64> {
        self.filled.then_some(self.serial_number)
    }
}

// ---------------------------------------------------------------------------
// Fill outcome
// ---------------------------------------------------------------------------

/// What happened when a station tried to fill an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillOutcome {
    /// One unit was taken from stock and assigned this serial number.
    Filled { serial: u64 },
    /// The order still needs the item but the station has no stock.
    OutOfStock,
    /// The order has no unfilled item for this station.
    NotNeeded,
}

// ---------------------------------------------------------------------------
// CustomerOrder
// ---------------------------------------------------------------------------

/// A customer's order for a product, made of an ordered list of items.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct CustomerOrder {
    customer: String,
    product: String,
    items: Vec<Item>,
}

impl CustomerOrder {
    pub fn new<I, S>(customer: impl Into<String>, product: impl Into<String>, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            customer: customer.into(),
            product: product.into(),
            items: items.into_iter().map(Item::new).collect(),
        }
    }

    /// Parse `customer | product | item1 | ... | itemN`.
    ///
    /// Items may repeat. An order with no items is accepted and counts as
    /// filled from the start.
    pub fn from_record(record: &str, tokenizer: &mut Tokenizer) -> Result<Self, ParseError> {
        let missing = |field: &'static str| ParseError::MissingField {
            record: record.to_string(),
            field,
        };

        let mut cursor = RecordCursor::new(record);
        let customer = tokenizer.next_field(&mut cursor)?;
        if customer.is_empty() {
            return Err(missing("customer name"));
        }
        if !cursor.has_more() {
            return Err(missing("product"));
        }
        let product = tokenizer.next_field(&mut cursor)?;
        if product.is_empty() {
            return Err(missing("product"));
        }

        let mut items = Vec::new();
        while cursor.has_more() {
            let name = tokenizer.next_field(&mut cursor)?;
            if name.is_empty() {
                return Err(missing("item name"));
            }
            items.push(Item::new(name));
        }

        Ok(Self {
            customer,
            product,
            items,
        })
    }

    pub fn customer_name(&self) -> &str {
        &self.customer
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn filled_item_count(&self) -> usize {
        self.items.iter().filter(|item| item.filled).count()
    }

    /// True when every item is filled.
    pub fn is_order_filled(&self) -> bool {
        self.items.iter().all(|item| item.filled)
    }

    /// True when no item called `name` is still waiting to be filled.
    pub fn is_item_filled(&self, name: &str) -> bool {
        !self
            .items
            .iter()
            .any(|item| item.name == name && !item.filled)
    }

    /// Fill the first unfilled item matching `station`'s name.
    ///
    /// Touches at most one item per call: an order for three beds takes three
    /// calls at the bed station. Stock is checked before it is consumed.
    pub fn fill_item(&mut self, station: &mut Station) -> FillOutcome {
        let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.name == station.name() && !item.filled)
        else {
            return FillOutcome::NotNeeded;
        };

        if !station.has_stock() {
            return FillOutcome::OutOfStock;
        }

        station.consume_one();
        item.serial_number = station.next_serial_number();
        item.filled = true;
        FillOutcome::Filled {
            serial: item.serial_number,
        }
    }

    /// Move the order out of `self`, leaving an empty order behind.
    pub fn take(&mut self) -> CustomerOrder {
        std::mem::take(self)
    }

    /// Width of the longest item name, for aligned listings.
    pub fn item_name_width(&self) -> usize {
        self.items
            .iter()
            .map(|item| item.name.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Render the order header and one line per item, padding item names to
    /// `width`.
    pub fn display(&self, width: usize) -> OrderDisplay<'_> {
        OrderDisplay { order: self, width }
    }
}

/// Formatter returned by [`CustomerOrder::display`].
pub struct OrderDisplay<'a> {
    order: &'a CustomerOrder,
    width: usize,
}

impl fmt::Display for OrderDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} - {}", self.order.customer, self.order.product)?;
        for item in &self.order.items {
            writeln!(
                f,
                "[{:06}] {:<width$} - {}",
                item.serial_number,
                item.name,
                if item.filled { "FILLED" } else { "TO BE FILLED" },
                width = self.width
            )?;
        }
        Ok(())
    }
}
