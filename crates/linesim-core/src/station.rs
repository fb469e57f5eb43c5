//! Inventory-bearing stations.
//!
//! A [`Station`] holds a stock of one named item and hands out serial numbers
//! for the units it fills. Stock only goes down and the serial cursor only
//! goes up, one step per fill.

use crate::error::{ConfigurationError, ParseError};
use crate::id::StationNumber;
use crate::tokenizer::{RecordCursor, Tokenizer};
use std::fmt;

/// A named item stock with its own serial-number generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    number: StationNumber,
    name: String,
    serial_number: u64,
    quantity: u32,
    description: String,
    filled_count: u32,
}

impl Station {
    /// `quantity` is capped so that every unit in stock gets a serial number
    /// that fits in a `u64`.
    pub fn new(
        number: StationNumber,
        name: impl Into<String>,
        serial_start: u64,
        quantity: u32,
        description: impl Into<String>,
    ) -> Self {
        let serials_left = u32::try_from(u64::MAX - serial_start).unwrap_or(u32::MAX);
        Self {
            number,
            name: name.into(),
            serial_number: serial_start,
            quantity: quantity.min(serials_left),
            description: description.into(),
            filled_count: 0,
        }
    }

    /// Parse `name[, serialStart[, quantity[, description]]]`.
    ///
    /// Only the name is required. An empty trailing field counts as absent.
    /// Any failure is reported as a [`ConfigurationError`] so callers can tell
    /// a bad station record apart from a bad order record.
    ///
    /// # Examples
    ///
    /// ```
    /// use linesim_core::id::StationNumber;
    /// use linesim_core::station::Station;
    /// use linesim_core::tokenizer::Tokenizer;
    ///
    /// let mut tokenizer = Tokenizer::new(',');
    /// let desk = Station::from_record("Desk, 100, 2, Oak desk", &mut tokenizer, StationNumber(1)).unwrap();
    /// assert_eq!(desk.name(), "Desk");
    /// assert_eq!(desk.quantity(), 2);
    /// ```
    pub fn from_record(
        record: &str,
        tokenizer: &mut Tokenizer,
        number: StationNumber,
    ) -> Result<Self, ConfigurationError> {
        let wrap = |source: ParseError| ConfigurationError::StationRecord {
            record: record.to_string(),
            source,
        };

        let mut cursor = RecordCursor::new(record);
        let name = tokenizer.next_field(&mut cursor).map_err(wrap)?;
        if name.is_empty() {
            return Err(wrap(ParseError::MissingField {
                record: record.to_string(),
                field: "station name",
            }));
        }

        let mut station = Station::new(number, name, 0, 0, String::new());

        if let Some(field) = optional_field(tokenizer, &mut cursor).map_err(wrap)? {
            station.serial_number = parse_number(record, "serial number", &field)?;
        }
        if let Some(field) = optional_field(tokenizer, &mut cursor).map_err(wrap)? {
            station.quantity = parse_number(record, "quantity", &field)?;
        }
        if let Some(field) = optional_field(tokenizer, &mut cursor).map_err(wrap)? {
            station.description = field;
        }
        if station
            .serial_number
            .checked_add(u64::from(station.quantity))
            .is_none()
        {
            return Err(ConfigurationError::StationNumber {
                record: record.to_string(),
                field: "serial number",
                value: station.serial_number.to_string(),
            });
        }

        Ok(station)
    }

    pub fn number(&self) -> StationNumber {
        self.number
    }

    /// The item this station stocks. Also the key used for topology links.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Return the current serial number and advance the cursor. The cursor
    /// stops at `u64::MAX`.
    pub fn next_serial_number(&mut self) -> u64 {
        let serial = self.serial_number;
        self.serial_number = self.serial_number.saturating_add(1);
        serial
    }

    /// The serial number the next fill will receive.
    pub fn peek_serial_number(&self) -> u64 {
        self.serial_number
    }

    /// Remaining stock.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn has_stock(&self) -> bool {
        self.quantity > 0
    }

    /// Take one unit out of stock. No-op when the stock is already empty.
    pub fn consume_one(&mut self) {
        if self.quantity > 0 {
            self.quantity -= 1;
            self.filled_count += 1;
        }
    }

    /// Units handed out so far.
    pub fn filled_count(&self) -> u32 {
        self.filled_count
    }

    /// Render as an aligned listing line. `width` pads the name column; the
    /// full form adds stock and description.
    pub fn display(&self, width: usize, full: bool) -> StationDisplay<'_> {
        StationDisplay {
            station: self,
            width,
            full,
        }
    }
}

/// Next field if present and non-empty.
fn optional_field(
    tokenizer: &mut Tokenizer,
    cursor: &mut RecordCursor<'_>,
) -> Result<Option<String>, ParseError> {
    if !cursor.has_more() {
        return Ok(None);
    }
    let field = tokenizer.next_field(cursor)?;
    Ok(if field.is_empty() { None } else { Some(field) })
}

fn parse_number<T: std::str::FromStr>(
    record: &str,
    field: &'static str,
    value: &str,
) -> Result<T, ConfigurationError> {
    value.parse().map_err(|_| ConfigurationError::StationNumber {
        record: record.to_string(),
        field,
        value: value.to_string(),
    })
}

/// Formatter returned by [`Station::display`].
pub struct StationDisplay<'a> {
    station: &'a Station,
    width: usize,
    full: bool,
}

impl fmt::Display for StationDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.station;
        write!(
            f,
            "{} | {:<width$} | {:06} | ",
            s.number,
            s.name,
            s.serial_number,
            width = self.width
        )?;
        if self.full {
            write!(f, "{:>4} | {}", s.quantity, s.description)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(record: &str) -> Result<Station, ConfigurationError> {
        let mut tokenizer = Tokenizer::new(',');
        Station::from_record(record, &mut tokenizer, StationNumber(1))
    }

    #[test]
    fn parses_full_record() {
        let station = parse("Bed, 123456, 5, Queen size bed with headboard").unwrap();
        assert_eq!(station.name(), "Bed");
        assert_eq!(station.peek_serial_number(), 123456);
        assert_eq!(station.quantity(), 5);
        assert_eq!(station.description(), "Queen size bed with headboard");
    }

    #[test]
    fn trailing_fields_are_optional() {
        let station = parse("Nightstand").unwrap();
        assert_eq!(station.name(), "Nightstand");
        assert_eq!(station.peek_serial_number(), 0);
        assert_eq!(station.quantity(), 0);
        assert_eq!(station.description(), "");

        let station = parse("Desk, 50").unwrap();
        assert_eq!(station.peek_serial_number(), 50);
        assert_eq!(station.quantity(), 0);

        let station = parse("Desk, 50, 3,").unwrap();
        assert_eq!(station.quantity(), 3);
        assert_eq!(station.description(), "");
    }

    #[test]
    fn empty_field_is_configuration_error() {
        let err = parse("Desk,,3").unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::StationRecord {
                source: ParseError::EmptyField { .. },
                ..
            }
        ));
    }

    #[test]
    fn missing_name_is_configuration_error() {
        let err = parse("   ").unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::StationRecord {
                source: ParseError::MissingField { .. },
                ..
            }
        ));
    }

    #[test]
    fn non_numeric_quantity_is_configuration_error() {
        let err = parse("Desk, 100, lots").unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::StationNumber { field: "quantity", .. }
        ));
    }

    #[test]
    fn serial_numbers_increase_by_one() {
        let mut station = parse("Desk, 100, 2").unwrap();
        assert_eq!(station.next_serial_number(), 100);
        assert_eq!(station.next_serial_number(), 101);
        assert_eq!(station.peek_serial_number(), 102);
    }

    #[test]
    fn serial_range_must_cover_stock() {
        let err = parse("Desk,18446744073709551615,1").unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::StationNumber { field: "serial number", .. }
        ));

        let station = parse("Desk,18446744073709551614,1").unwrap();
        assert_eq!(station.quantity(), 1);
        let station = parse("Desk,18446744073709551615,0").unwrap();
        assert!(!station.has_stock());
    }

    #[test]
    fn stock_is_capped_at_the_last_serial() {
        let mut station = Station::new(StationNumber(1), "Desk", u64::MAX - 1, 5, "");
        assert_eq!(station.quantity(), 1);

        let mut order = crate::order::CustomerOrder::new("Ann", "Office", ["Desk", "Desk"]);
        assert!(matches!(
            order.fill_item(&mut station),
            crate::order::FillOutcome::Filled { serial } if serial == u64::MAX - 1
        ));
        assert!(matches!(
            order.fill_item(&mut station),
            crate::order::FillOutcome::OutOfStock
        ));
        assert_eq!(station.peek_serial_number(), u64::MAX);
        assert_eq!(station.next_serial_number(), u64::MAX);
        assert_eq!(station.peek_serial_number(), u64::MAX);
    }

    #[test]
    fn consume_clamps_at_zero() {
        let mut station = parse("Desk, 100, 1").unwrap();
        station.consume_one();
        assert_eq!(station.quantity(), 0);
        assert_eq!(station.filled_count(), 1);

        station.consume_one();
        assert_eq!(station.quantity(), 0);
        assert_eq!(station.filled_count(), 1);
        assert!(!station.has_stock());
    }

    #[test]
    fn display_short_and_full() {
        let station = Station::new(StationNumber(3), "Desk", 42, 7, "Oak desk");
        assert_eq!(station.display(8, false).to_string(), "003 | Desk     | 000042 | ");
        assert_eq!(
            station.display(8, true).to_string(),
            "003 | Desk     | 000042 |    7 | Oak desk"
        );
    }
}
