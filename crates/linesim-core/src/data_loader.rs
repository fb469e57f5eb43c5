//! Loading stations, orders and topology from delimited text files.
//!
//! Every file holds one record per line. Blank lines are skipped. A record
//! that fails to parse aborts the load with a [`LineError::Record`] carrying
//! the file and 1-based line number. The `*_from_str` variants parse text
//! already in memory and report their location as `<string>`.

use crate::error::{ConfigurationError, FileError, LineError};
use crate::id::StationNumbering;
use crate::line::{LineTopology, StationLink};
use crate::order::CustomerOrder;
use crate::station::Station;
use crate::tokenizer::{DEFAULT_DELIMITER, Tokenizer};
use std::collections::HashSet;
use std::path::Path;

const IN_MEMORY: &str = "<string>";

// ===========================================================================
// Helpers
// ===========================================================================

fn read_file(path: &Path) -> Result<String, FileError> {
    std::fs::read_to_string(path).map_err(|source| FileError {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse each non-blank line of `text` with `parse`, tagging failures with
/// their location.
fn parse_records<T>(
    text: &str,
    origin: &Path,
    mut parse: impl FnMut(&str) -> Result<T, LineError>,
) -> Result<Vec<T>, LineError> {
    let mut records = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = parse(line).map_err(|source| LineError::Record {
            path: origin.to_path_buf(),
            line: index + 1,
            source: Box::new(source),
        })?;
        records.push(record);
    }
    Ok(records)
}

// ===========================================================================
// Stations
// ===========================================================================

/// Load one station file. Station numbers continue from `numbering`, so the
/// same numbering can be passed to several files.
pub fn load_stations(
    path: impl AsRef<Path>,
    delimiter: char,
    numbering: &mut StationNumbering,
) -> Result<Vec<Station>, LineError> {
    let path = path.as_ref();
    let text = read_file(path)?;
    let stations = parse_stations(&text, path, delimiter, numbering)?;
    log::info!("loaded {} stations from {}", stations.len(), path.display());
    Ok(stations)
}

pub fn load_stations_from_str(
    text: &str,
    delimiter: char,
    numbering: &mut StationNumbering,
) -> Result<Vec<Station>, LineError> {
    parse_stations(text, Path::new(IN_MEMORY), delimiter, numbering)
}

fn parse_stations(
    text: &str,
    origin: &Path,
    delimiter: char,
    numbering: &mut StationNumbering,
) -> Result<Vec<Station>, LineError> {
    let mut tokenizer = Tokenizer::new(delimiter);
    let mut seen = HashSet::new();
    let stations = parse_records(text, origin, |record| {
        let station = Station::from_record(record, &mut tokenizer, numbering.next_number())?;
        if !seen.insert(station.name().to_string()) {
            return Err(ConfigurationError::DuplicateStation {
                name: station.name().to_string(),
            }
            .into());
        }
        Ok(station)
    })?;
    log::debug!(
        "{}: widest station field is {} characters",
        origin.display(),
        tokenizer.field_width()
    );
    Ok(stations)
}

// ===========================================================================
// Orders
// ===========================================================================

/// Load an order file delimited by `|`.
pub fn load_orders(path: impl AsRef<Path>) -> Result<Vec<CustomerOrder>, LineError> {
    load_orders_with_delimiter(path, DEFAULT_DELIMITER)
}

pub fn load_orders_with_delimiter(
    path: impl AsRef<Path>,
    delimiter: char,
) -> Result<Vec<CustomerOrder>, LineError> {
    let path = path.as_ref();
    let text = read_file(path)?;
    let orders = parse_orders(&text, path, delimiter)?;
    log::info!("loaded {} orders from {}", orders.len(), path.display());
    Ok(orders)
}

pub fn load_orders_from_str(text: &str, delimiter: char) -> Result<Vec<CustomerOrder>, LineError> {
    parse_orders(text, Path::new(IN_MEMORY), delimiter)
}

fn parse_orders(
    text: &str,
    origin: &Path,
    delimiter: char,
) -> Result<Vec<CustomerOrder>, LineError> {
    let mut tokenizer = Tokenizer::new(delimiter);
    parse_records(text, origin, |record| {
        Ok(CustomerOrder::from_record(record, &mut tokenizer)?)
    })
}

// ===========================================================================
// Topology
// ===========================================================================

/// Load a topology file delimited by `|` and build the line over `stations`.
pub fn build_topology(
    path: impl AsRef<Path>,
    stations: Vec<Station>,
) -> Result<LineTopology, LineError> {
    build_topology_with_delimiter(path, stations, DEFAULT_DELIMITER)
}

pub fn build_topology_with_delimiter(
    path: impl AsRef<Path>,
    stations: Vec<Station>,
    delimiter: char,
) -> Result<LineTopology, LineError> {
    let path = path.as_ref();
    let text = read_file(path)?;
    let links = parse_links(&text, path, delimiter)?;
    log::info!("loaded {} topology links from {}", links.len(), path.display());
    Ok(LineTopology::build(stations, &links)?)
}

pub fn build_topology_from_str(
    text: &str,
    stations: Vec<Station>,
    delimiter: char,
) -> Result<LineTopology, LineError> {
    let links = parse_links(text, Path::new(IN_MEMORY), delimiter)?;
    Ok(LineTopology::build(stations, &links)?)
}

fn parse_links(text: &str, origin: &Path, delimiter: char) -> Result<Vec<StationLink>, LineError> {
    let mut tokenizer = Tokenizer::new(delimiter);
    parse_records(text, origin, |record| {
        Ok(StationLink::from_record(record, &mut tokenizer)?)
    })
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::test_utils::make_test_dir;
    use std::path::PathBuf;

    #[test]
    fn stations_number_across_files() {
        let mut numbering = StationNumbering::new();
        let first = load_stations_from_str("Bed, 1, 5, Queen bed\n", ',', &mut numbering).unwrap();
        let text = "Desk|10|2|Oak desk\n\nChair|20|1|Office chair\n";
        let second = load_stations_from_str(text, '|', &mut numbering).unwrap();

        assert_eq!(first[0].number().0, 1);
        let numbers: Vec<u32> = second.iter().map(|s| s.number().0).collect();
        assert_eq!(numbers, vec![2, 3]);
        assert_eq!(second[1].description(), "Office chair");
    }

    #[test]
    fn duplicate_station_reports_line() {
        let mut numbering = StationNumbering::new();
        let err = load_stations_from_str("Bed,1,1\nDesk,1,1\nBed,2,2\n", ',', &mut numbering)
            .unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, LineError::Record { line: 3, .. }));
    }

    #[test]
    fn bad_order_reports_line_and_kind() {
        let err = load_orders_from_str("Ann|Office|Desk\nCustomerX||Product\n", '|').unwrap_err();
        assert!(err.is_parse());
        match err {
            LineError::Record { line, source, .. } => {
                assert_eq!(line, 2);
                assert!(matches!(
                    *source,
                    LineError::Parse(ParseError::EmptyField { .. })
                ));
            }
            other => panic!("expected record error, got {other:?}"),
        }
    }

    #[test]
    fn blank_lines_are_skipped() {
        let orders =
            load_orders_from_str("\nAnn|Office|Desk\n   \nBob|Office|Chair\n", '|').unwrap();
        assert_eq!(orders.len(), 2);
    }

    #[test]
    fn topology_from_str_builds_chain() {
        let mut numbering = StationNumbering::new();
        let stations = load_stations_from_str("A,1,1\nB,1,1\n", ',', &mut numbering).unwrap();
        let line = build_topology_from_str("B|\nA|B\n", stations, '|').unwrap();
        let names: Vec<&str> = line.active().map(|ws| ws.name()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn topology_errors_are_configuration_errors() {
        let mut numbering = StationNumbering::new();
        let stations = load_stations_from_str("A,1,1\n", ',', &mut numbering).unwrap();
        let err = build_topology_from_str("A|Ghost\n", stations, '|').unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn missing_file_is_file_error() {
        let dir = make_test_dir("loader_missing");
        let err = load_orders(dir.join("nope.txt")).unwrap_err();
        assert!(err.is_file());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn loads_from_files() {
        let dir = make_test_dir("loader_files");
        std::fs::write(dir.join("stations.txt"), "Desk,100,2,Oak desk\nChair,5,3\n").unwrap();
        std::fs::write(dir.join("orders.txt"), "Ann|Office|Desk|Chair\n").unwrap();
        std::fs::write(dir.join("topology.txt"), "Desk|Chair\nChair\n").unwrap();

        let mut numbering = StationNumbering::new();
        let stations = load_stations(dir.join("stations.txt"), ',', &mut numbering).unwrap();
        let orders = load_orders(dir.join("orders.txt")).unwrap();
        let line = build_topology(dir.join("topology.txt"), stations).unwrap();

        assert_eq!(orders.len(), 1);
        assert_eq!(line.chain().len(), 2);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn record_error_names_file() {
        let dir = make_test_dir("loader_record");
        let path: PathBuf = dir.join("orders.txt");
        std::fs::write(&path, "Ann\n").unwrap();
        let err = load_orders(&path).unwrap_err();
        assert!(err.to_string().contains("orders.txt:1:"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
