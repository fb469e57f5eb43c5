//! Error taxonomy for loading and running an assembly line.
//!
//! Every error here is fatal to a simulation run. A station that cannot fill
//! an item in a given cycle is normal flow and is reported through the
//! [`EventBus`](crate::event::EventBus), never through these types.

use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// A record could not be split into the fields it requires.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("empty field at byte {position} in record '{record}'")]
    EmptyField { record: String, position: usize },

    #[error("missing {field} in record '{record}'")]
    MissingField { record: String, field: &'static str },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// A station or topology record is malformed, or the topology it describes
/// is not a single chain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("bad station record '{record}': {source}")]
    StationRecord { record: String, source: ParseError },

    #[error("bad {field} '{value}' in station record '{record}'")]
    StationNumber {
        record: String,
        field: &'static str,
        value: String,
    },

    #[error("duplicate station name '{name}'")]
    DuplicateStation { name: String },

    #[error("bad topology record '{record}': {source}")]
    TopologyRecord { record: String, source: ParseError },

    #[error("topology references unknown station '{name}'")]
    UnknownStation { name: String },

    #[error("station '{name}' is linked more than once")]
    DuplicateLink { name: String },

    #[error("topology is empty")]
    EmptyTopology,

    #[error("no entry station: every station is some other station's successor")]
    NoEntryStation,

    #[error("multiple entry stations: {}", .names.join(", "))]
    MultipleEntryStations { names: Vec<String> },

    #[error("cycle detected in assembly line at station '{name}'")]
    CycleDetected { name: String },

    #[error("station '{name}' is not reachable from entry station '{entry}'")]
    Unreachable { name: String, entry: String },
}

// ---------------------------------------------------------------------------
// File errors
// ---------------------------------------------------------------------------

/// A data file could not be read.
#[derive(Debug, thiserror::Error)]
#[error("unable to read {}: {source}", .path.display())]
pub struct FileError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

// ---------------------------------------------------------------------------
// Umbrella
// ---------------------------------------------------------------------------

/// Any failure that aborts a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("file error: {0}")]
    File(#[from] FileError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A record failed to load; carries its location.
    #[error("{}:{line}: {source}", .path.display())]
    Record {
        path: PathBuf,
        line: usize,
        #[source]
        source: Box<LineError>,
    },

    #[error("simulation did not finish within {limit} cycles")]
    CycleLimitExceeded { limit: u64 },
}

impl LineError {
    /// The innermost error, skipping record location wrappers.
    pub fn root(&self) -> &LineError {
        match self {
            LineError::Record { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self.root(), LineError::Configuration(_))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self.root(), LineError::Parse(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self.root(), LineError::File(_))
    }
}
