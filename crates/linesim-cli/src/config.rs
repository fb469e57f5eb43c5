//! Run configuration for the `linesim` host.
//!
//! Read from a RON, TOML or JSON file (picked by extension). Every field has
//! a default, so a partial file or no file at all is fine.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

// ===========================================================================
// Errors
// ===========================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unsupported configuration format: {}", .file.display())]
    UnsupportedFormat { file: PathBuf },

    #[error("parse error in {}: {detail}", .file.display())]
    Parse { file: PathBuf, detail: String },

    #[error("invalid log level '{0}'")]
    LogLevel(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

pub fn detect_format(path: &Path) -> Result<Format, ConfigError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(ConfigError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    let parse_error = |detail: String| ConfigError::Parse {
        file: path.to_path_buf(),
        detail,
    };

    match format {
        Format::Ron => ron::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(&content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(&content).map_err(|e| parse_error(e.to_string())),
    }
}

// ===========================================================================
// SimConfig
// ===========================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// `error`, `warn`, `info`, `debug`, `trace` or `off`. `RUST_LOG` wins.
    pub log_level: String,
    /// Send log output to this file instead of stderr.
    pub log_file: Option<PathBuf>,
    pub first_station_delimiter: char,
    pub second_station_delimiter: char,
    pub order_delimiter: char,
    pub topology_delimiter: char,
    /// Abort the run after this many cycles. Unbounded when absent.
    pub max_cycles: Option<u64>,
    /// Events kept per kind between deliveries.
    pub event_buffer_capacity: usize,
    /// Print the per-cycle fill notices.
    pub print_notices: bool,
    /// Write a JSON run report here.
    pub report_path: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_file: None,
            first_station_delimiter: ',',
            second_station_delimiter: '|',
            order_delimiter: '|',
            topology_delimiter: '|',
            max_cycles: None,
            event_buffer_capacity: 1024,
            print_notices: true,
            report_path: None,
        }
    }
}

impl SimConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        deserialize_file(path)
    }

    pub fn log_level_filter(&self) -> Result<log::LevelFilter, ConfigError> {
        self.log_level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.log_level.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linesim_core::test_utils::make_test_dir;
    use std::fs;

    #[test]
    fn defaults() {
        let config = SimConfig::default();
        assert_eq!(config.first_station_delimiter, ',');
        assert_eq!(config.second_station_delimiter, '|');
        assert_eq!(config.order_delimiter, '|');
        assert_eq!(config.topology_delimiter, '|');
        assert_eq!(config.max_cycles, None);
        assert_eq!(config.event_buffer_capacity, 1024);
        assert!(config.print_notices);
        assert_eq!(config.log_file, None);
        assert_eq!(config.log_level_filter().unwrap(), log::LevelFilter::Info);
    }

    #[test]
    fn detect_format_by_extension() {
        assert_eq!(detect_format(Path::new("a.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("a.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("a.json")).unwrap(), Format::Json);
        assert!(matches!(
            detect_format(Path::new("a.txt")),
            Err(ConfigError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let dir = make_test_dir("config_toml");
        let path = dir.join("linesim.toml");
        fs::write(
            &path,
            "log_level = \"debug\"\nlog_file = \"linesim.log\"\nmax_cycles = 500\n",
        )
        .unwrap();

        let config = SimConfig::load(&path).unwrap();
        assert_eq!(config.log_level_filter().unwrap(), log::LevelFilter::Debug);
        assert_eq!(config.max_cycles, Some(500));
        assert_eq!(config.log_file, Some(PathBuf::from("linesim.log")));
        assert_eq!(config.order_delimiter, '|');
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn json_and_ron_are_accepted() {
        let dir = make_test_dir("config_formats");
        let json = dir.join("linesim.json");
        fs::write(&json, r#"{ "first_station_delimiter": ";", "print_notices": false }"#).unwrap();
        let config = SimConfig::load(&json).unwrap();
        assert_eq!(config.first_station_delimiter, ';');
        assert!(!config.print_notices);

        let ron_path = dir.join("linesim.ron");
        fs::write(
            &ron_path,
            "(event_buffer_capacity: 16, report_path: Some(\"out.json\"))",
        )
        .unwrap();
        let config = SimConfig::load(&ron_path).unwrap();
        assert_eq!(config.event_buffer_capacity, 16);
        assert_eq!(config.report_path, Some(PathBuf::from("out.json")));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = make_test_dir("config_bad");
        let path = dir.join("linesim.toml");
        fs::write(&path, "max_cycles = \"lots\"").unwrap();
        assert!(matches!(SimConfig::load(&path), Err(ConfigError::Parse { .. })));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let config = SimConfig {
            log_level: "chatty".into(),
            ..SimConfig::default()
        };
        assert!(matches!(config.log_level_filter(), Err(ConfigError::LogLevel(_))));
    }
}
