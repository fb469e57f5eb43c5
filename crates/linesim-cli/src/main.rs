mod cli;
mod config;
mod output;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use config::SimConfig;
use linesim_core::data_loader::{
    build_topology_with_delimiter, load_orders_with_delimiter, load_stations,
};
use linesim_core::engine::Engine;
use linesim_core::error::LineError;
use linesim_core::event::{Event, EventBus, EventKind};
use linesim_core::id::StationNumbering;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

/// Exit status for errors raised while loading or running the line.
const EXIT_LINE_ERROR: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            eprintln!("{err:#}");
            if err.downcast_ref::<LineError>().is_some() {
                ExitCode::from(EXIT_LINE_ERROR)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

/// Stderr, or a freshly truncated `log_file`.
fn log_target(log_file: Option<&Path>) -> anyhow::Result<env_logger::Target> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Ok(env_logger::Target::Pipe(Box::new(file)))
        }
        None => Ok(env_logger::Target::Stderr),
    }
}

fn init_logger(level: log::LevelFilter, target: env_logger::Target) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp(None).target(target);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder.init();
}

fn load_config(cli: &Cli) -> anyhow::Result<(SimConfig, bool)> {
    let mut config = match &cli.config {
        Some(path) if path.exists() => SimConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        _ => SimConfig::default(),
    };
    let missing = cli.config.as_ref().is_some_and(|path| !path.exists());

    if cli.report.is_some() {
        config.report_path = cli.report.clone();
    }
    if cli.max_cycles.is_some() {
        config.max_cycles = cli.max_cycles;
    }
    if cli.quiet {
        config.print_notices = false;
    }
    Ok((config, missing))
}

fn event_bus(config: &SimConfig) -> EventBus {
    let mut events = EventBus::new(config.event_buffer_capacity);
    if config.print_notices {
        for kind in [EventKind::CycleStarted, EventKind::ItemFilled, EventKind::UnableToFill] {
            events.on_passive(kind, Box::new(|event: &Event| println!("{event}")));
        }
    } else {
        for kind in EventKind::ALL {
            events.suppress(kind);
        }
    }
    events
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let (config, config_missing) = load_config(&cli)?;
    init_logger(config.log_level_filter()?, log_target(config.log_file.as_deref())?);
    if config_missing && let Some(path) = &cli.config {
        log::warn!("configuration {} not found, using defaults", path.display());
    }

    log::info!("=== assembly line simulation starting ===");

    let mut numbering = StationNumbering::new();
    let mut stations =
        load_stations(&cli.stations1, config.first_station_delimiter, &mut numbering)?;
    stations.extend(load_stations(
        &cli.stations2,
        config.second_station_delimiter,
        &mut numbering,
    )?);
    let orders = load_orders_with_delimiter(&cli.orders, config.order_delimiter)?;
    let line = build_topology_with_delimiter(&cli.topology, stations, config.topology_delimiter)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    output::write_banner(&mut out, "Stations (summary)")?;
    output::write_stations(&mut out, &line, false)?;
    output::write_banner(&mut out, "Stations (full)")?;
    output::write_stations(&mut out, &line, true)?;
    output::write_banner(&mut out, "Assembly Line")?;
    write!(out, "{}", line.display())?;
    out.flush()?;
    drop(out);

    let mut engine = Engine::with_event_bus(line, orders, event_bus(&config));
    engine.run(config.max_cycles)?;

    let mut out = stdout.lock();
    output::write_results(&mut out, engine.state().completed(), engine.state().incomplete())?;
    writeln!(out)?;
    output::write_banner(&mut out, "Inventory")?;
    output::write_stations(&mut out, engine.line(), true)?;
    out.flush()?;

    let report = engine.report();
    log::info!(
        "completion rate {:.1}%, most active station: {}",
        report.completion_rate,
        report.most_active_station.as_deref().unwrap_or("none")
    );
    if let Some(path) = &config.report_path {
        output::write_report(path, &report)?;
    }

    log::info!("=== simulation complete ===");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use linesim_core::test_utils::make_test_dir;

    #[test]
    fn log_target_defaults_to_stderr() {
        assert!(matches!(log_target(None).unwrap(), env_logger::Target::Stderr));
    }

    #[test]
    fn log_target_creates_the_file() {
        let dir = make_test_dir("cli_log_file");
        let path = dir.join("linesim.log");
        std::fs::write(&path, "old run\n").unwrap();

        let target = log_target(Some(&path)).unwrap();
        assert!(matches!(target, env_logger::Target::Pipe(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unwritable_log_file_is_an_error() {
        let dir = make_test_dir("cli_log_missing_dir");
        let err = log_target(Some(&dir.join("no/such/dir/linesim.log"))).unwrap_err();
        assert!(err.to_string().contains("opening log file"));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
