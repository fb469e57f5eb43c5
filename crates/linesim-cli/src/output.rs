//! Console listings and the JSON run report.

use linesim_core::line::LineTopology;
use linesim_core::order::CustomerOrder;
use linesim_core::query::RunReport;
use std::io::{self, Write};
use std::path::Path;

const BANNER_WIDTH: usize = 40;

/// Three-line banner with `title` centred between `=` borders.
pub fn write_banner(out: &mut impl Write, title: &str) -> io::Result<()> {
    let inner = BANNER_WIDTH - 2;
    let len = title.chars().count().min(inner);
    let left = (inner - len).div_ceil(2);
    let right = inner - len - left;
    let rule = "=".repeat(BANNER_WIDTH);

    writeln!(out, "{rule}")?;
    writeln!(out, "={}{title}{}=", " ".repeat(left), " ".repeat(right))?;
    writeln!(out, "{rule}")
}

/// Every loaded station, short or full form.
pub fn write_stations(out: &mut impl Write, line: &LineTopology, full: bool) -> io::Result<()> {
    let width = line.name_width();
    for ws in line.all_stations() {
        writeln!(out, "{}", ws.station().display(width, full))?;
    }
    Ok(())
}

pub fn write_orders(out: &mut impl Write, orders: &[CustomerOrder]) -> io::Result<()> {
    let width = orders
        .iter()
        .map(CustomerOrder::item_name_width)
        .max()
        .unwrap_or(0);
    for order in orders {
        write!(out, "{}", order.display(width))?;
    }
    Ok(())
}

/// The end-of-run listing: completed orders, then incomplete ones.
pub fn write_results(
    out: &mut impl Write,
    completed: &[CustomerOrder],
    incomplete: &[CustomerOrder],
) -> io::Result<()> {
    writeln!(out)?;
    write_banner(out, "Processed Orders (complete)")?;
    write_orders(out, completed)?;
    writeln!(out)?;
    write_banner(out, "Processed Orders (incomplete)")?;
    write_orders(out, incomplete)
}

pub fn write_report(path: &Path, report: &RunReport) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    log::info!("run report written to {}", path.display());
    Ok(())
}
