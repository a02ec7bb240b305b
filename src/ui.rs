// UI layer: runs the lookup-then-fan-out flow for one patient and prints the
// outcome. A spinner on stderr shows progress; stdout only ever carries the
// final JSON so the output can be piped.

use crate::api::{ApiClient, Fetch};
use crate::category::AlgoType;
use crate::cli::CliArgs;
use crate::error::ApiError;
use crate::models::ResultRecord;
use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::Duration;

/// Resolve the series of `patient_id` and fetch the selected results of each
/// one, in series order. One inner list per series; the first failure aborts.
pub fn collect_results<F: Fetch>(
    api: &ApiClient<F>,
    patient_id: &str,
    algotype: AlgoType,
    progress: &ProgressBar,
) -> Result<Vec<Vec<ResultRecord>>, ApiError> {
    progress.set_message("Resolving series...");
    let series = api.resolve_series(patient_id)?;

    let total = series.len();
    let mut collected = Vec::with_capacity(total);
    for (i, uid) in series.iter().enumerate() {
        progress.set_message(format!("Fetching {algotype} results ({}/{total})...", i + 1));
        collected.push(api.fetch_results(uid.as_ref(), algotype)?);
    }
    Ok(collected)
}

/// Full command: fetch everything, then write it to `out` as JSON.
/// Nothing is written if any request fails.
pub fn run<F: Fetch, W: Write>(api: &ApiClient<F>, args: &CliArgs, out: &mut W) -> Result<()> {
    let spinner = spinner();
    let results = collect_results(api, &args.pid, args.algotype, &spinner);
    spinner.finish_and_clear();

    let results = results.map_err(|e| {
        let hint = match e.status() {
            Some(401 | 403) => " (check TOKEN)",
            _ => "",
        };
        anyhow::Error::new(e).context(format!("Failed to fetch {} results{hint}", args.algotype))
    })?;
    write_results(out, &results, args.pretty)
}

/// One JSON array per series inside an outer array, newline terminated.
pub fn write_results<W: Write>(out: &mut W, results: &[Vec<ResultRecord>], pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, results)?;
    } else {
        serde_json::to_writer(&mut *out, results)?;
    }
    writeln!(out).context("Failed to write output")?;
    out.flush()?;
    Ok(())
}

/// Stderr spinner; indicatif hides it when stderr is not a terminal.
fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
