use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, warn};

use matchfacts::cli_args::{flag_value, init_tracing, load_env};
use matchfacts::config::EngineConfig;
use matchfacts::report_export::MatchReport;
use matchfacts::upload_ledger::{
    RecordOutcome, open_ledger, record_assignment, recorded_assets, resume_index,
};

fn main() -> Result<()> {
    load_env();
    init_tracing();
    let config = EngineConfig::from_env();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let report_path = flag_value(&args, "report")
        .context("usage: asset_apply --report <file> [--db <file>] [--batch <id>]")?;
    let db_path = flag_value(&args, "db")
        .map(PathBuf::from)
        .or(config.ledger_path)
        .context("unable to resolve ledger path")?;

    let report = MatchReport::load(Path::new(&report_path))?;
    let batch = flag_value(&args, "batch")
        .unwrap_or_else(|| report.generated_at.format("%Y%m%dT%H%M%SZ").to_string());

    let mut conn = open_ledger(&db_path)?;
    let start = resume_index(&conn, &batch)?;
    if start > 0 {
        info!(batch = %batch, start, "resuming batch");
    }

    let mut recorded = 0usize;
    let mut skipped = 0usize;
    for (index, result) in report.results.iter().enumerate().skip(start) {
        if !result.is_matched() {
            skipped += 1;
            continue;
        }
        match record_assignment(&mut conn, &batch, index, result)? {
            RecordOutcome::Recorded => recorded += 1,
            RecordOutcome::AlreadyRecorded => {
                warn!(batch = %batch, index, "index was already recorded");
            }
        }
    }

    let total = recorded_assets(&conn, &batch)?.len();
    println!("Ledger: {}", db_path.display());
    println!("Batch: {batch}");
    println!("Started at index: {start}");
    println!("Recorded now: {recorded}");
    println!("Unmatched skipped: {skipped}");
    println!("Batch total: {total}");
    Ok(())
}
