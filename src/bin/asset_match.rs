use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use tracing::info;

use matchfacts::asset_match::{TeamFolderAliases, match_roster};
use matchfacts::cli_args::{flag_value, init_tracing, load_env};
use matchfacts::config::EngineConfig;
use matchfacts::feed_parse::parse_roster_json;
use matchfacts::model::AssetCandidate;
use matchfacts::report_export::{MatchReport, write_report_json, write_report_xlsx};

const USAGE: &str =
    "usage: asset_match --roster <file> --catalog <file> --aliases <file> [--out <stem>]";

fn main() -> Result<()> {
    load_env();
    init_tracing();
    let config = EngineConfig::from_env();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let roster_path = flag_value(&args, "roster").context(USAGE)?;
    let catalog_path = flag_value(&args, "catalog").context(USAGE)?;
    let aliases_path = flag_value(&args, "aliases").context(USAGE)?;
    let stem = flag_value(&args, "out").unwrap_or_else(|| "asset_matches".to_string());

    let roster = parse_roster_json(&read(Path::new(&roster_path))?)?;
    if roster.is_empty() {
        return Err(anyhow!("roster {roster_path} has no entries"));
    }
    let candidates: Vec<AssetCandidate> = read(Path::new(&catalog_path))?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(AssetCandidate::from_path)
        .collect();
    let aliases = TeamFolderAliases::from_json(&read(Path::new(&aliases_path))?)
        .with_context(|| format!("load aliases {aliases_path}"))?;
    info!(
        roster = roster.len(),
        candidates = candidates.len(),
        aliases = aliases.len(),
        floor = config.confidence_floor,
        "matching roster against catalog"
    );

    let results = match_roster(&roster, &candidates, &aliases, config.match_options());
    let report = MatchReport::new(config.confidence_floor, results);

    let json_path = PathBuf::from(format!("{stem}.json"));
    let xlsx_path = PathBuf::from(format!("{stem}.xlsx"));
    write_report_json(&report, &json_path)?;
    write_report_xlsx(&report, &xlsx_path)?;

    println!("Asset matching complete");
    println!("Matched: {}", report.matched);
    println!("Unmatched: {}", report.unmatched);
    for result in report.results.iter().filter(|r| !r.is_matched()).take(10) {
        let best = result
            .runner_ups
            .first()
            .map(|r| format!("{} ({})", r.path, r.score))
            .unwrap_or_else(|| "no candidates".to_string());
        println!(
            "  - {} {} [{}]: {best}",
            result.entry.first_name, result.entry.last_name, result.entry.team
        );
    }
    println!("Report: {} / {}", json_path.display(), xlsx_path.display());
    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}
