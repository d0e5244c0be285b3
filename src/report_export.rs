use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::{Deserialize, Serialize};

use crate::model::AssetMatchResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub generated_at: DateTime<Utc>,
    pub floor: u32,
    pub matched: usize,
    pub unmatched: usize,
    pub results: Vec<AssetMatchResult>,
}

impl MatchReport {
    pub fn new(floor: u32, results: Vec<AssetMatchResult>) -> Self {
        let matched = results.iter().filter(|r| r.is_matched()).count();
        Self {
            generated_at: Utc::now(),
            floor,
            matched,
            unmatched: results.len() - matched,
            results,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read report {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse report {}", path.display()))
    }
}

/// Writes next to `path` first, then renames over it.
pub fn write_report_json(report: &MatchReport, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let tmp = path.with_extension("json.tmp");
    let json = serde_json::to_string_pretty(report).context("serialize match report")?;
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("swap report into {}", path.display()))?;
    Ok(())
}

pub fn write_report_xlsx(report: &MatchReport, path: &Path) -> Result<()> {
    let mut matched_rows = vec![header(&[
        "Player ID",
        "First Name",
        "Last Name",
        "Team",
        "Asset",
        "Confidence",
        "Runner-ups",
    ])];
    let mut unmatched_rows = vec![header(&[
        "Player ID",
        "First Name",
        "Last Name",
        "Team",
        "Best Score",
        "Candidates",
    ])];

    for result in &report.results {
        let entry = &result.entry;
        let runner_ups = flatten_runner_ups(result);
        match &result.chosen {
            Some(asset) => matched_rows.push(vec![
                entry.player.to_string(),
                entry.first_name.clone(),
                entry.last_name.clone(),
                entry.team.to_string(),
                asset.path.clone(),
                result.confidence.to_string(),
                runner_ups,
            ]),
            None => unmatched_rows.push(vec![
                entry.player.to_string(),
                entry.first_name.clone(),
                entry.last_name.clone(),
                entry.team.to_string(),
                result.confidence.to_string(),
                runner_ups,
            ]),
        }
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Matched")?;
        write_rows(sheet, &matched_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Unmatched")?;
        write_rows(sheet, &unmatched_rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("failed writing workbook to {}", path.display()))?;
    Ok(())
}

fn header(cols: &[&str]) -> Vec<String> {
    cols.iter().map(|c| c.to_string()).collect()
}

fn flatten_runner_ups(result: &AssetMatchResult) -> String {
    result
        .runner_ups
        .iter()
        .map(|r| format!("{} ({})", r.path, r.score))
        .collect::<Vec<_>>()
        .join("; ")
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AssetCandidate, PlayerRef, RosterEntry, ScoredCandidate, TeamRef};

    fn result(id: &str, chosen: Option<&str>) -> AssetMatchResult {
        AssetMatchResult {
            entry: RosterEntry {
                player: PlayerRef::new(id),
                first_name: "Ada".into(),
                last_name: "Okafor".into(),
                team: TeamRef::new("t1"),
            },
            chosen: chosen.map(AssetCandidate::from_path),
            confidence: if chosen.is_some() { 90 } else { 20 },
            runner_ups: vec![
                ScoredCandidate { path: "a.png".into(), score: 20 },
                ScoredCandidate { path: "b.png".into(), score: 10 },
            ],
        }
    }

    #[test]
    fn counts_matched_and_unmatched() {
        let report = MatchReport::new(40, vec![result("p1", Some("T/x.png")), result("p2", None)]);
        assert_eq!((report.matched, report.unmatched), (1, 1));
        assert_eq!(flatten_runner_ups(&report.results[0]), "a.png (20); b.png (10)");
    }

    #[test]
    fn json_write_replaces_file_and_reloads() {
        let dir = std::env::temp_dir().join(format!("matchfacts-report-{}", std::process::id()));
        let path = dir.join("report.json");
        let report = MatchReport::new(40, vec![result("p1", Some("T/x.png"))]);
        write_report_json(&report, &path).unwrap();
        write_report_json(&report, &path).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
        let loaded = MatchReport::load(&path).unwrap();
        assert_eq!(loaded, report);
        fs::remove_dir_all(&dir).ok();
    }
}
