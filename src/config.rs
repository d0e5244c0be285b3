use std::env;
use std::path::PathBuf;

use crate::asset_match::{DEFAULT_CONFIDENCE_FLOOR, DEFAULT_REVIEW_TOP_N, MatchOptions};

const APP_DIR: &str = "matchfacts";
const LEDGER_FILE: &str = "ledger.sqlite";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub confidence_floor: u32,
    pub review_top_n: usize,
    pub ledger_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            confidence_floor: DEFAULT_CONFIDENCE_FLOOR,
            review_top_n: DEFAULT_REVIEW_TOP_N,
            ledger_path: default_ledger_path(),
        }
    }
}

impl EngineConfig {
    /// Reads `MATCH_CONFIDENCE_FLOOR`, `MATCH_REVIEW_TOP_N` and
    /// `MATCHFACTS_LEDGER_PATH`; bad or missing values fall back to defaults.
    pub fn from_env() -> Self {
        let confidence_floor = env::var("MATCH_CONFIDENCE_FLOOR")
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(DEFAULT_CONFIDENCE_FLOOR)
            .clamp(0, 100);
        let review_top_n = env::var("MATCH_REVIEW_TOP_N")
            .ok()
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_REVIEW_TOP_N)
            .clamp(1, 20);
        let ledger_path = env::var("MATCHFACTS_LEDGER_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .or_else(default_ledger_path);
        Self {
            confidence_floor,
            review_top_n,
            ledger_path,
        }
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            floor: self.confidence_floor,
            top_n: self.review_top_n,
        }
    }
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(APP_DIR));
        }
    }
    let home = env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(APP_DIR))
}

pub fn default_ledger_path() -> Option<PathBuf> {
    app_cache_dir().map(|dir| dir.join(LEDGER_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_feed_match_options() {
        let cfg = EngineConfig {
            ledger_path: None,
            ..EngineConfig::default()
        };
        assert_eq!(cfg.match_options(), MatchOptions::default());
        assert_eq!(cfg.match_options().floor, 40);
        assert_eq!(cfg.match_options().top_n, 5);
    }
}
