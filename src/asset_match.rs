use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::{debug, info};

use crate::asset_names::{normalize_name, score_names};
use crate::model::{AssetCandidate, AssetMatchResult, RosterEntry, ScoredCandidate, TeamRef};

pub const DEFAULT_CONFIDENCE_FLOOR: u32 = 40;
pub const DEFAULT_REVIEW_TOP_N: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Lowest score that may claim an asset.
    pub floor: u32,
    /// Runner-ups kept per result for review.
    pub top_n: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            floor: DEFAULT_CONFIDENCE_FLOOR,
            top_n: DEFAULT_REVIEW_TOP_N,
        }
    }
}

/// Asset folder label to team lookup. Labels are compared in normalized form,
/// so "Harbour City", "harbour-city" and "HARBOUR_CITY" are the same folder.
#[derive(Debug, Clone, Default)]
pub struct TeamFolderAliases {
    by_label: HashMap<String, TeamRef>,
}

impl TeamFolderAliases {
    pub fn new<I, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (L, TeamRef)>,
        L: AsRef<str>,
    {
        let mut by_label = HashMap::new();
        for (label, team) in pairs {
            let key = normalize_name(label.as_ref());
            if key.is_empty() {
                continue;
            }
            by_label.insert(key, team);
        }
        Self { by_label }
    }

    /// `{ "<folder label>": "<team ref>" }`
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw).context("invalid aliases json")?;
        let Value::Object(map) = value else {
            return Err(anyhow!("aliases json must be an object of label -> team ref"));
        };
        let mut pairs = Vec::with_capacity(map.len());
        for (label, team) in map {
            let team = match team {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                other => return Err(anyhow!("alias '{label}' maps to non-string {other}")),
            };
            pairs.push((label, TeamRef::new(&team)));
        }
        Ok(Self::new(pairs))
    }

    pub fn team_for(&self, label: &str) -> Option<&TeamRef> {
        self.by_label.get(&normalize_name(label))
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }
}

/// Pairs every roster entry with at most one asset from its own team folder.
pub fn match_roster(
    entries: &[RosterEntry],
    candidates: &[AssetCandidate],
    aliases: &TeamFolderAliases,
    opts: MatchOptions,
) -> Vec<AssetMatchResult> {
    for c in candidates {
        if c.first_name.is_empty() && c.last_name.is_empty() {
            debug!(path = %c.path, "asset name not parseable");
        }
        if aliases.team_for(&c.team_label).is_none() {
            debug!(path = %c.path, label = %c.team_label, "asset folder has no team alias");
        }
    }
    let results = assign_greedy(
        entries,
        candidates,
        opts,
        |entry, cand| aliases.team_for(&cand.team_label) == Some(&entry.team),
        |entry, cand| {
            score_names(
                &entry.first_name,
                &entry.last_name,
                &cand.first_name,
                &cand.last_name,
            )
        },
    );
    let matched = results.iter().filter(|r| r.is_matched()).count();
    info!(
        matched,
        unmatched = results.len() - matched,
        candidates = candidates.len(),
        "roster matching finished"
    );
    results
}

/// Greedy assignment in roster order. Each entry takes its best unclaimed,
/// eligible candidate (ties to the smaller path) when the score reaches
/// `opts.floor`.
pub fn assign_greedy<E, S>(
    entries: &[RosterEntry],
    candidates: &[AssetCandidate],
    opts: MatchOptions,
    eligible: E,
    score: S,
) -> Vec<AssetMatchResult>
where
    E: Fn(&RosterEntry, &AssetCandidate) -> bool,
    S: Fn(&RosterEntry, &AssetCandidate) -> u32,
{
    let mut claimed = vec![false; candidates.len()];
    let mut results = Vec::with_capacity(entries.len());

    for entry in entries {
        let mut scored: Vec<(usize, u32)> = candidates
            .iter()
            .enumerate()
            .filter(|(idx, cand)| !claimed[*idx] && eligible(entry, *cand))
            .map(|(idx, cand)| (idx, score(entry, cand)))
            .collect();
        scored.sort_by(|(ia, sa), (ib, sb)| {
            sb.cmp(sa)
                .then_with(|| candidates[*ia].path.cmp(&candidates[*ib].path))
        });

        let chosen_idx = scored
            .first()
            .filter(|(_, s)| *s >= opts.floor)
            .map(|(idx, _)| *idx);
        let confidence = scored.first().map(|(_, s)| *s).unwrap_or(0);

        match chosen_idx {
            Some(idx) => {
                claimed[idx] = true;
                debug!(player = %entry.player, path = %candidates[idx].path, confidence, "asset claimed");
            }
            None => {
                debug!(player = %entry.player, best = confidence, floor = opts.floor, "no asset above floor");
            }
        }

        let runner_ups = scored
            .iter()
            .filter(|(idx, _)| Some(*idx) != chosen_idx)
            .take(opts.top_n)
            .map(|(idx, s)| ScoredCandidate {
                path: candidates[*idx].path.clone(),
                score: *s,
            })
            .collect();

        results.push(AssetMatchResult {
            entry: entry.clone(),
            chosen: chosen_idx.map(|idx| candidates[idx].clone()),
            confidence,
            runner_ups,
        });
    }
    results
}
