use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::model::{DisplayStat, StatEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatCategory {
    Attack,
    Defence,
    Goalkeeping,
    Discipline,
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatMeta {
    pub key: &'static str,
    pub abbreviation: &'static str,
    pub label: &'static str,
    pub category: StatCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonStat {
    Goals,
    Assists,
    ChancesCreated,
    Shots,
    ShotsOnTarget,
    Fouls,
    Tackles,
    BlockedShots,
    Interceptions,
    Clearances,
    Saves,
    CleanSheets,
    GoalsConceded,
    Minutes,
    Appearances,
    YellowCards,
    RedCards,
}

impl CanonStat {
    /// Provider keys accepted for this stat, preferred first.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            CanonStat::Goals => &["goals", "goal"],
            CanonStat::Assists => &["goalAssist", "goal_assist", "assists"],
            CanonStat::ChancesCreated => &["totalAttAssist", "chancesCreated", "keyPasses"],
            CanonStat::Shots => &["totalScoringAtt", "shots", "totalShots"],
            CanonStat::ShotsOnTarget => &["ontargetScoringAtt", "shotsOnTarget"],
            CanonStat::Fouls => &["fouls", "foulCommitted", "totalFoulsConceded"],
            CanonStat::Tackles => &["totalTackle", "tackles", "wonTackle"],
            CanonStat::BlockedShots => &["blockedScoringAtt", "outfielderBlock", "blocks"],
            CanonStat::Interceptions => &["interception", "interceptions"],
            CanonStat::Clearances => &["totalClearance", "clearances"],
            CanonStat::Saves => &["saves", "saved"],
            CanonStat::CleanSheets => &["cleanSheet", "cleanSheets"],
            CanonStat::GoalsConceded => &["goalsConceded"],
            CanonStat::Minutes => &["minsPlayed", "minutesPlayed"],
            CanonStat::Appearances => &["appearances", "gameStarted"],
            CanonStat::YellowCards => &["yellowCard", "yellowCards"],
            CanonStat::RedCards => &["redCard", "redCards"],
        }
    }

    pub fn meta(self) -> Option<&'static StatMeta> {
        describe(self.aliases()[0])
    }
}

static DICTIONARY: &[StatMeta] = &[
    meta("goals", "G", "Goals", StatCategory::Attack),
    meta("goalAssist", "A", "Assists", StatCategory::Attack),
    meta("totalAttAssist", "CC", "Chances Created", StatCategory::Attack),
    meta("totalScoringAtt", "SH", "Shots", StatCategory::Attack),
    meta("ontargetScoringAtt", "SOT", "Shots on Target", StatCategory::Attack),
    meta("totalTackle", "TK", "Tackles", StatCategory::Defence),
    meta("wonTackle", "TKW", "Tackles Won", StatCategory::Defence),
    meta("blockedScoringAtt", "BLK", "Blocked Shots", StatCategory::Defence),
    meta("outfielderBlock", "BLK", "Blocks", StatCategory::Defence),
    meta("interception", "INT", "Interceptions", StatCategory::Defence),
    meta("totalClearance", "CLR", "Clearances", StatCategory::Defence),
    meta("saves", "SV", "Saves", StatCategory::Goalkeeping),
    meta("cleanSheet", "CS", "Clean Sheets", StatCategory::Goalkeeping),
    meta("goalsConceded", "GA", "Goals Conceded", StatCategory::Goalkeeping),
    meta("fouls", "FC", "Fouls", StatCategory::Discipline),
    meta("yellowCard", "YC", "Yellow Cards", StatCategory::Discipline),
    meta("redCard", "RC", "Red Cards", StatCategory::Discipline),
    meta("minsPlayed", "MIN", "Minutes", StatCategory::General),
    meta("appearances", "APP", "Appearances", StatCategory::General),
    meta("gameStarted", "GS", "Starts", StatCategory::General),
];

const fn meta(
    key: &'static str,
    abbreviation: &'static str,
    label: &'static str,
    category: StatCategory,
) -> StatMeta {
    StatMeta {
        key,
        abbreviation,
        label,
        category,
    }
}

static BY_KEY: Lazy<HashMap<String, &'static StatMeta>> = Lazy::new(|| {
    let mut map = HashMap::with_capacity(DICTIONARY.len() * 2);
    for entry in DICTIONARY {
        map.insert(entry.key.to_ascii_lowercase(), entry);
    }
    // Secondary aliases resolve to the primary key's metadata.
    for canon in ALL_CANON {
        let Some(primary) = map.get(&canon.aliases()[0].to_ascii_lowercase()).copied() else {
            continue;
        };
        for alias in canon.aliases() {
            map.entry(alias.to_ascii_lowercase()).or_insert(primary);
        }
    }
    map
});

static ALL_CANON: &[CanonStat] = &[
    CanonStat::Goals,
    CanonStat::Assists,
    CanonStat::ChancesCreated,
    CanonStat::Shots,
    CanonStat::ShotsOnTarget,
    CanonStat::Fouls,
    CanonStat::Tackles,
    CanonStat::BlockedShots,
    CanonStat::Interceptions,
    CanonStat::Clearances,
    CanonStat::Saves,
    CanonStat::CleanSheets,
    CanonStat::GoalsConceded,
    CanonStat::Minutes,
    CanonStat::Appearances,
    CanonStat::YellowCards,
    CanonStat::RedCards,
];

/// Display metadata for a provider key; `None` for keys outside the dictionary.
pub fn describe(key: &str) -> Option<&'static StatMeta> {
    BY_KEY.get(&key.trim().to_ascii_lowercase()).copied()
}

/// Value of a canonical stat, taken from the first alias present. Missing stats read as zero.
pub fn stat_value(stats: &[StatEntry], canon: CanonStat) -> f64 {
    find_stat(stats, canon).unwrap_or(0.0)
}

pub fn find_stat(stats: &[StatEntry], canon: CanonStat) -> Option<f64> {
    canon.aliases().iter().find_map(|alias| {
        stats
            .iter()
            .find(|entry| entry.key.eq_ignore_ascii_case(alias))
            .map(|entry| entry.value)
            .filter(|v| v.is_finite())
    })
}

/// Ordered `(label, value)` list for a selection snapshot.
pub fn display_stats(stats: &[StatEntry], wanted: &[CanonStat]) -> Vec<DisplayStat> {
    wanted
        .iter()
        .map(|canon| DisplayStat {
            label: canon
                .meta()
                .map(|m| m.label.to_string())
                .unwrap_or_else(|| canon.aliases()[0].to_string()),
            value: stat_value(stats, *canon),
        })
        .collect()
}

/// Every raw pair with its label; unknown keys keep the raw key as label.
pub fn label_all(stats: &[StatEntry]) -> Vec<DisplayStat> {
    stats
        .iter()
        .map(|entry| DisplayStat {
            label: describe(&entry.key)
                .map(|m| m.label.to_string())
                .unwrap_or_else(|| entry.key.clone()),
            value: entry.value,
        })
        .collect()
}
