use std::fmt;

use serde::{Deserialize, Serialize};

use crate::feed_shape::normalize_id;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamRef(String);

impl TeamRef {
    pub fn new(raw: &str) -> Self {
        Self(normalize_id(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TeamRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerRef(String);

impl PlayerRef {
    pub fn new(raw: &str) -> Self {
        Self(normalize_id(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric body of the id, when it has one.
    pub fn numeric(&self) -> Option<u64> {
        self.0.parse::<u64>().ok()
    }
}

impl fmt::Display for PlayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    Scheduled,
    Live,
    Completed,
    Postponed,
    Cancelled,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineupStatus {
    Starter,
    Substitute,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    Yellow,
    StraightRed,
    SecondYellow,
}

/// Raw provider stat pair, e.g. `("totalScoringAtt", 4.0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatEntry {
    pub key: String,
    pub value: f64,
}

impl StatEntry {
    pub fn new(key: &str, value: f64) -> Self {
        Self {
            key: key.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMatchEntry {
    pub player: PlayerRef,
    pub shirt_number: Option<u32>,
    pub status: LineupStatus,
    pub position: String,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub player: Option<PlayerRef>,
    pub card: CardKind,
    pub minute: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMatchEntry {
    pub team: TeamRef,
    pub side: Side,
    pub score: Option<u32>,
    #[serde(default)]
    pub lineup: Vec<PlayerMatchEntry>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchFeed {
    pub id: String,
    pub period: Option<String>,
    pub status: MatchStatus,
    pub home: TeamMatchEntry,
    pub away: TeamMatchEntry,
    pub winner: Option<TeamRef>,
}

impl MatchFeed {
    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    pub fn teams(&self) -> [&TeamMatchEntry; 2] {
        [&self.home, &self.away]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonPlayerStat {
    pub player: PlayerRef,
    pub team: TeamRef,
    pub position: String,
    pub first_name: String,
    pub last_name: String,
    pub known_name: Option<String>,
    pub shirt_number: Option<u32>,
    #[serde(default)]
    pub stats: Vec<StatEntry>,
}

impl SeasonPlayerStat {
    pub fn display_name(&self) -> String {
        if let Some(known) = self.known_name.as_deref().filter(|s| !s.trim().is_empty()) {
            return known.trim().to_string();
        }
        full_name(&self.first_name, &self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquadMember {
    pub player: PlayerRef,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
}

impl SquadMember {
    pub fn full_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub team: TeamRef,
    pub wins: u32,
    pub losses: u32,
}

impl TeamRecord {
    pub fn new(team: TeamRef) -> Self {
        Self {
            team,
            wins: 0,
            losses: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    pub team: TeamRef,
    pub games_played: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl TeamStats {
    pub fn new(team: TeamRef) -> Self {
        Self {
            team,
            games_played: 0,
            goals_for: 0,
            goals_against: 0,
        }
    }

    pub fn goal_difference(&self) -> i64 {
        i64::from(self.goals_for) - i64::from(self.goals_against)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStatSheet {
    pub team: TeamRef,
    pub wins: u32,
    pub losses: u32,
    pub games_played: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub shots: f64,
    pub assists: f64,
    pub fouls: f64,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub second_yellow_reds: u32,
}

impl TeamStatSheet {
    pub fn new(team: TeamRef) -> Self {
        Self {
            team,
            wins: 0,
            losses: 0,
            games_played: 0,
            goals_for: 0,
            goals_against: 0,
            shots: 0.0,
            assists: 0.0,
            fouls: 0.0,
            yellow_cards: 0,
            red_cards: 0,
            second_yellow_reds: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayStat {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaderRole {
    Scorer,
    Playmaker,
    Keeper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaderSource {
    SeasonStats,
    RosterFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderSelection {
    pub role: LeaderRole,
    pub player: Option<PlayerRef>,
    pub player_name: Option<String>,
    pub source: LeaderSource,
    pub stats: Vec<DisplayStat>,
}

impl LeaderSelection {
    pub fn none(role: LeaderRole) -> Self {
        Self {
            role,
            player: None,
            player_name: None,
            source: LeaderSource::SeasonStats,
            stats: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamLeaders {
    pub team: TeamRef,
    pub scorer: LeaderSelection,
    pub playmaker: LeaderSelection,
    pub keeper: LeaderSelection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandoutRole {
    Scoring,
    Defensive,
    Goalkeeper,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandoutSelection {
    pub role: StandoutRole,
    pub player: Option<PlayerRef>,
    pub team: Option<TeamRef>,
    pub stats: Vec<DisplayStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStandouts {
    pub match_id: String,
    pub winner: Option<TeamRef>,
    pub scoring: StandoutSelection,
    pub defensive: StandoutSelection,
    pub goalkeeper: StandoutSelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player: PlayerRef,
    pub first_name: String,
    pub last_name: String,
    pub team: TeamRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCandidate {
    pub path: String,
    pub first_name: String,
    pub last_name: String,
    pub team_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub path: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetMatchResult {
    pub entry: RosterEntry,
    pub chosen: Option<AssetCandidate>,
    pub confidence: u32,
    pub runner_ups: Vec<ScoredCandidate>,
}

impl AssetMatchResult {
    pub fn is_matched(&self) -> bool {
        self.chosen.is_some()
    }
}

pub fn full_name(first: &str, last: &str) -> String {
    let first = first.trim();
    let last = last.trim();
    match (first.is_empty(), last.is_empty()) {
        (true, true) => String::new(),
        (false, true) => first.to_string(),
        (true, false) => last.to_string(),
        (false, false) => format!("{first} {last}"),
    }
}

/// Goalkeeper check shared by the leader and standout selectors.
pub fn is_goalkeeper(position: &str) -> bool {
    let p = position.trim().to_ascii_lowercase();
    p == "gk" || p.contains("goalkeeper") || p.contains("keeper")
}
