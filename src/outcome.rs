use crate::model::{MatchFeed, MatchStatus, TeamRef};

/// Winner of a match, if one can be determined.
///
/// An explicit winner naming one of the two teams is authoritative (shootouts,
/// awarded matches). Otherwise the higher score wins when both scores are known.
/// Draws and incomplete scores have no winner.
pub fn resolve_winner(
    home: &TeamRef,
    away: &TeamRef,
    home_score: Option<u32>,
    away_score: Option<u32>,
    explicit_winner: Option<&TeamRef>,
) -> Option<TeamRef> {
    if let Some(winner) = explicit_winner {
        if winner == home || winner == away {
            return Some(winner.clone());
        }
    }
    let (Some(h), Some(a)) = (home_score, away_score) else {
        return None;
    };
    if h > a {
        Some(home.clone())
    } else if a > h {
        Some(away.clone())
    } else {
        None
    }
}

pub fn resolve_match_winner(feed: &MatchFeed) -> Option<TeamRef> {
    resolve_winner(
        &feed.home.team,
        &feed.away.team,
        feed.home.score,
        feed.away.score,
        feed.winner.as_ref(),
    )
}

/// Loser of a match that has a winner.
pub fn resolve_match_loser(feed: &MatchFeed) -> Option<TeamRef> {
    let winner = resolve_match_winner(feed)?;
    if winner == feed.home.team {
        Some(feed.away.team.clone())
    } else {
        Some(feed.home.team.clone())
    }
}

pub fn classify_status(status: Option<&str>, period: Option<&str>) -> MatchStatus {
    if let Some(raw) = status.map(compact).filter(|s| !s.is_empty()) {
        return match raw.as_str() {
            "played" | "fulltime" | "ft" | "completed" | "complete" | "result" | "final"
            | "aet" | "pens" | "finished" => MatchStatus::Completed,
            "fixture" | "scheduled" | "prematch" | "notstarted" | "upcoming" => {
                MatchStatus::Scheduled
            }
            "playing" | "live" | "inprogress" | "halftime" | "firsthalf" | "secondhalf"
            | "extratime" | "shootout" => MatchStatus::Live,
            "postponed" | "suspended" | "delayed" => MatchStatus::Postponed,
            "cancelled" | "canceled" | "abandoned" | "void" => MatchStatus::Cancelled,
            _ => MatchStatus::Unknown,
        };
    }
    match period.map(compact).as_deref() {
        Some("fulltime" | "extratimeend" | "shootoutend" | "fulltimeend") => MatchStatus::Completed,
        Some("prematch") => MatchStatus::Scheduled,
        Some("firsthalf" | "halftime" | "secondhalf" | "extrafirsthalf" | "extrasecondhalf")
        | Some("shootout") => MatchStatus::Live,
        Some("postponed") => MatchStatus::Postponed,
        Some("abandoned") => MatchStatus::Cancelled,
        _ => MatchStatus::Unknown,
    }
}

fn compact(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
