use std::collections::HashMap;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use crate::feed_shape::{as_list, list_at, normalize_id, pick_f64, pick_string, pick_u32};
use crate::model::{
    Booking, CardKind, LineupStatus, MatchFeed, PlayerMatchEntry, PlayerRef, RosterEntry,
    SeasonPlayerStat, Side, SquadMember, StatEntry, TeamMatchEntry, TeamRef,
};
use crate::outcome::classify_status;

pub fn parse_match_feed_json(raw: &str) -> Result<Option<MatchFeed>> {
    let Some(root) = parse_root(raw).context("invalid match feed json")? else {
        return Ok(None);
    };
    Ok(parse_match(unwrap_match(&root)))
}

/// A document holding one match or a list of matches.
pub fn parse_match_feeds_json(raw: &str) -> Result<Vec<MatchFeed>> {
    let Some(root) = parse_root(raw).context("invalid match feed json")? else {
        return Ok(Vec::new());
    };
    let items = if root.is_array() {
        as_list(Some(&root))
    } else if root.get("match").is_some() {
        list_at(&root, &["match"])
    } else {
        as_list(Some(&root))
    };
    Ok(items.iter().filter_map(parse_match).collect())
}

pub fn parse_season_stats_json(raw: &str) -> Result<Vec<SeasonPlayerStat>> {
    let Some(root) = parse_root(raw).context("invalid season stats json")? else {
        return Ok(Vec::new());
    };
    let items = if root.is_array() {
        as_list(Some(&root))
    } else {
        list_at(&root, &["player", "players"])
    };
    Ok(items.iter().filter_map(parse_season_player).collect())
}

pub fn parse_squad_json(raw: &str) -> Result<Vec<SquadMember>> {
    let Some(root) = parse_root(raw).context("invalid squad json")? else {
        return Ok(Vec::new());
    };
    let items = if root.is_array() {
        as_list(Some(&root))
    } else {
        list_at(&root, &["person", "player", "players"])
    };
    Ok(items.iter().filter_map(parse_squad_member).collect())
}

/// Squads for several teams: `{"team": [{"teamRef": .., "person": [..]}, ..]}`
/// or a bare list of team objects.
pub fn parse_team_squads_json(raw: &str) -> Result<HashMap<TeamRef, Vec<SquadMember>>> {
    let Some(root) = parse_root(raw).context("invalid squads json")? else {
        return Ok(HashMap::new());
    };
    let teams = if root.is_array() {
        as_list(Some(&root))
    } else {
        list_at(&root, &["team", "squad", "squads"])
    };
    let mut out: HashMap<TeamRef, Vec<SquadMember>> = HashMap::new();
    for team in teams {
        let Some(team_ref) = pick_string(team, &["teamRef", "teamId", "id"]) else {
            debug!("squad entry without team ref skipped");
            continue;
        };
        let members = list_at(team, &["person", "player", "players"])
            .iter()
            .filter_map(parse_squad_member);
        out.entry(TeamRef::new(&team_ref)).or_default().extend(members);
    }
    Ok(out)
}

pub fn parse_roster_json(raw: &str) -> Result<Vec<RosterEntry>> {
    let Some(root) = parse_root(raw).context("invalid roster json")? else {
        return Ok(Vec::new());
    };
    let items = if root.is_array() {
        as_list(Some(&root))
    } else {
        list_at(&root, &["roster", "player", "players"])
    };
    Ok(items.iter().filter_map(parse_roster_entry).collect())
}

fn parse_root(raw: &str) -> Result<Option<Value>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(trimmed)?;
    Ok(Some(value))
}

/// Providers sometimes wrap a single match as `{ "match": { ... } }`.
fn unwrap_match(root: &Value) -> &Value {
    match root.get("match") {
        Some(inner) if inner.is_object() => inner,
        _ => root,
    }
}

fn parse_match(value: &Value) -> Option<MatchFeed> {
    let id = pick_string(value, &["id", "matchId", "uID"]).unwrap_or_default();
    let info = value.get("matchInfo").unwrap_or(value);
    let status_raw = pick_string(info, &["status", "matchStatus"]);
    let period = pick_string(info, &["period"]);
    let status = classify_status(status_raw.as_deref(), period.as_deref());

    let mut entries: Vec<TeamMatchEntry> = Vec::new();
    for (idx, team) in list_at(value, &["teamData", "team", "teams"]).iter().enumerate() {
        let fallback_side = if idx == 0 { Side::Home } else { Side::Away };
        if let Some(entry) = parse_team_entry(team, fallback_side) {
            entries.push(entry);
        }
    }
    if entries.len() < 2 {
        debug!(match_id = %id, teams = entries.len(), "match feed without two teams skipped");
        return None;
    }

    let home_idx = entries.iter().position(|e| e.side == Side::Home).unwrap_or(0);
    let away_idx = entries
        .iter()
        .enumerate()
        .position(|(idx, e)| idx != home_idx && e.side == Side::Away)
        .or_else(|| (0..entries.len()).find(|idx| *idx != home_idx))?;
    let mut home = entries[home_idx].clone();
    let mut away = entries[away_idx].clone();
    home.side = Side::Home;
    away.side = Side::Away;

    let winner = pick_string(info, &["winner", "winnerRef", "matchWinner"]).map(|w| TeamRef::new(&w));

    Some(MatchFeed {
        id: normalize_id(&id),
        period,
        status,
        home,
        away,
        winner,
    })
}

fn parse_team_entry(value: &Value, fallback_side: Side) -> Option<TeamMatchEntry> {
    let team = pick_string(value, &["teamRef", "teamId", "id"])?;
    let side = match pick_string(value, &["side"]).map(|s| s.to_ascii_lowercase()) {
        Some(s) if s == "home" => Side::Home,
        Some(s) if s == "away" => Side::Away,
        _ => fallback_side,
    };
    let score = pick_u32(value, &["score", "goals"]);
    let lineup = list_at(value, &["player", "lineup", "players"])
        .iter()
        .filter_map(parse_lineup_player)
        .collect();
    let bookings = list_at(value, &["booking", "bookings"])
        .iter()
        .filter_map(parse_booking)
        .collect();
    Some(TeamMatchEntry {
        team: TeamRef::new(&team),
        side,
        score,
        lineup,
        bookings,
    })
}

fn parse_lineup_player(value: &Value) -> Option<PlayerMatchEntry> {
    let player = pick_string(value, &["playerRef", "playerId", "id"])?;
    let status = match pick_string(value, &["status", "role"])
        .map(|s| s.to_ascii_lowercase())
        .as_deref()
    {
        Some("start" | "starter" | "starting") => LineupStatus::Starter,
        Some("sub" | "substitute" | "bench") => LineupStatus::Substitute,
        _ => LineupStatus::Unknown,
    };
    Some(PlayerMatchEntry {
        player: PlayerRef::new(&player),
        shirt_number: pick_u32(value, &["shirtNumber", "shirt", "number"]),
        status,
        position: pick_string(value, &["position", "pos"]).unwrap_or_default(),
        stats: parse_stats(value),
    })
}

fn parse_booking(value: &Value) -> Option<Booking> {
    let card = pick_string(value, &["card"]).map(|s| s.to_ascii_lowercase());
    let card_type = pick_string(value, &["cardType", "type"]).map(|s| s.to_ascii_lowercase());
    let kind = classify_card(card.as_deref(), card_type.as_deref())?;
    Some(Booking {
        player: pick_string(value, &["playerRef", "playerId"]).map(|p| PlayerRef::new(&p)),
        card: kind,
        minute: pick_u32(value, &["min", "minute", "time"]),
    })
}

fn classify_card(card: Option<&str>, card_type: Option<&str>) -> Option<CardKind> {
    let compacted = |s: &str| s.replace([' ', '_', '-'], "");
    let card_type = card_type.map(compacted);
    let card = card.map(compacted);
    match card_type.as_deref() {
        Some("secondyellow" | "yellowred") => return Some(CardKind::SecondYellow),
        Some("straightred" | "red") => return Some(CardKind::StraightRed),
        Some("yellow") => return Some(CardKind::Yellow),
        _ => {}
    }
    match card.as_deref() {
        Some("yellow") => Some(CardKind::Yellow),
        Some("secondyellow" | "yellowred") => Some(CardKind::SecondYellow),
        Some("red" | "straightred") => Some(CardKind::StraightRed),
        _ => None,
    }
}

fn parse_stats(value: &Value) -> Vec<StatEntry> {
    let mut out = Vec::new();
    for stat in list_at(value, &["stat", "stats"]) {
        let Some(key) = pick_string(stat, &["type", "key", "name"]) else {
            continue;
        };
        let Some(v) = pick_f64(stat, &["value", "@value", "total"]) else {
            continue;
        };
        out.push(StatEntry { key, value: v });
    }
    out
}

fn parse_season_player(value: &Value) -> Option<SeasonPlayerStat> {
    let player = pick_string(value, &["playerRef", "playerId", "id"])?;
    let team = pick_string(value, &["teamRef", "teamId"])?;
    Some(SeasonPlayerStat {
        player: PlayerRef::new(&player),
        team: TeamRef::new(&team),
        position: pick_string(value, &["position", "pos"]).unwrap_or_default(),
        first_name: pick_string(value, &["firstName", "first"]).unwrap_or_default(),
        last_name: pick_string(value, &["lastName", "last"]).unwrap_or_default(),
        known_name: pick_string(value, &["knownName", "matchName"]),
        shirt_number: pick_u32(value, &["shirtNumber", "shirt"]),
        stats: parse_stats(value),
    })
}

fn parse_squad_member(value: &Value) -> Option<SquadMember> {
    let player = pick_string(value, &["playerRef", "playerId", "id"])?;
    Some(SquadMember {
        player: PlayerRef::new(&player),
        first_name: pick_string(value, &["firstName", "first"]).unwrap_or_default(),
        last_name: pick_string(value, &["lastName", "last"]).unwrap_or_default(),
        position: pick_string(value, &["position", "pos"]).unwrap_or_default(),
    })
}

fn parse_roster_entry(value: &Value) -> Option<RosterEntry> {
    let player = pick_string(value, &["playerRef", "playerId", "id"])?;
    let team = pick_string(value, &["teamRef", "teamId", "team"])?;
    Some(RosterEntry {
        player: PlayerRef::new(&player),
        first_name: pick_string(value, &["firstName", "first"]).unwrap_or_default(),
        last_name: pick_string(value, &["lastName", "last"]).unwrap_or_default(),
        team: TeamRef::new(&team),
    })
}
