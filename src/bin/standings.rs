use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{info, warn};

use matchfacts::cli_args::{flag_value, init_tracing, load_env};
use matchfacts::feed_parse::{parse_match_feeds_json, parse_season_stats_json, parse_team_squads_json};
use matchfacts::leaders::select_all_leaders;
use matchfacts::model::{
    DisplayStat, LeaderSelection, MatchFeed, MatchStandouts, StandoutSelection, TeamLeaders, TeamRecord,
    TeamStatSheet, TeamStats,
};
use matchfacts::standings::{compute_records, compute_stat_sheets, compute_team_stats};
use matchfacts::standouts::select_match_standouts;

#[derive(Serialize)]
struct StandingsOutput {
    records: Vec<TeamRecord>,
    team_stats: Vec<TeamStats>,
    stat_sheets: Vec<TeamStatSheet>,
    leaders: Vec<TeamLeaders>,
    standouts: Vec<MatchStandouts>,
}

fn main() -> Result<()> {
    load_env();
    init_tracing();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let feeds_path = flag_value(&args, "feeds")
        .map(PathBuf::from)
        .context("usage: standings --feeds <dir|file> [--season-stats <file>] [--squads <file>] [--out <file>]")?;

    let matches = load_feeds(&feeds_path)?;
    info!(matches = matches.len(), "feeds loaded");

    let records = compute_records(&matches);
    let team_stats = compute_team_stats(&matches);
    let stat_sheets = compute_stat_sheets(&matches);

    let season = match flag_value(&args, "season-stats") {
        Some(path) => parse_season_stats_json(&read(Path::new(&path))?)?,
        None => Vec::new(),
    };
    let squads = match flag_value(&args, "squads") {
        Some(path) => parse_team_squads_json(&read(Path::new(&path))?)?,
        None => HashMap::new(),
    };
    let leaders = if season.is_empty() && squads.is_empty() {
        Vec::new()
    } else {
        select_all_leaders(&season, &squads)
    };

    let standouts: Vec<MatchStandouts> = matches
        .iter()
        .filter(|m| m.is_completed())
        .map(select_match_standouts)
        .collect();

    print_tables(&stat_sheets);
    print_leaders(&leaders);
    print_standouts(&standouts);

    if let Some(out) = flag_value(&args, "out") {
        let output = StandingsOutput {
            records,
            team_stats,
            stat_sheets,
            leaders,
            standouts,
        };
        let out = PathBuf::from(out);
        let json = serde_json::to_string_pretty(&output).context("serialize standings")?;
        fs::write(&out, json).with_context(|| format!("write {}", out.display()))?;
        println!("Wrote {}", out.display());
    }

    Ok(())
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

fn load_feeds(path: &Path) -> Result<Vec<MatchFeed>> {
    if path.is_file() {
        return parse_match_feeds_json(&read(path)?)
            .with_context(|| format!("parse {}", path.display()));
    }
    if !path.is_dir() {
        return Err(anyhow!("feeds path {} does not exist", path.display()));
    }
    let mut files = fs::read_dir(path)
        .with_context(|| format!("list {}", path.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")))
        .collect::<Vec<_>>();
    files.sort();

    let mut out = Vec::new();
    for file in files {
        match read(&file).and_then(|raw| parse_match_feeds_json(&raw)) {
            Ok(mut feeds) => out.append(&mut feeds),
            Err(err) => warn!(file = %file.display(), error = %err, "feed file skipped"),
        }
    }
    Ok(out)
}

fn print_tables(sheets: &[TeamStatSheet]) {
    println!(
        "{:<10} {:>3} {:>3} {:>3} {:>4} {:>4} {:>5} {:>6} {:>5} {:>5} {:>3} {:>3}",
        "Team", "GP", "W", "L", "GF", "GA", "GD", "Shots", "Ast", "Fouls", "YC", "RC"
    );
    for s in sheets {
        let gd = i64::from(s.goals_for) - i64::from(s.goals_against);
        println!(
            "{:<10} {:>3} {:>3} {:>3} {:>4} {:>4} {:>5} {:>6} {:>5} {:>5} {:>3} {:>3}",
            s.team.as_str(),
            s.games_played,
            s.wins,
            s.losses,
            s.goals_for,
            s.goals_against,
            gd,
            s.shots,
            s.assists,
            s.fouls,
            s.yellow_cards,
            s.red_cards + s.second_yellow_reds
        );
    }
}

fn print_leaders(leaders: &[TeamLeaders]) {
    if leaders.is_empty() {
        return;
    }
    println!();
    println!("Leaders");
    for team in leaders {
        println!("team {}", team.team);
        for sel in [&team.scorer, &team.playmaker, &team.keeper] {
            println!("  {:<10} {}", format!("{:?}", sel.role), describe_leader(sel));
        }
    }
}

fn describe_leader(sel: &LeaderSelection) -> String {
    let Some(player) = &sel.player else {
        return "n/a".to_string();
    };
    let name = sel.player_name.as_deref().unwrap_or("");
    format!("{name} ({player}) {}", stat_line(&sel.stats))
}

fn print_standouts(standouts: &[MatchStandouts]) {
    if standouts.is_empty() {
        return;
    }
    println!();
    println!("Standouts");
    for m in standouts {
        let winner = m.winner.as_ref().map(|w| w.to_string()).unwrap_or_else(|| "draw".to_string());
        println!("match {} winner={winner}", m.match_id);
        for sel in [&m.scoring, &m.defensive, &m.goalkeeper] {
            println!("  {:<10} {}", format!("{:?}", sel.role), describe_standout(sel));
        }
    }
}

fn describe_standout(sel: &StandoutSelection) -> String {
    match (&sel.player, &sel.team) {
        (Some(player), Some(team)) => format!("{player} [{team}] {}", stat_line(&sel.stats)),
        _ => "n/a".to_string(),
    }
}

fn stat_line(stats: &[DisplayStat]) -> String {
    stats
        .iter()
        .map(|s| format!("{}={}", s.label, s.value))
        .collect::<Vec<_>>()
        .join(" ")
}
