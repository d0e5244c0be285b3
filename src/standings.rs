use std::collections::BTreeMap;

use tracing::debug;

use crate::model::{CardKind, MatchFeed, TeamRecord, TeamRef, TeamStatSheet, TeamStats};
use crate::outcome::{resolve_match_loser, resolve_match_winner};
use crate::stat_keys::{CanonStat, stat_value};

fn completed(matches: &[MatchFeed]) -> impl Iterator<Item = &MatchFeed> {
    matches.iter().filter(|m| {
        if !m.is_completed() {
            debug!(match_id = %m.id, status = ?m.status, "not completed, left out of tallies");
        }
        m.is_completed()
    })
}

/// Win/loss tally per team over completed matches, ordered by team.
/// A match without a winner counts for neither side.
pub fn compute_records(matches: &[MatchFeed]) -> Vec<TeamRecord> {
    let mut records: BTreeMap<TeamRef, TeamRecord> = BTreeMap::new();
    for m in completed(matches) {
        for team in [&m.home.team, &m.away.team] {
            records
                .entry(team.clone())
                .or_insert_with(|| TeamRecord::new(team.clone()));
        }
        let (Some(winner), Some(loser)) = (resolve_match_winner(m), resolve_match_loser(m)) else {
            continue;
        };
        if let Some(rec) = records.get_mut(&winner) {
            rec.wins += 1;
        }
        if let Some(rec) = records.get_mut(&loser) {
            rec.losses += 1;
        }
    }
    records.into_values().collect()
}

/// Games played and goals for/against per team over completed matches.
pub fn compute_team_stats(matches: &[MatchFeed]) -> Vec<TeamStats> {
    let mut stats: BTreeMap<TeamRef, TeamStats> = BTreeMap::new();
    for m in completed(matches) {
        let home_goals = m.home.score.unwrap_or(0);
        let away_goals = m.away.score.unwrap_or(0);
        for (team, scored, conceded) in [
            (&m.home.team, home_goals, away_goals),
            (&m.away.team, away_goals, home_goals),
        ] {
            let row = stats
                .entry(team.clone())
                .or_insert_with(|| TeamStats::new(team.clone()));
            row.games_played += 1;
            row.goals_for += scored;
            row.goals_against += conceded;
        }
    }
    stats.into_values().collect()
}

/// Records and team stats joined with lineup roll-ups and card counts.
pub fn compute_stat_sheets(matches: &[MatchFeed]) -> Vec<TeamStatSheet> {
    let mut sheets: BTreeMap<TeamRef, TeamStatSheet> = BTreeMap::new();

    for row in compute_team_stats(matches) {
        let sheet = sheets
            .entry(row.team.clone())
            .or_insert_with(|| TeamStatSheet::new(row.team.clone()));
        sheet.games_played = row.games_played;
        sheet.goals_for = row.goals_for;
        sheet.goals_against = row.goals_against;
    }
    for rec in compute_records(matches) {
        let sheet = sheets
            .entry(rec.team.clone())
            .or_insert_with(|| TeamStatSheet::new(rec.team.clone()));
        sheet.wins = rec.wins;
        sheet.losses = rec.losses;
    }

    for m in completed(matches) {
        for entry in m.teams() {
            let Some(sheet) = sheets.get_mut(&entry.team) else {
                continue;
            };
            for player in &entry.lineup {
                sheet.shots += stat_value(&player.stats, CanonStat::Shots);
                sheet.assists += stat_value(&player.stats, CanonStat::Assists);
                sheet.fouls += stat_value(&player.stats, CanonStat::Fouls);
            }
            for booking in &entry.bookings {
                match booking.card {
                    CardKind::Yellow => sheet.yellow_cards += 1,
                    CardKind::StraightRed => sheet.red_cards += 1,
                    CardKind::SecondYellow => sheet.second_yellow_reds += 1,
                }
            }
        }
    }

    sheets.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Booking, LineupStatus, MatchStatus, PlayerMatchEntry, PlayerRef, Side, StatEntry,
        TeamMatchEntry,
    };

    fn side(team: &str, side: Side, score: Option<u32>) -> TeamMatchEntry {
        TeamMatchEntry {
            team: TeamRef::new(team),
            side,
            score,
            lineup: Vec::new(),
            bookings: Vec::new(),
        }
    }

    fn game(home: &str, away: &str, hs: u32, aws: u32, status: MatchStatus) -> MatchFeed {
        MatchFeed {
            id: format!("{home}-{away}"),
            period: None,
            status,
            home: side(home, Side::Home, Some(hs)),
            away: side(away, Side::Away, Some(aws)),
            winner: None,
        }
    }

    #[test]
    fn skips_matches_that_are_not_completed() {
        let matches = vec![
            game("t1", "t2", 2, 0, MatchStatus::Live),
            game("t1", "t3", 1, 0, MatchStatus::Scheduled),
            game("t2", "t3", 0, 1, MatchStatus::Postponed),
        ];
        assert!(compute_records(&matches).is_empty());
        assert!(compute_team_stats(&matches).is_empty());
        assert!(compute_stat_sheets(&matches).is_empty());
    }

    #[test]
    fn draws_count_as_played_but_not_won_or_lost() {
        let matches = vec![game("t1", "t2", 1, 1, MatchStatus::Completed)];
        let records = compute_records(&matches);
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.wins == 0 && r.losses == 0));
        let stats = compute_team_stats(&matches);
        assert!(stats.iter().all(|s| s.games_played == 1 && s.goals_for == 1));
    }

    #[test]
    fn explicit_winner_drives_record() {
        let mut m = game("t1", "t2", 1, 1, MatchStatus::Completed);
        m.winner = Some(TeamRef::new("t2"));
        let records = compute_records(&[m]);
        let t2 = records.iter().find(|r| r.team.as_str() == "2").unwrap();
        assert_eq!((t2.wins, t2.losses), (1, 0));
    }

    #[test]
    fn stat_sheet_rolls_up_players_and_cards() {
        let mut m = game("t1", "t2", 2, 0, MatchStatus::Completed);
        m.home.lineup = vec![
            PlayerMatchEntry {
                player: PlayerRef::new("p1"),
                shirt_number: Some(9),
                status: LineupStatus::Starter,
                position: "Striker".into(),
                stats: vec![
                    StatEntry::new("totalScoringAtt", 4.0),
                    StatEntry::new("goalAssist", 1.0),
                    StatEntry::new("fouls", 2.0),
                ],
            },
            PlayerMatchEntry {
                player: PlayerRef::new("p2"),
                shirt_number: Some(10),
                status: LineupStatus::Starter,
                position: "Midfielder".into(),
                stats: vec![StatEntry::new("totalScoringAtt", 1.0)],
            },
        ];
        m.away.bookings = vec![
            Booking {
                player: Some(PlayerRef::new("p7")),
                card: CardKind::Yellow,
                minute: Some(12),
            },
            Booking {
                player: Some(PlayerRef::new("p7")),
                card: CardKind::SecondYellow,
                minute: Some(70),
            },
            Booking {
                player: Some(PlayerRef::new("p8")),
                card: CardKind::StraightRed,
                minute: Some(88),
            },
        ];

        let sheets = compute_stat_sheets(&[m]);
        let home = &sheets[0];
        assert_eq!(home.team.as_str(), "1");
        assert_eq!(home.shots, 5.0);
        assert_eq!(home.assists, 1.0);
        assert_eq!(home.fouls, 2.0);
        assert_eq!((home.wins, home.losses, home.goals_for), (1, 0, 2));

        let away = &sheets[1];
        assert_eq!(away.yellow_cards, 1);
        assert_eq!(away.second_yellow_reds, 1);
        assert_eq!(away.red_cards, 1);
        assert_eq!(away.losses, 1);
    }
}
