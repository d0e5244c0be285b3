use std::cmp::Ordering;

use crate::model::{
    MatchFeed, MatchStandouts, PlayerMatchEntry, StandoutRole, StandoutSelection, TeamRef,
    is_goalkeeper,
};
use crate::outcome::resolve_match_winner;
use crate::stat_keys::{CanonStat, display_stats, stat_value};

const SCORING_KEYS: &[CanonStat] = &[CanonStat::Goals, CanonStat::Assists, CanonStat::Shots];
const DEFENSIVE_KEYS: &[CanonStat] = &[
    CanonStat::Tackles,
    CanonStat::BlockedShots,
    CanonStat::Interceptions,
];
const KEEPER_KEYS: &[CanonStat] = &[CanonStat::Saves];

#[derive(Debug, Clone, Copy)]
struct Tagged<'a> {
    player: &'a PlayerMatchEntry,
    team: &'a TeamRef,
}

/// Scoring, defensive and goalkeeper standouts for a single match.
pub fn select_match_standouts(feed: &MatchFeed) -> MatchStandouts {
    let winner = resolve_match_winner(feed);
    let pool: Vec<Tagged> = feed
        .teams()
        .into_iter()
        .flat_map(|entry| {
            entry.lineup.iter().map(move |player| Tagged {
                player,
                team: &entry.team,
            })
        })
        .collect();

    let scoring = pick(StandoutRole::Scoring, pool.clone(), SCORING_KEYS, |a, b| {
        by_stats_desc(a, b, SCORING_KEYS)
    });

    let defensive = pick(StandoutRole::Defensive, pool.clone(), DEFENSIVE_KEYS, |a, b| {
        by_stats_desc(a, b, DEFENSIVE_KEYS)
    });

    let keepers: Vec<Tagged> = pool
        .iter()
        .copied()
        .filter(|t| is_goalkeeper(&t.player.position))
        .collect();
    let goalkeeper = pick(StandoutRole::Goalkeeper, keepers, KEEPER_KEYS, |a, b| {
        by_stats_desc(a, b, KEEPER_KEYS).then_with(|| match winner.as_ref() {
            Some(w) => (b.team == w).cmp(&(a.team == w)),
            None => Ordering::Equal,
        })
    });

    MatchStandouts {
        match_id: feed.id.clone(),
        winner,
        scoring,
        defensive,
        goalkeeper,
    }
}

fn pick(
    role: StandoutRole,
    mut pool: Vec<Tagged>,
    display: &[CanonStat],
    primary: impl Fn(&Tagged, &Tagged) -> Ordering,
) -> StandoutSelection {
    pool.sort_by(|a, b| {
        primary(a, b).then_with(|| a.player.player.as_str().cmp(b.player.player.as_str()))
    });
    match pool.first() {
        Some(best) => StandoutSelection {
            role,
            player: Some(best.player.player.clone()),
            team: Some(best.team.clone()),
            stats: display_stats(&best.player.stats, display),
        },
        None => StandoutSelection {
            role,
            player: None,
            team: None,
            stats: Vec::new(),
        },
    }
}

fn by_stats_desc(a: &Tagged, b: &Tagged, keys: &[CanonStat]) -> Ordering {
    for key in keys {
        let ord = stat_value(&b.player.stats, *key).total_cmp(&stat_value(&a.player.stats, *key));
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
