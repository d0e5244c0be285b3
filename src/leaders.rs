use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::model::{
    LeaderRole, LeaderSelection, LeaderSource, PlayerRef, SeasonPlayerStat, SquadMember,
    TeamLeaders, TeamRef, is_goalkeeper,
};
use crate::stat_keys::{CanonStat, display_stats, stat_value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    HigherBetter,
    LowerBetter,
}

struct RoleSpec {
    role: LeaderRole,
    qualifies: fn(&SeasonPlayerStat) -> bool,
    order: &'static [(CanonStat, Direction)],
    display: &'static [CanonStat],
}

const SCORER: RoleSpec = RoleSpec {
    role: LeaderRole::Scorer,
    qualifies: has_goals,
    order: &[
        (CanonStat::Goals, Direction::HigherBetter),
        (CanonStat::Assists, Direction::HigherBetter),
    ],
    display: &[CanonStat::Goals, CanonStat::Assists, CanonStat::Shots],
};

const PLAYMAKER: RoleSpec = RoleSpec {
    role: LeaderRole::Playmaker,
    qualifies: has_assists,
    order: &[
        (CanonStat::Assists, Direction::HigherBetter),
        (CanonStat::ChancesCreated, Direction::HigherBetter),
        (CanonStat::Goals, Direction::HigherBetter),
    ],
    display: &[CanonStat::Assists, CanonStat::ChancesCreated, CanonStat::Goals],
};

const KEEPER: RoleSpec = RoleSpec {
    role: LeaderRole::Keeper,
    qualifies: plays_in_goal,
    order: &[
        (CanonStat::Saves, Direction::HigherBetter),
        (CanonStat::CleanSheets, Direction::HigherBetter),
        (CanonStat::GoalsConceded, Direction::LowerBetter),
    ],
    display: &[CanonStat::Saves, CanonStat::CleanSheets, CanonStat::GoalsConceded],
};

fn has_goals(p: &SeasonPlayerStat) -> bool {
    stat_value(&p.stats, CanonStat::Goals) > 0.0
}

fn has_assists(p: &SeasonPlayerStat) -> bool {
    stat_value(&p.stats, CanonStat::Assists) > 0.0
}

fn plays_in_goal(p: &SeasonPlayerStat) -> bool {
    is_goalkeeper(&p.position)
}

/// Scorer, playmaker and keeper for one team.
///
/// `pool` may hold the whole competition; only rows for `team` are considered.
/// A role with no qualifying row falls back to the alphabetical squad list when
/// one is given, skipping players that already hold another role.
pub fn select_team_leaders(
    team: &TeamRef,
    pool: &[SeasonPlayerStat],
    squad: Option<&[SquadMember]>,
) -> TeamLeaders {
    let team_pool: Vec<&SeasonPlayerStat> = pool.iter().filter(|p| &p.team == team).collect();
    let fallback = squad.map(RosterFallback::new);

    let pick = |spec: &RoleSpec, taken: &[&LeaderSelection]| -> LeaderSelection {
        if let Some(selection) = select_from_stats(spec, &team_pool) {
            return selection;
        }
        let taken: Vec<&PlayerRef> = taken.iter().filter_map(|s| s.player.as_ref()).collect();
        match fallback.as_ref().and_then(|f| f.pick(spec, &taken)) {
            Some(selection) => {
                debug!(team = %team, role = ?spec.role, "leader taken from squad fallback");
                selection
            }
            None => LeaderSelection::none(spec.role),
        }
    };

    let scorer = pick(&SCORER, &[]);
    let playmaker = pick(&PLAYMAKER, &[&scorer]);
    let keeper = pick(&KEEPER, &[&scorer, &playmaker]);
    TeamLeaders {
        team: team.clone(),
        scorer,
        playmaker,
        keeper,
    }
}

/// Leaders for every team present in `pool` or `squads`, ordered by team.
pub fn select_all_leaders(
    pool: &[SeasonPlayerStat],
    squads: &HashMap<TeamRef, Vec<SquadMember>>,
) -> Vec<TeamLeaders> {
    let teams: BTreeSet<&TeamRef> = pool.iter().map(|p| &p.team).chain(squads.keys()).collect();
    teams
        .into_iter()
        .map(|team| select_team_leaders(team, pool, squads.get(team).map(Vec::as_slice)))
        .collect()
}

fn select_from_stats(spec: &RoleSpec, pool: &[&SeasonPlayerStat]) -> Option<LeaderSelection> {
    let mut candidates: Vec<&SeasonPlayerStat> =
        pool.iter().copied().filter(|p| (spec.qualifies)(p)).collect();
    candidates.sort_by(|a, b| compare_for_role(spec, a, b));
    let best = candidates.first()?;
    Some(LeaderSelection {
        role: spec.role,
        player: Some(best.player.clone()),
        player_name: Some(best.display_name()),
        source: LeaderSource::SeasonStats,
        stats: display_stats(&best.stats, spec.display),
    })
}

fn compare_for_role(spec: &RoleSpec, a: &SeasonPlayerStat, b: &SeasonPlayerStat) -> Ordering {
    for (stat, dir) in spec.order {
        let va = stat_value(&a.stats, *stat);
        let vb = stat_value(&b.stats, *stat);
        let ord = match dir {
            Direction::HigherBetter => vb.total_cmp(&va),
            Direction::LowerBetter => va.total_cmp(&vb),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    compare_numeric_ids(&a.player, &b.player)
}

/// Ascending numeric id; non-numeric ids sort after numeric ones.
pub fn compare_numeric_ids(a: &PlayerRef, b: &PlayerRef) -> Ordering {
    match (a.numeric(), b.numeric()) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.as_str().cmp(b.as_str())),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.as_str().cmp(b.as_str()),
    }
}

struct RosterFallback<'a> {
    outfield: Vec<&'a SquadMember>,
    keepers: Vec<&'a SquadMember>,
}

impl<'a> RosterFallback<'a> {
    fn new(squad: &'a [SquadMember]) -> Self {
        let mut sorted: Vec<&SquadMember> = squad.iter().collect();
        sorted.sort_by(|a, b| {
            a.full_name()
                .to_lowercase()
                .cmp(&b.full_name().to_lowercase())
                .then_with(|| compare_numeric_ids(&a.player, &b.player))
        });
        let (keepers, outfield): (Vec<&SquadMember>, Vec<&SquadMember>) =
            sorted.into_iter().partition(|m| is_goalkeeper(&m.position));
        Self { outfield, keepers }
    }

    /// The role's own slot first (playmaker is the second outfield name), then
    /// the rest of the list in order, never a player in `taken`.
    fn pick(&self, spec: &RoleSpec, taken: &[&PlayerRef]) -> Option<LeaderSelection> {
        let (list, slot) = match spec.role {
            LeaderRole::Scorer => (&self.outfield, 0),
            LeaderRole::Playmaker => (&self.outfield, 1),
            LeaderRole::Keeper => (&self.keepers, 0),
        };
        let slot = slot.min(list.len());
        let member = list[slot..]
            .iter()
            .chain(&list[..slot])
            .find(|m| !taken.contains(&&m.player))?;
        Some(LeaderSelection {
            role: spec.role,
            player: Some(member.player.clone()),
            player_name: Some(member.full_name()),
            source: LeaderSource::RosterFallback,
            stats: display_stats(&[], spec.display),
        })
    }
}
