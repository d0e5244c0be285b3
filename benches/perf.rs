use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use matchfacts::asset_match::{MatchOptions, TeamFolderAliases, match_roster};
use matchfacts::asset_names::score_names;
use matchfacts::feed_parse::{parse_match_feeds_json, parse_season_stats_json};
use matchfacts::leaders::select_team_leaders;
use matchfacts::model::{AssetCandidate, MatchFeed, PlayerRef, RosterEntry, TeamRef};
use matchfacts::standings::compute_stat_sheets;

const FIRST_NAMES: &[&str] = &[
    "Maria", "Ada", "Carla", "Sofia", "Yara", "Lena", "Ines", "Olga", "Zoe", "Beth",
];
const LAST_NAMES: &[&str] = &[
    "Gonzalez", "Okafor", "Diaz", "Lindqvist", "Haddad", "Brandt", "Moreau", "Petrova",
    "Adams", "Young", "Núñez", "Østergaard",
];

fn sample_roster(teams: usize, per_team: usize) -> (Vec<RosterEntry>, Vec<AssetCandidate>) {
    let mut roster = Vec::new();
    let mut catalog = Vec::new();
    for t in 0..teams {
        for p in 0..per_team {
            let first = FIRST_NAMES[(t + p) % FIRST_NAMES.len()];
            let last = LAST_NAMES[(t * 3 + p) % LAST_NAMES.len()];
            roster.push(RosterEntry {
                player: PlayerRef::new(&format!("p{}", t * 100 + p)),
                first_name: first.to_string(),
                last_name: last.to_string(),
                team: TeamRef::new(&format!("t{t}")),
            });
            let path = if p % 2 == 0 {
                format!("Team {t}/T{t}_{last}_{first}.png")
            } else {
                format!("Team {t}/Photo_{} {last}.jpg", &first[..1])
            };
            catalog.push(AssetCandidate::from_path(&path));
        }
    }
    (roster, catalog)
}

fn sample_feeds() -> Vec<MatchFeed> {
    let mut feeds = Vec::new();
    for _ in 0..50 {
        feeds.extend(parse_match_feeds_json(ROUND_ROBIN_JSON).expect("valid fixture json"));
    }
    feeds
}

fn bench_feed_parse(c: &mut Criterion) {
    c.bench_function("feed_parse", |b| {
        b.iter(|| {
            let feeds = parse_match_feeds_json(black_box(ROUND_ROBIN_JSON)).unwrap();
            black_box(feeds.len());
        })
    });
}

fn bench_stat_sheets(c: &mut Criterion) {
    let feeds = sample_feeds();
    c.bench_function("stat_sheets", |b| {
        b.iter(|| {
            let sheets = compute_stat_sheets(black_box(&feeds));
            black_box(sheets.len());
        })
    });
}

fn bench_team_leaders(c: &mut Criterion) {
    let pool = parse_season_stats_json(SEASON_STATS_JSON).expect("valid fixture json");
    let team = TeamRef::new("t1");
    c.bench_function("team_leaders", |b| {
        b.iter(|| {
            let leaders = select_team_leaders(black_box(&team), black_box(&pool), None);
            black_box(leaders.scorer.player.is_some());
        })
    });
}

fn bench_name_scoring(c: &mut Criterion) {
    c.bench_function("name_scoring", |b| {
        b.iter(|| {
            let score = score_names(
                black_box("María"),
                black_box("González"),
                black_box("M"),
                black_box("Gonzales"),
            );
            black_box(score);
        })
    });
}

fn bench_roster_matching(c: &mut Criterion) {
    let (roster, catalog) = sample_roster(12, 25);
    let aliases =
        TeamFolderAliases::new((0..12).map(|t| (format!("Team {t}"), TeamRef::new(&format!("t{t}")))));
    c.bench_function("roster_matching", |b| {
        b.iter(|| {
            let results = match_roster(
                black_box(&roster),
                black_box(&catalog),
                &aliases,
                MatchOptions::default(),
            );
            black_box(results.len());
        })
    });
}

criterion_group!(
    perf,
    bench_feed_parse,
    bench_stat_sheets,
    bench_team_leaders,
    bench_name_scoring,
    bench_roster_matching
);
criterion_main!(perf);

static ROUND_ROBIN_JSON: &str = include_str!("../tests/fixtures/round_robin.json");
static SEASON_STATS_JSON: &str = include_str!("../tests/fixtures/season_stats.json");
