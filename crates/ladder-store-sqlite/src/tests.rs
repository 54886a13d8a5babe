//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::Utc;
use uuid::Uuid;

use ladder_core::{
  record::{NewSnapshot, StandingRecord},
  season::{Competition, Season, Team},
  store::{ApplyMode, StandingsStore},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory().await.expect("in-memory store")
}

/// A seeded season + competition + 18 teams with aliases.
struct Fixture {
  season:      Season,
  competition: Competition,
  teams:       Vec<Team>,
}

async fn seed(s: &SqliteStore) -> Fixture {
  let season = s.insert_season("2025/26".into(), true).await.unwrap();
  let competition = s.insert_competition("Highland League".into()).await.unwrap();

  let mut teams = Vec::new();
  for i in 1..=18 {
    let team = s.insert_team(format!("Team {i}")).await.unwrap();
    s.insert_team_alias(team.team_id, format!("Team {i} FC"))
      .await
      .unwrap();
    teams.push(team);
  }

  Fixture { season, competition, teams }
}

/// A self-consistent standings table over the fixture's teams.
fn records(f: &Fixture) -> Vec<StandingRecord> {
  f.teams
    .iter()
    .enumerate()
    .map(|(i, team)| {
      let position = i as u32 + 1;
      let wins = 18 - i as u32;
      let draws = 3;
      let losses = i as u32;
      StandingRecord {
        season_id:       f.season.season_id,
        competition_id:  f.competition.competition_id,
        team_id:         team.team_id,
        team_name:       team.name.clone(),
        position,
        points:          wins * 3 + draws,
        matches_played:  wins + draws + losses,
        wins,
        draws,
        losses,
        goals_for:       wins * 2,
        goals_against:   losses * 2,
        goal_difference: (wins as i32 - losses as i32) * 2,
        form:            "WWDLWW".into(),
      }
    })
    .collect()
}

fn snapshot(records: Vec<StandingRecord>) -> NewSnapshot {
  NewSnapshot {
    source_timestamp: Utc::now(),
    source_degraded:  false,
    warnings:         Vec::new(),
    records,
  }
}

// ─── Seasons ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn current_season_round_trips() {
  let s = store().await;
  let inserted = s.insert_season("2025/26".into(), true).await.unwrap();

  let current = s.current_season().await.unwrap().expect("current season");
  assert_eq!(current.season_id, inserted.season_id);
  assert_eq!(current.name, "2025/26");
}

#[tokio::test]
async fn inserting_a_new_current_season_demotes_the_old_one() {
  let s = store().await;
  s.insert_season("2024/25".into(), true).await.unwrap();
  let newer = s.insert_season("2025/26".into(), true).await.unwrap();

  // Exactly one current season at any time.
  let current = s.current_season().await.unwrap().unwrap();
  assert_eq!(current.season_id, newer.season_id);
}

#[tokio::test]
async fn no_current_season_returns_none() {
  let s = store().await;
  s.insert_season("2024/25".into(), false).await.unwrap();
  assert!(s.current_season().await.unwrap().is_none());
}

// ─── Aliases ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn alias_map_covers_all_registered_aliases() {
  let s = store().await;
  let f = seed(&s).await;

  let map = s.alias_map().await.unwrap();
  assert_eq!(map.len(), 18);
  assert!(
    map
      .iter()
      .any(|(alias, id)| alias == "Team 1 FC" && *id == f.teams[0].team_id)
  );
}

// ─── Staging snapshots ───────────────────────────────────────────────────────

#[tokio::test]
async fn snapshot_round_trips_with_provenance() {
  let s = store().await;
  let f = seed(&s).await;

  let input = NewSnapshot {
    source_timestamp: Utc::now(),
    source_degraded:  true,
    warnings:         vec!["row 8: unmatched team name \"Formartine Utd\"".into()],
    records:          records(&f),
  };
  let written = s.insert_snapshot(input).await.unwrap();

  let latest = s.latest_snapshot().await.unwrap().expect("snapshot");
  assert_eq!(latest.snapshot_id, written.snapshot_id);
  assert!(latest.source_degraded);
  assert_eq!(latest.warnings.len(), 1);
  assert_eq!(latest.records.len(), 18);
  // Records come back ordered by position with team names joined in.
  assert_eq!(latest.records[0].position, 1);
  assert_eq!(latest.records[0].team_name, "Team 1");
}

#[tokio::test]
async fn later_snapshot_supersedes_earlier() {
  let s = store().await;
  let f = seed(&s).await;

  s.insert_snapshot(snapshot(records(&f))).await.unwrap();
  let mut second = records(&f);
  second.truncate(17);
  let newer = s.insert_snapshot(snapshot(second)).await.unwrap();

  let latest = s.latest_snapshot().await.unwrap().unwrap();
  assert_eq!(latest.snapshot_id, newer.snapshot_id);
  assert_eq!(latest.records.len(), 17);
  assert_eq!(s.snapshot_count().await.unwrap(), 2);
}

#[tokio::test]
async fn empty_scrape_still_produces_a_snapshot() {
  let s = store().await;
  seed(&s).await;

  s.insert_snapshot(snapshot(Vec::new())).await.unwrap();
  let latest = s.latest_snapshot().await.unwrap().unwrap();
  assert!(latest.records.is_empty());
}

// ─── Promotion ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn apply_replaces_live_table_for_the_season() {
  let s = store().await;
  let f = seed(&s).await;
  s.insert_snapshot(snapshot(records(&f))).await.unwrap();

  let promotion = s.apply_staging(ApplyMode::Transactional).await.unwrap();
  assert_eq!(promotion.records_applied, 18);
  assert_eq!(promotion.season_id, f.season.season_id);

  let live = s.live_records(f.season.season_id).await.unwrap();
  assert_eq!(live.len(), 18);
  assert_eq!(live[0].team_name, "Team 1");
  assert!(s.live_last_updated(f.season.season_id).await.unwrap().is_some());
}

#[tokio::test]
async fn live_goal_difference_is_derived_not_copied() {
  let s = store().await;
  let f = seed(&s).await;

  let mut staged = records(&f);
  // Staging carries a bogus scraped goal difference; the live table must
  // recompute from goals for/against rather than copy it.
  staged[0].goal_difference = 99;
  s.insert_snapshot(snapshot(staged)).await.unwrap();
  s.apply_staging(ApplyMode::Transactional).await.unwrap();

  let live = s.live_records(f.season.season_id).await.unwrap();
  let first = &live[0];
  assert_eq!(
    first.goal_difference,
    first.goals_for as i32 - first.goals_against as i32,
  );
}

#[tokio::test]
async fn apply_is_idempotent_on_content() {
  let s = store().await;
  let f = seed(&s).await;
  s.insert_snapshot(snapshot(records(&f))).await.unwrap();

  s.apply_staging(ApplyMode::Transactional).await.unwrap();
  let first: Vec<_> = s
    .live_records(f.season.season_id)
    .await
    .unwrap()
    .into_iter()
    .map(|r| (r.team_id, r.position, r.points))
    .collect();

  s.apply_staging(ApplyMode::Transactional).await.unwrap();
  let second: Vec<_> = s
    .live_records(f.season.season_id)
    .await
    .unwrap()
    .into_iter()
    .map(|r| (r.team_id, r.position, r.points))
    .collect();

  assert_eq!(first, second);
}

#[tokio::test]
async fn apply_without_current_season_fails_before_touching_live() {
  // No season is flagged current.
  let s = store().await;
  let staged = seed_without_current(&s).await;
  s.insert_snapshot(snapshot(staged.clone())).await.unwrap();

  let err = s.apply_staging(ApplyMode::Transactional).await.unwrap_err();
  assert!(matches!(err, Error::NoCurrentSeason));

  // The live table was never touched.
  let live = s.live_records(staged[0].season_id).await.unwrap();
  assert!(live.is_empty());
}

#[tokio::test]
async fn apply_with_empty_staging_fails() {
  let s = store().await;
  seed(&s).await;

  let err = s.apply_staging(ApplyMode::Transactional).await.unwrap_err();
  assert!(matches!(err, Error::EmptyStaging));
}

#[tokio::test]
async fn apply_with_empty_snapshot_fails() {
  let s = store().await;
  let f = seed(&s).await;
  s.insert_snapshot(snapshot(records(&f))).await.unwrap();
  s.apply_staging(ApplyMode::Transactional).await.unwrap();

  // A later, empty snapshot must not wipe the live table.
  s.insert_snapshot(snapshot(Vec::new())).await.unwrap();
  let err = s.apply_staging(ApplyMode::Transactional).await.unwrap_err();
  assert!(matches!(err, Error::EmptyStaging));
  assert_eq!(s.live_records(f.season.season_id).await.unwrap().len(), 18);
}

#[tokio::test]
async fn legacy_apply_matches_transactional_content() {
  let s = store().await;
  let f = seed(&s).await;
  s.insert_snapshot(snapshot(records(&f))).await.unwrap();

  let promotion = s.apply_staging(ApplyMode::Legacy).await.unwrap();
  assert_eq!(promotion.records_applied, 18);
  assert_eq!(s.live_records(f.season.season_id).await.unwrap().len(), 18);
}

// ─── Reject ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn reject_clears_every_snapshot() {
  // Two snapshots coexist; reject removes both.
  let s = store().await;
  let f = seed(&s).await;
  s.insert_snapshot(snapshot(records(&f))).await.unwrap();
  s.insert_snapshot(snapshot(records(&f))).await.unwrap();
  assert_eq!(s.snapshot_count().await.unwrap(), 2);

  let removed = s.reject_staging().await.unwrap();
  assert_eq!(removed, 2);
  assert_eq!(s.snapshot_count().await.unwrap(), 0);
  assert!(s.latest_snapshot().await.unwrap().is_none());
}

#[tokio::test]
async fn reject_leaves_live_table_alone() {
  let s = store().await;
  let f = seed(&s).await;
  s.insert_snapshot(snapshot(records(&f))).await.unwrap();
  s.apply_staging(ApplyMode::Transactional).await.unwrap();

  s.reject_staging().await.unwrap();
  assert_eq!(s.live_records(f.season.season_id).await.unwrap().len(), 18);
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Seed teams and a *non-current* season, returning records against it.
async fn seed_without_current(s: &SqliteStore) -> Vec<StandingRecord> {
  let season = s.insert_season("2025/26".into(), false).await.unwrap();
  let competition = s.insert_competition("Highland League".into()).await.unwrap();
  let team = s.insert_team("Team 1".into()).await.unwrap();

  vec![StandingRecord {
    season_id:       season.season_id,
    competition_id:  competition.competition_id,
    team_id:         team.team_id,
    team_name:       team.name,
    position:        1,
    points:          33,
    matches_played:  14,
    wins:            10,
    draws:           3,
    losses:          1,
    goals_for:       30,
    goals_against:   10,
    goal_difference: 20,
    form:            "WWWDLW".into(),
  }]
}
