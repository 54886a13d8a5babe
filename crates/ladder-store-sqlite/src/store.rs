//! [`SqliteStore`] — the SQLite implementation of [`StandingsStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use ladder_core::{
  record::{NewSnapshot, StagingSnapshot, StandingRecord},
  season::{Competition, Season, Team},
  store::{ApplyMode, Promotion, StandingsStore},
};

use crate::{
  Error, Result,
  encode::{
    RawSeason, RawStandingRecord, decode_dt, decode_uuid, decode_warnings,
    encode_dt, encode_uuid, encode_warnings,
  },
  schema::SCHEMA,
};

/// Standing columns shared by the staging and live SELECTs, team name joined
/// in from the teams table.
const RECORD_COLUMNS: &str =
  "r.season_id, r.competition_id, r.team_id, t.name,
   r.position, r.points, r.matches_played, r.wins, r.draws, r.losses,
   r.goals_for, r.goals_against, r.goal_difference, r.form";

/// Columns copied from staging into live on promotion. Provenance stays
/// behind; `goal_difference` is generated by the live table.
const PROMOTED_COLUMNS: &str =
  "season_id, competition_id, team_id, position, points, matches_played,
   wins, draws, losses, goals_for, goals_against, form";

fn raw_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawStandingRecord> {
  Ok(RawStandingRecord {
    season_id:       row.get(0)?,
    competition_id:  row.get(1)?,
    team_id:         row.get(2)?,
    team_name:       row.get(3)?,
    position:        row.get(4)?,
    points:          row.get(5)?,
    matches_played:  row.get(6)?,
    wins:            row.get(7)?,
    draws:           row.get(8)?,
    losses:          row.get(9)?,
    goals_for:       row.get(10)?,
    goals_against:   row.get(11)?,
    goal_difference: row.get(12)?,
    form:            row.get(13)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A standings store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Snapshot provenance row for the most recent scrape, records not loaded.
  async fn latest_snapshot_header(
    &self,
  ) -> Result<Option<(Uuid, DateTime<Utc>, DateTime<Utc>, bool, Vec<String>)>> {
    let raw: Option<(String, String, String, bool, String)> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT snapshot_id, scrape_timestamp, source_timestamp,
                      source_degraded, warnings
               FROM staging_snapshots
               ORDER BY scrape_timestamp DESC, snapshot_id DESC
               LIMIT 1",
              [],
              |row| {
                Ok((
                  row.get(0)?,
                  row.get(1)?,
                  row.get(2)?,
                  row.get(3)?,
                  row.get(4)?,
                ))
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|(id, scraped, source, degraded, warnings)| {
        Ok((
          decode_uuid(&id)?,
          decode_dt(&scraped)?,
          decode_dt(&source)?,
          degraded,
          decode_warnings(&warnings)?,
        ))
      })
      .transpose()
  }

  async fn snapshot_records(&self, snapshot_id: Uuid) -> Result<Vec<StandingRecord>> {
    let id_str = encode_uuid(snapshot_id);

    let raws: Vec<RawStandingRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS}
           FROM staging_records r
           JOIN teams t ON t.team_id = r.team_id
           WHERE r.snapshot_id = ?1
           ORDER BY r.position",
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], raw_record)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStandingRecord::into_record).collect()
  }

  async fn snapshot_record_count(&self, snapshot_id: Uuid) -> Result<u64> {
    let id_str = encode_uuid(snapshot_id);
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM staging_records WHERE snapshot_id = ?1",
          rusqlite::params![id_str],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(count as u64)
  }
}

// ─── StandingsStore impl ─────────────────────────────────────────────────────

impl StandingsStore for SqliteStore {
  type Error = Error;

  // ── Reference entities ──────────────────────────────────────────────────

  async fn insert_season(&self, name: String, is_current: bool) -> Result<Season> {
    let season = Season {
      season_id: Uuid::new_v4(),
      name,
      is_current,
    };

    let id_str = encode_uuid(season.season_id);
    let name_str = season.name.clone();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        if is_current {
          // Preserve the single-current-season invariant.
          tx.execute("UPDATE seasons SET is_current = 0", [])?;
        }
        tx.execute(
          "INSERT INTO seasons (season_id, name, is_current) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name_str, is_current],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(season)
  }

  async fn current_season(&self) -> Result<Option<Season>> {
    let raw: Option<RawSeason> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              "SELECT season_id, name, is_current FROM seasons WHERE is_current = 1",
              [],
              |row| {
                Ok(RawSeason {
                  season_id:  row.get(0)?,
                  name:       row.get(1)?,
                  is_current: row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSeason::into_season).transpose()
  }

  async fn insert_competition(&self, name: String) -> Result<Competition> {
    let competition = Competition {
      competition_id: Uuid::new_v4(),
      name,
    };

    let id_str = encode_uuid(competition.competition_id);
    let name_str = competition.name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO competitions (competition_id, name) VALUES (?1, ?2)",
          rusqlite::params![id_str, name_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(competition)
  }

  async fn competition_by_name(&self, name: String) -> Result<Option<Competition>> {
    let raw: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT competition_id, name FROM competitions WHERE name = ?1",
              rusqlite::params![name],
              |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|(id, name)| {
        Ok(Competition { competition_id: decode_uuid(&id)?, name })
      })
      .transpose()
  }

  async fn insert_team(&self, name: String) -> Result<Team> {
    let team = Team {
      team_id:    Uuid::new_v4(),
      name,
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(team.team_id);
    let name_str = team.name.clone();
    let at_str = encode_dt(team.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO teams (team_id, name, created_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(team)
  }

  async fn insert_team_alias(&self, team_id: Uuid, alias: String) -> Result<()> {
    let id_str = encode_uuid(team_id);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO team_aliases (alias, team_id) VALUES (?1, ?2)",
          rusqlite::params![alias, id_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn alias_map(&self) -> Result<Vec<(String, Uuid)>> {
    let raws: Vec<(String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare("SELECT alias, team_id FROM team_aliases")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(alias, id)| Ok((alias, decode_uuid(&id)?)))
      .collect()
  }

  // ── Staging — append-only writes ────────────────────────────────────────

  async fn insert_snapshot(&self, input: NewSnapshot) -> Result<StagingSnapshot> {
    let snapshot = StagingSnapshot {
      snapshot_id:      Uuid::new_v4(),
      scrape_timestamp: Utc::now(),
      source_timestamp: input.source_timestamp,
      source_degraded:  input.source_degraded,
      warnings:         input.warnings,
      records:          input.records,
    };

    let snap_id_str = encode_uuid(snapshot.snapshot_id);
    let scraped_str = encode_dt(snapshot.scrape_timestamp);
    let source_str = encode_dt(snapshot.source_timestamp);
    let degraded = snapshot.source_degraded;
    let warnings_str = encode_warnings(&snapshot.warnings)?;
    let records = snapshot.records.clone();

    // Header and rows land in one transaction: a snapshot is either fully
    // staged or not staged at all.
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO staging_snapshots
             (snapshot_id, scrape_timestamp, source_timestamp, source_degraded, warnings)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![snap_id_str, scraped_str, source_str, degraded, warnings_str],
        )?;
        for r in &records {
          tx.execute(
            "INSERT INTO staging_records
               (snapshot_id, season_id, competition_id, team_id, position, points,
                matches_played, wins, draws, losses, goals_for, goals_against,
                goal_difference, form)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            rusqlite::params![
              snap_id_str,
              encode_uuid(r.season_id),
              encode_uuid(r.competition_id),
              encode_uuid(r.team_id),
              r.position,
              r.points,
              r.matches_played,
              r.wins,
              r.draws,
              r.losses,
              r.goals_for,
              r.goals_against,
              r.goal_difference,
              r.form,
            ],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(snapshot)
  }

  async fn latest_snapshot(&self) -> Result<Option<StagingSnapshot>> {
    let Some((snapshot_id, scraped, source, degraded, warnings)) =
      self.latest_snapshot_header().await?
    else {
      return Ok(None);
    };

    let records = self.snapshot_records(snapshot_id).await?;

    Ok(Some(StagingSnapshot {
      snapshot_id,
      scrape_timestamp: scraped,
      source_timestamp: source,
      source_degraded: degraded,
      warnings,
      records,
    }))
  }

  async fn snapshot_count(&self) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM staging_snapshots", [], |row| row.get(0))?)
      })
      .await?;
    Ok(count as u64)
  }

  // ── Live table ──────────────────────────────────────────────────────────

  async fn live_records(&self, season_id: Uuid) -> Result<Vec<StandingRecord>> {
    let id_str = encode_uuid(season_id);

    let raws: Vec<RawStandingRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {RECORD_COLUMNS}
           FROM live_records r
           JOIN teams t ON t.team_id = r.team_id
           WHERE r.season_id = ?1
           ORDER BY r.position",
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], raw_record)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStandingRecord::into_record).collect()
  }

  async fn live_last_updated(&self, season_id: Uuid) -> Result<Option<DateTime<Utc>>> {
    let id_str = encode_uuid(season_id);

    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT MAX(updated_at) FROM live_records WHERE season_id = ?1",
          rusqlite::params![id_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    raw.as_deref().map(decode_dt).transpose()
  }

  // ── Promotion ───────────────────────────────────────────────────────────

  async fn apply_staging(&self, mode: ApplyMode) -> Result<Promotion> {
    // Preconditions first — nothing is touched unless they hold.
    let season = self.current_season().await?.ok_or(Error::NoCurrentSeason)?;
    let (snapshot_id, ..) = self
      .latest_snapshot_header()
      .await?
      .ok_or(Error::EmptyStaging)?;
    if self.snapshot_record_count(snapshot_id).await? == 0 {
      return Err(Error::EmptyStaging);
    }

    let season_str = encode_uuid(season.season_id);
    let snap_str = encode_uuid(snapshot_id);
    let now_str = encode_dt(Utc::now());

    let insert_sql = format!(
      "INSERT INTO live_records
         (season_id, competition_id, team_id, position, points, matches_played,
          wins, draws, losses, goals_for, goals_against, form, updated_at)
       SELECT {PROMOTED_COLUMNS}, ?2
       FROM staging_records
       WHERE snapshot_id = ?1",
    );

    let applied = match mode {
      ApplyMode::Transactional => {
        // Delete and insert commit together; a failed insert rolls the
        // delete back instead of leaving the season's live table empty.
        self
          .conn
          .call(move |conn| {
            let tx = conn.transaction()?;
            tx.execute(
              "DELETE FROM live_records WHERE season_id = ?1",
              rusqlite::params![season_str],
            )?;
            let n = tx.execute(&insert_sql, rusqlite::params![snap_str, now_str])?;
            tx.commit()?;
            Ok(n)
          })
          .await?
      }
      ApplyMode::Legacy => {
        // Historical behaviour: two independent statements with a
        // partial-failure window between them.
        let season_str_del = season_str.clone();
        self
          .conn
          .call(move |conn| {
            conn.execute(
              "DELETE FROM live_records WHERE season_id = ?1",
              rusqlite::params![season_str_del],
            )?;
            Ok(())
          })
          .await?;
        self
          .conn
          .call(move |conn| {
            Ok(conn.execute(&insert_sql, rusqlite::params![snap_str, now_str])?)
          })
          .await?
      }
    };

    Ok(Promotion {
      season_id:       season.season_id,
      snapshot_id,
      records_applied: applied as u32,
    })
  }

  async fn reject_staging(&self) -> Result<u64> {
    // Clears the whole staging area, not just the latest snapshot.
    let snapshots: usize = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM staging_records", [])?;
        let n = tx.execute("DELETE FROM staging_snapshots", [])?;
        tx.commit()?;
        Ok(n)
      })
      .await?;

    Ok(snapshots as u64)
  }
}
