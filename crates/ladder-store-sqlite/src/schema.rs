//! SQL schema for the Ladder SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS seasons (
    season_id  TEXT PRIMARY KEY,
    name       TEXT NOT NULL UNIQUE,
    is_current INTEGER NOT NULL DEFAULT 0   -- exactly one row holds 1
);

CREATE TABLE IF NOT EXISTS competitions (
    competition_id TEXT PRIMARY KEY,
    name           TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS teams (
    team_id    TEXT PRIMARY KEY,
    name       TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

-- External-name aliases, consumed only by the resolver.
CREATE TABLE IF NOT EXISTS team_aliases (
    alias   TEXT PRIMARY KEY,
    team_id TEXT NOT NULL REFERENCES teams(team_id)
);

-- Snapshots are append-only: a scrape run inserts one, the next run
-- supersedes it, a reject bulk-clears them. No UPDATE is ever issued.
CREATE TABLE IF NOT EXISTS staging_snapshots (
    snapshot_id      TEXT PRIMARY KEY,
    scrape_timestamp TEXT NOT NULL,
    source_timestamp TEXT NOT NULL,
    source_degraded  INTEGER NOT NULL DEFAULT 0,
    warnings         TEXT NOT NULL DEFAULT '[]'   -- JSON array of strings
);

CREATE TABLE IF NOT EXISTS staging_records (
    snapshot_id     TEXT NOT NULL REFERENCES staging_snapshots(snapshot_id)
                        ON DELETE CASCADE,
    season_id       TEXT NOT NULL REFERENCES seasons(season_id),
    competition_id  TEXT NOT NULL REFERENCES competitions(competition_id),
    team_id         TEXT NOT NULL REFERENCES teams(team_id),
    position        INTEGER NOT NULL,
    points          INTEGER NOT NULL,
    matches_played  INTEGER NOT NULL,
    wins            INTEGER NOT NULL,
    draws           INTEGER NOT NULL,
    losses          INTEGER NOT NULL,
    goals_for       INTEGER NOT NULL,
    goals_against   INTEGER NOT NULL,
    goal_difference INTEGER NOT NULL,
    form            TEXT NOT NULL DEFAULT '',
    PRIMARY KEY (snapshot_id, team_id)
);

-- Written only by apply_staging; read-only for everything else.
-- goal_difference is derived by the database and never inserted.
CREATE TABLE IF NOT EXISTS live_records (
    season_id       TEXT NOT NULL REFERENCES seasons(season_id),
    competition_id  TEXT NOT NULL REFERENCES competitions(competition_id),
    team_id         TEXT NOT NULL REFERENCES teams(team_id),
    position        INTEGER NOT NULL,
    points          INTEGER NOT NULL,
    matches_played  INTEGER NOT NULL,
    wins            INTEGER NOT NULL,
    draws           INTEGER NOT NULL,
    losses          INTEGER NOT NULL,
    goals_for       INTEGER NOT NULL,
    goals_against   INTEGER NOT NULL,
    goal_difference INTEGER GENERATED ALWAYS AS (goals_for - goals_against) STORED,
    form            TEXT NOT NULL DEFAULT '',
    updated_at      TEXT NOT NULL,
    PRIMARY KEY (season_id, competition_id, team_id)
);

CREATE INDEX IF NOT EXISTS staging_records_snapshot_idx
    ON staging_records(snapshot_id);
CREATE INDEX IF NOT EXISTS live_records_season_idx
    ON live_records(season_id);

PRAGMA user_version = 1;
";
