//! SQL schema for the Rapport SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS people (
    person_id     TEXT PRIMARY KEY,
    username      TEXT NOT NULL UNIQUE,
    full_name     TEXT NOT NULL,
    role          TEXT NOT NULL,   -- 'manager' | 'employee'
    password_hash TEXT,            -- argon2 PHC string
    created_at    TEXT NOT NULL
);

-- One team per manager.
CREATE TABLE IF NOT EXISTS teams (
    team_id    TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    manager_id TEXT NOT NULL UNIQUE REFERENCES people(person_id),
    created_at TEXT NOT NULL
);

-- One team per employee; rowid order is assignment order.
CREATE TABLE IF NOT EXISTS team_members (
    team_id   TEXT NOT NULL REFERENCES teams(team_id),
    person_id TEXT NOT NULL UNIQUE REFERENCES people(person_id)
);

-- Feedback rows are updated in place by edits and acknowledgment; never
-- deleted.
CREATE TABLE IF NOT EXISTS feedback (
    feedback_id      TEXT PRIMARY KEY,
    author_id        TEXT NOT NULL REFERENCES people(person_id),
    recipient_id     TEXT NOT NULL REFERENCES people(person_id),
    strengths        TEXT NOT NULL,
    areas_to_improve TEXT NOT NULL,
    sentiment        TEXT NOT NULL,   -- 'positive' | 'neutral' | 'negative'
    created_at       TEXT NOT NULL,   -- RFC 3339 UTC
    updated_at       TEXT NOT NULL,
    acknowledged     INTEGER NOT NULL DEFAULT 0,
    acknowledged_at  TEXT,
    CHECK (acknowledged IN (0, 1)),
    CHECK ((acknowledged = 1) = (acknowledged_at IS NOT NULL))
);

CREATE INDEX IF NOT EXISTS team_members_team_idx  ON team_members(team_id);
CREATE INDEX IF NOT EXISTS feedback_recipient_idx ON feedback(recipient_id);
CREATE INDEX IF NOT EXISTS feedback_author_idx    ON feedback(author_id);

PRAGMA user_version = 1;
";
