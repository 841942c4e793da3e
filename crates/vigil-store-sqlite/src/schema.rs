//! SQL schema for the Vigil SQLite store.
//!
//! Each record lives in a `doc` JSON column; the other columns are
//! denormalised copies of the fields the filtered listings and unique
//! indexes need, rewritten on every save.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS identities (
    identity_id TEXT PRIMARY KEY,
    email       TEXT NOT NULL UNIQUE,  -- exact-match, case-sensitive
    role        TEXT NOT NULL,         -- 'admin' | 'officer' | 'user'
    active      INTEGER NOT NULL,
    created_at  TEXT NOT NULL,         -- ISO 8601 UTC
    updated_at  TEXT NOT NULL,
    doc         TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS cases (
    case_id     TEXT PRIMARY KEY,
    case_number TEXT NOT NULL UNIQUE,  -- immutable after creation
    status      TEXT NOT NULL,         -- 'new' | 'in-progress' | 'resolved' | 'closed'
    priority    TEXT NOT NULL,         -- 'high' | 'medium' | 'low'
    district    TEXT,
    location    TEXT,
    assigned_to TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL,
    doc         TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS reports (
    report_id     TEXT PRIMARY KEY,
    report_number TEXT NOT NULL UNIQUE,
    status        TEXT NOT NULL,       -- 'new' | 'approved' | 'rejected' | 'converted-to-case'
    reported_by   TEXT,                -- NULL for anonymous reports
    district      TEXT,
    created_at    TEXT NOT NULL,
    updated_at    TEXT NOT NULL,
    doc           TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS incidents (
    incident_id     TEXT PRIMARY KEY,
    incident_number TEXT NOT NULL UNIQUE,
    status          TEXT NOT NULL,     -- 'active' | 'contained' | 'resolved'
    severity        TEXT NOT NULL,     -- 'critical' | 'major' | 'minor'
    district        TEXT,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL,
    doc             TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS cases_status_idx      ON cases(status);
CREATE INDEX IF NOT EXISTS cases_assigned_idx    ON cases(assigned_to);
CREATE INDEX IF NOT EXISTS cases_created_idx     ON cases(created_at);
CREATE INDEX IF NOT EXISTS reports_status_idx    ON reports(status);
CREATE INDEX IF NOT EXISTS reports_reporter_idx  ON reports(reported_by);
CREATE INDEX IF NOT EXISTS incidents_status_idx  ON incidents(status);

PRAGMA user_version = 1;
";
