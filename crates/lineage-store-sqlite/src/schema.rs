//! SQL schema for the Lineage SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
///
/// `foreign_keys` must be on for every connection: delete protection for
/// members and relationship types relies on it.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS members (
    member_id     TEXT PRIMARY KEY,
    first_name    TEXT NOT NULL,
    middle_name   TEXT,
    last_name     TEXT NOT NULL,
    date_of_birth TEXT,               -- YYYY-MM-DD or NULL
    date_of_death TEXT,               -- YYYY-MM-DD or NULL
    is_alive      INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS relationship_types (
    relationship_type_id TEXT PRIMARY KEY,
    name                 TEXT NOT NULL UNIQUE,
    inverse_type_id      TEXT REFERENCES relationship_types(relationship_type_id)
);

-- Inverse rows are kept in step by the relationship writer, not by a
-- constraint. (member_id_1, relationship_type_id, member_id_2) is not UNIQUE.
CREATE TABLE IF NOT EXISTS relationships (
    relationship_id      TEXT PRIMARY KEY,
    member_id_1          TEXT NOT NULL REFERENCES members(member_id),
    relationship_type_id TEXT NOT NULL REFERENCES relationship_types(relationship_type_id),
    member_id_2          TEXT NOT NULL REFERENCES members(member_id)
);

CREATE INDEX IF NOT EXISTS relationships_edge_idx
    ON relationships(member_id_1, relationship_type_id, member_id_2);
CREATE INDEX IF NOT EXISTS relationships_member_2_idx
    ON relationships(member_id_2);
CREATE INDEX IF NOT EXISTS relationships_type_idx
    ON relationships(relationship_type_id);
CREATE INDEX IF NOT EXISTS relationship_types_inverse_idx
    ON relationship_types(inverse_type_id);

PRAGMA user_version = 1;
";
