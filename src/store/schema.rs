//! Schema declaration and versioned in-place upgrade
//!
//! The schema is declared once, here, for every flow that opens the store.
//! Versioning uses SQLite's `user_version` pragma: version 1 creates the
//! quiz collections and seeds the question set, version 2 adds the users
//! collection with its unique secondary indexes. Opening a database whose
//! version is newer than [`SCHEMA_VERSION`] fails instead of guessing.

use crate::error::{QuizzifyError, QuizzifyResult};
use crate::quiz;
use rusqlite::{params, Connection};
use tracing::debug;

/// Current schema version
pub const SCHEMA_VERSION: i64 = 2;

/// Collection names
pub const USERS: &str = "users";
pub const SCORES: &str = "scores";
pub const QUESTIONS: &str = "questions";

/// Create or upgrade the schema in place, inside one transaction
pub fn migrate(conn: &mut Connection) -> QuizzifyResult<()> {
    let found: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    if found > SCHEMA_VERSION {
        return Err(QuizzifyError::SchemaTooNew {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    if found == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;

    if found < 1 {
        debug!("creating quiz collections (schema v1)");
        tx.execute_batch(
            "CREATE TABLE questions (
                 id         INTEGER PRIMARY KEY AUTOINCREMENT,
                 question   TEXT NOT NULL,
                 options    TEXT NOT NULL,
                 answer     INTEGER NOT NULL,
                 difficulty TEXT NOT NULL
             );
             CREATE INDEX idx_questions_difficulty ON questions (difficulty);

             CREATE TABLE scores (
                 id    INTEGER PRIMARY KEY AUTOINCREMENT,
                 value INTEGER NOT NULL,
                 date  TEXT NOT NULL
             );
             CREATE INDEX idx_scores_value ON scores (value);",
        )?;
        seed_questions(&tx)?;
    }

    if found < 2 {
        debug!("creating users collection (schema v2)");
        tx.execute_batch(
            "CREATE TABLE users (
                 email           TEXT PRIMARY KEY,
                 nickname        TEXT NOT NULL,
                 phone           TEXT NOT NULL,
                 fullname        TEXT NOT NULL,
                 dob             TEXT NOT NULL,
                 password        TEXT NOT NULL,
                 profile_picture TEXT
             );
             CREATE UNIQUE INDEX idx_users_nickname ON users (nickname);
             CREATE UNIQUE INDEX idx_users_phone ON users (phone);",
        )?;
    }

    tx.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    tx.commit()?;
    Ok(())
}

/// Insert the sample question set, once, at first creation
fn seed_questions(tx: &rusqlite::Transaction<'_>) -> QuizzifyResult<()> {
    let mut stmt = tx.prepare(
        "INSERT INTO questions (question, options, answer, difficulty) VALUES (?1, ?2, ?3, ?4)",
    )?;
    for q in quiz::sample_questions() {
        let options = serde_json::to_string(&q.options)?;
        stmt.execute(params![
            q.question,
            options,
            q.answer as i64,
            q.difficulty.as_str()
        ])?;
    }
    Ok(())
}
