//! SQLite-backed record store
//!
//! One connection per store handle, shared behind a mutex; every trait
//! operation locks, runs as its own transaction, and releases. The handle is
//! cheap to clone and is meant to be opened once per flow and reused.

use super::schema;
use crate::duplicates::DuplicateViolation;
use crate::error::{QuizzifyError, QuizzifyResult};
use crate::records::{Difficulty, QuestionRecord, ScoreRecord, UserRecord};
use crate::store::traits::{QuestionStore, ScoreStore, UserStore};
use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

/// SQLite-backed implementation of all three collection stores
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and migrate its schema
    pub fn open(path: impl AsRef<Path>) -> QuizzifyResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .map_err(|e| QuizzifyError::ConnectionFailed(e.to_string()))?;
        let store = Self::from_connection(conn)?;
        info!(path = %path.display(), "opened quizzify database");
        Ok(store)
    }

    /// Open an in-memory database, mainly for tests
    pub fn open_in_memory() -> QuizzifyResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| QuizzifyError::ConnectionFailed(e.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> QuizzifyResult<Self> {
        schema::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

// ============================================================================
// Row mapping
// ============================================================================

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        email: row.get(0)?,
        nickname: row.get(1)?,
        phone: row.get(2)?,
        fullname: row.get(3)?,
        dob: row.get(4)?,
        password: row.get(5)?,
        profile_picture: row.get(6)?,
    })
}

fn question_from_row(row: &Row<'_>) -> rusqlite::Result<QuestionRecord> {
    let options_json: String = row.get(2)?;
    let options: Vec<String> = serde_json::from_str(&options_json).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let difficulty_str: String = row.get(4)?;
    let difficulty = Difficulty::from_str(&difficulty_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            format!("unknown difficulty: {difficulty_str}").into(),
        )
    })?;
    Ok(QuestionRecord {
        id: Some(row.get(0)?),
        question: row.get(1)?,
        options,
        answer: row.get::<_, i64>(3)? as usize,
        difficulty,
    })
}

fn score_from_row(row: &Row<'_>) -> rusqlite::Result<ScoreRecord> {
    Ok(ScoreRecord {
        id: Some(row.get(0)?),
        value: row.get(1)?,
        date: row.get(2)?,
    })
}

const USER_COLUMNS: &str = "email, nickname, phone, fullname, dob, password, profile_picture";

fn insert_user(conn: &Connection, user: &UserRecord) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO users (email, nickname, phone, fullname, dob, password, profile_picture)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user.email,
            user.nickname,
            user.phone,
            user.fullname,
            user.dob,
            user.password,
            user.profile_picture,
        ],
    )
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn exists(tx: &Transaction<'_>, sql: &str, value: &str) -> QuizzifyResult<bool> {
    let count: i64 = tx.query_row(sql, [value], |row| row.get(0))?;
    Ok(count > 0)
}

/// Whether a record other than the one keyed by `email` holds `value` in
/// `column` (callers pass a fixed column name, never user input)
fn exists_for_other(
    tx: &Transaction<'_>,
    column: &str,
    value: &str,
    email: &str,
) -> QuizzifyResult<bool> {
    let count: i64 = tx.query_row(
        &format!("SELECT COUNT(*) FROM users WHERE {column} = ?1 AND email != ?2"),
        params![value, email],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

// ============================================================================
// UserStore
// ============================================================================

#[async_trait]
impl UserStore for SqliteStore {
    async fn add_user(&self, user: &UserRecord) -> QuizzifyResult<()> {
        let conn = self.conn.lock()?;
        insert_user(&conn, user).map_err(|e| {
            if is_constraint_violation(&e) {
                QuizzifyError::DuplicateKey {
                    collection: schema::USERS,
                    key: user.email.clone(),
                }
            } else {
                e.into()
            }
        })?;
        Ok(())
    }

    async fn add_user_checked(&self, user: &UserRecord) -> QuizzifyResult<()> {
        let mut conn = self.conn.lock()?;
        let tx = conn.transaction()?;

        let mut violations = Vec::new();
        if exists(&tx, "SELECT COUNT(*) FROM users WHERE email = ?1", &user.email)? {
            violations.push(DuplicateViolation::Email);
        }
        if exists(&tx, "SELECT COUNT(*) FROM users WHERE phone = ?1", &user.phone)? {
            violations.push(DuplicateViolation::Phone);
        }
        if exists(
            &tx,
            "SELECT COUNT(*) FROM users WHERE nickname = ?1",
            &user.nickname,
        )? {
            violations.push(DuplicateViolation::Nickname);
        }
        if !violations.is_empty() {
            return Err(QuizzifyError::DuplicateFields(violations));
        }

        insert_user(&tx, user)?;
        tx.commit()?;
        debug!(email = %user.email, "registered user");
        Ok(())
    }

    async fn get_user(&self, email: &str) -> QuizzifyResult<Option<UserRecord>> {
        let conn = self.conn.lock()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                [email],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    async fn get_user_by_nickname(&self, nickname: &str) -> QuizzifyResult<Option<UserRecord>> {
        let conn = self.conn.lock()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE nickname = ?1"),
                [nickname],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    async fn get_user_by_phone(&self, phone: &str) -> QuizzifyResult<Option<UserRecord>> {
        let conn = self.conn.lock()?;
        let user = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE phone = ?1"),
                [phone],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    async fn get_all_users(&self) -> QuizzifyResult<Vec<UserRecord>> {
        let conn = self.conn.lock()?;
        let mut stmt =
            conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY rowid"))?;
        let users = stmt
            .query_map([], user_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    async fn put_user(&self, user: &UserRecord) -> QuizzifyResult<()> {
        let mut conn = self.conn.lock()?;
        let tx = conn.transaction()?;

        // The upsert is keyed on email, so the only possible clashes are a
        // nickname or phone held by some other record. Probe them first so
        // the error names the field actually in conflict.
        let mut violations = Vec::new();
        if exists_for_other(&tx, "phone", &user.phone, &user.email)? {
            violations.push(DuplicateViolation::Phone);
        }
        if exists_for_other(&tx, "nickname", &user.nickname, &user.email)? {
            violations.push(DuplicateViolation::Nickname);
        }
        if !violations.is_empty() {
            return Err(QuizzifyError::DuplicateFields(violations));
        }

        tx.execute(
            "INSERT INTO users (email, nickname, phone, fullname, dob, password, profile_picture)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT (email) DO UPDATE SET
                 nickname = excluded.nickname,
                 phone = excluded.phone,
                 fullname = excluded.fullname,
                 dob = excluded.dob,
                 password = excluded.password,
                 profile_picture = excluded.profile_picture",
            params![
                user.email,
                user.nickname,
                user.phone,
                user.fullname,
                user.dob,
                user.password,
                user.profile_picture,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    async fn delete_user(&self, email: &str) -> QuizzifyResult<()> {
        let conn = self.conn.lock()?;
        // No-op (not an error) when the key is absent
        conn.execute("DELETE FROM users WHERE email = ?1", [email])?;
        Ok(())
    }
}

// ============================================================================
// QuestionStore
// ============================================================================

#[async_trait]
impl QuestionStore for SqliteStore {
    async fn add_question(&self, question: &QuestionRecord) -> QuizzifyResult<i64> {
        let conn = self.conn.lock()?;
        let options = serde_json::to_string(&question.options)?;
        conn.execute(
            "INSERT INTO questions (question, options, answer, difficulty)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                question.question,
                options,
                question.answer as i64,
                question.difficulty.as_str(),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    async fn get_all_questions(&self) -> QuizzifyResult<Vec<QuestionRecord>> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, question, options, answer, difficulty FROM questions ORDER BY id",
        )?;
        let questions = stmt
            .query_map([], question_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(questions)
    }

    async fn get_questions_by_difficulty(
        &self,
        difficulty: Difficulty,
    ) -> QuizzifyResult<Vec<QuestionRecord>> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, question, options, answer, difficulty FROM questions
             WHERE difficulty = ?1 ORDER BY id",
        )?;
        let questions = stmt
            .query_map([difficulty.as_str()], question_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(questions)
    }
}

// ============================================================================
// ScoreStore
// ============================================================================

#[async_trait]
impl ScoreStore for SqliteStore {
    async fn save_score(&self, value: i64) -> QuizzifyResult<ScoreRecord> {
        let conn = self.conn.lock()?;
        let date = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO scores (value, date) VALUES (?1, ?2)",
            params![value, date],
        )?;
        Ok(ScoreRecord {
            id: Some(conn.last_insert_rowid()),
            value,
            date,
        })
    }

    async fn get_all_scores(&self) -> QuizzifyResult<Vec<ScoreRecord>> {
        let conn = self.conn.lock()?;
        let mut stmt = conn.prepare("SELECT id, value, date FROM scores ORDER BY id")?;
        let scores = stmt
            .query_map([], score_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(scores)
    }
}
