//! Store trait definitions
//!
//! These traits define the abstract interfaces for collection access.
//! Every operation runs as its own transaction against the named collection
//! and is exposed as a deferred result; callers suspend only at these
//! boundaries. There is no multi-collection transaction.

use crate::error::QuizzifyResult;
use crate::records::{Difficulty, QuestionRecord, ScoreRecord, UserRecord};
use async_trait::async_trait;

/// Store for the `users` collection
///
/// Primary key is `email`; `nickname` and `phone` are unique secondary
/// indexes.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user; fails if the primary key (or a unique index)
    /// already has a record
    async fn add_user(&self, user: &UserRecord) -> QuizzifyResult<()>;

    /// Atomic conditional insert: probe all three unique fields and insert
    /// only when none match, inside a single transaction
    ///
    /// Fails with `DuplicateFields` listing every violated constraint. This
    /// closes the check-then-insert race the standalone duplicate checker
    /// cannot.
    async fn add_user_checked(&self, user: &UserRecord) -> QuizzifyResult<()>;

    /// Point lookup by primary key
    async fn get_user(&self, email: &str) -> QuizzifyResult<Option<UserRecord>>;

    /// Point lookup by the `nickname` unique index
    async fn get_user_by_nickname(&self, nickname: &str) -> QuizzifyResult<Option<UserRecord>>;

    /// Point lookup by the `phone` unique index
    async fn get_user_by_phone(&self, phone: &str) -> QuizzifyResult<Option<UserRecord>>;

    /// Full collection scan, in insertion order
    async fn get_all_users(&self) -> QuizzifyResult<Vec<UserRecord>>;

    /// Full-record upsert by primary key
    ///
    /// Unconditionally overwrites whatever currently exists at the key, so
    /// concurrent edits on the same record are last-write-wins. Callers must
    /// supply the complete record: read, patch in memory, write back.
    async fn put_user(&self, user: &UserRecord) -> QuizzifyResult<()>;

    /// Remove the record with the given primary key; no-op if absent
    async fn delete_user(&self, email: &str) -> QuizzifyResult<()>;

    /// Check if a user exists by primary key
    async fn has_user(&self, email: &str) -> QuizzifyResult<bool> {
        Ok(self.get_user(email).await?.is_some())
    }
}

/// Store for the `questions` collection
///
/// Seeded once at schema creation; read-only thereafter in normal use.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Insert a question, returning its assigned id
    async fn add_question(&self, question: &QuestionRecord) -> QuizzifyResult<i64>;

    /// Full collection scan, in insertion order
    async fn get_all_questions(&self) -> QuizzifyResult<Vec<QuestionRecord>>;

    /// Filtered read via the `difficulty` index
    async fn get_questions_by_difficulty(
        &self,
        difficulty: Difficulty,
    ) -> QuizzifyResult<Vec<QuestionRecord>>;
}

/// Store for the append-only `scores` collection
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Append a score stamped with the current time, returning the stored
    /// record
    async fn save_score(&self, value: i64) -> QuizzifyResult<ScoreRecord>;

    /// Full collection scan, in insertion order
    async fn get_all_scores(&self) -> QuizzifyResult<Vec<ScoreRecord>>;

    /// Count of recorded scores
    async fn count_scores(&self) -> QuizzifyResult<usize> {
        Ok(self.get_all_scores().await?.len())
    }
}
