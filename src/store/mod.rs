//! Record store
//!
//! A single parameterized store module behind trait contracts, replacing
//! per-flow copies of the persistence logic. The SQLite backend is the only
//! implementation; flows hold `Arc<SqliteStore>` (or a trait object) opened
//! once and reused for the life of the session.

pub mod schema;
pub mod sqlite;
pub mod traits;

pub use sqlite::SqliteStore;
pub use traits::{QuestionStore, ScoreStore, UserStore};
