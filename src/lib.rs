//! Quizzify core
//!
//! Persistent core of a local-first quiz and user-registration application:
//! a versioned embedded record store (SQLite), a duplicate checker over the
//! unique user fields, a typestate registration flow, and a paginated
//! listing/editing flow. There is no network surface; everything lives in
//! one local database file opened once per session and shared by the flows.

pub mod duplicates;
pub mod error;
pub mod listing;
pub mod media;
pub mod quiz;
pub mod records;
pub mod registration;
pub mod sanitize;
pub mod store;

pub use error::{QuizzifyError, QuizzifyResult, ValidationErrors};
pub use records::{Difficulty, QuestionRecord, ScoreRecord, UserRecord};
pub use store::SqliteStore;
