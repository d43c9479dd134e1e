//! Record types persisted by the store
//!
//! Three independent collections: users (keyed by email), scores
//! (append-only), and questions (seeded once at schema creation).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A registered user
///
/// `email` is the primary key and never changes. `nickname` and `phone` are
/// globally unique across the collection. Updates are full-record
/// replacements; there is no partial-update path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    pub nickname: String,
    pub phone: String,
    pub fullname: String,

    /// Date of birth, stored as the string the user entered (ISO `YYYY-MM-DD`)
    pub dob: String,

    pub password: String,

    /// Inline-encoded profile picture as a `data:` URL, if one was uploaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

impl UserRecord {
    /// Parse the stored date of birth, if it is a valid ISO date
    pub fn dob_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.dob, "%Y-%m-%d").ok()
    }
}

/// A quiz result. Append-only; no update or delete path exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Assigned by the store on insert
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub value: i64,

    /// RFC 3339 timestamp of when the score was recorded
    pub date: String,
}

/// Question difficulty, indexed for filtered reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

/// A quiz question with four options and the index of the correct one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Assigned by the store on insert
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    pub question: String,

    /// Ordered sequence of 4 answer options
    pub options: Vec<String>,

    /// Index into `options`
    pub answer: usize,

    pub difficulty: Difficulty,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> UserRecord {
        UserRecord {
            email: "a@x.com".to_string(),
            nickname: "A".to_string(),
            phone: "1".to_string(),
            fullname: "Ada Lovelace".to_string(),
            dob: "1990-04-02".to_string(),
            password: "secret".to_string(),
            profile_picture: None,
        }
    }

    #[test]
    fn test_dob_parses_iso_date() {
        let user = sample_user();
        let date = user.dob_date().unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1990, 4, 2).unwrap());
    }

    #[test]
    fn test_dob_invalid_is_none() {
        let mut user = sample_user();
        user.dob = "not-a-date".to_string();
        assert!(user.dob_date().is_none());
    }

    #[test]
    fn test_difficulty_round_trip() {
        for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("impossible"), None);
    }

    #[test]
    fn test_user_serializes_without_picture_field_when_absent() {
        let user = sample_user();
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("profile_picture"));
    }
}
