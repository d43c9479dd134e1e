//! Duplicate checker
//!
//! Read-only probe of the unique user fields. Each field that resolves to an
//! existing record contributes one violation; the result is empty when the
//! candidate is clear.
//!
//! The checker does not reserve or lock the values it probes, so a record can
//! appear between check and insert. Callers that need the race closed use
//! [`UserStore::add_user_checked`], which runs the same probes and the insert
//! in one transaction; this checker exists for the validation step, where
//! best-effort semantics are acceptable.

use crate::error::QuizzifyResult;
use crate::store::UserStore;
use std::fmt;

/// A uniqueness constraint that an insertion would violate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateViolation {
    Email,
    Phone,
    Nickname,
}

impl fmt::Display for DuplicateViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DuplicateViolation::Email => write!(f, "Email already in use."),
            DuplicateViolation::Phone => write!(f, "Phone number already in use."),
            DuplicateViolation::Nickname => write!(f, "Nickname already in use."),
        }
    }
}

/// Probe the store for records matching any of the candidate unique fields
///
/// Issues three independent point lookups: primary key for email, secondary
/// index for phone and nickname. Side-effect free.
pub async fn check_duplicates(
    store: &dyn UserStore,
    email: &str,
    phone: &str,
    nickname: &str,
) -> QuizzifyResult<Vec<DuplicateViolation>> {
    let mut violations = Vec::new();
    if store.get_user(email).await?.is_some() {
        violations.push(DuplicateViolation::Email);
    }
    if store.get_user_by_phone(phone).await?.is_some() {
        violations.push(DuplicateViolation::Phone);
    }
    if store.get_user_by_nickname(nickname).await?.is_some() {
        violations.push(DuplicateViolation::Nickname);
    }
    Ok(violations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::UserRecord;
    use crate::store::SqliteStore;

    fn existing_user() -> UserRecord {
        UserRecord {
            email: "a@x.com".to_string(),
            nickname: "A".to_string(),
            phone: "1".to_string(),
            fullname: "Ada".to_string(),
            dob: "1990-01-01".to_string(),
            password: "pw".to_string(),
            profile_picture: None,
        }
    }

    #[tokio::test]
    async fn test_clear_candidate_yields_empty_set() {
        let store = SqliteStore::open_in_memory().unwrap();
        let violations = check_duplicates(&store, "new@x.com", "9", "New")
            .await
            .unwrap();
        assert!(violations.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_email_only() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.add_user(&existing_user()).await.unwrap();

        // Same email, different nickname and phone
        let violations = check_duplicates(&store, "a@x.com", "2", "B").await.unwrap();
        assert_eq!(violations, vec![DuplicateViolation::Email]);
        assert_eq!(violations[0].to_string(), "Email already in use.");
    }

    #[tokio::test]
    async fn test_all_three_violations_reported() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.add_user(&existing_user()).await.unwrap();

        let violations = check_duplicates(&store, "a@x.com", "1", "A").await.unwrap();
        assert_eq!(
            violations,
            vec![
                DuplicateViolation::Email,
                DuplicateViolation::Phone,
                DuplicateViolation::Nickname,
            ]
        );
    }

    #[tokio::test]
    async fn test_check_has_no_side_effects() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.add_user(&existing_user()).await.unwrap();

        check_duplicates(&store, "a@x.com", "1", "A").await.unwrap();
        assert_eq!(store.get_all_users().await.unwrap().len(), 1);
    }
}
