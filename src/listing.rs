//! Listing/editing flow
//!
//! A [`UserDirectory`] owns the store handle and an in-memory mirror of the
//! full user collection. The mirror is refreshed by a full reload after
//! every mutating operation rather than patched locally. Filtering, sorting,
//! and pagination all run over the mirror.

use crate::error::{QuizzifyError, QuizzifyResult};
use crate::records::UserRecord;
use crate::store::schema;
use crate::store::UserStore;
use std::sync::Arc;
use tracing::debug;

/// Fixed number of records per page
pub const PAGE_SIZE: usize = 5;

/// Sort order for the directory view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Insertion order, the collection's natural order
    #[default]
    InsertionOrder,

    /// Lexicographic by full name
    Fullname,

    /// Chronological by date of birth; unparsable dates sort first
    Dob,
}

/// Fields editable from the directory view
///
/// Email is the primary key and is not editable; a record never changes its
/// key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableField {
    Fullname,
    Nickname,
    Phone,
    Dob,
}

/// One named-field overwrite from an input control
#[derive(Debug, Clone)]
pub struct FieldEdit {
    pub field: EditableField,
    pub value: String,
}

/// Session state for the paginated user-management view
pub struct UserDirectory {
    store: Arc<dyn UserStore>,
    users: Vec<UserRecord>,
    query: String,
    sort: SortKey,
    page: usize, // 1-based
}

impl UserDirectory {
    /// Open the directory, loading the full collection into the mirror
    pub async fn new(store: Arc<dyn UserStore>) -> QuizzifyResult<Self> {
        let mut directory = Self {
            store,
            users: Vec::new(),
            query: String::new(),
            sort: SortKey::default(),
            page: 1,
        };
        directory.reload().await?;
        Ok(directory)
    }

    /// Refresh the in-memory mirror from the store
    pub async fn reload(&mut self) -> QuizzifyResult<()> {
        self.users = self.store.get_all_users().await?;
        debug!(count = self.users.len(), "reloaded user directory");
        Ok(())
    }

    /// Set the search query (case-insensitive substring over fullname or
    /// email)
    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_lowercase();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
    }

    /// The filtered-and-sorted view over the mirror
    pub fn filtered(&self) -> Vec<&UserRecord> {
        let mut filtered: Vec<&UserRecord> = self
            .users
            .iter()
            .filter(|user| {
                user.fullname.to_lowercase().contains(&self.query)
                    || user.email.to_lowercase().contains(&self.query)
            })
            .collect();

        match self.sort {
            SortKey::InsertionOrder => {}
            SortKey::Fullname => filtered.sort_by(|a, b| a.fullname.cmp(&b.fullname)),
            SortKey::Dob => filtered.sort_by(|a, b| a.dob_date().cmp(&b.dob_date())),
        }
        filtered
    }

    /// The slice of the filtered view shown on the current page
    pub fn current_page(&self) -> Vec<&UserRecord> {
        let filtered = self.filtered();
        let start = (self.page - 1) * PAGE_SIZE;
        filtered
            .into_iter()
            .skip(start)
            .take(PAGE_SIZE)
            .collect()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// "Page N" label for the pagination control
    pub fn page_label(&self) -> String {
        format!("Page {}", self.page)
    }

    /// Advance a page if more filtered records remain; returns whether the
    /// page changed
    pub fn next_page(&mut self) -> bool {
        if self.page * PAGE_SIZE < self.filtered().len() {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Go back a page; returns whether the page changed
    pub fn prev_page(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Apply named-field overwrites to the record with the given key, then
    /// write the full record back and reload
    ///
    /// Values are trimmed before being applied. The write is a blind
    /// full-record `put`: concurrent edits on the same record are
    /// last-write-wins.
    pub async fn save_edits(&mut self, email: &str, edits: &[FieldEdit]) -> QuizzifyResult<()> {
        let mut updated = self
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| QuizzifyError::RecordNotFound {
                collection: schema::USERS,
                key: email.to_string(),
            })?;

        for edit in edits {
            let value = edit.value.trim().to_string();
            match edit.field {
                EditableField::Fullname => updated.fullname = value,
                EditableField::Nickname => updated.nickname = value,
                EditableField::Phone => updated.phone = value,
                EditableField::Dob => updated.dob = value,
            }
        }

        self.store.put_user(&updated).await?;
        debug!(email, edits = edits.len(), "saved user edits");
        self.reload().await
    }

    /// Delete the record with the given key and reload
    pub async fn delete(&mut self, email: &str) -> QuizzifyResult<()> {
        self.store.delete_user(email).await?;
        debug!(email, "deleted user");
        self.reload().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    async fn seeded_directory(count: usize) -> UserDirectory {
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        for i in 0..count {
            let user = UserRecord {
                email: format!("user{i}@x.com"),
                nickname: format!("nick{i}"),
                phone: format!("555-01{i:02}"),
                fullname: format!("User {:02}", count - i), // reverse name order
                dob: format!("19{:02}-06-15", 90 - i),
                password: "pw".to_string(),
                profile_picture: None,
            };
            store.add_user(&user).await.unwrap();
        }
        UserDirectory::new(store).await.unwrap()
    }

    #[tokio::test]
    async fn test_filter_is_subset_matching_predicate() {
        let mut directory = seeded_directory(7).await;
        directory.set_query("user3@");

        let filtered = directory.filtered();
        assert_eq!(filtered.len(), 1);
        assert!(filtered
            .iter()
            .all(|u| u.fullname.to_lowercase().contains("user3@")
                || u.email.to_lowercase().contains("user3@")));
    }

    #[tokio::test]
    async fn test_filter_is_case_insensitive_on_fullname() {
        let mut directory = seeded_directory(3).await;
        directory.set_query("USER 01");
        assert_eq!(directory.filtered().len(), 1);
    }

    #[tokio::test]
    async fn test_sort_by_fullname_is_ordered() {
        let mut directory = seeded_directory(7).await;
        directory.set_sort(SortKey::Fullname);

        let names: Vec<&str> = directory
            .filtered()
            .iter()
            .map(|u| u.fullname.as_str())
            .collect();
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_sort_by_dob_is_chronological() {
        let mut directory = seeded_directory(5).await;
        directory.set_sort(SortKey::Dob);

        let dates: Vec<_> = directory
            .filtered()
            .iter()
            .map(|u| u.dob_date())
            .collect();
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[tokio::test]
    async fn test_default_order_is_insertion_order() {
        let directory = seeded_directory(4).await;
        let emails: Vec<&str> = directory
            .filtered()
            .iter()
            .map(|u| u.email.as_str())
            .collect();
        assert_eq!(
            emails,
            ["user0@x.com", "user1@x.com", "user2@x.com", "user3@x.com"]
        );
    }

    #[tokio::test]
    async fn test_pagination_clamps() {
        let mut directory = seeded_directory(7).await;

        assert_eq!(directory.current_page().len(), PAGE_SIZE);
        assert_eq!(directory.page_label(), "Page 1");
        assert!(!directory.prev_page());

        assert!(directory.next_page());
        assert_eq!(directory.current_page().len(), 2);

        // Only 7 records: no third page
        assert!(!directory.next_page());
        assert_eq!(directory.page(), 2);

        assert!(directory.prev_page());
        assert_eq!(directory.page(), 1);
    }

    #[tokio::test]
    async fn test_save_edits_puts_full_record_and_reloads() {
        let mut directory = seeded_directory(3).await;

        directory
            .save_edits(
                "user1@x.com",
                &[
                    FieldEdit {
                        field: EditableField::Fullname,
                        value: "  Edited Name  ".to_string(),
                    },
                    FieldEdit {
                        field: EditableField::Phone,
                        value: "555-9999".to_string(),
                    },
                ],
            )
            .await
            .unwrap();

        let filtered = directory.filtered();
        let edited = filtered
            .iter()
            .find(|u| u.email == "user1@x.com")
            .unwrap();
        assert_eq!(edited.fullname, "Edited Name");
        assert_eq!(edited.phone, "555-9999");
        // Key unchanged, other fields untouched
        assert_eq!(edited.nickname, "nick1");
    }

    #[tokio::test]
    async fn test_save_edits_unknown_key() {
        let mut directory = seeded_directory(1).await;
        let err = directory
            .save_edits(
                "ghost@x.com",
                &[FieldEdit {
                    field: EditableField::Fullname,
                    value: "Ghost".to_string(),
                }],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, QuizzifyError::RecordNotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_reloads_without_key() {
        let mut directory = seeded_directory(3).await;
        directory.delete("user0@x.com").await.unwrap();

        assert!(directory
            .filtered()
            .iter()
            .all(|u| u.email != "user0@x.com"));
        assert_eq!(directory.filtered().len(), 2);
    }
}
