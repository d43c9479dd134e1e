/// State type definitions for the registration state machine
///
/// Each state is a distinct type, making invalid states impossible to
/// represent. State-specific data is stored in each state type.
use crate::records::UserRecord;
use chrono::{DateTime, Utc};

/// Raw form input, exactly as the user typed it
///
/// Nothing here is trimmed or sanitized; that happens on submit. The raw
/// form survives into `Previewing` so that Go Back discards no data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub fullname: String,
    pub email: String,
    pub phone: String,
    pub dob: String,
    pub nickname: String,
    pub password: String,

    /// Raw bytes of an uploaded profile picture, if any
    pub profile_picture: Option<Vec<u8>>,
}

/// Editing state - Collecting raw field values
#[derive(Debug, Clone, Default)]
pub struct Editing {
    pub form: RegistrationForm,
}

/// Previewing state - Sanitized record awaiting confirmation
#[derive(Debug, Clone)]
pub struct Previewing {
    /// The record that `Continue` will insert
    pub record: UserRecord,

    /// Prior raw input, restored verbatim by Go Back
    pub(crate) form: RegistrationForm,
}

/// Submitted state - Record inserted into the store
#[derive(Debug, Clone)]
pub struct Submitted {
    /// Primary key of the inserted record
    pub email: String,

    /// When the insert completed
    pub completed_at: DateTime<Utc>,
}

impl Submitted {
    pub fn new(email: String) -> Self {
        Self {
            email,
            completed_at: Utc::now(),
        }
    }
}
