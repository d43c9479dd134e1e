/// State Machine Pattern for Registration
///
/// This module implements a type-safe state machine for the registration
/// flow. Invalid transitions are impossible to represent.
///
/// # States
///
/// - `Editing` - Collecting raw field values
/// - `Previewing` - Sanitized record rendered for confirmation
/// - `Submitted` - Record inserted into the store
///
/// Submit validates required fields (collecting every missing one),
/// sanitizes free-text input, encodes an attached profile picture, and runs
/// the duplicate check; all problems surface as one list and the flow stays
/// in `Editing`. From `Previewing`, `Go Back` returns to `Editing` with the
/// prior input intact; `Continue` performs the atomic conditional insert and
/// either completes or stays in `Previewing` with the error surfaced.
///
/// # Example
///
/// ```ignore
/// let registration = Registration::new(store);
/// registration.form_mut().email = "a@x.com".to_string();
/// // ... fill remaining fields ...
/// let previewing = match registration.submit().await {
///     SubmitOutcome::Previewing(p) => p,
///     SubmitOutcome::Rejected { errors, .. } => return render(errors),
///     SubmitOutcome::Failed { error, .. } => return notice(error),
/// };
/// match previewing.confirm().await {
///     ConfirmOutcome::Submitted(_) => {}
///     ConfirmOutcome::Rejected { error, .. } => alert(error),
/// }
/// ```
pub mod states;
pub mod transitions;
pub mod wrapper;

pub use states::*;
pub use transitions::{ConfirmOutcome, SubmitOutcome};
pub use wrapper::*;

use crate::store::UserStore;
use std::sync::Arc;

/// Registration session with type-safe state
///
/// The generic parameter `S` is the current state; only the operations valid
/// for that state exist on the type. The store handle travels with the
/// session across transitions.
pub struct Registration<S> {
    /// Current state (type parameter ensures type safety)
    pub state: S,

    pub(crate) store: Arc<dyn UserStore>,
}
