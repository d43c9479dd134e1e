/// Type-erased wrapper for Registration<S>
///
/// This enum allows storing a registration session in any state behind a
/// single type, for callers that drive the flow from runtime events rather
/// than typed code paths.
use super::states::*;
use super::transitions::{ConfirmOutcome, SubmitOutcome};
use super::Registration;
use crate::store::UserStore;
use std::sync::Arc;

/// Wrapper enum that can hold a registration session in any state
pub enum RegistrationFlow {
    Editing(Registration<Editing>),
    Previewing(Registration<Previewing>),
    Submitted(Registration<Submitted>),
}

impl RegistrationFlow {
    /// Start a new flow in the Editing state
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self::Editing(Registration::new(store))
    }

    /// Get the current state as a string
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Editing(_) => "Editing",
            Self::Previewing(_) => "Previewing",
            Self::Submitted(_) => "Submitted",
        }
    }

    /// Mutable access to the form while editing
    pub fn form_mut(&mut self) -> Option<&mut RegistrationForm> {
        match self {
            Self::Editing(session) => Some(session.form_mut()),
            _ => None,
        }
    }

    /// The record awaiting confirmation, if previewing
    pub fn previewed_record(&self) -> Option<&crate::records::UserRecord> {
        match self {
            Self::Previewing(session) => Some(session.record()),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Submitted(_))
    }

    /// Submit the form (only from Editing)
    ///
    /// Returns the next flow state and the list of messages to surface; an
    /// empty list means the flow advanced to Previewing.
    pub async fn submit(self) -> (Self, Vec<String>) {
        match self {
            Self::Editing(session) => match session.submit().await {
                SubmitOutcome::Previewing(next) => (Self::Previewing(next), Vec::new()),
                SubmitOutcome::Rejected { editing, errors } => {
                    (Self::Editing(editing), errors.into_messages())
                }
                SubmitOutcome::Failed { editing, error } => {
                    (Self::Editing(editing), vec![error.to_string()])
                }
            },
            other => {
                let message = format!("Cannot submit from {} state", other.state_name());
                (other, vec![message])
            }
        }
    }

    /// Return to editing (only from Previewing)
    ///
    /// Returns the next flow state and an optional message; `None` means the
    /// flow returned to Editing. An invalid transition hands the flow back
    /// unchanged, like `submit` and `confirm`.
    pub fn go_back(self) -> (Self, Option<String>) {
        match self {
            Self::Previewing(session) => (Self::Editing(session.go_back()), None),
            other => {
                let message = format!("Cannot go back from {} state", other.state_name());
                (other, Some(message))
            }
        }
    }

    /// Confirm the previewed record (only from Previewing)
    ///
    /// Returns the next flow state and the list of messages to surface; an
    /// empty list means the record was inserted.
    pub async fn confirm(self) -> (Self, Vec<String>) {
        match self {
            Self::Previewing(session) => match session.confirm().await {
                ConfirmOutcome::Submitted(next) => (Self::Submitted(next), Vec::new()),
                ConfirmOutcome::Rejected { previewing, error } => {
                    (Self::Previewing(previewing), vec![error.to_string()])
                }
            },
            other => {
                let message = format!("Cannot confirm from {} state", other.state_name());
                (other, vec![message])
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    fn new_flow() -> RegistrationFlow {
        RegistrationFlow::new(Arc::new(SqliteStore::open_in_memory().unwrap()))
    }

    fn fill(flow: &mut RegistrationFlow) {
        let form = flow.form_mut().unwrap();
        form.fullname = "Ada Lovelace".to_string();
        form.email = "ada@x.com".to_string();
        form.phone = "555-0100".to_string();
        form.dob = "1990-04-02".to_string();
        form.nickname = "ada".to_string();
        form.password = "secret".to_string();
    }

    #[tokio::test]
    async fn test_full_flow_through_wrapper() {
        let mut flow = new_flow();
        assert_eq!(flow.state_name(), "Editing");
        fill(&mut flow);

        let (flow, messages) = flow.submit().await;
        assert!(messages.is_empty());
        assert_eq!(flow.state_name(), "Previewing");
        assert!(flow.previewed_record().is_some());

        let (flow, messages) = flow.confirm().await;
        assert!(messages.is_empty());
        assert!(flow.is_complete());
    }

    #[tokio::test]
    async fn test_go_back_and_resubmit() {
        let mut flow = new_flow();
        fill(&mut flow);

        let (flow, _) = flow.submit().await;
        let (mut flow, message) = flow.go_back();
        assert!(message.is_none());
        assert_eq!(flow.state_name(), "Editing");
        assert_eq!(flow.form_mut().unwrap().email, "ada@x.com");

        let (flow, messages) = flow.submit().await;
        assert!(messages.is_empty());
        assert_eq!(flow.state_name(), "Previewing");
    }

    #[tokio::test]
    async fn test_invalid_transitions_report_state() {
        let (flow, message) = new_flow().go_back();
        assert_eq!(message.unwrap(), "Cannot go back from Editing state");
        assert_eq!(flow.state_name(), "Editing");

        let (flow, messages) = new_flow().confirm().await;
        assert_eq!(messages, ["Cannot confirm from Editing state"]);
        assert_eq!(flow.state_name(), "Editing");
    }

    #[tokio::test]
    async fn test_rejected_go_back_keeps_form_input() {
        let mut flow = new_flow();
        fill(&mut flow);

        let (mut flow, message) = flow.go_back();
        assert!(message.is_some());
        assert_eq!(flow.form_mut().unwrap().email, "ada@x.com");
    }

    #[tokio::test]
    async fn test_rejected_submit_stays_editing() {
        let flow = new_flow();
        let (flow, messages) = flow.submit().await;
        assert_eq!(flow.state_name(), "Editing");
        assert_eq!(messages.len(), 6);
    }
}
