/// State transition implementations
///
/// Each transition consumes the current state and returns the next one. A
/// rejected submit hands the `Editing` session back with the complete list
/// of problems; a rejected confirm hands the `Previewing` session back with
/// the insert error. No transition loses the user's input.
use super::states::*;
use super::Registration;
use crate::duplicates::check_duplicates;
use crate::error::{QuizzifyError, ValidationErrors};
use crate::media::encode_profile_picture;
use crate::records::UserRecord;
use crate::sanitize::sanitize;
use crate::store::UserStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of submitting the editing form
pub enum SubmitOutcome {
    /// All checks passed; the sanitized record awaits confirmation
    Previewing(Registration<Previewing>),

    /// Validation or duplicate problems; the form is unchanged
    Rejected {
        editing: Registration<Editing>,
        errors: ValidationErrors,
    },

    /// The store itself failed during the duplicate check
    Failed {
        editing: Registration<Editing>,
        error: QuizzifyError,
    },
}

/// Outcome of confirming the previewed record
pub enum ConfirmOutcome {
    /// The record was inserted
    Submitted(Registration<Submitted>),

    /// The insert failed (for example, a race occupied one of the unique
    /// fields between check and insert); the preview is unchanged
    Rejected {
        previewing: Registration<Previewing>,
        error: QuizzifyError,
    },
}

/// Capitalize the first letter of a field name for its error message
fn field_label(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Trim and sanitize a required field, or record why it is missing
fn required_field(field: &str, raw: &str, errors: &mut ValidationErrors) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.push(format!("{} is required.", field_label(field)));
        None
    } else {
        Some(sanitize(trimmed))
    }
}

// ============================================================================
// Editing State Transitions
// ============================================================================

impl Registration<Editing> {
    /// Start a new registration session against the given store
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self {
            state: Editing::default(),
            store,
        }
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.state.form
    }

    pub fn form_mut(&mut self) -> &mut RegistrationForm {
        &mut self.state.form
    }

    /// Validate, sanitize, and duplicate-check the form
    ///
    /// Every missing required field is reported, not just the first.
    /// Duplicate checks run only once all required fields are present, and
    /// their violations append to the same error list.
    pub async fn submit(self) -> SubmitOutcome {
        let mut errors = ValidationErrors::new();
        let form = &self.state.form;

        let fullname = required_field("fullname", &form.fullname, &mut errors);
        let email = required_field("email", &form.email, &mut errors);
        let phone = required_field("phone", &form.phone, &mut errors);
        let dob = required_field("dob", &form.dob, &mut errors);
        let nickname = required_field("nickname", &form.nickname, &mut errors);
        let password = required_field("password", &form.password, &mut errors);

        let mut profile_picture = None;
        if let Some(bytes) = &form.profile_picture {
            if !bytes.is_empty() {
                match encode_profile_picture(bytes) {
                    Ok(url) => profile_picture = Some(url),
                    Err(QuizzifyError::Validation(picture_errors)) => {
                        errors.extend(picture_errors.into_messages());
                    }
                    Err(error) => {
                        return SubmitOutcome::Failed {
                            editing: self,
                            error,
                        }
                    }
                }
            }
        }

        match (fullname, email, phone, dob, nickname, password) {
            (Some(fullname), Some(email), Some(phone), Some(dob), Some(nickname), Some(password))
                if errors.is_empty() =>
            {
                let violations =
                    match check_duplicates(self.store.as_ref(), &email, &phone, &nickname).await {
                        Ok(violations) => violations,
                        Err(error) => {
                            return SubmitOutcome::Failed {
                                editing: self,
                                error,
                            }
                        }
                    };

                if !violations.is_empty() {
                    errors.extend(violations.iter().map(|v| v.to_string()));
                    return SubmitOutcome::Rejected {
                        editing: self,
                        errors,
                    };
                }

                let record = UserRecord {
                    email,
                    nickname,
                    phone,
                    fullname,
                    dob,
                    password,
                    profile_picture,
                };
                info!(email = %record.email, "registration validated, awaiting confirmation");
                SubmitOutcome::Previewing(Registration {
                    state: Previewing {
                        record,
                        form: self.state.form,
                    },
                    store: self.store,
                })
            }
            _ => SubmitOutcome::Rejected {
                editing: self,
                errors,
            },
        }
    }
}

// ============================================================================
// Previewing State Transitions
// ============================================================================

impl Registration<Previewing> {
    /// The sanitized record that `confirm` will insert
    pub fn record(&self) -> &UserRecord {
        &self.state.record
    }

    /// Return to editing; the prior raw input is intact
    pub fn go_back(self) -> Registration<Editing> {
        Registration {
            state: Editing {
                form: self.state.form,
            },
            store: self.store,
        }
    }

    /// Insert the record, atomically re-checking the uniqueness constraints
    pub async fn confirm(self) -> ConfirmOutcome {
        match self.store.add_user_checked(&self.state.record).await {
            Ok(()) => {
                info!(email = %self.state.record.email, "registration complete");
                ConfirmOutcome::Submitted(Registration {
                    state: Submitted::new(self.state.record.email),
                    store: self.store,
                })
            }
            Err(error) => {
                warn!(%error, "registration insert failed");
                ConfirmOutcome::Rejected {
                    previewing: self,
                    error,
                }
            }
        }
    }
}
