//! Wizard form state and submission-time validation

use chrono::Utc;
use uuid::Uuid;

use crate::compose::RecipientSelection;
use crate::error::AppError;
use crate::models::{DraftAttachment, TransactionSubmission};

/// Wizard tabs. Any step may be revisited freely; nothing is validated at
/// step transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeStep {
    Main,
    Attachments,
    Recipients,
}

/// Whether the transaction is new or a reply to an earlier one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionNature {
    New,
    Reply { parent_transaction_id: i64 },
}

/// What the form is being flushed as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    Send,
    Draft,
}

/// One inline, per-field validation message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Local validation failures. Never sent to the network; the shell renders
/// them inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("؛ ");
        write!(f, "{}", joined)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors.to_string())
    }
}

/// In-memory state of the composition wizard.
///
/// Everything here is ephemeral: navigating away without submitting discards
/// the form, including accumulated attachments.
#[derive(Debug, Clone, Default)]
pub struct ComposeForm {
    pub step: ComposeStep,
    pub subject: String,
    pub content: String,
    pub nature: TransactionNature,
    pub type_id: Option<i64>,
    pub recipients: RecipientSelection,
    attachments: Vec<DraftAttachment>,
    in_flight: bool,
}

impl Default for ComposeStep {
    fn default() -> Self {
        ComposeStep::Main
    }
}

impl Default for TransactionNature {
    fn default() -> Self {
        TransactionNature::New
    }
}

impl ComposeForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to another step. Always allowed.
    pub fn goto(&mut self, step: ComposeStep) {
        self.step = step;
    }

    /// Add an attachment to the in-memory list. A description is required
    /// before the file can be added.
    pub fn add_attachment(
        &mut self,
        file_name: impl Into<String>,
        data: Vec<u8>,
        description: impl Into<String>,
    ) -> Result<Uuid, FieldError> {
        let description = description.into();
        if description.trim().is_empty() {
            return Err(FieldError {
                field: "description",
                message: "يرجى إدخال وصف الملف".to_string(),
            });
        }

        let id = Uuid::new_v4();
        self.attachments.push(DraftAttachment {
            id,
            file_name: file_name.into(),
            data,
            description,
            added_at: Utc::now(),
        });
        Ok(id)
    }

    /// Remove an attachment by its locally generated id
    pub fn remove_attachment(&mut self, id: &Uuid) -> bool {
        let before = self.attachments.len();
        self.attachments.retain(|a| a.id != *id);
        self.attachments.len() != before
    }

    /// Attachments in the order they were added
    pub fn attachments(&self) -> &[DraftAttachment] {
        &self.attachments
    }

    /// Whether a submission is currently in flight. The shell disables the
    /// submit control while this is set.
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Claim the in-flight guard. Returns false when a submission is already
    /// running, in which case the caller must not submit again.
    pub fn begin_submit(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Release the in-flight guard once the request settles
    pub fn finish_submit(&mut self) {
        self.in_flight = false;
    }

    /// Validate for the given mode. Sending needs recipients, a subject, and
    /// a type; saving a draft needs only a subject.
    pub fn validate(&self, mode: SubmitMode) -> Result<(), ValidationErrors> {
        let mut errors = Vec::new();

        if mode == SubmitMode::Send && self.recipients.is_empty() {
            errors.push(FieldError {
                field: "receivers",
                message: "يرجى اختيار جهة واحدة على الأقل".to_string(),
            });
        }

        if self.subject.trim().is_empty() {
            errors.push(FieldError {
                field: "subject",
                message: "يرجى إدخال موضوع المعاملة".to_string(),
            });
        }

        if mode == SubmitMode::Send && self.type_id.is_none() {
            errors.push(FieldError {
                field: "type_id",
                message: "يرجى اختيار نوع المعاملة".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors { errors })
        }
    }

    /// Flush the form into a submission. Validation runs first; the network
    /// is never touched when it fails.
    pub fn submission(&self, mode: SubmitMode) -> Result<TransactionSubmission, ValidationErrors> {
        self.validate(mode)?;

        let parent_transaction_id = match self.nature {
            TransactionNature::New => None,
            TransactionNature::Reply {
                parent_transaction_id,
            } => Some(parent_transaction_id),
        };

        Ok(TransactionSubmission {
            subject: self.subject.clone(),
            content: self.content.clone(),
            type_id: self.type_id,
            is_draft: mode == SubmitMode::Draft,
            receivers: self.recipients.ids(),
            parent_transaction_id,
            attachments: self.attachments.clone(),
        })
    }
}
