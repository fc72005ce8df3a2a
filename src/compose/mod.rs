//! Transaction composition wizard state
//!
//! A three-step flow (main fields, attachments, recipients) with free
//! navigation between steps. Validation happens only at submission time; the
//! form is flushed into a single multipart submission, never uploaded
//! incrementally.

mod form;
mod recipients;

pub use form::{
    ComposeForm, ComposeStep, FieldError, SubmitMode, TransactionNature, ValidationErrors,
};
pub use recipients::{employees_in_department, search_employees, RecipientSelection};
