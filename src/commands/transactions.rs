//! Transaction commands
//!
//! Lists and details are always fetched fresh; nothing here is cached
//! locally. Submission flushes the whole composition form in one multipart
//! request.

use super::{authed_client, settle};
use crate::compose::{ComposeForm, SubmitMode};
use crate::error::AppResult;
use crate::models::{
    ApiMessage, FormMetadata, TransactionAction, TransactionFull, TransactionSummary,
};
use crate::state::SharedState;

/// Incoming transactions
pub async fn inbox(state: &SharedState) -> AppResult<Vec<TransactionSummary>> {
    let (api, token) = authed_client(state).await?;
    settle(state, api.inbox(&token).await).await
}

/// Transactions the user has sent
pub async fn sent(state: &SharedState) -> AppResult<Vec<TransactionSummary>> {
    let (api, token) = authed_client(state).await?;
    settle(state, api.sent(&token).await).await
}

/// Saved drafts
pub async fn drafts(state: &SharedState) -> AppResult<Vec<TransactionSummary>> {
    let (api, token) = authed_client(state).await?;
    settle(state, api.drafts(&token).await).await
}

/// Deleted transactions
pub async fn deleted(state: &SharedState) -> AppResult<Vec<TransactionSummary>> {
    let (api, token) = authed_client(state).await?;
    settle(state, api.deleted(&token).await).await
}

/// Full detail for one transaction, including attachments and routing
/// history
pub async fn transaction_details(state: &SharedState, id: i64) -> AppResult<TransactionFull> {
    let (api, token) = authed_client(state).await?;
    settle(state, api.transaction_details(id, &token).await).await
}

/// Recipients and types for the composition wizard
pub async fn form_metadata(state: &SharedState) -> AppResult<FormMetadata> {
    let (api, token) = authed_client(state).await?;
    settle(state, api.form_metadata(&token).await).await
}

/// Send the composed transaction. Validation runs locally first; an invalid
/// form never reaches the network.
pub async fn submit_transaction(state: &SharedState, form: &ComposeForm) -> AppResult<ApiMessage> {
    let submission = form.submission(SubmitMode::Send)?;
    let (api, token) = authed_client(state).await?;
    settle(state, api.create_transaction(&submission, &token).await).await
}

/// Save the composed transaction as a draft (subject-only validation)
pub async fn save_draft(state: &SharedState, form: &ComposeForm) -> AppResult<ApiMessage> {
    let submission = form.submission(SubmitMode::Draft)?;
    let (api, token) = authed_client(state).await?;
    settle(state, api.create_transaction(&submission, &token).await).await
}

/// Accept or reject a transaction with an annotation
pub async fn transaction_action(
    state: &SharedState,
    id: i64,
    action: TransactionAction,
    notes: &str,
) -> AppResult<ApiMessage> {
    let (api, token) = authed_client(state).await?;
    settle(state, api.transaction_action(id, action, notes, &token).await).await
}

/// Fetch an attachment's binary content
pub async fn fetch_attachment(state: &SharedState, file_path: &str) -> AppResult<Vec<u8>> {
    let (api, token) = authed_client(state).await?;
    settle(state, api.fetch_attachment(file_path, &token).await).await
}
