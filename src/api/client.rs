//! HTTP client for the Tarasul backend API
//!
//! Stateless: every function takes typed arguments and returns a typed
//! payload or a typed failure. The caller owns the token; a 401 here only
//! becomes a cleared session in the commands layer.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::error::{AppError, AppResult, GENERIC_REQUEST_FAILURE};
use crate::models::{
    ApiEnvelope, ApiMessage, FormMetadata, LoginOutcome, LoginResponse, NotificationPage,
    ProfileUpdate, TransactionAction, TransactionFull, TransactionSubmission, TransactionSummary,
    UserProfile,
};

/// Wrapper for the profile payload from /api/users/profile
#[derive(Debug, serde::Deserialize)]
struct ProfileData {
    user: UserProfile,
}

/// API client for the Tarasul backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: Url) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, base_url }
    }

    /// Build URL for endpoint
    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), endpoint)
    }

    /// Make authenticated GET request
    async fn get<T: DeserializeOwned>(&self, endpoint: &str, token: Option<&str>) -> AppResult<T> {
        let mut request = self.client.get(self.url(endpoint));

        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Make authenticated POST request with a JSON body
    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
        token: Option<&str>,
    ) -> AppResult<T> {
        let mut request = self.client.post(self.url(endpoint)).json(body);

        if let Some(token) = token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Make authenticated POST request with a multipart body
    async fn post_multipart<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: Form,
        token: &str,
    ) -> AppResult<T> {
        let response = self
            .client
            .post(self.url(endpoint))
            .header("Authorization", format!("Bearer {}", token))
            .multipart(form)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Make authenticated PUT request with a multipart body
    async fn put_multipart<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        form: Form,
        token: &str,
    ) -> AppResult<T> {
        let response = self
            .client
            .put(self.url(endpoint))
            .header("Authorization", format!("Bearer {}", token))
            .multipart(form)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Handle response and parse JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> AppResult<T> {
        let response = Self::check_status(response).await?;
        let data = response.json().await?;
        Ok(data)
    }

    /// Translate HTTP status into the error taxonomy, passing 2xx through.
    async fn check_status(response: Response) -> AppResult<Response> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(AppError::SessionExpired);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiMessage>(&body)
                .ok()
                .and_then(|m| m.message)
                .unwrap_or_else(|| GENERIC_REQUEST_FAILURE.to_string());
            return Err(AppError::Request(message));
        }

        Ok(response)
    }

    // ========================================================================
    // Auth Endpoints
    // ========================================================================

    /// Log in with email and password, normalizing the response into one
    /// canonical shape.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginOutcome> {
        #[derive(Serialize)]
        struct LoginRequest<'a> {
            email: &'a str,
            password: &'a str,
        }

        let response: LoginResponse = self
            .post("/api/users/login", &LoginRequest { email, password }, None)
            .await?;

        let requires_profile_update = response.method.as_deref() == Some("PUT");

        let Some(payload) = response.data else {
            let message = response
                .message
                .unwrap_or_else(|| GENERIC_REQUEST_FAILURE.to_string());
            return Err(AppError::Request(message));
        };

        Ok(LoginOutcome {
            user: payload.user,
            token: payload.token,
            requires_profile_update,
        })
    }

    // ========================================================================
    // Profile Endpoints
    // ========================================================================

    /// Fetch the current user's profile
    pub async fn fetch_profile(&self, token: &str) -> AppResult<UserProfile> {
        let response: ApiEnvelope<ProfileData> = self.get("/api/users/profile", Some(token)).await?;
        let data = response
            .data
            .ok_or_else(|| AppError::Request(GENERIC_REQUEST_FAILURE.to_string()))?;
        Ok(data.user)
    }

    /// Update the current user's profile. Absent fields are omitted from the
    /// multipart body entirely.
    pub async fn update_profile(&self, update: &ProfileUpdate, token: &str) -> AppResult<ApiMessage> {
        let mut form = Form::new();

        if let Some(v) = &update.full_name {
            form = form.text("fullName", v.clone());
        }
        if let Some(v) = &update.email {
            form = form.text("email", v.clone());
        }
        if let Some(v) = &update.password {
            form = form.text("password", v.clone());
        }
        if let Some(v) = &update.mobile_number {
            form = form.text("mobileNumber", v.clone());
        }
        if let Some(v) = &update.landline {
            form = form.text("landline", v.clone());
        }
        if let Some(v) = &update.fax {
            form = form.text("fax", v.clone());
        }
        if let Some(picture) = &update.profile_picture {
            let part = Part::bytes(picture.data.clone()).file_name(picture.file_name.clone());
            form = form.part("profile_picture", part);
        }

        self.put_multipart("/api/users/profile/update", form, token)
            .await
    }

    // ========================================================================
    // Transaction Endpoints
    // ========================================================================

    /// Incoming transactions
    pub async fn inbox(&self, token: &str) -> AppResult<Vec<TransactionSummary>> {
        self.transaction_list("/api/transactions/inbox", token).await
    }

    /// Transactions the user has sent
    pub async fn sent(&self, token: &str) -> AppResult<Vec<TransactionSummary>> {
        self.transaction_list("/api/transactions/my-history", token)
            .await
    }

    /// Saved drafts
    pub async fn drafts(&self, token: &str) -> AppResult<Vec<TransactionSummary>> {
        self.transaction_list("/api/transactions/draft", token).await
    }

    /// Deleted transactions
    pub async fn deleted(&self, token: &str) -> AppResult<Vec<TransactionSummary>> {
        self.transaction_list("/api/transactions/deleted", token)
            .await
    }

    async fn transaction_list(
        &self,
        endpoint: &str,
        token: &str,
    ) -> AppResult<Vec<TransactionSummary>> {
        let response: ApiEnvelope<Vec<TransactionSummary>> = self.get(endpoint, Some(token)).await?;
        Ok(response.data.unwrap_or_default())
    }

    /// Full detail for one transaction: header, attachments, routing history
    pub async fn transaction_details(&self, id: i64, token: &str) -> AppResult<TransactionFull> {
        let response: ApiEnvelope<TransactionFull> = self
            .get(&format!("/api/transactions/details/{}", id), Some(token))
            .await?;
        response
            .data
            .ok_or_else(|| AppError::Request(GENERIC_REQUEST_FAILURE.to_string()))
    }

    /// Recipients and transaction types for the composition wizard
    pub async fn form_metadata(&self, token: &str) -> AppResult<FormMetadata> {
        let response: ApiEnvelope<FormMetadata> =
            self.get("/api/transactions/form-data", Some(token)).await?;
        response
            .data
            .ok_or_else(|| AppError::Request(GENERIC_REQUEST_FAILURE.to_string()))
    }

    /// Create a transaction or save it as a draft. The whole submission is
    /// flushed in one multipart request; attachments are never uploaded
    /// incrementally.
    pub async fn create_transaction(
        &self,
        submission: &TransactionSubmission,
        token: &str,
    ) -> AppResult<ApiMessage> {
        let receivers = submission
            .receivers
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let mut form = Form::new()
            .text("subject", submission.subject.clone())
            .text("content", submission.content.clone())
            .text("is_draft", if submission.is_draft { "true" } else { "false" })
            .text("receivers", receivers);

        if let Some(type_id) = submission.type_id {
            form = form.text("type_id", type_id.to_string());
        }
        if let Some(parent) = submission.parent_transaction_id {
            form = form.text("parent_transaction_id", parent.to_string());
        }

        for attachment in &submission.attachments {
            let part = Part::bytes(attachment.data.clone()).file_name(attachment.file_name.clone());
            form = form.part("attachments", part);
        }

        self.post_multipart("/api/transactions/create", form, token)
            .await
    }

    /// Accept or reject a transaction, with an annotation
    pub async fn transaction_action(
        &self,
        id: i64,
        action: TransactionAction,
        notes: &str,
        token: &str,
    ) -> AppResult<ApiMessage> {
        #[derive(Serialize)]
        struct ActionRequest<'a> {
            action: &'a str,
            notes: &'a str,
        }

        self.post(
            &format!("/api/transactions/action/{}", id),
            &ActionRequest {
                action: action.label(),
                notes,
            },
            Some(token),
        )
        .await
    }

    /// Fetch an attachment's binary content
    pub async fn fetch_attachment(&self, file_path: &str, token: &str) -> AppResult<Vec<u8>> {
        let endpoint = format!("/api/transactions/file/{}", encode_file_path(file_path));
        let response = self
            .client
            .get(self.url(&endpoint))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;

        let response = Self::check_status(response).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    // ========================================================================
    // Notification Endpoints
    // ========================================================================

    /// One page of notifications plus the unread count
    pub async fn notifications(
        &self,
        page: u32,
        limit: u32,
        token: &str,
    ) -> AppResult<NotificationPage> {
        let response: ApiEnvelope<NotificationPage> = self
            .get(
                &format!("/api/notifications?page={}&limit={}", page, limit),
                Some(token),
            )
            .await?;
        Ok(response.data.unwrap_or_default())
    }

    /// Mark a single notification as read
    pub async fn mark_notification_read(&self, id: i64, token: &str) -> AppResult<()> {
        let response = self
            .client
            .put(self.url(&format!("/api/notifications/{}/read", id)))
            .header("Authorization", format!("Bearer {}", token))
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }
}

/// Percent-encode each segment of an attachment path, preserving the
/// separators the backend routes on.
fn encode_file_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
