//! Shared data types for API, store, and command-layer operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Auth Types
// ============================================================================

/// Canonical user record.
///
/// The backend returns slightly divergent user shapes across endpoints; the
/// API client normalizes them into this one before anything else sees them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

/// Login payload as the backend sends it: the token rides inline with the
/// user record.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    pub token: String,
    #[serde(flatten)]
    pub user: User,
}

/// Raw login response envelope.
///
/// `method == "PUT"` signals that the backend wants a first-login profile
/// update before anything else.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub data: Option<LoginUser>,
}

/// Normalized outcome of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
    /// The shell decides whether to redirect to the profile view; this is a
    /// flag, not a separate auth state.
    pub requires_profile_update: bool,
}

// ============================================================================
// Transaction Types
// ============================================================================

/// One row in the inbox / sent / drafts / deleted lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionSummary {
    pub transaction_id: i64,
    pub code: String,
    pub subject: String,
    /// ISO-8601, parsed only for display ordering
    pub date: String,
    pub sender_name: String,
}

/// Header fields of a single transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDetails {
    pub transaction_id: i64,
    pub code: String,
    pub subject: String,
    pub content: String,
    pub date: String,
    pub sender_name: String,
    /// Backend-owned status label. The client renders it verbatim and never
    /// branches on it.
    pub current_status: String,
}

/// Attachment reference as recorded against a transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentRecord {
    pub attachment_id: i64,
    pub file_path: String,
    pub description: String,
    pub attachment_date: String,
}

/// One movement/action event in a transaction's routing history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingEvent {
    pub path_id: i64,
    pub path_notes: String,
    pub from_department: String,
    pub to_department: String,
    pub created_at: String,
}

/// Full transaction detail: header, attachments, routing history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionFull {
    pub details: TransactionDetails,
    #[serde(default)]
    pub attachments: Vec<AttachmentRecord>,
    #[serde(default)]
    pub history: Vec<RoutingEvent>,
}

/// Workflow action a recipient can take on a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionAction {
    Accept,
    Reject,
}

impl TransactionAction {
    /// Wire label sent to the action endpoint
    pub fn label(&self) -> &'static str {
        match self {
            TransactionAction::Accept => "accept",
            TransactionAction::Reject => "reject",
        }
    }
}

// ============================================================================
// Form Metadata Types
// ============================================================================

/// An addressable employee from the form-data endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub user_id: i64,
    pub full_name: String,
    pub department_name: String,
    pub department_id: i64,
    pub role_level: i64,
}

/// A department with its addressable employees
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentReceivers {
    pub department_id: i64,
    pub department_name: String,
    #[serde(default)]
    pub employees: Vec<Employee>,
}

/// A selectable transaction type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionType {
    pub id: i64,
    pub name: String,
}

/// Everything the composition wizard needs from the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormMetadata {
    #[serde(default)]
    pub receivers: Vec<DepartmentReceivers>,
    #[serde(default)]
    pub types: Vec<TransactionType>,
}

// ============================================================================
// Submission Types
// ============================================================================

/// Client-local attachment accumulated during composition.
///
/// Lives only in the wizard's in-memory state; discarded when the user
/// navigates away without submitting.
#[derive(Debug, Clone)]
pub struct DraftAttachment {
    pub id: Uuid,
    pub file_name: String,
    pub data: Vec<u8>,
    pub description: String,
    pub added_at: DateTime<Utc>,
}

/// The wizard's output, flushed into one multipart request at submit time
#[derive(Debug, Clone)]
pub struct TransactionSubmission {
    pub subject: String,
    pub content: String,
    /// Required for send, may be absent on drafts
    pub type_id: Option<i64>,
    pub is_draft: bool,
    pub receivers: Vec<i64>,
    /// Set when the transaction is a reply to an earlier one
    pub parent_transaction_id: Option<i64>,
    pub attachments: Vec<DraftAttachment>,
}

// ============================================================================
// Notification Types
// ============================================================================

/// A stored notification as returned by the list endpoint.
///
/// Two fields are camelCase on the wire; everything else is snake_case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub notification_id: i64,
    pub subject: String,
    #[serde(rename = "senderName")]
    pub sender_name: String,
    #[serde(rename = "messageSnippet")]
    pub message_snippet: String,
    pub date: String,
    #[serde(default)]
    pub is_read: bool,
}

/// One page of notifications plus the derived unread count
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationPage {
    #[serde(default)]
    pub notifications: Vec<NotificationRecord>,
    #[serde(rename = "unreadCount", default)]
    pub unread_count: i64,
}

/// Route of the notifications view, the navigation target of push alerts
pub const NOTIFICATIONS_ROUTE: &str = "/notifications";

/// Transient, dismissible alert raised by the push channel
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    pub id: Uuid,
    pub subject: String,
    pub sender_name: String,
    pub message_snippet: String,
    pub received_at: DateTime<Utc>,
    /// Route the shell navigates to when the alert is activated
    pub navigate_to: &'static str,
}

// ============================================================================
// Profile Types
// ============================================================================

/// Profile record as the profile endpoint returns it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub full_name: String,
    pub email: String,
    pub mobile_number: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub landline: Option<String>,
    #[serde(default)]
    pub fax_number: Option<String>,
}

/// Picture upload attached to a profile update
#[derive(Debug, Clone)]
pub struct ProfilePicture {
    pub file_name: String,
    pub data: Vec<u8>,
}

/// Fields for the multipart profile-update endpoint. Absent fields are
/// omitted from the request body entirely.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub mobile_number: Option<String>,
    pub landline: Option<String>,
    pub fax: Option<String>,
    pub profile_picture: Option<ProfilePicture>,
}

// ============================================================================
// Settings Types
// ============================================================================

/// Interface language
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Arabic,
    English,
}

impl Default for Language {
    fn default() -> Self {
        Language::Arabic
    }
}

/// Client settings persisted in the local store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    #[serde(default)]
    pub language: Language,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            notifications_enabled: true,
            sound_enabled: true,
            language: Language::Arabic,
        }
    }
}

// ============================================================================
// API Response Types
// ============================================================================

/// Generic response wrapper the backend puts around most payloads
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

/// Envelope for endpoints whose payload the client does not consume
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMessage {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}
