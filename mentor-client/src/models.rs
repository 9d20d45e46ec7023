use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Пользователи ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Mentor,
    Admin,
    #[serde(other)]
    Other,
}

/// Populated user reference embedded in posts, comments and connections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    /// Price of a paid mentorship in minor currency units
    #[serde(default)]
    pub mentorship_price: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentorship_price: Option<i64>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.bio.is_none()
            && self.skills.is_none()
            && self.mentorship_price.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: User,
}

// ==================== Связи и менторство ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionType {
    StudentToMentor,
    MentorToStudent,
    Peer,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Rejected,
    Cancelled,
    Blocked,
    #[serde(other)]
    Other,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Accepted => "accepted",
            ConnectionStatus::Rejected => "rejected",
            ConnectionStatus::Cancelled => "cancelled",
            ConnectionStatus::Blocked => "blocked",
            ConnectionStatus::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionMetadata {
    #[serde(default)]
    pub goals: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(rename = "type")]
    pub connection_type: ConnectionType,
    pub status: ConnectionStatus,
    #[serde(default)]
    pub from_user: Option<UserSummary>,
    #[serde(default)]
    pub other_user: Option<UserSummary>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub metadata: ConnectionMetadata,
    #[serde(default)]
    pub is_paid: bool,
    /// Minor currency units
    #[serde(default)]
    pub mentorship_price: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionRequest {
    pub recipient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorshipApplication {
    pub mentor_id: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    /// Pre-authorized payment intent for a paid mentorship
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ReasonRequest<'a> {
    pub reason: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AcceptMentorshipRequest<'a> {
    pub payment_method_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConnectionEnvelope {
    pub connection: Connection,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ConnectionsEnvelope {
    pub connections: Vec<Connection>,
}

// ==================== Платежи ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Created,
    Succeeded,
    Refunded,
    Failed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    #[serde(rename = "none")]
    NotRequested,
    Pending,
    Succeeded,
    Failed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    /// Minor currency units
    pub amount: i64,
    pub currency: String,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub charged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub refunded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub refunded_amount: Option<i64>,
    #[serde(default)]
    pub refund_status: Option<RefundStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentDetailsEnvelope {
    pub payment_details: PaymentDetails,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateIntentRequest<'a> {
    pub mentor_id: &'a str,
    pub amount: i64,
    pub currency: &'a str,
}

/// Backend-created payment intent awaiting card confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentHandle {
    pub client_secret: String,
    pub payment_intent_id: String,
}

/// Intent as reported by the payment processor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl PaymentIntent {
    /// Authorized for later capture, or already captured.
    pub fn is_authorized(&self) -> bool {
        matches!(self.status.as_str(), "requires_capture" | "succeeded")
    }
}

// ==================== Лента ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(alias = "_id")]
    pub id: String,
    pub user: UserSummary,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interactions {
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub shares: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostStats {
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub comment_count: u64,
    #[serde(default)]
    pub share_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(alias = "_id")]
    pub id: String,
    pub author: UserSummary,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub interactions: Interactions,
    #[serde(default)]
    pub stats: PostStats,
    pub created_at: DateTime<Utc>,
}

impl Post {
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.interactions.likes.iter().any(|id| id == user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    #[serde(default)]
    pub total_pages: u32,
    pub has_next_page: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedPage {
    pub posts: Vec<Post>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CreatePostRequest {
    pub content: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct CommentRequest<'a> {
    pub content: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PostEnvelope {
    pub post: Post,
}

// ==================== Загрузка файлов ====================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub urls: Vec<String>,
}

// ==================== Общие ошибки ====================

/// Error body as sent by the backend; either field may carry the text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorResponse {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_mentorship_connection() {
        let raw = json!({
            "_id": "c1",
            "type": "student_to_mentor",
            "status": "pending",
            "fromUser": { "_id": "u1", "name": "Ada", "role": "student" },
            "otherUser": { "_id": "u2", "name": "Grace", "role": "mentor" },
            "message": "Hi",
            "metadata": { "goals": "Learn Rust", "availability": "weekends" },
            "isPaid": true,
            "mentorshipPrice": 2599,
            "paymentStatus": "created"
        });

        let connection: Connection = serde_json::from_value(raw).unwrap();
        assert_eq!(connection.id, "c1");
        assert_eq!(connection.connection_type, ConnectionType::StudentToMentor);
        assert_eq!(connection.status, ConnectionStatus::Pending);
        assert!(connection.is_paid);
        assert_eq!(connection.mentorship_price, Some(2599));
        assert_eq!(connection.payment_status, Some(PaymentStatus::Created));
        assert_eq!(connection.metadata.goals.as_deref(), Some("Learn Rust"));
        assert_eq!(connection.other_user.unwrap().role, Some(Role::Mentor));
    }

    #[test]
    fn unknown_status_does_not_break_decoding() {
        let raw = json!({
            "id": "c2",
            "type": "alumni",
            "status": "archived"
        });
        let connection: Connection = serde_json::from_value(raw).unwrap();
        assert_eq!(connection.connection_type, ConnectionType::Other);
        assert_eq!(connection.status, ConnectionStatus::Other);
        assert!(!connection.is_paid);
    }

    #[test]
    fn post_defaults_missing_interactions() {
        let raw = json!({
            "_id": "p1",
            "author": { "_id": "u1", "name": "Ada" },
            "content": "hello",
            "createdAt": "2026-01-02T03:04:05Z"
        });
        let post: Post = serde_json::from_value(raw).unwrap();
        assert!(post.interactions.likes.is_empty());
        assert_eq!(post.stats, PostStats::default());
        assert!(!post.is_liked_by("u1"));
    }

    #[test]
    fn error_body_prefers_message() {
        let body: ErrorResponse =
            serde_json::from_value(json!({ "message": "a", "error": "b" })).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("a"));

        let body: ErrorResponse = serde_json::from_value(json!({ "error": "b" })).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("b"));
    }

    #[test]
    fn profile_update_skips_unset_fields() {
        let update = ProfileUpdate {
            bio: Some("Rustacean".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "bio": "Rustacean" })
        );
        assert!(ProfileUpdate::default().is_empty());
    }
}
