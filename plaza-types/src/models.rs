use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Path of the account-creation endpoint, relative to the API base URL
pub const SIGNUP_PATH: &str = "/api/auth/signup";

/// Path of the paginated posts endpoint, relative to the API base URL
pub const POSTS_PATH: &str = "/api/posts";

/// Offset of the first feed page
pub const FIRST_PAGE_OFFSET: u32 = 0;

/// Number of posts requested for the first feed page
pub const FIRST_PAGE_LIMIT: u32 = 20;

/// A post as returned by the posts endpoint.
///
/// Only the aggregate counters are interpreted by the client. Every other
/// field is kept as-is in `fields` so the renderer sees the full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments_count: Option<i64>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Post {
    /// Like count, treating a missing or null value as zero
    pub fn likes(&self) -> i64 {
        self.likes_count.unwrap_or(0)
    }

    /// Comment count, treating a missing or null value as zero
    pub fn comments(&self) -> i64 {
        self.comments_count.unwrap_or(0)
    }

    /// Look up an opaque string field (e.g. `content`, `author_name`)
    pub fn text_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Best-effort creation timestamp, if the server sent an RFC3339 `created_at`
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.text_field("created_at")
            .and_then(|s| s.parse::<DateTime<Utc>>().ok())
    }
}

/// Aggregates shown next to the feed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeedStats {
    pub post_count: usize,
    pub total_likes: i64,
    pub total_comments: i64,
}

impl FeedStats {
    pub fn from_posts(posts: &[Post]) -> Self {
        posts.iter().fold(
            Self {
                post_count: posts.len(),
                ..Self::default()
            },
            |mut stats, post| {
                // Counts come from the server; clamp rather than overflow
                stats.total_likes = stats.total_likes.saturating_add(post.likes());
                stats.total_comments = stats.total_comments.saturating_add(post.comments());
                stats
            },
        )
    }
}

// Request/Response types for API

/// Body of `POST /api/auth/signup`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "demo_user")]
    pub demo_user: bool,
}

/// Credentials for the hosted password sign-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Session established by a successful sign-in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

/// Error body returned by the API on non-2xx responses
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
}
