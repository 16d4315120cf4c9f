use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::notification;

pub const KIND_NEWS_PENDING: &str = "news_pending";
pub const KIND_NEWS_APPROVED: &str = "news_approved";
pub const KIND_NEWS_REJECTED: &str = "news_rejected";

#[derive(Serialize, utoipa::ToSchema)]
pub struct NotificationResponse {
    pub id: i32,
    #[schema(example = "news_pending")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub related_id: Option<i32>,
    pub related_type: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<notification::Model> for NotificationResponse {
    fn from(m: notification::Model) -> Self {
        Self {
            id: m.id,
            kind: m.kind,
            title: m.title,
            message: m.message,
            related_id: m.related_id,
            related_type: m.related_type,
            is_read: m.is_read,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct NotificationQuery {
    /// When true, only unread notifications are returned.
    pub unread: Option<bool>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct MarkReadRequest {
    pub id: i32,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MarkAllReadResponse {
    /// Number of notifications flipped to read.
    pub updated: u64,
}
