use serde::Serialize;

/// Aggregate counts for the admin dashboard.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DashboardStats {
    pub total_news: u64,
    pub pending_news: u64,
    pub approved_news: u64,
    pub rejected_news: u64,
    pub total_operators: u64,
    pub active_operators: u64,
    pub total_categories: u64,
    pub total_sub_categories: u64,
    pub total_advertisements: u64,
    pub unread_notifications: u64,
}
