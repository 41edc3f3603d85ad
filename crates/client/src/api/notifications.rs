use api_types::{
    auth::MessageResponse,
    notification::{MarkRead, Notification, UnreadCount},
};

use crate::{error::Result, http::ApiClient};

impl ApiClient {
    pub async fn notifications(&self) -> Result<Vec<Notification>> {
        self.get_json("/api/notifications").await
    }

    pub async fn mark_notifications_read(&self, ids: &[String]) -> Result<MessageResponse> {
        self.post_json(
            "/api/notifications/mark-read",
            &MarkRead {
                notification_ids: ids.to_vec(),
            },
        )
        .await
    }

    pub async fn mark_all_notifications_read(&self) -> Result<MessageResponse> {
        self.post_json("/api/notifications/mark-all-read", &serde_json::json!({}))
            .await
    }

    pub async fn unread_count(&self) -> Result<UnreadCount> {
        self.get_json("/api/notifications/unread-count").await
    }
}
