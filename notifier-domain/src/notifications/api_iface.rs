use async_trait::async_trait;

use super::errors::NotificationError;
use super::types::{MarkReadResponse, Notification, NotificationId, RecentNotificationsResponse};

/// The notification REST endpoints, as seen by the poller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// `GET /unread_count/`
    async fn unread_count(&self) -> Result<u32, NotificationError>;
    /// `GET /recent/?limit=N`
    async fn recent(&self, limit: u32) -> Result<RecentNotificationsResponse, NotificationError>;
    /// `GET /important/`
    async fn important(&self) -> Result<Vec<Notification>, NotificationError>;
    /// `POST /mark_as_read/`
    async fn mark_as_read(&self, ids: &[NotificationId]) -> Result<MarkReadResponse, NotificationError>;
    /// `POST /mark_all_read/`
    async fn mark_all_read(&self) -> Result<MarkReadResponse, NotificationError>;
}
