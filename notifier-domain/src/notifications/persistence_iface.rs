use async_trait::async_trait;

use super::errors::NotificationError;

/// Key under which the bearer token is stored.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Key under which the shown-toast registry is stored, as a JSON array of IDs.
pub const SHOWN_TOAST_IDS_KEY: &str = "shown_toast_ids";

/// Persistent string key/value storage shared with the rest of the client.
#[async_trait]
pub trait ClientStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, NotificationError>;
    async fn set_item(&self, key: &str, value: &str) -> Result<(), NotificationError>;
    async fn remove_item(&self, key: &str) -> Result<(), NotificationError>;
}
