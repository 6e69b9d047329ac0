use std::sync::Arc;

use async_trait::async_trait;
use notifier_core::config::ApiConfig;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::api_iface::NotificationApi;
use super::errors::NotificationError;
use super::persistence_iface::{ClientStorage, ACCESS_TOKEN_KEY};
use super::types::{
    MarkAsReadRequest, MarkReadResponse, Notification, NotificationId, RecentNotificationsResponse,
    UnreadCountResponse,
};

/// The server never returns more than this many recent notifications.
pub const MAX_RECENT_LIMIT: u32 = 50;

/// [`NotificationApi`] over HTTP with bearer authentication.
///
/// The token is read from [`ClientStorage`] on every request, so a login or
/// logout elsewhere in the client takes effect on the next poll.
pub struct HttpNotificationApi {
    client: reqwest::Client,
    base_url: String,
    storage: Arc<dyn ClientStorage>,
}

impl HttpNotificationApi {
    pub fn new(config: &ApiConfig, storage: Arc<dyn ClientStorage>) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| NotificationError::Network {
                endpoint: config.base_url.clone(),
                source: e,
            })?;
        Ok(Self::with_client(client, &config.base_url, storage))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str, storage: Arc<dyn ClientStorage>) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            storage,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn bearer_token(&self) -> Result<String, NotificationError> {
        match self.storage.get_item(ACCESS_TOKEN_KEY).await? {
            Some(token) if !token.trim().is_empty() => Ok(token),
            _ => Err(NotificationError::Unauthenticated),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder, endpoint: &str) -> Result<Vec<u8>, NotificationError> {
        let token = self.bearer_token().await?;
        let response = request
            .header(AUTHORIZATION, format!("Bearer {}", token))
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|e| NotificationError::Network {
                endpoint: endpoint.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotificationError::HttpStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|e| NotificationError::Network {
            endpoint: endpoint.to_string(),
            source: e,
        })?;
        Ok(bytes.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T, NotificationError> {
        let endpoint = self.endpoint(path);
        let body = self.send(self.client.get(&endpoint).query(query), &endpoint).await?;
        serde_json::from_slice(&body).map_err(|e| NotificationError::Decode {
            endpoint,
            reason: e.to_string(),
        })
    }

    /// The mark-read endpoints only signal success through the status code, so an
    /// empty or unexpected body is not an error.
    async fn post_json<B: Serialize + Sync>(&self, path: &str, payload: Option<&B>) -> Result<MarkReadResponse, NotificationError> {
        let endpoint = self.endpoint(path);
        let mut request = self.client.post(&endpoint);
        request = match payload {
            Some(payload) => request.json(payload),
            None => request.body("{}"),
        };
        let body = self.send(request, &endpoint).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(MarkReadResponse::default());
        }
        Ok(serde_json::from_slice(&body).unwrap_or_else(|e| {
            debug!("Ignoring unexpected body from {}: {}", endpoint, e);
            MarkReadResponse::default()
        }))
    }
}

#[async_trait]
impl NotificationApi for HttpNotificationApi {
    async fn unread_count(&self) -> Result<u32, NotificationError> {
        let response: UnreadCountResponse = self.get_json("unread_count/", &[]).await?;
        Ok(response.count)
    }

    async fn recent(&self, limit: u32) -> Result<RecentNotificationsResponse, NotificationError> {
        let query = [("limit", limit.clamp(1, MAX_RECENT_LIMIT).to_string())];
        self.get_json("recent/", &query).await
    }

    async fn important(&self) -> Result<Vec<Notification>, NotificationError> {
        self.get_json("important/", &[]).await
    }

    async fn mark_as_read(&self, ids: &[NotificationId]) -> Result<MarkReadResponse, NotificationError> {
        let payload = MarkAsReadRequest {
            notification_ids: ids.to_vec(),
        };
        self.post_json("mark_as_read/", Some(&payload)).await
    }

    async fn mark_all_read(&self) -> Result<MarkReadResponse, NotificationError> {
        self.post_json::<MarkAsReadRequest>("mark_all_read/", None).await
    }
}
