use chrono::{DateTime, Utc};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Server-assigned notification identifier.
pub type NotificationId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    Order,
    Deposit,
    Withdraw,
    /// Also used for type strings this client does not know.
    #[default]
    #[serde(other)]
    System,
}

impl NotificationType {
    /// Symbolic icon name a renderer should use for this type.
    pub fn icon_name(&self) -> &'static str {
        match self {
            NotificationType::Order => "shopping-cart",
            NotificationType::Deposit => "arrow-down",
            NotificationType::Withdraw => "arrow-up",
            NotificationType::System => "info-circle",
        }
    }
}

/// Opaque order or transaction reference, e.g. `"GT-000123"`. Integer
/// references from older payloads are kept in their decimal form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceId(pub String);

impl ReferenceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ReferenceId {
    fn from(value: &str) -> Self {
        ReferenceId(value.to_string())
    }
}

impl From<i64> for ReferenceId {
    fn from(value: i64) -> Self {
        ReferenceId(value.to_string())
    }
}

/// Where activating a notification should take the user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NavigationTarget(pub String);

impl NavigationTarget {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub notification_type: NotificationType,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub is_important: bool,
    #[serde(default)]
    pub time_ago: String,
    #[serde(default, deserialize_with = "lenient_reference_id", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<ReferenceId>,
    #[serde(default, deserialize_with = "lenient_reference_id", skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<ReferenceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn new(id: NotificationId, title: impl Into<String>, notification_type: NotificationType) -> Self {
        Self {
            id,
            title: title.into(),
            message: String::new(),
            notification_type,
            is_read: false,
            is_important: false,
            time_ago: String::new(),
            order_id: None,
            transaction_id: None,
            created_at: None,
        }
    }

    /// An order reference wins over a transaction reference.
    pub fn navigation_target(&self) -> Option<NavigationTarget> {
        if let Some(order_id) = &self.order_id {
            Some(NavigationTarget(format!("/orders/{}/", order_id)))
        } else if self.transaction_id.is_some() {
            Some(NavigationTarget("/wallet/deposits/".to_string()))
        } else {
            None
        }
    }

    pub fn icon_name(&self) -> &'static str {
        self.notification_type.icon_name()
    }
}

/// Accepts an integer or a non-blank string. `null`, blank strings and any other
/// JSON value (floats, booleans, objects) deserialize to `None` rather than
/// failing the whole payload.
fn lenient_reference_id<'de, D>(deserializer: D) -> Result<Option<ReferenceId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) if n.is_i64() || n.is_u64() => Some(ReferenceId(n.to_string())),
        Value::String(text) if !text.trim().is_empty() => Some(ReferenceId(text.trim().to_string())),
        _ => None,
    })
}

// --- Wire types ---

/// `GET /unread_count/`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCountResponse {
    pub count: u32,
}

/// `GET /recent/?limit=N`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RecentNotificationsResponse {
    #[serde(default)]
    pub results: Vec<Notification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unread_count: Option<u32>,
}

/// Body of `POST /mark_as_read/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkAsReadRequest {
    pub notification_ids: Vec<NotificationId>,
}

/// Body returned by both mark-read endpoints. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MarkReadResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_count: Option<u64>,
}
