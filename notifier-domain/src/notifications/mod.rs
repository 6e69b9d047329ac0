// Notification polling: wire types, REST client, client storage, toast
// bookkeeping and the poller service that ties them together.

pub mod api;
pub mod api_iface;
pub mod badge;
pub mod dropdown;
pub mod errors;
pub mod events;
pub mod persistence;
pub mod persistence_iface;
pub mod registry;
pub mod service;
pub mod toast;
pub mod types;

pub use api::HttpNotificationApi;
pub use api_iface::NotificationApi;
pub use badge::BadgeState;
pub use dropdown::{DropdownCloseReason, DropdownState};
pub use errors::NotificationError;
pub use events::NotificationEvent;
pub use persistence::{FileClientStorage, InMemoryClientStorage};
pub use persistence_iface::{ClientStorage, ACCESS_TOKEN_KEY, SHOWN_TOAST_IDS_KEY};
pub use registry::ShownToastRegistry;
pub use service::{NotificationPoller, TickOutcome};
pub use toast::{Toast, ToastId, ToastPush, ToastRemovalReason, ToastState, ToastTray};
pub use types::{
    MarkAsReadRequest, MarkReadResponse, NavigationTarget, Notification, NotificationId, NotificationType,
    RecentNotificationsResponse, ReferenceId, UnreadCountResponse,
};
