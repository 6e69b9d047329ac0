//! Domain layer of the storefront notifier.
//!
//! Polls the notification REST endpoints, keeps the unread badge and the
//! dropdown list current, and surfaces new important notifications as toasts
//! exactly once per shown-toast registry window. Rendering lives elsewhere:
//! consumers subscribe to [`NotificationEvent`]s.

// Re-export core module
pub use notifier_core as core;

pub mod i18n;
pub mod notifications;

pub use i18n::{FallbackTranslator, Translator};
pub use notifications::{
    BadgeState, ClientStorage, DropdownCloseReason, FileClientStorage, HttpNotificationApi, InMemoryClientStorage,
    NavigationTarget, Notification, NotificationApi, NotificationError, NotificationEvent, NotificationId,
    NotificationPoller, NotificationType, ShownToastRegistry, TickOutcome, Toast, ToastId, ToastRemovalReason,
};
