use serde::{Deserialize, Serialize};

use super::badge::BadgeState;
use super::dropdown::DropdownCloseReason;
use super::toast::{Toast, ToastId, ToastRemovalReason};
use super::types::{NavigationTarget, Notification, NotificationId};

/// Everything a renderer needs to mirror the poller's state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NotificationEvent {
    BadgeUpdated {
        badge: BadgeState,
        count: u32,
    },
    ListUpdated {
        notifications: Vec<Notification>,
    },
    ToastShown {
        toast: Toast,
    },
    ToastRemoved {
        toast_id: ToastId,
        notification_id: NotificationId,
        reason: ToastRemovalReason,
    },
    DropdownOpened,
    DropdownClosed {
        reason: DropdownCloseReason,
    },
    NavigationRequested {
        target: NavigationTarget,
    },
    PollerStarted,
    PollerStopped,
    PollerDestroyed,
}
