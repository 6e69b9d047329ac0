//! Toast model and the bounded tray of visible toasts.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::Notification;

/// Identifies one toast instance. The same notification could in principle be
/// toasted twice (after registry eviction), so toasts get their own IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToastId(Uuid);

impl ToastId {
    pub fn new() -> Self {
        ToastId(Uuid::new_v4())
    }
}

impl Default for ToastId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToastRemovalReason {
    Timeout,
    UserClosed,
    UserClicked,
    /// Pushed out by a newer toast when the tray was full.
    Evicted,
    /// The poller was destroyed.
    Destroyed,
}

/// `Queued -> Visible -> Removed(reason)`. There is no way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToastState {
    Queued,
    Visible,
    Removed(ToastRemovalReason),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub id: ToastId,
    pub notification: Notification,
    pub state: ToastState,
    pub shown_at: Option<DateTime<Utc>>,
}

impl Toast {
    pub fn new(notification: Notification) -> Self {
        Self {
            id: ToastId::new(),
            notification,
            state: ToastState::Queued,
            shown_at: None,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.state == ToastState::Visible
    }

    fn mark_visible(&mut self) {
        if self.state == ToastState::Queued {
            self.state = ToastState::Visible;
            self.shown_at = Some(Utc::now());
        }
    }

    fn mark_removed(&mut self, reason: ToastRemovalReason) {
        if !matches!(self.state, ToastState::Removed(_)) {
            self.state = ToastState::Removed(reason);
        }
    }
}

/// Result of [`ToastTray::push`].
#[derive(Debug, Clone, PartialEq)]
pub struct ToastPush {
    pub shown: Toast,
    pub evicted: Option<Toast>,
}

/// Visible toasts, oldest first, never more than `max_toasts`.
#[derive(Debug, Clone)]
pub struct ToastTray {
    active: VecDeque<Toast>,
    max_toasts: usize,
}

impl ToastTray {
    pub fn new(max_toasts: usize) -> Self {
        Self {
            active: VecDeque::new(),
            max_toasts: max_toasts.max(1),
        }
    }

    /// Makes a toast for `notification` visible. When the tray is full the oldest
    /// toast is removed first and returned as `evicted`.
    pub fn push(&mut self, notification: Notification) -> ToastPush {
        let evicted = if self.active.len() >= self.max_toasts {
            self.active.pop_front().map(|mut oldest| {
                oldest.mark_removed(ToastRemovalReason::Evicted);
                oldest
            })
        } else {
            None
        };

        let mut toast = Toast::new(notification);
        toast.mark_visible();
        self.active.push_back(toast.clone());
        ToastPush { shown: toast, evicted }
    }

    /// Removes a visible toast. Returns `None` when it is already gone.
    pub fn remove(&mut self, id: ToastId, reason: ToastRemovalReason) -> Option<Toast> {
        let idx = self.active.iter().position(|t| t.id == id)?;
        let mut toast = self.active.remove(idx)?;
        toast.mark_removed(reason);
        Some(toast)
    }

    pub fn active(&self) -> Vec<Toast> {
        self.active.iter().cloned().collect()
    }

    pub fn clear(&mut self, reason: ToastRemovalReason) -> Vec<Toast> {
        self.active
            .drain(..)
            .map(|mut toast| {
                toast.mark_removed(reason);
                toast
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_toasts
    }
}
