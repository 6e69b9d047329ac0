//! Turns [`NotificationEvent`]s into log lines.
//!
//! Stands in for a graphical bell/toast widget: every state change the poller
//! publishes is described with translated labels and emitted through `tracing`.

use notifier_domain::i18n::{keys, Translator};
use notifier_domain::notifications::{BadgeState, Notification, NotificationEvent};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

pub struct TracingRenderer<T: Translator> {
    translator: T,
}

impl<T: Translator> TracingRenderer<T> {
    pub fn new(translator: T) -> Self {
        Self { translator }
    }

    /// One human readable line per event. `None` for events only worth a debug log.
    pub fn describe(&self, event: &NotificationEvent) -> Option<String> {
        match event {
            NotificationEvent::BadgeUpdated { badge, .. } => Some(match badge {
                BadgeState::Hidden => format!("{}: none unread", self.translator.label(keys::TITLE)),
                _ => format!(
                    "{}: {} unread",
                    self.translator.label(keys::TITLE),
                    badge.label().unwrap_or_default()
                ),
            }),
            NotificationEvent::ListUpdated { notifications } if notifications.is_empty() => {
                Some(self.translator.label(keys::EMPTY))
            }
            NotificationEvent::ListUpdated { notifications } => {
                let mut lines: Vec<String> = notifications.iter().map(list_line).collect();
                lines.push(format!(
                    "[{}] [{}]",
                    self.translator.label(keys::MARK_ALL_READ),
                    self.translator.label(keys::VIEW_ALL)
                ));
                Some(lines.join("\n"))
            }
            NotificationEvent::ToastShown { toast } => Some(format!(
                "[{}] {}: {}",
                toast.notification.icon_name(),
                toast.notification.title,
                toast.notification.message
            )),
            NotificationEvent::NavigationRequested { target } => Some(format!("Open {}", target.as_str())),
            _ => None,
        }
    }

    /// Consumes events until the poller is destroyed or the channel closes.
    pub async fn run(self, mut events: broadcast::Receiver<NotificationEvent>) {
        loop {
            match events.recv().await {
                Ok(event) => {
                    match self.describe(&event) {
                        Some(line) => info!("{}", line),
                        None => debug!("Notification event: {:?}", event),
                    }
                    if event == NotificationEvent::PollerDestroyed {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Renderer fell behind; {} notification events skipped", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    }
}

fn list_line(notification: &Notification) -> String {
    let marker = if notification.is_read { ' ' } else { '*' };
    format!(
        "{} [{}] {} ({})",
        marker,
        notification.icon_name(),
        notification.title,
        notification.time_ago
    )
}
