//! The notification poller.
//!
//! [`NotificationPoller`] keeps an eventually consistent view of the user's
//! unread notifications and surfaces each new *important* notification as a
//! toast at most once (within the window kept by [`ShownToastRegistry`]).
//!
//! The poller never renders anything. Every state change is published as a
//! [`NotificationEvent`] on a broadcast channel; a renderer subscribes with
//! [`NotificationPoller::subscribe`] and drives user interaction back through
//! the `*_dropdown`, `*_toast` and `mark_*` methods.
//!
//! Network failures are logged and swallowed: stale state persists until the
//! next successful tick and the poll loop never stops on its own.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, Weak};

use notifier_core::config::PollerConfig;
use tokio::sync::{broadcast, oneshot, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::api_iface::NotificationApi;
use super::badge::BadgeState;
use super::dropdown::{DropdownCloseReason, DropdownState};
use super::errors::NotificationError;
use super::events::NotificationEvent;
use super::persistence_iface::{ClientStorage, ACCESS_TOKEN_KEY};
use super::registry::ShownToastRegistry;
use super::toast::{Toast, ToastId, ToastRemovalReason, ToastTray};
use super::types::{NavigationTarget, Notification, NotificationId, RecentNotificationsResponse};

/// What [`NotificationPoller::poll_tick`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Completed,
    /// The previous tick had not finished yet.
    Skipped,
}

struct PollerState {
    unread_count: u32,
    notifications: Vec<Notification>,
    dropdown: DropdownState,
    toasts: ToastTray,
    destroyed: bool,
}

struct PollTask {
    stop_tx: oneshot::Sender<()>,
    handle: JoinHandle<()>,
}

/// Clears the in-flight flag when a tick ends, including on cancellation.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct NotificationPoller {
    api: Arc<dyn NotificationApi>,
    storage: Arc<dyn ClientStorage>,
    config: PollerConfig,
    state: RwLock<PollerState>,
    event_publisher: broadcast::Sender<NotificationEvent>,
    poll_task: Mutex<Option<PollTask>>,
    tick_in_flight: AtomicBool,
    toast_timers: StdMutex<HashMap<ToastId, JoinHandle<()>>>,
    self_ref: Weak<NotificationPoller>,
}

impl NotificationPoller {
    pub fn new(api: Arc<dyn NotificationApi>, storage: Arc<dyn ClientStorage>, config: PollerConfig) -> Arc<Self> {
        let (event_publisher, _) = broadcast::channel(config.event_channel_capacity.max(1));
        let toasts = ToastTray::new(config.max_toasts);
        Arc::new_cyclic(|self_ref| Self {
            api,
            storage,
            config,
            state: RwLock::new(PollerState {
                unread_count: 0,
                notifications: Vec::new(),
                dropdown: DropdownState::default(),
                toasts,
                destroyed: false,
            }),
            event_publisher,
            poll_task: Mutex::new(None),
            tick_in_flight: AtomicBool::new(false),
            toast_timers: StdMutex::new(HashMap::new()),
            self_ref: self_ref.clone(),
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NotificationEvent> {
        self.event_publisher.subscribe()
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    fn publish_event(&self, event: NotificationEvent) {
        if let Err(e) = self.event_publisher.send(event) {
            debug!("No subscribers for notification event: {:?}", e.0);
        }
    }

    // --- Lifecycle ---

    /// Starts polling if client storage holds an access token.
    ///
    /// Performs one tick right away, then one per `interval_secs`. Returns
    /// whether the poller is running afterwards. Without a token this is a
    /// silent no-op: the feature is inactive for anonymous users.
    pub async fn start(&self) -> bool {
        if self.state.read().await.destroyed {
            warn!("start() called on a destroyed notification poller");
            return false;
        }

        let mut poll_task = self.poll_task.lock().await;
        if poll_task.is_some() {
            debug!("Notification poller already running");
            return true;
        }
        if !self.has_access_token().await {
            info!("No access token in client storage; notification polling stays inactive");
            return false;
        }

        self.poll_tick().await;
        *poll_task = Some(self.spawn_poll_loop());
        drop(poll_task);

        info!("Notification polling started (interval {:?})", self.config.interval());
        self.publish_event(NotificationEvent::PollerStarted);
        true
    }

    async fn has_access_token(&self) -> bool {
        match self.storage.get_item(ACCESS_TOKEN_KEY).await {
            Ok(Some(token)) => !token.trim().is_empty(),
            Ok(None) => false,
            Err(e) => {
                warn!("Could not read access token from client storage: {}", e);
                false
            }
        }
    }

    fn spawn_poll_loop(&self) -> PollTask {
        let self_ref = self.self_ref.clone();
        let period = self.config.interval();
        let (stop_tx, mut stop_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = &mut stop_rx => {
                        debug!("Poll loop received stop signal");
                        break;
                    }
                    _ = ticker.tick() => {
                        let Some(poller) = self_ref.upgrade() else {
                            debug!("Notification poller dropped; poll loop exiting");
                            break;
                        };
                        // Ticks run detached so a slow request never delays the
                        // timer; overlap is handled by the in-flight guard.
                        tokio::spawn(async move {
                            poller.poll_tick().await;
                        });
                    }
                }
            }
        });

        PollTask { stop_tx, handle }
    }

    /// Cancels the recurring timer. In-flight requests still complete and
    /// apply their results. Returns whether the poller was running.
    pub async fn stop(&self) -> bool {
        let task = self.poll_task.lock().await.take();
        let Some(task) = task else {
            return false;
        };

        let _ = task.stop_tx.send(());
        if let Err(e) = task.handle.await {
            if !e.is_cancelled() {
                error!("Poll loop task ended abnormally: {}", e);
            }
        }
        info!("Notification polling stopped");
        self.publish_event(NotificationEvent::PollerStopped);
        true
    }

    /// Stops polling, removes every toast and closes the dropdown. A destroyed
    /// poller cannot be started again.
    pub async fn destroy(&self) {
        self.stop().await;

        let cleared = {
            let mut state = self.state.write().await;
            if state.destroyed {
                return;
            }
            state.destroyed = true;
            state.dropdown.close();
            state.toasts.clear(ToastRemovalReason::Destroyed)
        };

        for (_, timer) in self.timers().drain() {
            timer.abort();
        }
        for toast in cleared {
            self.publish_toast_removed(&toast, ToastRemovalReason::Destroyed);
        }

        info!("Notification poller destroyed");
        self.publish_event(NotificationEvent::PollerDestroyed);
    }

    // --- Polling ---

    /// One poll cycle: unread count and important notifications, concurrently.
    pub async fn poll_tick(&self) -> TickOutcome {
        if self
            .tick_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Previous poll tick still in flight; skipping this one");
            return TickOutcome::Skipped;
        }
        let _guard = InFlightGuard(&self.tick_in_flight);

        tokio::join!(self.fetch_unread_count(), self.check_important_notifications());
        TickOutcome::Completed
    }

    /// Refreshes the badge. On failure the previous count is kept and `None` returned.
    pub async fn fetch_unread_count(&self) -> Option<u32> {
        match self.api.unread_count().await {
            Ok(count) => {
                self.update_badge(count).await;
                Some(count)
            }
            Err(e) => {
                log_fetch_failure("unread count", &e);
                None
            }
        }
    }

    /// Replaces the dropdown list. On failure the previous list is kept.
    pub async fn fetch_recent_notifications(&self, limit: u32) -> bool {
        match self.api.recent(limit).await {
            Ok(RecentNotificationsResponse { results, unread_count }) => {
                self.state.write().await.notifications = results.clone();
                self.publish_event(NotificationEvent::ListUpdated { notifications: results });
                if let Some(count) = unread_count {
                    self.update_badge(count).await;
                }
                true
            }
            Err(e) => {
                log_fetch_failure("recent notifications", &e);
                false
            }
        }
    }

    /// Toasts every important notification not yet in the shown-toast registry,
    /// records the new IDs and marks them read in one batch.
    ///
    /// Returns the IDs that were newly surfaced.
    pub async fn check_important_notifications(&self) -> Vec<NotificationId> {
        let important = match self.api.important().await {
            Ok(important) => important,
            Err(e) => {
                log_fetch_failure("important notifications", &e);
                return Vec::new();
            }
        };
        if important.is_empty() {
            return Vec::new();
        }

        let mut registry =
            match ShownToastRegistry::load(self.storage.as_ref(), self.config.shown_registry_capacity).await {
                Ok(registry) => registry,
                Err(e) => {
                    warn!("Cannot read shown-toast registry, skipping toasts this tick: {}", e);
                    return Vec::new();
                }
            };

        let fresh = registry.unseen(&important);
        if fresh.is_empty() {
            debug!("All {} important notifications were already toasted", important.len());
            return Vec::new();
        }

        let new_ids: Vec<NotificationId> = fresh.iter().map(|n| n.id).collect();
        for notification in fresh {
            self.show_toast(notification).await;
        }

        registry.record(&new_ids);
        if let Err(e) = registry.persist(self.storage.as_ref()).await {
            warn!("Failed to persist shown-toast registry: {}", e);
        }

        self.mark_as_read(&new_ids).await;
        new_ids
    }

    async fn update_badge(&self, count: u32) {
        self.state.write().await.unread_count = count;
        self.publish_event(NotificationEvent::BadgeUpdated {
            badge: BadgeState::from_count(count),
            count,
        });
    }

    // --- Mark read ---

    /// Marks `ids` read on the server, then refreshes the unread count.
    /// An empty slice is a no-op.
    pub async fn mark_as_read(&self, ids: &[NotificationId]) -> bool {
        if ids.is_empty() {
            return false;
        }
        match self.api.mark_as_read(ids).await {
            Ok(_) => {
                self.flag_read(ids).await;
                self.fetch_unread_count().await;
                true
            }
            Err(e) => {
                warn!("Failed to mark notifications {:?} as read: {}", ids, e);
                false
            }
        }
    }

    /// Marks everything read. On success the badge drops to zero immediately and
    /// the list is refetched.
    pub async fn mark_all_as_read(&self) -> bool {
        match self.api.mark_all_read().await {
            Ok(_) => {
                self.update_badge(0).await;
                self.fetch_recent_notifications(self.config.recent_limit).await;
                true
            }
            Err(e) => {
                warn!("Failed to mark all notifications as read: {}", e);
                false
            }
        }
    }

    async fn flag_read(&self, ids: &[NotificationId]) {
        let updated = {
            let mut state = self.state.write().await;
            let mut changed = false;
            for notification in state.notifications.iter_mut() {
                if !notification.is_read && ids.contains(&notification.id) {
                    notification.is_read = true;
                    changed = true;
                }
            }
            changed.then(|| state.notifications.clone())
        };
        if let Some(notifications) = updated {
            self.publish_event(NotificationEvent::ListUpdated { notifications });
        }
    }

    // --- Dropdown ---

    /// Returns whether the dropdown is open afterwards.
    pub async fn toggle_dropdown(&self) -> bool {
        let is_open = self.state.read().await.dropdown.is_open();
        if is_open {
            self.close_dropdown(DropdownCloseReason::Toggle).await;
            false
        } else {
            self.open_dropdown().await
        }
    }

    /// Opens the dropdown and fetches a fresh list for it.
    pub async fn open_dropdown(&self) -> bool {
        {
            let mut state = self.state.write().await;
            if state.destroyed {
                return false;
            }
            if !state.dropdown.open() {
                return true;
            }
        }
        self.publish_event(NotificationEvent::DropdownOpened);
        self.fetch_recent_notifications(self.config.recent_limit).await;
        true
    }

    /// Returns whether the dropdown was open.
    pub async fn close_dropdown(&self, reason: DropdownCloseReason) -> bool {
        let changed = self.state.write().await.dropdown.close();
        if changed {
            self.publish_event(NotificationEvent::DropdownClosed { reason });
        }
        changed
    }

    /// The user picked an entry in the dropdown list.
    pub async fn select_list_item(&self, id: NotificationId) -> Option<NavigationTarget> {
        let target = self
            .state
            .read()
            .await
            .notifications
            .iter()
            .find(|n| n.id == id)
            .and_then(Notification::navigation_target);

        if let Some(target) = &target {
            self.publish_event(NotificationEvent::NavigationRequested { target: target.clone() });
        }
        self.close_dropdown(DropdownCloseReason::ItemSelected).await;
        self.mark_as_read(&[id]).await;
        target
    }

    // --- Toasts ---

    /// Shows a toast, evicting the oldest one when the tray is full, and arms
    /// its auto-dismiss timer. Does nothing once the poller is destroyed.
    pub async fn show_toast(&self, notification: Notification) -> Option<ToastId> {
        let push = {
            let mut state = self.state.write().await;
            if state.destroyed {
                debug!("Dropping toast for notification {}: poller destroyed", notification.id);
                return None;
            }
            state.toasts.push(notification)
        };

        if let Some(evicted) = &push.evicted {
            self.disarm_toast_timer(evicted.id, true);
            self.publish_toast_removed(evicted, ToastRemovalReason::Evicted);
        }

        let id = push.shown.id;
        debug!("Showing toast {} for notification {}", id, push.shown.notification.id);
        self.publish_event(NotificationEvent::ToastShown { toast: push.shown });
        self.arm_toast_timer(id);
        Some(id)
    }

    /// The user closed a toast. Returns `false` if it was already gone.
    pub async fn close_toast(&self, id: ToastId) -> bool {
        self.remove_toast(id, ToastRemovalReason::UserClosed).await.is_some()
    }

    /// The user clicked a toast: it is removed and navigation is requested when
    /// the notification points somewhere.
    pub async fn click_toast(&self, id: ToastId) -> Option<NavigationTarget> {
        let toast = self.remove_toast(id, ToastRemovalReason::UserClicked).await?;
        let target = toast.notification.navigation_target()?;
        self.publish_event(NotificationEvent::NavigationRequested { target: target.clone() });
        Some(target)
    }

    async fn remove_toast(&self, id: ToastId, reason: ToastRemovalReason) -> Option<Toast> {
        let removed = self.state.write().await.toasts.remove(id, reason);
        // A timer must not abort the task it is running on.
        self.disarm_toast_timer(id, reason != ToastRemovalReason::Timeout);
        let toast = removed?;
        self.publish_toast_removed(&toast, reason);
        Some(toast)
    }

    fn publish_toast_removed(&self, toast: &Toast, reason: ToastRemovalReason) {
        self.publish_event(NotificationEvent::ToastRemoved {
            toast_id: toast.id,
            notification_id: toast.notification.id,
            reason,
        });
    }

    fn arm_toast_timer(&self, id: ToastId) {
        let self_ref = self.self_ref.clone();
        let timeout = self.config.toast_timeout();
        // Held across the spawn so the timer cannot disarm itself before it is registered.
        let mut timers = self.timers();
        let timer = tokio::spawn(async move {
            time::sleep(timeout).await;
            if let Some(poller) = self_ref.upgrade() {
                poller.remove_toast(id, ToastRemovalReason::Timeout).await;
            }
        });
        timers.insert(id, timer);
    }

    fn disarm_toast_timer(&self, id: ToastId, abort: bool) {
        if let Some(timer) = self.timers().remove(&id) {
            if abort {
                timer.abort();
            }
        }
    }

    fn timers(&self) -> MutexGuard<'_, HashMap<ToastId, JoinHandle<()>>> {
        self.toast_timers.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // --- Accessors ---

    pub async fn unread_count(&self) -> u32 {
        self.state.read().await.unread_count
    }

    pub async fn badge(&self) -> BadgeState {
        BadgeState::from_count(self.unread_count().await)
    }

    pub async fn notifications(&self) -> Vec<Notification> {
        self.state.read().await.notifications.clone()
    }

    pub async fn active_toasts(&self) -> Vec<Toast> {
        self.state.read().await.toasts.active()
    }

    pub async fn is_dropdown_open(&self) -> bool {
        self.state.read().await.dropdown.is_open()
    }

    pub async fn is_running(&self) -> bool {
        self.poll_task.lock().await.is_some()
    }

    pub async fn is_destroyed(&self) -> bool {
        self.state.read().await.destroyed
    }

    /// IDs currently persisted in the shown-toast registry, oldest first.
    pub async fn shown_registry_ids(&self) -> Result<Vec<NotificationId>, NotificationError> {
        let registry = ShownToastRegistry::load(self.storage.as_ref(), self.config.shown_registry_capacity).await?;
        Ok(registry.ids())
    }
}

fn log_fetch_failure(what: &str, error: &NotificationError) {
    match error {
        NotificationError::Unauthenticated => debug!("Skipping {} fetch: {}", what, error),
        _ => warn!("Failed to fetch {}: {}", what, error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::api_iface::MockNotificationApi;
    use crate::notifications::persistence::InMemoryClientStorage;
    use crate::notifications::persistence_iface::SHOWN_TOAST_IDS_KEY;
    use crate::notifications::types::{MarkReadResponse, NotificationType, ReferenceId};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    fn signed_in_storage() -> Arc<InMemoryClientStorage> {
        Arc::new(InMemoryClientStorage::with_items([(ACCESS_TOKEN_KEY, "tok")]))
    }

    fn poller_with(api: MockNotificationApi, storage: Arc<InMemoryClientStorage>) -> Arc<NotificationPoller> {
        NotificationPoller::new(Arc::new(api), storage, PollerConfig::default())
    }

    fn important(id: NotificationId) -> Notification {
        let mut notification = Notification::new(id, format!("Important {}", id), NotificationType::Order);
        notification.is_important = true;
        notification.order_id = Some(ReferenceId(format!("GT-{:06}", id)));
        notification
    }

    fn drain_events(rx: &mut broadcast::Receiver<NotificationEvent>) -> Vec<NotificationEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_start_without_token_is_inactive() {
        // No expectations: any API call would panic.
        let poller = poller_with(MockNotificationApi::new(), Arc::new(InMemoryClientStorage::new()));
        assert!(!poller.start().await);
        assert!(!poller.is_running().await);
    }

    #[tokio::test]
    async fn test_start_ticks_once_and_is_idempotent() {
        let mut api = MockNotificationApi::new();
        api.expect_unread_count().times(1).returning(|| Ok(4));
        api.expect_important().times(1).returning(|| Ok(vec![]));
        let poller = poller_with(api, signed_in_storage());
        let mut rx = poller.subscribe();

        assert!(poller.start().await);
        assert!(poller.start().await);
        assert!(poller.is_running().await);
        assert_eq!(poller.unread_count().await, 4);
        assert_eq!(poller.badge().await.label().as_deref(), Some("4"));

        let events = drain_events(&mut rx);
        assert!(events.contains(&NotificationEvent::PollerStarted));

        assert!(poller.stop().await);
        assert!(!poller.stop().await);
        assert!(!poller.is_running().await);
    }

    #[tokio::test]
    async fn test_overlapping_tick_is_skipped() {
        let poller = poller_with(MockNotificationApi::new(), signed_in_storage());
        poller.tick_in_flight.store(true, Ordering::SeqCst);
        assert_eq!(poller.poll_tick().await, TickOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_check_important_toasts_only_unseen() {
        let storage = signed_in_storage();
        storage.set_item(SHOWN_TOAST_IDS_KEY, "[1,2]").await.unwrap();

        let mut api = MockNotificationApi::new();
        api.expect_important().times(1).returning(|| Ok(vec![important(2), important(3)]));
        api.expect_mark_as_read()
            .withf(|ids| ids.to_vec() == vec![3])
            .times(1)
            .returning(|_| Ok(MarkReadResponse::default()));
        api.expect_unread_count().returning(|| Ok(0));
        let poller = poller_with(api, storage.clone());

        assert_eq!(poller.check_important_notifications().await, vec![3]);

        let toasts = poller.active_toasts().await;
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].notification.id, 3);
        assert_eq!(poller.shown_registry_ids().await.unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_check_important_failure_changes_nothing() {
        let storage = signed_in_storage();
        storage.set_item(SHOWN_TOAST_IDS_KEY, "[1]").await.unwrap();

        let mut api = MockNotificationApi::new();
        api.expect_important().returning(|| {
            Err(NotificationError::HttpStatus {
                endpoint: "important/".to_string(),
                status: 500,
            })
        });
        let poller = poller_with(api, storage);

        assert!(poller.check_important_notifications().await.is_empty());
        assert!(poller.active_toasts().await.is_empty());
        assert_eq!(poller.shown_registry_ids().await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn test_failed_count_keeps_stale_value() {
        let mut api = MockNotificationApi::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        api.expect_unread_count().returning(move || {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Ok(12)
            } else {
                Err(NotificationError::Decode {
                    endpoint: "unread_count/".to_string(),
                    reason: "eof".to_string(),
                })
            }
        });
        let poller = poller_with(api, signed_in_storage());

        assert_eq!(poller.fetch_unread_count().await, Some(12));
        assert_eq!(poller.fetch_unread_count().await, None);
        assert_eq!(poller.unread_count().await, 12);
    }

    #[tokio::test]
    async fn test_mark_all_as_read_zeroes_badge_and_refreshes_list() {
        let mut api = MockNotificationApi::new();
        api.expect_unread_count().returning(|| Ok(150));
        api.expect_mark_all_read().times(1).returning(|| Ok(MarkReadResponse::default()));
        api.expect_recent().withf(|limit| *limit == 10).times(1).returning(|_| {
            let mut read = important(7);
            read.is_read = true;
            Ok(RecentNotificationsResponse {
                results: vec![read],
                unread_count: None,
            })
        });
        let poller = poller_with(api, signed_in_storage());

        poller.fetch_unread_count().await;
        assert_eq!(poller.badge().await, BadgeState::Overflow);

        assert!(poller.mark_all_as_read().await);
        assert_eq!(poller.unread_count().await, 0);
        assert_eq!(poller.badge().await, BadgeState::Hidden);
        assert_eq!(poller.notifications().await.len(), 1);
    }

    #[tokio::test]
    async fn test_mark_as_read_empty_is_noop() {
        let poller = poller_with(MockNotificationApi::new(), signed_in_storage());
        assert!(!poller.mark_as_read(&[]).await);
    }

    #[tokio::test]
    async fn test_dropdown_toggle_fetches_and_closes() {
        let mut api = MockNotificationApi::new();
        api.expect_recent().times(1).returning(|_| {
            Ok(RecentNotificationsResponse {
                results: vec![important(1), important(2)],
                unread_count: Some(2),
            })
        });
        let poller = poller_with(api, signed_in_storage());
        let mut rx = poller.subscribe();

        assert!(poller.toggle_dropdown().await);
        assert!(poller.is_dropdown_open().await);
        assert_eq!(poller.notifications().await.len(), 2);
        assert_eq!(poller.unread_count().await, 2);

        assert!(!poller.toggle_dropdown().await);
        assert!(!poller.close_dropdown(DropdownCloseReason::Escape).await);

        let events = drain_events(&mut rx);
        assert_eq!(events.first(), Some(&NotificationEvent::DropdownOpened));
        assert_eq!(
            events.last(),
            Some(&NotificationEvent::DropdownClosed {
                reason: DropdownCloseReason::Toggle
            })
        );
    }

    #[tokio::test]
    async fn test_select_list_item_navigates_and_marks_read() {
        let mut api = MockNotificationApi::new();
        api.expect_recent().returning(|_| {
            Ok(RecentNotificationsResponse {
                results: vec![important(4)],
                unread_count: Some(1),
            })
        });
        api.expect_mark_as_read()
            .withf(|ids| ids.to_vec() == vec![4])
            .times(1)
            .returning(|_| Ok(MarkReadResponse::default()));
        api.expect_unread_count().returning(|| Ok(0));
        let poller = poller_with(api, signed_in_storage());

        poller.open_dropdown().await;
        let target = poller.select_list_item(4).await.unwrap();
        assert_eq!(target.as_str(), "/orders/GT-000004/");
        assert!(!poller.is_dropdown_open().await);
        assert!(poller.notifications().await[0].is_read);
        assert_eq!(poller.unread_count().await, 0);
    }

    #[tokio::test]
    async fn test_click_toast_removes_once_and_navigates() {
        let poller = poller_with(MockNotificationApi::new(), signed_in_storage());
        let mut rx = poller.subscribe();

        let id = poller.show_toast(important(5)).await.unwrap();
        assert_eq!(poller.click_toast(id).await.unwrap().as_str(), "/orders/GT-000005/");
        assert!(poller.click_toast(id).await.is_none());
        assert!(!poller.close_toast(id).await);

        let removals: Vec<_> = drain_events(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, NotificationEvent::ToastRemoved { .. }))
            .collect();
        assert_eq!(
            removals,
            vec![NotificationEvent::ToastRemoved {
                toast_id: id,
                notification_id: 5,
                reason: ToastRemovalReason::UserClicked
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_auto_dismisses_after_timeout() {
        let poller = poller_with(MockNotificationApi::new(), signed_in_storage());
        let id = poller.show_toast(important(1)).await.unwrap();

        time::sleep(Duration::from_millis(4_999)).await;
        assert_eq!(poller.active_toasts().await.len(), 1);

        time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert!(poller.active_toasts().await.is_empty());
        assert!(!poller.close_toast(id).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_finished_toast_timers_are_released() {
        let config = PollerConfig {
            toast_timeout_ms: 1,
            ..PollerConfig::default()
        };
        let poller = NotificationPoller::new(Arc::new(MockNotificationApi::new()), signed_in_storage(), config);

        let closed = poller.show_toast(important(1)).await.unwrap();
        poller.show_toast(important(2)).await.unwrap();
        assert_eq!(poller.timers().len(), 2);
        assert!(poller.close_toast(closed).await);
        assert_eq!(poller.timers().len(), 1);

        time::sleep(Duration::from_millis(5)).await;
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        assert!(poller.active_toasts().await.is_empty());
        assert!(poller.timers().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_loop_ticks_on_interval() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut api = MockNotificationApi::new();
        api.expect_unread_count().returning(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(1)
        });
        api.expect_important().returning(|| Ok(vec![]));
        let poller = poller_with(api, signed_in_storage());

        assert!(poller.start().await);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_secs(30) + Duration::from_millis(10)).await;
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        poller.stop().await;
        time::sleep(Duration::from_secs(90)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    /// Answers the unread count only after `latency`; everything else is immediate.
    struct SlowCountApi {
        calls: AtomicUsize,
        latency: Duration,
    }

    #[async_trait::async_trait]
    impl NotificationApi for SlowCountApi {
        async fn unread_count(&self) -> Result<u32, NotificationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            time::sleep(self.latency).await;
            Ok(3)
        }

        async fn recent(&self, _limit: u32) -> Result<RecentNotificationsResponse, NotificationError> {
            Ok(RecentNotificationsResponse::default())
        }

        async fn important(&self) -> Result<Vec<Notification>, NotificationError> {
            Ok(vec![])
        }

        async fn mark_as_read(&self, _ids: &[NotificationId]) -> Result<MarkReadResponse, NotificationError> {
            Ok(MarkReadResponse::default())
        }

        async fn mark_all_read(&self) -> Result<MarkReadResponse, NotificationError> {
            Ok(MarkReadResponse::default())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_loop_skips_ticks_while_previous_is_in_flight() {
        let api = Arc::new(SlowCountApi {
            calls: AtomicUsize::new(0),
            latency: Duration::from_secs(45),
        });
        let poller = NotificationPoller::new(api.clone(), signed_in_storage(), PollerConfig::default());

        // The first tick runs inline and finishes at t=45s; the loop then ticks
        // at 75s (runs until 120s), 105s (skipped) and 135s.
        assert!(poller.start().await);
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);

        time::sleep(Duration::from_secs(65)).await;
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);
        assert!(poller.tick_in_flight.load(Ordering::SeqCst));

        time::sleep(Duration::from_secs(20)).await;
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        assert_eq!(api.calls.load(Ordering::SeqCst), 2);

        time::sleep(Duration::from_secs(10)).await;
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        assert_eq!(api.calls.load(Ordering::SeqCst), 3);

        poller.stop().await;
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent_and_final() {
        let poller = poller_with(MockNotificationApi::new(), signed_in_storage());
        let mut rx = poller.subscribe();
        poller.show_toast(important(1)).await;
        poller.show_toast(important(2)).await;

        poller.destroy().await;
        poller.destroy().await;

        assert!(poller.active_toasts().await.is_empty());
        assert!(poller.is_destroyed().await);
        assert!(!poller.start().await);
        assert!(poller.show_toast(important(3)).await.is_none());

        let events = drain_events(&mut rx);
        let destroyed = events.iter().filter(|e| **e == NotificationEvent::PollerDestroyed).count();
        assert_eq!(destroyed, 1);
        let removed = events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    NotificationEvent::ToastRemoved {
                        reason: ToastRemovalReason::Destroyed,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(removed, 2);
    }
}
