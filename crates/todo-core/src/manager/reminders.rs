//! Reminder sweep and its periodic scheduler.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::ListState;
use crate::models::TodoItem;
use crate::notify::{Notification, Notifier};

/// How long a reminder notification stays on screen
pub const REMINDER_DISPLAY_DURATION: Duration = Duration::from_secs(10);

/// Fire every due reminder once and clear it.
///
/// The clearing is local only; the stored document keeps its reminder.
pub(crate) fn sweep(items: &mut [TodoItem], now: DateTime<Utc>, notifier: &dyn Notifier) -> usize {
    let mut fired = 0;
    for item in items.iter_mut().filter(|item| item.is_reminder_due(now)) {
        tracing::info!(id = %item.id, "Reminder due");
        notifier.notify(
            Notification::info(format!("Reminder: {}", item.text))
                .with_duration(REMINDER_DISPLAY_DURATION),
        );
        item.reminder = None;
        fired += 1;
    }
    fired
}

/// Owned periodic reminder task.
///
/// The first sweep runs one period after start. Stop it with `stop`; dropping
/// the scheduler aborts the task.
pub struct ReminderScheduler {
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl ReminderScheduler {
    pub(crate) fn spawn(
        state: Arc<Mutex<ListState>>,
        notifier: Arc<dyn Notifier>,
        period: Duration,
    ) -> Self {
        let (shutdown, mut shutdown_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        let mut state = state.lock().await;
                        let fired = sweep(&mut state.items, Utc::now(), notifier.as_ref());
                        tracing::debug!(fired, "Reminder sweep finished");
                    }
                }
            }
            tracing::debug!("Reminder scheduler stopped");
        });

        Self {
            shutdown: Some(shutdown),
            handle: Some(handle),
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stop the task and wait for it to finish.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(error) = handle.await {
                tracing::warn!("Reminder scheduler ended abnormally: {}", error);
            }
        }
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration as ChronoDuration;

    use super::*;
    use crate::models::TodoDocument;
    use crate::notify::tests::RecordingNotifier;

    fn item(id: &str, reminder: Option<DateTime<Utc>>) -> TodoItem {
        TodoItem::from_document(id.parse().unwrap(), TodoDocument::new(id, reminder))
    }

    #[test]
    fn sweep_fires_each_due_reminder_once() {
        let now = Utc::now();
        let notifier = RecordingNotifier::default();
        let mut items = vec![
            item("past", Some(now - ChronoDuration::minutes(1))),
            item("future", Some(now + ChronoDuration::minutes(1))),
            item("none", None),
            item("exact", Some(now)),
        ];

        assert_eq!(sweep(&mut items, now, &notifier), 2);
        assert_eq!(notifier.messages(), vec!["Reminder: past", "Reminder: exact"]);
        assert_eq!(items[0].reminder, None);
        assert!(items[1].reminder.is_some());
        assert_eq!(items[3].reminder, None);

        assert_eq!(sweep(&mut items, now, &notifier), 0);
        assert_eq!(notifier.take().len(), 2);
    }

    #[test]
    fn reminder_notifications_use_info_kind_and_long_duration() {
        let now = Utc::now();
        let notifier = RecordingNotifier::default();
        let mut items = vec![item("x", Some(now))];
        sweep(&mut items, now, &notifier);

        let seen = notifier.take();
        assert_eq!(seen[0].kind, crate::notify::NotifyKind::Info);
        assert_eq!(seen[0].duration, REMINDER_DISPLAY_DURATION);
    }
}
