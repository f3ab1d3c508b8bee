//! User-facing transient notifications.

use std::time::Duration;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Success,
    Error,
    Info,
}

impl NotifyKind {
    /// How long a notification of this kind stays visible by default
    #[must_use]
    pub const fn default_duration(self) -> Duration {
        match self {
            Self::Success => Duration::from_secs(2),
            Self::Error | Self::Info => Duration::from_secs(4),
        }
    }
}

/// A message to show the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub kind: NotifyKind,
    pub duration: Duration,
}

impl Notification {
    pub fn new(kind: NotifyKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            duration: kind.default_duration(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotifyKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotifyKind::Error, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotifyKind::Info, message)
    }

    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Fire-and-forget notification sink
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Notifier that writes every message to the tracing log
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotifyKind::Error => tracing::warn!(target: "todo::notify", "{}", notification.message),
            NotifyKind::Success | NotifyKind::Info => {
                tracing::info!(target: "todo::notify", "{}", notification.message);
            }
        }
    }
}
