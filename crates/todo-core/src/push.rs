//! Optional push messaging.
//!
//! Push is best-effort: an environment without messaging configuration
//! degrades to no push at all, without telling the user.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::ClientConfig;
use crate::notify::{Notification, Notifier};
use crate::util::normalize_text_option;
use crate::{Error, Result};

/// Messaging registration parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushConfig {
    pub sender_id: String,
    pub vapid_key: String,
}

/// A push message as delivered by the messaging service
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PushMessage {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl PushMessage {
    /// Parse the `{"notification": {...}}` payload shape.
    pub fn from_payload(payload: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct Envelope {
            notification: Option<PushMessage>,
        }

        let envelope: Envelope = serde_json::from_str(payload)?;
        Ok(envelope.notification.unwrap_or_default())
    }
}

/// An initialized messaging client
#[derive(Debug, Clone)]
pub struct Messaging {
    config: PushConfig,
}

impl Messaging {
    #[must_use]
    pub const fn config(&self) -> &PushConfig {
        &self.config
    }

    /// Forward foreground messages to the notifier until the sender closes.
    pub fn listen(
        &self,
        mut messages: mpsc::Receiver<PushMessage>,
        notifier: Arc<dyn Notifier>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(message) = messages.recv().await {
                let Some(body) = normalize_text_option(message.body) else {
                    tracing::debug!("Ignoring push message without a body");
                    continue;
                };
                notifier.notify(Notification::success(body));
            }
            tracing::debug!("Push message channel closed");
        })
    }
}

/// Initialize messaging, or report why it is unavailable.
pub fn init_messaging(config: &ClientConfig) -> Result<Messaging> {
    let sender_id = normalize_text_option(config.messaging_sender_id.clone())
        .ok_or_else(|| Error::NotSupported("messaging sender id is not configured".to_string()))?;
    let vapid_key = normalize_text_option(config.vapid_key.clone())
        .ok_or_else(|| Error::NotSupported("VAPID key is not configured".to_string()))?;

    Ok(Messaging {
        config: PushConfig {
            sender_id,
            vapid_key,
        },
    })
}

/// Like `init_messaging`, but an unsupported environment yields `None`.
#[must_use]
pub fn setup_push(config: &ClientConfig) -> Option<Messaging> {
    match init_messaging(config) {
        Ok(messaging) => Some(messaging),
        Err(error) => {
            tracing::debug!("Push messaging disabled: {}", error);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::tests::RecordingNotifier;
    use crate::notify::NotifyKind;

    fn push_config() -> ClientConfig {
        ClientConfig {
            messaging_sender_id: Some("1234".to_string()),
            vapid_key: Some("vapid".to_string()),
            ..ClientConfig::default()
        }
    }

    #[test]
    fn unsupported_environment_degrades_silently() {
        assert!(matches!(
            init_messaging(&ClientConfig::default()),
            Err(Error::NotSupported(_))
        ));
        assert!(setup_push(&ClientConfig::default()).is_none());
        assert!(setup_push(&push_config()).is_some());
    }

    #[test]
    fn parses_notification_payload() {
        let message = PushMessage::from_payload(
            r#"{ "notification": { "title": "Todo", "body": "Time to stretch" }, "data": {} }"#,
        )
        .unwrap();
        assert_eq!(message.title.as_deref(), Some("Todo"));
        assert_eq!(message.body.as_deref(), Some("Time to stretch"));
        assert_eq!(message.image, None);

        assert_eq!(
            PushMessage::from_payload("{}").unwrap(),
            PushMessage::default()
        );
    }

    #[tokio::test]
    async fn listen_turns_messages_into_success_notifications() {
        let messaging = setup_push(&push_config()).unwrap();
        let notifier = Arc::new(RecordingNotifier::default());
        let (sender, receiver) = mpsc::channel(4);

        let handle = messaging.listen(receiver, notifier.clone());
        sender
            .send(PushMessage {
                body: Some("Time to stretch".to_string()),
                ..PushMessage::default()
            })
            .await
            .unwrap();
        sender.send(PushMessage::default()).await.unwrap();
        drop(sender);
        handle.await.unwrap();

        let seen = notifier.take();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].message, "Time to stretch");
        assert_eq!(seen[0].kind, NotifyKind::Success);
    }
}
