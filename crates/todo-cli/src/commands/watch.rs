use std::io::IsTerminal;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use todo_core::config::ClientConfig;
use todo_core::push::{setup_push, PushMessage};
use todo_core::store::RemoteStore;
use todo_core::TodoListManager;

use crate::commands::common::default_notifier;
use crate::error::CliError;

const PUSH_CHANNEL_CAPACITY: usize = 16;

/// Fire reminders (and relay push messages) until Ctrl-C.
pub async fn run_watch<S: RemoteStore>(
    manager: &TodoListManager<S>,
    config: &ClientConfig,
) -> Result<(), CliError> {
    let scheduler = manager.start_reminders(config.reminder_interval())?;

    let push = setup_push(config).map(|messaging| {
        let (sender, receiver) = mpsc::channel(PUSH_CHANNEL_CAPACITY);
        let listener = messaging.listen(receiver, default_notifier());
        let reader = tokio::spawn(forward_piped_payloads(sender));
        (listener, reader)
    });

    eprintln!(
        "Watching {} todos; reminders checked every {}s. Press Ctrl-C to stop.",
        manager.len().await,
        config.reminder_interval_secs
    );
    tokio::signal::ctrl_c().await?;

    scheduler.stop().await;
    if let Some((listener, reader)) = push {
        reader.abort();
        listener.abort();
    }
    tracing::info!("Stopped watching");
    Ok(())
}

/// Read FCM-shaped JSON payloads from piped stdin, one per line.
async fn forward_piped_payloads(sender: mpsc::Sender<PushMessage>) {
    if std::io::stdin().is_terminal() {
        return;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => {}
            Ok(Some(line)) => match PushMessage::from_payload(&line) {
                Ok(message) => {
                    if sender.send(message).await.is_err() {
                        break;
                    }
                }
                Err(error) => tracing::warn!("Ignoring malformed push payload: {}", error),
            },
            Ok(None) => break,
            Err(error) => {
                tracing::warn!("Stopped reading push payloads: {}", error);
                break;
            }
        }
    }
}
