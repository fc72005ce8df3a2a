//! Server-sent-event transport for the push channel

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use url::Url;

/// Payload of a "new notification" push event
#[derive(Debug, Clone, Deserialize)]
pub struct NewNotification {
    pub subject: String,
    #[serde(rename = "senderName")]
    pub sender_name: String,
    #[serde(rename = "messageSnippet")]
    pub message_snippet: String,
}

/// Typed events delivered by the push channel
#[derive(Debug, Clone)]
pub enum PushEvent {
    NewNotification(NewNotification),
}

/// Delay before re-opening a dropped stream. Kept flat: reconnection is a
/// transport concern, not an application state machine.
const RECONNECT_DELAY: Duration = Duration::from_secs(5);

/// Handle to an open push connection. Dropping the handle does not close the
/// stream; call [`NotificationChannel::close`].
pub struct NotificationChannel {
    task: JoinHandle<()>,
}

impl NotificationChannel {
    /// Open the stream with the session token as connection-level credential.
    /// Events arrive on the returned receiver until the channel is closed or
    /// the receiver is dropped.
    pub fn connect(stream_url: Url, token: String) -> (Self, mpsc::Receiver<PushEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let task = tokio::spawn(run_stream(stream_url, token, tx));
        (Self { task }, rx)
    }

    /// Tear down the connection task
    pub fn close(self) {
        self.task.abort();
    }
}

async fn run_stream(url: Url, token: String, tx: mpsc::Sender<PushEvent>) {
    // A dedicated client without a total-request timeout: the stream is
    // expected to stay open indefinitely.
    let client = match Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to build push stream client: {}", e);
            return;
        }
    };

    loop {
        match open_and_consume(&client, &url, &token, &tx).await {
            StreamEnd::Unauthorized => {
                // The session is gone; the next REST call discovers it too.
                tracing::warn!("Push stream rejected credentials; closing channel");
                return;
            }
            StreamEnd::ReceiverGone => return,
            StreamEnd::Disconnected => {}
        }

        if tx.is_closed() {
            return;
        }
        tokio::time::sleep(RECONNECT_DELAY).await;
    }
}

enum StreamEnd {
    Unauthorized,
    ReceiverGone,
    Disconnected,
}

async fn open_and_consume(
    client: &Client,
    url: &Url,
    token: &str,
    tx: &mpsc::Sender<PushEvent>,
) -> StreamEnd {
    let response = match client
        .get(url.clone())
        .header("Authorization", format!("Bearer {}", token))
        .header("Accept", "text/event-stream")
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Push stream connection failed: {}", e);
            return StreamEnd::Disconnected;
        }
    };

    if response.status() == reqwest::StatusCode::UNAUTHORIZED {
        return StreamEnd::Unauthorized;
    }
    if !response.status().is_success() {
        tracing::warn!("Push stream refused ({})", response.status());
        return StreamEnd::Disconnected;
    }

    tracing::info!("Push stream connected");

    let mut body = Box::pin(response.bytes_stream());
    let mut buffer: Vec<u8> = Vec::new();

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::warn!("Push stream dropped: {}", e);
                return StreamEnd::Disconnected;
            }
        };

        buffer.extend_from_slice(&chunk);

        while let Some(pos) = buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = buffer.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);

            if let Some(event) = parse_event_line(&line) {
                if tx.send(event).await.is_err() {
                    return StreamEnd::ReceiverGone;
                }
            }
        }
    }

    tracing::info!("Push stream ended");
    StreamEnd::Disconnected
}

/// Parse one line of the event stream.
///
/// Only `data:` lines carry payloads; comments (`:` heartbeats), event-name
/// lines, and blank separators are skipped. A payload that fails to decode
/// is dropped with a warning rather than killing the stream.
fn parse_event_line(line: &str) -> Option<PushEvent> {
    let line = line.trim();
    let payload = line.strip_prefix("data:")?.trim();
    if payload.is_empty() {
        return None;
    }

    match serde_json::from_str::<NewNotification>(payload) {
        Ok(notification) => Some(PushEvent::NewNotification(notification)),
        Err(e) => {
            tracing::warn!("Unreadable push payload: {}", e);
            None
        }
    }
}
