//! Push-channel consumer.
//!
//! One long-lived connection per session, reconnecting forever with
//! exponential backoff. The channel carries no sequence numbers, so
//! events lost across a reconnect are undetectable here; the periodic
//! snapshot reload is the correctness backstop, and duplicates are
//! absorbed by the store's url dedup.

use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::types::StreamEvent;

const RECONNECT_BASE_DELAY: Duration = Duration::from_secs(1);
const RECONNECT_MAX_DELAY: Duration = Duration::from_secs(60);

/// Consume the push channel at `ws_url`, forwarding parsed events into
/// `tx` in arrival order. Returns only when the receiving side is gone.
pub async fn run_push_channel(ws_url: String, tx: mpsc::Sender<StreamEvent>) {
    let mut delay = RECONNECT_BASE_DELAY;
    loop {
        match connect_async(ws_url.as_str()).await {
            Ok((ws, _)) => {
                info!(url = %ws_url, "push channel connected");
                delay = RECONNECT_BASE_DELAY;

                let (_write, mut read) = ws.split();
                while let Some(msg) = read.next().await {
                    match msg {
                        Ok(Message::Text(text)) => {
                            match serde_json::from_str::<StreamEvent>(&text) {
                                Ok(event) => {
                                    if tx.send(event).await.is_err() {
                                        return;
                                    }
                                }
                                Err(e) => {
                                    debug!(error = %e, "ignoring unparseable push message");
                                }
                            }
                        }
                        Ok(Message::Close(_)) => {
                            warn!("push channel closed by server");
                            break;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            warn!(error = %e, "push channel read error");
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                warn!(url = %ws_url, error = %e, "push channel connect failed");
            }
        }

        if tx.is_closed() {
            return;
        }
        tokio::time::sleep(delay).await;
        delay = (delay * 2).min(RECONNECT_MAX_DELAY);
    }
}
