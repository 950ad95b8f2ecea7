use std::fmt::Display;

use log::error;
use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::message::{LoadRequest, OutboundMessage, Progress};

pub type MessageReceiver = mpsc::UnboundedReceiver<OutboundMessage>;

/// Reply side of a single load request.
///
/// Terminal replies consume the handle, so nothing can be sent after
/// `Complete` or `Error`.
pub struct ReplyHandle {
    pub request_id: Uuid,
    key: Value,
    sender: mpsc::UnboundedSender<OutboundMessage>,
}

impl ReplyHandle {
    /// Returns `false` once the caller has stopped listening.
    pub fn reply_with_batch(&self, items: Vec<Value>, progress: Progress) -> bool {
        self.send(OutboundMessage::Batch {
            key: self.key.clone(),
            items,
            progress,
        })
    }

    pub fn reply_with_completion(self, total_items: usize) {
        let key = self.key.clone();
        self.send(OutboundMessage::Complete { key, total_items });
    }

    pub fn reply_with_error(self, err: impl Display) {
        let key = self.key.clone();
        self.send(OutboundMessage::Error {
            key,
            error: err.to_string(),
        });
    }

    fn send(&self, message: OutboundMessage) -> bool {
        match self.sender.send(message) {
            Ok(()) => true,
            Err(_) => {
                error!(
                    "Could not send message to client, receiver has dropped. [request_id = {}]",
                    self.request_id
                );
                false
            }
        }
    }
}

pub struct RequestClient {
    pub source: String,
    pub handle: ReplyHandle,
}

impl RequestClient {
    pub fn new(request: LoadRequest, request_id: Uuid) -> (MessageReceiver, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let LoadRequest { source, key } = request;

        let client = Self {
            source,
            handle: ReplyHandle {
                request_id,
                key,
                sender,
            },
        };

        (receiver, client)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn client() -> (MessageReceiver, RequestClient) {
        RequestClient::new(
            LoadRequest {
                source: "data/2024-05.json".to_string(),
                key: json!("2024-05"),
            },
            Uuid::new_v4(),
        )
    }

    #[test]
    fn given_terminal_reply__when_received__should_echo_key_and_close_channel() {
        let (mut receiver, client) = client();

        client.handle.reply_with_error("boom");

        assert_eq!(
            receiver.try_recv().unwrap(),
            OutboundMessage::Error {
                key: json!("2024-05"),
                error: "boom".to_string()
            }
        );
        assert!(matches!(
            receiver.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn given_dropped_receiver__when_batch_sent__should_report_failure() {
        let (receiver, client) = client();
        drop(receiver);

        let progress = Progress {
            current: 1000,
            total: 1,
            percentage: 100,
        };

        assert!(!client.handle.reply_with_batch(vec![json!(1)], progress));
    }
}
