use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound request, as relayed by the host.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadRequest {
    pub source: String,
    /// Opaque correlation value, echoed back on every outbound message.
    #[serde(default)]
    pub key: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current: usize,
    pub total: usize,
    pub percentage: u8,
}

/// Messages emitted for a single [`LoadRequest`].
///
/// A sequence is zero or more `Batch` messages followed by exactly one
/// `Complete` or `Error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage {
    Batch {
        key: Value,
        items: Vec<Value>,
        progress: Progress,
    },
    Complete {
        key: Value,
        #[serde(rename = "totalItems")]
        total_items: usize,
    },
    Error {
        key: Value,
        error: String,
    },
}

impl OutboundMessage {
    pub fn key(&self) -> &Value {
        match self {
            OutboundMessage::Batch { key, .. }
            | OutboundMessage::Complete { key, .. }
            | OutboundMessage::Error { key, .. } => key,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, OutboundMessage::Batch { .. })
    }
}
