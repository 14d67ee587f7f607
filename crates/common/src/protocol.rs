//! Result types returned by the helper operations.
//!
//! These are plain data carriers decoupled from the provider SDK output types,
//! and serialise to JSON for the command-line front end.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Messaging
// ---------------------------------------------------------------------------

/// Outcome of publishing a message to a topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    /// Provider-assigned message identifier.
    pub message_id: Option<String>,
    /// Sequence number, only set for FIFO topics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<String>,
}

/// Outcome of subscribing a queue to a topic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionReceipt {
    /// ARN of the new subscription, or `"pending confirmation"`.
    pub subscription_arn: Option<String>,
}

// ---------------------------------------------------------------------------
// Queueing
// ---------------------------------------------------------------------------

/// A single message received from a queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueMessage {
    pub message_id: Option<String>,
    /// Handle required to delete this message.
    pub receipt_handle: Option<String>,
    pub body: Option<String>,
    pub md5_of_body: Option<String>,
    /// System attributes (e.g. `SentTimestamp`), keyed by attribute name.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub attributes: HashMap<String, String>,
}

/// Parameters for a single receive call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveOptions {
    /// Maximum number of messages to return (1..=10).
    pub max_messages: i32,
    /// Long-poll duration in seconds (0..=20).
    pub wait_time_seconds: i32,
}

impl ReceiveOptions {
    pub const DEFAULT_MAX_MESSAGES: i32 = 1;
    pub const DEFAULT_WAIT_TIME_SECONDS: i32 = 10;
}

impl Default for ReceiveOptions {
    fn default() -> Self {
        Self {
            max_messages: Self::DEFAULT_MAX_MESSAGES,
            wait_time_seconds: Self::DEFAULT_WAIT_TIME_SECONDS,
        }
    }
}
