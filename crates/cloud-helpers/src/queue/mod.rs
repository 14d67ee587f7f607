//! SQS message polling and deletion.

pub mod sqs;

use async_trait::async_trait;
use common::protocol::{QueueMessage, ReceiveOptions};
use common::HelperError;
use tracing::{debug, info, warn};

use crate::error::require;

/// Largest batch a single receive call may return.
pub const MAX_BATCH: i32 = 10;

/// Longest long-poll wait, in seconds.
pub const MAX_WAIT_SECONDS: i32 = 20;

/// Consumer-side operations of the queueing provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Receive up to `options.max_messages` messages from `queue_url`.
    async fn receive(
        &self,
        queue_url: &str,
        options: ReceiveOptions,
    ) -> Result<Vec<QueueMessage>, HelperError>;

    /// Delete the message identified by `receipt_handle`.
    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<(), HelperError>;
}

/// Poll `queue_url` once and return whatever messages arrived.
///
/// An empty vector means the wait elapsed without messages.
///
/// # Errors
///
/// Returns [`HelperError::InvalidInput`] for a blank URL or options outside
/// the service limits, otherwise whatever the queue reports.
pub async fn poll_sqs_message<Q>(
    queue: &Q,
    queue_url: &str,
    options: ReceiveOptions,
) -> Result<Vec<QueueMessage>, HelperError>
where
    Q: MessageQueue + ?Sized,
{
    require("queue URL", queue_url)?;
    check_options(&options)?;
    debug!(
        queue = %queue_url,
        max_messages = options.max_messages,
        wait_time_seconds = options.wait_time_seconds,
        "polling SQS queue"
    );

    match queue.receive(queue_url, options).await {
        Ok(messages) => {
            info!(queue = %queue_url, count = messages.len(), "SQS poll complete");
            Ok(messages)
        }
        Err(e) => {
            warn!(queue = %queue_url, error = %e, "SQS poll failed");
            Err(e)
        }
    }
}

/// Delete one message from `queue_url`.
///
/// # Errors
///
/// Returns [`HelperError::InvalidInput`] for a blank URL or receipt handle,
/// otherwise whatever the queue reports.
pub async fn delete_sqs_message<Q>(
    queue: &Q,
    queue_url: &str,
    receipt_handle: &str,
) -> Result<(), HelperError>
where
    Q: MessageQueue + ?Sized,
{
    require("queue URL", queue_url)?;
    require("receipt handle", receipt_handle)?;

    match queue.delete(queue_url, receipt_handle).await {
        Ok(()) => {
            info!(queue = %queue_url, "SQS message deleted");
            Ok(())
        }
        Err(e) => {
            warn!(queue = %queue_url, error = %e, "SQS delete failed");
            Err(e)
        }
    }
}

fn check_options(options: &ReceiveOptions) -> Result<(), HelperError> {
    if !(1..=MAX_BATCH).contains(&options.max_messages) {
        return Err(HelperError::InvalidInput(format!(
            "max_messages must be between 1 and {MAX_BATCH}, got {}",
            options.max_messages
        )));
    }
    if !(0..=MAX_WAIT_SECONDS).contains(&options.wait_time_seconds) {
        return Err(HelperError::InvalidInput(format!(
            "wait_time_seconds must be between 0 and {MAX_WAIT_SECONDS}, got {}",
            options.wait_time_seconds
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Operation;

    const URL: &str = "https://sqs.us-east-1.amazonaws.com/123456789012/orders-worker";

    fn message(id: &str) -> QueueMessage {
        QueueMessage {
            message_id: Some(id.into()),
            receipt_handle: Some(format!("rh-{id}")),
            body: Some("payload".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn poll_uses_default_options() {
        let mut queue = MockMessageQueue::new();
        queue
            .expect_receive()
            .withf(|url, opts| url == URL && *opts == ReceiveOptions::default())
            .times(1)
            .returning(|_, _| Ok(vec![message("a")]));

        let got = poll_sqs_message(&queue, URL, ReceiveOptions::default())
            .await
            .unwrap();
        assert_eq!(got.len(), 1);
        assert_eq!(got[0].receipt_handle.as_deref(), Some("rh-a"));
    }

    #[tokio::test]
    async fn poll_returns_empty_when_queue_is_idle() {
        let mut queue = MockMessageQueue::new();
        queue.expect_receive().returning(|_, _| Ok(Vec::new()));

        let got = poll_sqs_message(&queue, URL, ReceiveOptions::default())
            .await
            .unwrap();
        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn poll_rejects_out_of_range_options() {
        let mut queue = MockMessageQueue::new();
        queue.expect_receive().never();

        let too_many = ReceiveOptions {
            max_messages: 11,
            ..Default::default()
        };
        assert!(matches!(
            poll_sqs_message(&queue, URL, too_many).await,
            Err(HelperError::InvalidInput(_))
        ));

        let too_long = ReceiveOptions {
            wait_time_seconds: 21,
            ..Default::default()
        };
        assert!(matches!(
            poll_sqs_message(&queue, URL, too_long).await,
            Err(HelperError::InvalidInput(_))
        ));

        let zero = ReceiveOptions {
            max_messages: 0,
            ..Default::default()
        };
        assert!(poll_sqs_message(&queue, URL, zero).await.is_err());
    }

    #[tokio::test]
    async fn poll_accepts_short_poll_and_full_batch() {
        let mut queue = MockMessageQueue::new();
        queue
            .expect_receive()
            .returning(|_, _| Ok((0..10).map(|i| message(&i.to_string())).collect()));

        let opts = ReceiveOptions {
            max_messages: MAX_BATCH,
            wait_time_seconds: 0,
        };
        assert_eq!(poll_sqs_message(&queue, URL, opts).await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn delete_forwards_receipt_handle() {
        let mut queue = MockMessageQueue::new();
        queue
            .expect_delete()
            .withf(|url, handle| url == URL && handle == "rh-a")
            .times(1)
            .returning(|_, _| Ok(()));

        delete_sqs_message(&queue, URL, "rh-a").await.unwrap();
    }

    #[tokio::test]
    async fn delete_rejects_blank_receipt_handle() {
        let mut queue = MockMessageQueue::new();
        queue.expect_delete().never();

        assert!(matches!(
            delete_sqs_message(&queue, URL, "").await,
            Err(HelperError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn delete_propagates_provider_error() {
        let mut queue = MockMessageQueue::new();
        queue.expect_delete().returning(|_, _| {
            Err(HelperError::provider(
                Operation::Delete,
                "ReceiptHandleIsInvalid: handle expired",
            ))
        });

        let err = delete_sqs_message(&queue, URL, "rh-a").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to delete message from SQS queue: ReceiptHandleIsInvalid: handle expired"
        );
    }
}
