//! SNS topic publishing and queue subscription.
//!
//! The functions here validate arguments, log, and forward to a [`Notifier`].
//! The production notifier is [`AwsClients`](crate::aws::AwsClients); see
//! [`sns`].

pub mod sns;

use async_trait::async_trait;
use common::protocol::{PublishReceipt, SubscriptionReceipt};
use common::HelperError;
use tracing::{debug, info, warn};

use crate::error::require;

/// Protocol used when subscribing a queue to a topic.
pub const SQS_PROTOCOL: &str = "sqs";

/// Topic-side operations of the messaging provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Publish `message` to the topic identified by `topic_arn`.
    async fn publish(&self, topic_arn: &str, message: &str)
        -> Result<PublishReceipt, HelperError>;

    /// Subscribe the queue `queue_arn` to `topic_arn` using [`SQS_PROTOCOL`].
    async fn subscribe_queue(
        &self,
        topic_arn: &str,
        queue_arn: &str,
    ) -> Result<SubscriptionReceipt, HelperError>;
}

/// Publish `data` to the topic `topic`.
///
/// # Errors
///
/// Returns [`HelperError::InvalidInput`] for a blank topic ARN, otherwise
/// whatever the notifier reports.
pub async fn publish_sns_message<N>(
    notifier: &N,
    data: &str,
    topic: &str,
) -> Result<PublishReceipt, HelperError>
where
    N: Notifier + ?Sized,
{
    require("topic ARN", topic)?;
    debug!(topic = %topic, bytes = data.len(), "publishing SNS message");

    match notifier.publish(topic, data).await {
        Ok(receipt) => {
            info!(
                topic = %topic,
                message_id = receipt.message_id.as_deref().unwrap_or(""),
                "SNS message published"
            );
            Ok(receipt)
        }
        Err(e) => {
            warn!(topic = %topic, error = %e, "SNS publish failed");
            Err(e)
        }
    }
}

/// Subscribe the queue `queue_arn` to the topic `topic_arn`.
///
/// # Errors
///
/// Returns [`HelperError::InvalidInput`] for a blank ARN, otherwise whatever
/// the notifier reports.
pub async fn subscribe_sqs_to_sns<N>(
    notifier: &N,
    queue_arn: &str,
    topic_arn: &str,
) -> Result<SubscriptionReceipt, HelperError>
where
    N: Notifier + ?Sized,
{
    require("queue ARN", queue_arn)?;
    require("topic ARN", topic_arn)?;
    debug!(queue = %queue_arn, topic = %topic_arn, "subscribing SQS queue to SNS topic");

    match notifier.subscribe_queue(topic_arn, queue_arn).await {
        Ok(receipt) => {
            info!(
                queue = %queue_arn,
                topic = %topic_arn,
                subscription = receipt.subscription_arn.as_deref().unwrap_or(""),
                "queue subscribed"
            );
            Ok(receipt)
        }
        Err(e) => {
            warn!(queue = %queue_arn, topic = %topic_arn, error = %e, "subscribe failed");
            Err(e)
        }
    }
}
