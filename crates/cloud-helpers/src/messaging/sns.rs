//! [`Notifier`] implementation backed by the SNS client.

use async_trait::async_trait;
use common::protocol::{PublishReceipt, SubscriptionReceipt};
use common::{HelperError, Operation};

use super::{Notifier, SQS_PROTOCOL};
use crate::aws::AwsClients;
use crate::error::translate;

#[async_trait]
impl Notifier for AwsClients {
    async fn publish(
        &self,
        topic_arn: &str,
        message: &str,
    ) -> Result<PublishReceipt, HelperError> {
        let resp = self
            .sns
            .publish()
            .topic_arn(topic_arn)
            .message(message)
            .send()
            .await
            .map_err(|e| translate(Operation::Publish, e))?;

        Ok(PublishReceipt {
            message_id: resp.message_id().map(str::to_owned),
            sequence_number: resp.sequence_number().map(str::to_owned),
        })
    }

    async fn subscribe_queue(
        &self,
        topic_arn: &str,
        queue_arn: &str,
    ) -> Result<SubscriptionReceipt, HelperError> {
        let resp = self
            .sns
            .subscribe()
            .protocol(SQS_PROTOCOL)
            .topic_arn(topic_arn)
            .endpoint(queue_arn)
            .send()
            .await
            .map_err(|e| translate(Operation::Subscribe, e))?;

        Ok(SubscriptionReceipt {
            subscription_arn: resp.subscription_arn().map(str::to_owned),
        })
    }
}
