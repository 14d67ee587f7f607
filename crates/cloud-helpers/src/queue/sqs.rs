//! [`MessageQueue`] implementation backed by the SQS client.

use async_trait::async_trait;
use aws_sdk_sqs::types::{Message, MessageSystemAttributeName};
use common::protocol::{QueueMessage, ReceiveOptions};
use common::{HelperError, Operation};

use super::MessageQueue;
use crate::aws::AwsClients;
use crate::error::translate;

#[async_trait]
impl MessageQueue for AwsClients {
    async fn receive(
        &self,
        queue_url: &str,
        options: ReceiveOptions,
    ) -> Result<Vec<QueueMessage>, HelperError> {
        let resp = self
            .sqs
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(options.max_messages)
            .wait_time_seconds(options.wait_time_seconds)
            .message_system_attribute_names(MessageSystemAttributeName::All)
            .send()
            .await
            .map_err(|e| translate(Operation::Poll, e))?;

        Ok(resp.messages().iter().map(to_queue_message).collect())
    }

    async fn delete(&self, queue_url: &str, receipt_handle: &str) -> Result<(), HelperError> {
        self.sqs
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|e| translate(Operation::Delete, e))?;
        Ok(())
    }
}

fn to_queue_message(m: &Message) -> QueueMessage {
    QueueMessage {
        message_id: m.message_id().map(str::to_owned),
        receipt_handle: m.receipt_handle().map(str::to_owned),
        body: m.body().map(str::to_owned),
        md5_of_body: m.md5_of_body().map(str::to_owned),
        attributes: m
            .attributes()
            .map(|attrs| {
                attrs
                    .iter()
                    .map(|(k, v)| (k.as_str().to_owned(), v.clone()))
                    .collect()
            })
            .unwrap_or_default(),
    }
}
