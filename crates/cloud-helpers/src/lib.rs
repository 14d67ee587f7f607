//! Thin helpers over SNS, SQS, and Secrets Manager, plus passphrase
//! encryption of `.env` files.
//!
//! Every provider operation is a direct pass-through: arguments are checked,
//! the call is forwarded, and provider failures are translated into
//! [`HelperError`]. There is no retry, batching, or result caching.
//!
//! Use a [`CloudHelpers`] handle, or the free functions at the crate root,
//! which share one handle built from the environment on first use:
//!
//! ```no_run
//! # async fn run() -> Result<(), cloud_helpers::HelperError> {
//! let receipt = cloud_helpers::publish_sns_message(
//!     r#"{"order":42}"#,
//!     "arn:aws:sns:us-east-1:123456789012:orders",
//! )
//! .await?;
//! println!("{:?}", receipt.message_id);
//! # Ok(())
//! # }
//! ```

pub mod aws;
pub mod config;
pub mod envfile;
mod error;
mod helpers;
pub mod messaging;
pub mod queue;
pub mod secrets;

pub use common::protocol::{PublishReceipt, QueueMessage, ReceiveOptions, SubscriptionReceipt};
pub use common::{Direction, HelperError, Operation};
pub use config::Settings;
pub use envfile::{CipherError, GpgCipher, PassphraseCipher, DEFAULT_ENV_OUTPUT};
pub use helpers::{
    decrypt_env_file, delete_sqs_message, encrypt_env_file, poll_sqs_message,
    publish_sns_message, retrieve_secret, shared, subscribe_sqs_to_sns, CloudHelpers,
};
pub use secrecy::SecretString;
