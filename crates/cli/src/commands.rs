//! Command-line surface and dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cloud_helpers::{CloudHelpers, ReceiveOptions, SecretString, DEFAULT_ENV_OUTPUT};
use serde_json::{json, Value};

/// Publish, poll, and read secrets on AWS; encrypt and decrypt `.env` files.
#[derive(Debug, Parser)]
#[command(name = "cloudctl", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Publish a message to an SNS topic.
    Publish {
        /// Topic ARN.
        #[arg(long)]
        topic: String,
        /// Message body.
        #[arg(long)]
        message: String,
    },

    /// Receive messages from an SQS queue.
    Poll {
        /// Queue URL.
        #[arg(long)]
        queue_url: String,
        #[arg(long, default_value_t = ReceiveOptions::DEFAULT_MAX_MESSAGES)]
        max_messages: i32,
        #[arg(long, default_value_t = ReceiveOptions::DEFAULT_WAIT_TIME_SECONDS)]
        wait_time_seconds: i32,
    },

    /// Delete a received message from an SQS queue.
    Delete {
        /// Queue URL.
        #[arg(long)]
        queue_url: String,
        /// Receipt handle returned by `poll`.
        #[arg(long)]
        receipt_handle: String,
    },

    /// Subscribe an SQS queue to an SNS topic.
    Subscribe {
        #[arg(long)]
        queue_arn: String,
        #[arg(long)]
        topic_arn: String,
    },

    /// Print a Secrets Manager secret parsed as JSON.
    Secret {
        /// Secret name or ARN.
        name: String,
    },

    /// Encrypt a plaintext env file with a passphrase.
    EncryptEnv {
        #[arg(long, default_value = DEFAULT_ENV_OUTPUT)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long, env = "ENV_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Decrypt an encrypted env file with a passphrase.
    DecryptEnv {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value = DEFAULT_ENV_OUTPUT)]
        output: PathBuf,
        #[arg(long, env = "ENV_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

/// Run `command` and return its JSON result.
pub async fn run(command: Command, helpers: &CloudHelpers) -> Result<Value> {
    let out = match command {
        Command::Publish { topic, message } => {
            serde_json::to_value(helpers.publish_sns_message(&message, &topic).await?)?
        }
        Command::Poll {
            queue_url,
            max_messages,
            wait_time_seconds,
        } => {
            let options = ReceiveOptions {
                max_messages,
                wait_time_seconds,
            };
            serde_json::to_value(helpers.poll_sqs_message(&queue_url, options).await?)?
        }
        Command::Delete {
            queue_url,
            receipt_handle,
        } => {
            helpers
                .delete_sqs_message(&queue_url, &receipt_handle)
                .await?;
            json!({ "deleted": true })
        }
        Command::Subscribe {
            queue_arn,
            topic_arn,
        } => serde_json::to_value(helpers.subscribe_sqs_to_sns(&queue_arn, &topic_arn).await?)?,
        Command::Secret { name } => helpers.retrieve_secret(&name).await?,
        Command::EncryptEnv {
            input,
            output,
            password,
        } => {
            let password = SecretString::from(password);
            helpers.encrypt_env_file(&password, &input, &output).await?;
            json!({ "encrypted": output.display().to_string() })
        }
        Command::DecryptEnv {
            input,
            output,
            password,
        } => {
            let password = SecretString::from(password);
            helpers.decrypt_env_file(&password, &input, &output).await?;
            json!({ "decrypted": output.display().to_string() })
        }
    };
    Ok(out)
}
