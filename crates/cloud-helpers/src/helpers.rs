//! [`CloudHelpers`]: one handle exposing every helper operation.
//!
//! Provider clients are created on the first provider call, not when the
//! handle is built, so env-file operations never touch AWS configuration.

use std::path::Path;
use std::sync::Arc;

use common::protocol::{PublishReceipt, QueueMessage, ReceiveOptions, SubscriptionReceipt};
use common::HelperError;
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::OnceCell;

use crate::aws::LazyClients;
use crate::config::Settings;
use crate::envfile::{self, GpgCipher, PassphraseCipher};
use crate::{messaging, queue, secrets};

/// Lazily-connected provider clients plus a passphrase cipher.
#[derive(Clone)]
pub struct CloudHelpers {
    clients: LazyClients,
    cipher: Arc<dyn PassphraseCipher>,
}

impl CloudHelpers {
    /// Build a handle from `settings`; the cipher is a [`GpgCipher`] configured
    /// from the same settings.
    pub fn new(settings: Settings) -> Self {
        let cipher = GpgCipher::from_settings(&settings);
        Self {
            clients: LazyClients::new(settings),
            cipher: Arc::new(cipher),
        }
    }

    /// Build a handle from environment variables.
    ///
    /// # Errors
    ///
    /// Propagates [`Settings::from_env`] failures.
    pub fn from_env() -> Result<Self, HelperError> {
        Ok(Self::new(Settings::from_env()?))
    }

    /// Replace the passphrase cipher.
    pub fn with_cipher(mut self, cipher: impl PassphraseCipher + 'static) -> Self {
        self.cipher = Arc::new(cipher);
        self
    }

    /// The lazily-initialised client bundle.
    pub fn clients(&self) -> &LazyClients {
        &self.clients
    }

    /// See [`messaging::publish_sns_message`].
    pub async fn publish_sns_message(
        &self,
        data: &str,
        topic: &str,
    ) -> Result<PublishReceipt, HelperError> {
        let aws = self.clients.get().await?;
        messaging::publish_sns_message(aws, data, topic).await
    }

    /// See [`messaging::subscribe_sqs_to_sns`].
    pub async fn subscribe_sqs_to_sns(
        &self,
        queue_arn: &str,
        topic_arn: &str,
    ) -> Result<SubscriptionReceipt, HelperError> {
        let aws = self.clients.get().await?;
        messaging::subscribe_sqs_to_sns(aws, queue_arn, topic_arn).await
    }

    /// See [`queue::poll_sqs_message`].
    pub async fn poll_sqs_message(
        &self,
        queue_url: &str,
        options: ReceiveOptions,
    ) -> Result<Vec<QueueMessage>, HelperError> {
        let aws = self.clients.get().await?;
        queue::poll_sqs_message(aws, queue_url, options).await
    }

    /// See [`queue::delete_sqs_message`].
    pub async fn delete_sqs_message(
        &self,
        queue_url: &str,
        receipt_handle: &str,
    ) -> Result<(), HelperError> {
        let aws = self.clients.get().await?;
        queue::delete_sqs_message(aws, queue_url, receipt_handle).await
    }

    /// See [`secrets::retrieve_secret`].
    pub async fn retrieve_secret(&self, secret_name: &str) -> Result<Value, HelperError> {
        let aws = self.clients.get().await?;
        secrets::retrieve_secret(aws, secret_name).await
    }

    /// See [`secrets::retrieve_secret_as`].
    pub async fn retrieve_secret_as<T: DeserializeOwned>(
        &self,
        secret_name: &str,
    ) -> Result<T, HelperError> {
        let aws = self.clients.get().await?;
        secrets::retrieve_secret_as(aws, secret_name).await
    }

    /// See [`envfile::decrypt_env_file`].
    pub async fn decrypt_env_file(
        &self,
        password: &SecretString,
        env_file: impl AsRef<Path>,
        output_file: impl AsRef<Path>,
    ) -> Result<(), HelperError> {
        envfile::decrypt_env_file(self.cipher.as_ref(), password, env_file, output_file).await
    }

    /// See [`envfile::encrypt_env_file`].
    pub async fn encrypt_env_file(
        &self,
        password: &SecretString,
        input_env_file: impl AsRef<Path>,
        output_env_file: impl AsRef<Path>,
    ) -> Result<(), HelperError> {
        envfile::encrypt_env_file(
            self.cipher.as_ref(),
            password,
            input_env_file,
            output_env_file,
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Process-wide handle
// ---------------------------------------------------------------------------

static SHARED: OnceCell<CloudHelpers> = OnceCell::const_new();

/// The process-wide handle, built from the environment on first use.
///
/// # Errors
///
/// Propagates [`Settings::from_env`] failures; the next call retries.
pub async fn shared() -> Result<&'static CloudHelpers, HelperError> {
    SHARED
        .get_or_try_init(|| async { CloudHelpers::from_env() })
        .await
}

/// Publish `data` to `topic` using the process-wide handle.
pub async fn publish_sns_message(data: &str, topic: &str) -> Result<PublishReceipt, HelperError> {
    shared().await?.publish_sns_message(data, topic).await
}

/// Poll `queue_url` once using the process-wide handle.
pub async fn poll_sqs_message(
    queue_url: &str,
    max_messages: i32,
    wait_time_seconds: i32,
) -> Result<Vec<QueueMessage>, HelperError> {
    let options = ReceiveOptions {
        max_messages,
        wait_time_seconds,
    };
    shared().await?.poll_sqs_message(queue_url, options).await
}

/// Delete a message from `queue_url` using the process-wide handle.
pub async fn delete_sqs_message(queue_url: &str, receipt_handle: &str) -> Result<(), HelperError> {
    shared()
        .await?
        .delete_sqs_message(queue_url, receipt_handle)
        .await
}

/// Subscribe `queue_arn` to `topic_arn` using the process-wide handle.
pub async fn subscribe_sqs_to_sns(
    queue_arn: &str,
    topic_arn: &str,
) -> Result<SubscriptionReceipt, HelperError> {
    shared()
        .await?
        .subscribe_sqs_to_sns(queue_arn, topic_arn)
        .await
}

/// Fetch and parse `secret_name` using the process-wide handle.
pub async fn retrieve_secret(secret_name: &str) -> Result<Value, HelperError> {
    shared().await?.retrieve_secret(secret_name).await
}

/// Decrypt `env_file` into `output_file` using the process-wide handle.
pub async fn decrypt_env_file(
    password: &SecretString,
    env_file: impl AsRef<Path>,
    output_file: impl AsRef<Path>,
) -> Result<(), HelperError> {
    shared()
        .await?
        .decrypt_env_file(password, env_file, output_file)
        .await
}

/// Encrypt `input_env_file` into `output_env_file` using the process-wide handle.
pub async fn encrypt_env_file(
    password: &SecretString,
    input_env_file: impl AsRef<Path>,
    output_env_file: impl AsRef<Path>,
) -> Result<(), HelperError> {
    shared()
        .await?
        .encrypt_env_file(password, input_env_file, output_env_file)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envfile::MockPassphraseCipher;

    fn settings() -> Settings {
        Settings {
            aws_access_key_id: Some("AKIDEXAMPLE".into()),
            aws_secret_access_key: Some("secret".into()),
            region: Some("us-east-1".into()),
            gpg_binary: "gpg".into(),
            gpg_armor: true,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn half_credentials_fail_before_any_request() {
        let helpers = CloudHelpers::new(Settings {
            aws_secret_access_key: None,
            ..settings()
        });
        let err = helpers
            .publish_sns_message("body", "arn:aws:sns:us-east-1:1:t")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "AWS credentials are missing or incomplete.");
        assert!(!helpers.clients().is_initialised());
    }

    #[tokio::test]
    async fn first_provider_call_builds_clients() {
        let helpers = CloudHelpers::new(settings());
        assert!(!helpers.clients().is_initialised());

        let err = helpers
            .delete_sqs_message("https://sqs.us-east-1.amazonaws.com/1/q", " ")
            .await
            .unwrap_err();
        assert!(matches!(err, HelperError::InvalidInput(_)));
        assert!(helpers.clients().is_initialised());
    }

    #[tokio::test]
    async fn env_file_operations_do_not_build_clients() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join(".env");
        let sealed = dir.path().join(".env.gpg");
        tokio::fs::write(&plain, "TOKEN=abc\n").await.unwrap();

        let mut cipher = MockPassphraseCipher::new();
        cipher
            .expect_encrypt()
            .returning(|data, _| Ok(data.iter().rev().copied().collect()));

        let helpers = CloudHelpers::new(settings()).with_cipher(cipher);
        let pw = SecretString::from("pw".to_owned());
        helpers.encrypt_env_file(&pw, &plain, &sealed).await.unwrap();

        assert_eq!(tokio::fs::read(&sealed).await.unwrap(), b"\ncba=NEKOT");
        assert!(!helpers.clients().is_initialised());
    }

    #[tokio::test]
    async fn env_file_operations_ignore_half_key_pair() {
        let dir = tempfile::tempdir().unwrap();
        let half = Settings {
            aws_secret_access_key: None,
            ..settings()
        };
        half.validate().unwrap();

        let mut cipher = MockPassphraseCipher::new();
        cipher.expect_encrypt().never();

        let helpers = CloudHelpers::new(half).with_cipher(cipher);
        let pw = SecretString::from("pw".to_owned());
        let err = helpers
            .encrypt_env_file(&pw, dir.path().join("absent.env"), dir.path().join("out.gpg"))
            .await
            .unwrap_err();
        assert!(err
            .to_string()
            .starts_with("Failed to encrypt environment file: cannot read"));
        assert!(!helpers.clients().is_initialised());
    }
}
