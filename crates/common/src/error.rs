//! Common error types shared across crates.

use std::fmt;

use thiserror::Error;

/// A provider operation exposed by the helper layer.
///
/// Used to prefix provider failures so callers see which call failed without
/// inspecting the provider's own error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// SNS `Publish`.
    Publish,
    /// SQS `ReceiveMessage`.
    Poll,
    /// SQS `DeleteMessage`.
    Delete,
    /// SNS `Subscribe` with the `sqs` protocol.
    Subscribe,
    /// Secrets Manager `GetSecretValue`.
    RetrieveSecret,
}

impl Operation {
    /// Human-readable prefix used when this operation fails.
    pub fn failure_prefix(self) -> &'static str {
        match self {
            Operation::Publish => "Failed to publish message to SNS topic",
            Operation::Poll => "Failed to poll messages from SQS queue",
            Operation::Delete => "Failed to delete message from SQS queue",
            Operation::Subscribe => "Failed to subscribe SQS queue to SNS topic",
            Operation::RetrieveSecret => "Failed to retrieve secret from Secrets Manager",
        }
    }
}

/// Direction of an environment-file transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    /// Noun form, e.g. for "decryption failed".
    pub fn noun(self) -> &'static str {
        match self {
            Direction::Encrypt => "encryption",
            Direction::Decrypt => "decryption",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Encrypt => f.write_str("encrypt"),
            Direction::Decrypt => f.write_str("decrypt"),
        }
    }
}

/// Generic error returned by every helper operation.
///
/// Provider-specific failures (SDK errors, tool exit codes) are flattened into
/// these variants so callers never depend on the provider's error types.
#[derive(Debug, Error)]
pub enum HelperError {
    /// No credentials could be resolved, or only half of a key pair was given.
    #[error("AWS credentials are missing or incomplete.")]
    MissingCredentials,

    /// The provider rejected or failed the call.
    #[error("{}: {message}", .operation.failure_prefix())]
    Provider {
        operation: Operation,
        message: String,
    },

    /// An argument was rejected before reaching the provider.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The secret exists but its value is not usable JSON.
    #[error("Failed to retrieve secret from Secrets Manager: {0}")]
    MalformedSecret(String),

    /// Reading, transforming, or writing an environment file failed.
    #[error("Failed to {direction} environment file: {message}")]
    EnvFile {
        direction: Direction,
        message: String,
    },

    /// Settings could not be loaded or are inconsistent.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl HelperError {
    /// Shorthand for a [`HelperError::Provider`] failure.
    pub fn provider(operation: Operation, message: impl Into<String>) -> Self {
        HelperError::Provider {
            operation,
            message: message.into(),
        }
    }

    /// Shorthand for a [`HelperError::EnvFile`] failure.
    pub fn env_file(direction: Direction, message: impl fmt::Display) -> Self {
        HelperError::EnvFile {
            direction,
            message: message.to_string(),
        }
    }

    /// Returns `true` if the failure was caused by missing credentials.
    pub fn is_credentials(&self) -> bool {
        matches!(self, HelperError::MissingCredentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_message_is_fixed() {
        assert_eq!(
            HelperError::MissingCredentials.to_string(),
            "AWS credentials are missing or incomplete."
        );
        assert!(HelperError::MissingCredentials.is_credentials());
    }

    #[test]
    fn provider_message_carries_operation_prefix() {
        let e = HelperError::provider(Operation::Publish, "NotFound: Topic does not exist");
        assert_eq!(
            e.to_string(),
            "Failed to publish message to SNS topic: NotFound: Topic does not exist"
        );
        assert!(!e.is_credentials());
    }

    #[test]
    fn every_operation_has_distinct_prefix() {
        let ops = [
            Operation::Publish,
            Operation::Poll,
            Operation::Delete,
            Operation::Subscribe,
            Operation::RetrieveSecret,
        ];
        let mut prefixes: Vec<_> = ops.iter().map(|o| o.failure_prefix()).collect();
        prefixes.sort_unstable();
        prefixes.dedup();
        assert_eq!(prefixes.len(), ops.len());
    }

    #[test]
    fn direction_noun_forms() {
        assert_eq!(Direction::Encrypt.noun(), "encryption");
        assert_eq!(Direction::Decrypt.noun(), "decryption");
    }

    #[test]
    fn env_file_message_names_direction() {
        let e = HelperError::env_file(Direction::Decrypt, "bad passphrase");
        assert_eq!(
            e.to_string(),
            "Failed to decrypt environment file: bad passphrase"
        );
        let e = HelperError::env_file(Direction::Encrypt, "disk full");
        assert!(e.to_string().starts_with("Failed to encrypt environment file"));
    }
}
