//! Secret retrieval from Secrets Manager.
//!
//! Secrets are expected to hold a JSON document in their string value. The
//! value is never logged.

pub mod manager;

use async_trait::async_trait;
use common::HelperError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::require;

/// Read side of the secrets provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretSource: Send + Sync {
    /// Fetch the string value of `secret_id` (a name or ARN).
    ///
    /// `Ok(None)` means the secret exists but only has a binary value.
    async fn secret_string(&self, secret_id: &str) -> Result<Option<String>, HelperError>;
}

/// Fetch `secret_name` and parse its string value as JSON.
///
/// # Errors
///
/// Returns [`HelperError::MalformedSecret`] if the secret has no string value
/// or the value is not JSON, otherwise whatever the source reports.
pub async fn retrieve_secret<S>(source: &S, secret_name: &str) -> Result<Value, HelperError>
where
    S: SecretSource + ?Sized,
{
    retrieve_secret_as(source, secret_name).await
}

/// Fetch `secret_name` and deserialise its JSON string value into `T`.
///
/// # Errors
///
/// Same as [`retrieve_secret`], plus [`HelperError::MalformedSecret`] when the
/// JSON does not match `T`.
pub async fn retrieve_secret_as<T, S>(source: &S, secret_name: &str) -> Result<T, HelperError>
where
    T: DeserializeOwned,
    S: SecretSource + ?Sized,
{
    require("secret name", secret_name)?;
    debug!(secret = %secret_name, "retrieving secret");

    let raw = match source.secret_string(secret_name).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            warn!(secret = %secret_name, "secret has no string value");
            return Err(HelperError::MalformedSecret(format!(
                "secret {secret_name} has no string value"
            )));
        }
        Err(e) => {
            warn!(secret = %secret_name, error = %e, "secret retrieval failed");
            return Err(e);
        }
    };

    let parsed = serde_json::from_str(&raw).map_err(|e| {
        // serde_json errors only carry position, never the input.
        HelperError::MalformedSecret(format!("secret {secret_name} is not valid JSON: {e}"))
    })?;

    info!(secret = %secret_name, "secret retrieved");
    Ok(parsed)
}
