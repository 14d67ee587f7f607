//! Settings loading and validation for the helper layer.
//!
//! All values are read from environment variables. Blank values are treated as
//! absent, so an exported-but-empty `REGION=` behaves like an unset one.

use std::fmt;

use aws_credential_types::Credentials;
use common::HelperError;
use serde::Deserialize;

/// Provider name attached to credentials taken from the environment.
const ENV_CREDENTIALS_PROVIDER: &str = "cloud-helpers-env";

/// Validated helper settings.
#[derive(Clone, Default, Deserialize)]
pub struct Settings {
    /// Static access key id. Must be paired with `aws_secret_access_key`.
    #[serde(default)]
    pub aws_access_key_id: Option<String>,

    /// Static secret access key. Must be paired with `aws_access_key_id`.
    #[serde(default)]
    pub aws_secret_access_key: Option<String>,

    /// Optional session token for temporary credentials.
    #[serde(default)]
    pub aws_session_token: Option<String>,

    /// Provider region (`REGION`).
    #[serde(default)]
    pub region: Option<String>,

    /// Endpoint override applied to every client, e.g. a local emulator.
    #[serde(default)]
    pub aws_endpoint_url: Option<String>,

    /// Encryption tool executable.
    #[serde(default = "default_gpg_binary")]
    pub gpg_binary: String,

    /// Home directory handed to the encryption tool.
    #[serde(default)]
    pub gnupghome: Option<String>,

    /// Whether encrypted output is ASCII-armoured.
    #[serde(default = "default_gpg_armor")]
    pub gpg_armor: bool,
}

fn default_gpg_binary() -> String {
    "gpg".into()
}
fn default_gpg_armor() -> bool {
    true
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("Settings")
            .field("aws_access_key_id", &self.aws_access_key_id)
            .field("aws_secret_access_key", &redact(&self.aws_secret_access_key))
            .field("aws_session_token", &redact(&self.aws_session_token))
            .field("region", &self.region)
            .field("aws_endpoint_url", &self.aws_endpoint_url)
            .field("gpg_binary", &self.gpg_binary)
            .field("gnupghome", &self.gnupghome)
            .field("gpg_armor", &self.gpg_armor)
            .finish()
    }
}

impl Settings {
    /// Load and validate settings from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`HelperError::Configuration`] if the environment cannot be
    /// deserialised or a field is unusable. Credentials are not checked here;
    /// see [`Settings::static_credentials`].
    pub fn from_env() -> Result<Self, HelperError> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .map_err(|e| {
                HelperError::Configuration(format!("failed to read environment: {e}"))
            })?;

        let s: Settings = cfg.try_deserialize().map_err(|e| {
            HelperError::Configuration(format!("failed to deserialise settings: {e}"))
        })?;

        s.validate()?;
        Ok(s)
    }

    /// Validate fields needed by every operation.
    ///
    /// The key pair is only checked when provider clients are built, so
    /// env-file operations work regardless of the AWS environment.
    pub fn validate(&self) -> Result<(), HelperError> {
        if self.gpg_binary.trim().is_empty() {
            return Err(HelperError::Configuration(
                "GPG_BINARY must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Region, if one was configured.
    pub fn region(&self) -> Option<&str> {
        non_blank(&self.region)
    }

    /// Endpoint override, if one was configured.
    pub fn endpoint_url(&self) -> Option<&str> {
        non_blank(&self.aws_endpoint_url)
    }

    /// Encryption tool home directory, if one was configured.
    pub fn gnupghome(&self) -> Option<&str> {
        non_blank(&self.gnupghome)
    }

    /// Static credentials from the environment.
    ///
    /// Returns `Ok(None)` when neither key is set, in which case the provider's
    /// default credential chain applies.
    ///
    /// # Errors
    ///
    /// Returns [`HelperError::MissingCredentials`] if exactly one of the two
    /// keys is set.
    pub fn static_credentials(&self) -> Result<Option<Credentials>, HelperError> {
        match (
            non_blank(&self.aws_access_key_id),
            non_blank(&self.aws_secret_access_key),
        ) {
            (Some(id), Some(secret)) => Ok(Some(Credentials::new(
                id,
                secret,
                non_blank(&self.aws_session_token).map(str::to_owned),
                None,
                ENV_CREDENTIALS_PROVIDER,
            ))),
            (None, None) => Ok(None),
            _ => Err(HelperError::MissingCredentials),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            gpg_binary: default_gpg_binary(),
            gpg_armor: default_gpg_armor(),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_are_correct() {
        assert_eq!(default_gpg_binary(), "gpg");
        assert!(default_gpg_armor());
    }

    #[test]
    fn no_keys_falls_back_to_default_chain() {
        let s = settings();
        assert!(s.validate().is_ok());
        assert!(s.static_credentials().unwrap().is_none());
    }

    #[test]
    fn full_key_pair_yields_static_credentials() {
        let s = Settings {
            aws_access_key_id: Some("AKIDEXAMPLE".into()),
            aws_secret_access_key: Some("wJalrXUtnFEMI".into()),
            ..settings()
        };
        let creds = s.static_credentials().unwrap().unwrap();
        assert_eq!(creds.access_key_id(), "AKIDEXAMPLE");
        assert!(creds.session_token().is_none());
    }

    #[test]
    fn half_key_pair_is_missing_credentials() {
        let s = Settings {
            aws_access_key_id: Some("AKIDEXAMPLE".into()),
            ..settings()
        };
        assert!(matches!(
            s.static_credentials(),
            Err(HelperError::MissingCredentials)
        ));
    }

    #[test]
    fn half_key_pair_still_validates() {
        let s = Settings {
            aws_secret_access_key: Some("wJalrXUtnFEMI".into()),
            ..settings()
        };
        assert!(s.validate().is_ok());
    }

    #[test]
    fn blank_values_count_as_absent() {
        let s = Settings {
            aws_access_key_id: Some("  ".into()),
            aws_secret_access_key: Some("".into()),
            region: Some(" ".into()),
            ..settings()
        };
        assert!(s.static_credentials().unwrap().is_none());
        assert!(s.region().is_none());
    }

    #[test]
    fn validate_rejects_empty_gpg_binary() {
        let s = Settings {
            gpg_binary: " ".into(),
            ..settings()
        };
        assert!(matches!(s.validate(), Err(HelperError::Configuration(_))));
    }

    #[test]
    fn debug_redacts_secret_key() {
        let s = Settings {
            aws_access_key_id: Some("AKIDEXAMPLE".into()),
            aws_secret_access_key: Some("super-secret".into()),
            ..settings()
        };
        let out = format!("{s:?}");
        assert!(!out.contains("super-secret"));
        assert!(out.contains("REDACTED"));
    }
}
