//! Passphrase encryption and decryption of `.env` style files.
//!
//! # Decrypted output
//!
//! Decrypted files are normalised before they are written: every line is
//! trimmed, blank lines are dropped, and lines are joined with `\n` with no
//! trailing newline.
//!
//! Plaintext buffers are zeroised when dropped. Neither plaintext nor
//! passphrases are logged.

pub mod gpg;

pub use gpg::GpgCipher;

use std::path::Path;

use async_trait::async_trait;
use common::{Direction, HelperError};
use secrecy::SecretString;
use thiserror::Error;
use tracing::{info, warn};
use zeroize::Zeroizing;

/// Output path used by [`decrypt_env_file`] callers that have no preference.
pub const DEFAULT_ENV_OUTPUT: &str = ".env";

/// Errors produced by a [`PassphraseCipher`].
#[derive(Debug, Error)]
pub enum CipherError {
    /// The passphrase is empty or spans several lines.
    #[error("passphrase must be a single non-empty line")]
    InvalidPassphrase,

    /// The encryption tool could not be started.
    #[error("failed to start {binary}: {source}")]
    Spawn {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// The tool's stdin pipe was not available after spawning.
    #[error("encryption tool stdin unavailable")]
    StdinUnavailable,

    /// I/O with the running tool failed.
    #[error("i/o error talking to encryption tool: {0}")]
    Io(#[source] std::io::Error),

    /// The tool ran but reported failure.
    #[error("{} failed (exit code {}): {stderr}", .direction.noun(), .code.map_or_else(|| "none".to_owned(), |c| c.to_string()))]
    Failed {
        direction: Direction,
        code: Option<i32>,
        stderr: String,
    },
}

/// Symmetric, passphrase-keyed encryption of byte buffers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PassphraseCipher: Send + Sync {
    async fn encrypt(
        &self,
        plaintext: &[u8],
        passphrase: &SecretString,
    ) -> Result<Vec<u8>, CipherError>;

    async fn decrypt(
        &self,
        ciphertext: &[u8],
        passphrase: &SecretString,
    ) -> Result<Vec<u8>, CipherError>;
}

/// Decrypt `env_file` with `password` and write the normalised plaintext to
/// `output_file`.
///
/// # Errors
///
/// Every failure (unreadable input, wrong passphrase, non-UTF-8 plaintext,
/// unwritable output) is reported as [`HelperError::EnvFile`] with
/// [`Direction::Decrypt`].
pub async fn decrypt_env_file<C>(
    cipher: &C,
    password: &SecretString,
    env_file: impl AsRef<Path>,
    output_file: impl AsRef<Path>,
) -> Result<(), HelperError>
where
    C: PassphraseCipher + ?Sized,
{
    let (input, output) = (env_file.as_ref(), output_file.as_ref());
    let fail = |msg: String| {
        warn!(input = %input.display(), error = %msg, "env file decryption failed");
        HelperError::env_file(Direction::Decrypt, msg)
    };

    let ciphertext = tokio::fs::read(input)
        .await
        .map_err(|e| fail(format!("cannot read {}: {e}", input.display())))?;

    let plaintext = Zeroizing::new(
        cipher
            .decrypt(&ciphertext, password)
            .await
            .map_err(|e| fail(e.to_string()))?,
    );

    let text = std::str::from_utf8(&plaintext)
        .map_err(|_| fail("decrypted data is not valid UTF-8".into()))?;
    let normalised = Zeroizing::new(normalise_lines(text));

    tokio::fs::write(output, normalised.as_bytes())
        .await
        .map_err(|e| fail(format!("cannot write {}: {e}", output.display())))?;

    info!(input = %input.display(), output = %output.display(), "env file decrypted");
    Ok(())
}

/// Encrypt the text file `input_env_file` with `password` and write the
/// ciphertext to `output_env_file`.
///
/// # Errors
///
/// Every failure is reported as [`HelperError::EnvFile`] with
/// [`Direction::Encrypt`].
pub async fn encrypt_env_file<C>(
    cipher: &C,
    password: &SecretString,
    input_env_file: impl AsRef<Path>,
    output_env_file: impl AsRef<Path>,
) -> Result<(), HelperError>
where
    C: PassphraseCipher + ?Sized,
{
    let (input, output) = (input_env_file.as_ref(), output_env_file.as_ref());
    let fail = |msg: String| {
        warn!(input = %input.display(), error = %msg, "env file encryption failed");
        HelperError::env_file(Direction::Encrypt, msg)
    };

    let plaintext = Zeroizing::new(
        tokio::fs::read_to_string(input)
            .await
            .map_err(|e| fail(format!("cannot read {}: {e}", input.display())))?,
    );

    let ciphertext = cipher
        .encrypt(plaintext.as_bytes(), password)
        .await
        .map_err(|e| fail(format!("Encryption failed: {e}")))?;

    tokio::fs::write(output, &ciphertext)
        .await
        .map_err(|e| fail(format!("cannot write {}: {e}", output.display())))?;

    info!(input = %input.display(), output = %output.display(), "env file encrypted");
    Ok(())
}

/// Trim every line, drop blank ones, and join with `\n`.
///
/// Lines break on `\n`, `\r`, and the other Unicode line separators, so files
/// with classic Mac endings or form feeds split the same way.
pub fn normalise_lines(text: &str) -> String {
    // `\r\n` leaves an empty piece between the two, dropped below.
    text.split(is_line_break)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}
