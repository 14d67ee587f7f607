//! [`GpgCipher`]: symmetric encryption through the GnuPG command-line tool.
//!
//! The tool runs in batch mode with loopback pinentry. The passphrase is the
//! first line written to its stdin (`--passphrase-fd 0`), followed by the
//! payload; the result is read from stdout.

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use common::Direction;
use secrecy::{ExposeSecret, SecretString};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;
use zeroize::Zeroizing;

use super::{CipherError, PassphraseCipher};
use crate::config::Settings;

/// Longest stderr excerpt kept in an error.
const STDERR_LIMIT: usize = 1024;

/// Passphrase cipher that shells out to `gpg`.
#[derive(Debug, Clone)]
pub struct GpgCipher {
    binary: PathBuf,
    homedir: Option<PathBuf>,
    armor: bool,
    cipher_algo: Option<String>,
}

impl GpgCipher {
    /// `gpg` from `PATH`, default home directory, armoured output.
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("gpg"),
            homedir: None,
            armor: true,
            cipher_algo: None,
        }
    }

    /// Build from the `GPG_*` / `GNUPGHOME` settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            binary: PathBuf::from(settings.gpg_binary.trim()),
            homedir: settings.gnupghome().map(PathBuf::from),
            armor: settings.gpg_armor,
            cipher_algo: None,
        }
    }

    pub fn with_binary(mut self, binary: impl Into<PathBuf>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_homedir(mut self, homedir: impl Into<PathBuf>) -> Self {
        self.homedir = Some(homedir.into());
        self
    }

    pub fn with_armor(mut self, armor: bool) -> Self {
        self.armor = armor;
        self
    }

    /// Symmetric algorithm name passed to `--cipher-algo` (e.g. `AES256`).
    pub fn with_cipher_algo(mut self, algo: impl Into<String>) -> Self {
        self.cipher_algo = Some(algo.into());
        self
    }

    fn args(&self, direction: Direction) -> Vec<OsString> {
        let mut args: Vec<OsString> = [
            "--batch",
            "--yes",
            "--no-tty",
            "--quiet",
            "--pinentry-mode",
            "loopback",
            "--passphrase-fd",
            "0",
        ]
        .iter()
        .map(OsString::from)
        .collect();

        if let Some(home) = &self.homedir {
            args.push("--homedir".into());
            args.push(home.into());
        }

        match direction {
            Direction::Encrypt => {
                args.push("--symmetric".into());
                if self.armor {
                    args.push("--armor".into());
                }
                if let Some(algo) = &self.cipher_algo {
                    args.push("--cipher-algo".into());
                    args.push(algo.into());
                }
            }
            Direction::Decrypt => args.push("--decrypt".into()),
        }

        args.push("--output".into());
        args.push("-".into());
        args
    }

    async fn run(
        &self,
        direction: Direction,
        input: &[u8],
        passphrase: &SecretString,
    ) -> Result<Vec<u8>, CipherError> {
        let secret = passphrase.expose_secret();
        if secret.is_empty() || secret.contains(['\n', '\r']) {
            return Err(CipherError::InvalidPassphrase);
        }

        let mut child = Command::new(&self.binary)
            .args(self.args(direction))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CipherError::Spawn {
                binary: self.binary.display().to_string(),
                source,
            })?;
        debug!(binary = %self.binary.display(), %direction, bytes = input.len(), "gpg started");

        let mut stdin = child.stdin.take().ok_or(CipherError::StdinUnavailable)?;
        let mut payload = Zeroizing::new(Vec::with_capacity(secret.len() + 1 + input.len()));
        payload.extend_from_slice(secret.as_bytes());
        payload.push(b'\n');
        payload.extend_from_slice(input);

        let writer = async move {
            let res = stdin.write_all(&payload).await;
            drop(stdin);
            res
        };
        let (written, output) = tokio::join!(writer, child.wait_with_output());
        let output = output.map_err(CipherError::Io)?;

        // The exit status wins over a broken pipe: gpg stops reading on failure.
        if !output.status.success() {
            return Err(CipherError::Failed {
                direction,
                code: output.status.code(),
                stderr: stderr_excerpt(&output.stderr),
            });
        }
        written.map_err(CipherError::Io)?;

        debug!(%direction, bytes = output.stdout.len(), "gpg finished");
        Ok(output.stdout)
    }
}

impl Default for GpgCipher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PassphraseCipher for GpgCipher {
    async fn encrypt(
        &self,
        plaintext: &[u8],
        passphrase: &SecretString,
    ) -> Result<Vec<u8>, CipherError> {
        self.run(Direction::Encrypt, plaintext, passphrase).await
    }

    async fn decrypt(
        &self,
        ciphertext: &[u8],
        passphrase: &SecretString,
    ) -> Result<Vec<u8>, CipherError> {
        self.run(Direction::Decrypt, ciphertext, passphrase).await
    }
}

fn stderr_excerpt(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    match text.char_indices().nth(STDERR_LIMIT) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}
