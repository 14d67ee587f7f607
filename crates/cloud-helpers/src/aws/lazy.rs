//! [`LazyClients`]: builds the [`AwsClients`] bundle on first use.

use std::sync::Arc;

use common::HelperError;
use tokio::sync::OnceCell;
use tracing::info;

use super::AwsClients;
use crate::config::Settings;

/// Settings plus a client bundle that is created on first access.
///
/// Cloning is cheap and clones share the same cell, so the bundle is built at
/// most once no matter how many handles ask for it concurrently. A failed
/// initialisation leaves the cell empty and the next call retries.
#[derive(Clone, Debug)]
pub struct LazyClients {
    settings: Arc<Settings>,
    cell: Arc<OnceCell<AwsClients>>,
}

impl LazyClients {
    /// Create an uninitialised handle for `settings`.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            cell: Arc::new(OnceCell::new()),
        }
    }

    /// Wrap an already-built bundle.
    pub fn from_clients(settings: Settings, clients: AwsClients) -> Self {
        Self {
            settings: Arc::new(settings),
            cell: Arc::new(OnceCell::new_with(Some(clients))),
        }
    }

    /// Settings the bundle is (or will be) built from.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns `true` once the bundle has been built.
    pub fn is_initialised(&self) -> bool {
        self.cell.initialized()
    }

    /// Borrow the client bundle, building it first if necessary.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`AwsClients::init`].
    pub async fn get(&self) -> Result<&AwsClients, HelperError> {
        self.cell
            .get_or_try_init(|| async {
                let clients = AwsClients::init(&self.settings).await?;
                info!("AWS clients ready");
                Ok::<_, HelperError>(clients)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            aws_access_key_id: Some("AKIDEXAMPLE".into()),
            aws_secret_access_key: Some("secret".into()),
            region: Some("us-east-1".into()),
            gpg_binary: "gpg".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn not_built_until_first_get() {
        let lazy = LazyClients::new(settings());
        assert!(!lazy.is_initialised());
        lazy.get().await.unwrap();
        assert!(lazy.is_initialised());
    }

    #[tokio::test]
    async fn clones_share_one_bundle() {
        let a = LazyClients::new(settings());
        let b = a.clone();
        a.get().await.unwrap();
        assert!(b.is_initialised());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_callers_share_one_bundle() {
        let lazy = LazyClients::new(settings());
        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..8 {
            let lazy = lazy.clone();
            tasks.spawn(async move {
                let clients = lazy.get().await.unwrap();
                clients as *const AwsClients as usize
            });
        }

        let mut addrs = Vec::new();
        while let Some(addr) = tasks.join_next().await {
            addrs.push(addr.unwrap());
        }
        let first = lazy.get().await.unwrap();
        assert_eq!(addrs.len(), 8);
        assert!(addrs
            .iter()
            .all(|&a| std::ptr::eq(a as *const AwsClients, first)));
    }

    #[tokio::test]
    async fn failed_init_leaves_cell_empty() {
        let lazy = LazyClients::new(Settings {
            aws_secret_access_key: None,
            ..settings()
        });
        assert!(lazy.get().await.unwrap_err().is_credentials());
        assert!(!lazy.is_initialised());
    }
}
