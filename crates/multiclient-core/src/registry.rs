use multiclient_common::error::{MulticlientError, Result};
use multiclient_common::GlobalConfig;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::client::{ClientConfig, ClientFactory};
use crate::config::MultiClientConfig;
use crate::worker::{Worker, WorkerStatus};

/// Fixed, index-addressed set of liteserver workers.
///
/// Built once at startup from the partitioned global config. Index `i`
/// always refers to the i-th liteserver of the original document; workers
/// are never added, removed or reordered afterwards.
#[derive(Debug)]
pub struct WorkerRegistry<C> {
    workers: Vec<Worker<C>>,
}

impl<C> WorkerRegistry<C> {
    /// Creates a registry from already opened connections.
    ///
    /// # Errors
    ///
    /// Returns `NoLiteServers` if `clients` is empty.
    pub fn from_clients(clients: Vec<C>) -> Result<Self> {
        if clients.is_empty() {
            return Err(MulticlientError::NoLiteServers);
        }
        Ok(Self {
            workers: clients.into_iter().map(Worker::new).collect(),
        })
    }

    /// Reads and partitions the global config, prepares the key store and
    /// opens one connection per liteserver.
    ///
    /// # Errors
    ///
    /// Startup is aborted when:
    /// - the global config cannot be read (`ConfigRead`) or parsed
    /// - the config lists no liteservers (`NoLiteServers`)
    /// - resetting the key store fails (`Io`)
    /// - the factory fails to open any connection
    pub async fn bootstrap<F>(config: &MultiClientConfig, factory: &F) -> Result<Self>
    where
        F: ClientFactory<Client = C>,
    {
        let text = tokio::fs::read_to_string(&config.global_config_path)
            .await
            .map_err(|source| MulticlientError::ConfigRead {
                path: config.global_config_path.clone(),
                source,
            })?;

        let partitioned = GlobalConfig::parse(&text)?.partition()?;

        if let Some(root) = &config.key_store_root {
            if config.reset_key_store {
                reset_key_store(root).await?;
            }
        }

        info!("starting {} client workers", partitioned.len());

        let clients = partitioned
            .into_iter()
            .enumerate()
            .map(|(index, doc)| {
                let client_config = ClientConfig {
                    global_config: serde_json::to_string(&doc)?,
                    key_store: config
                        .key_store_root
                        .as_deref()
                        .map(|root| worker_key_store(root, index)),
                    blockchain_name: config.blockchain_name.clone(),
                };
                factory.connect(index, client_config)
            })
            .collect::<Result<Vec<_>>>()?;

        Self::from_clients(clients)
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Worker<C>> {
        self.workers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Worker<C>> {
        self.workers.get_mut(index)
    }

    pub fn workers(&self) -> &[Worker<C>] {
        &self.workers
    }

    pub fn workers_mut(&mut self) -> &mut [Worker<C>] {
        &mut self.workers
    }

    pub fn snapshot(&self) -> Vec<WorkerStatus> {
        self.workers
            .iter()
            .enumerate()
            .map(|(index, worker)| worker.status(index))
            .collect()
    }
}

/// Key-store directory of the worker at `index`.
pub fn worker_key_store(root: &Path, index: usize) -> PathBuf {
    root.join(format!("ls_{}", index))
}

/// Wipes the key-store root and recreates it empty.
async fn reset_key_store(root: &Path) -> Result<()> {
    if tokio::fs::try_exists(root).await? {
        info!("resetting key store at {}", root.display());
        tokio::fs::remove_dir_all(root).await?;
    }
    tokio::fs::create_dir_all(root).await?;
    Ok(())
}
