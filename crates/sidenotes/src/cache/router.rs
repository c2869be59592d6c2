use super::clients::{ClientId, Clients};
use super::fetcher::Fetcher;
use super::http::{Request, Response};
use super::notifications::{self, NotificationSink};
use super::partition::CacheStorage;
use super::routes::{RouteTable, Strategy};
use super::{share, strategy};
use crate::config::CacheConfig;
use reqwest::Method;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to cache {asset}: {reason}")]
    Install { asset: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// `activate` before a successful `install`.
    #[error("Cannot activate: install has not completed")]
    NotInstalled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteOutcome {
    Respond(Response),
    /// Not ours: the request goes to the network untouched.
    Passthrough,
    /// Nothing cached and the network failed.
    NoResponse,
}

impl RouteOutcome {
    pub fn response(self) -> Option<Response> {
        match self {
            RouteOutcome::Respond(response) => Some(response),
            _ => None,
        }
    }
}

/// Offline-first request router: decides per request whether to answer
/// from the network, from a partition, or from the offline placeholder.
pub struct CacheRouter<F: Fetcher + 'static> {
    config: CacheConfig,
    origin: Url,
    routes: RouteTable,
    storage: Arc<CacheStorage>,
    fetcher: Arc<F>,
    clients: Arc<Clients>,
    refreshes: Mutex<Vec<JoinHandle<()>>>,
    installed: AtomicBool,
}

impl<F: Fetcher + 'static> CacheRouter<F> {
    pub fn new(config: CacheConfig, fetcher: F) -> Result<Self, CacheError> {
        let storage = Arc::new(CacheStorage::new(config.max_entries));
        Self::with_storage(config, fetcher, storage)
    }

    /// Share partitions with an earlier router, as a new version would find
    /// the previous version's caches.
    pub fn with_storage(
        config: CacheConfig,
        fetcher: F,
        storage: Arc<CacheStorage>,
    ) -> Result<Self, CacheError> {
        let origin = config
            .origin_url()
            .map_err(|e| CacheError::InvalidUrl(e.to_string()))?;
        Ok(Self {
            routes: RouteTable::from_config(&config),
            config,
            origin,
            storage,
            fetcher: Arc::new(fetcher),
            clients: Arc::new(Clients::new()),
            refreshes: Mutex::new(Vec::new()),
            installed: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<CacheStorage> {
        &self.storage
    }

    pub fn clients(&self) -> &Arc<Clients> {
        &self.clients
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Absolute URL for a path on the application origin.
    pub fn url(&self, path: &str) -> Result<Url, CacheError> {
        self.origin
            .join(path)
            .map_err(|e| CacheError::InvalidUrl(format!("{path}: {e}")))
    }

    pub async fn handle(&self, request: Request) -> RouteOutcome {
        if request.url.origin() != self.origin.origin() {
            return RouteOutcome::Passthrough;
        }
        if request.method == Method::POST && request.url.path() == self.config.share_path {
            return RouteOutcome::Respond(share::handle(&self.clients, &request));
        }
        if request.method != Method::GET {
            return RouteOutcome::Passthrough;
        }

        let strategy = self.routes.classify(request.url.path());
        debug!(url = %request.url, %strategy, "Routing request");

        match strategy {
            Strategy::NetworkFirst => {
                let dynamic = self.storage.open(&self.config.dynamic_partition());
                RouteOutcome::Respond(
                    strategy::network_first(&*self.fetcher, &self.storage, &dynamic, &request)
                        .await,
                )
            }
            Strategy::CacheFirst => {
                let static_partition = self.storage.open(&self.config.static_partition());
                RouteOutcome::Respond(
                    strategy::cache_first(&*self.fetcher, &self.storage, &static_partition, &request)
                        .await,
                )
            }
            Strategy::StaleWhileRevalidate => {
                let partition = self.storage.open(&self.config.static_partition());
                let (response, refresh) =
                    strategy::stale_while_revalidate(Arc::clone(&self.fetcher), partition, request)
                        .await;
                if let Some(refresh) = refresh {
                    let mut refreshes = self.refreshes.lock().unwrap_or_else(|e| e.into_inner());
                    refreshes.retain(|h| !h.is_finished());
                    refreshes.push(refresh);
                }
                match response {
                    Some(response) => RouteOutcome::Respond(response),
                    None => RouteOutcome::NoResponse,
                }
            }
        }
    }

    /// Wait for outstanding background refreshes.
    pub async fn drain_refreshes(&self) {
        let handles = std::mem::take(&mut *self.refreshes.lock().unwrap_or_else(|e| e.into_inner()));
        for handle in handles {
            // A refresh that panicked has nothing left to store
            let _ = handle.await;
        }
    }

    /// Pre-populate the static partition with the install manifest.
    ///
    /// All assets must arrive with a 2xx status; otherwise nothing is stored.
    pub async fn install(&self) -> Result<usize, CacheError> {
        let mut fetched = Vec::with_capacity(self.config.install_manifest.len());
        for asset in &self.config.install_manifest {
            let url = self.url(asset)?;
            let response = self
                .fetcher
                .fetch(&Request::get(url.clone()))
                .await
                .map_err(|e| CacheError::Install {
                    asset: asset.clone(),
                    reason: e.to_string(),
                })?;
            if !response.is_success() {
                return Err(CacheError::Install {
                    asset: asset.clone(),
                    reason: format!("status {}", response.status),
                });
            }
            fetched.push((url, response));
        }

        let partition = self.storage.open(&self.config.static_partition());
        let count = fetched.len();
        for (url, response) in fetched {
            partition.put_url(&url, response);
        }
        self.installed.store(true, Ordering::SeqCst);
        info!(partition = partition.name(), assets = count, "Static assets cached");
        Ok(count)
    }

    pub fn is_installed(&self) -> bool {
        self.installed.load(Ordering::SeqCst)
    }

    /// Delete partitions left by other versions and take control of every
    /// open client. Returns the deleted partition names.
    ///
    /// Refused until [`CacheRouter::install`] has succeeded, so a failed
    /// install never purges the previous version's caches.
    pub fn activate(&self) -> Result<Vec<String>, CacheError> {
        if !self.is_installed() {
            warn!("Activation refused: install has not completed");
            return Err(CacheError::NotInstalled);
        }
        let owned = format!("{}-", self.config.prefix);
        let current = [
            self.config.static_partition(),
            self.config.dynamic_partition(),
        ];
        let stale: Vec<String> = self
            .storage
            .names()
            .into_iter()
            .filter(|name| name.starts_with(&owned) && !current.contains(name))
            .collect();
        for name in &stale {
            info!(partition = %name, "Deleting old cache");
            self.storage.delete(name);
        }
        let claimed = self.clients.claim();
        info!(deleted = stale.len(), clients = claimed, "Cache router activated");
        Ok(stale)
    }

    pub fn on_push(&self, sink: &dyn NotificationSink, payload: Option<&str>) {
        notifications::on_push(sink, payload);
    }

    pub fn on_notification_click(&self, action: &str) -> Option<ClientId> {
        notifications::on_notification_click(&self.clients, action)
    }

    pub fn on_sync(&self, tag: &str) -> bool {
        notifications::on_sync(tag)
    }
}
