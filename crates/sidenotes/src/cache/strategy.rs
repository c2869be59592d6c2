//! The three caching strategies plus the offline placeholder.
//!
//! Network errors stop here: every function resolves to a response (or, for
//! stale-while-revalidate with nothing cached and no network, to `None`).

use super::fetcher::Fetcher;
use super::http::{Destination, Request, Response};
use super::partition::{CacheStorage, Partition};
use reqwest::StatusCode;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub const OFFLINE_PAGE: &str = "<html><body><h1>SideNotes is Offline</h1>\
<p>Your notes are still available in the cached version.</p></body></html>";

/// Fetch first; fall back to anything cached, then the offline placeholder.
/// Successful responses are stored in `dynamic`.
pub async fn network_first<F: Fetcher + ?Sized>(
    fetcher: &F,
    storage: &CacheStorage,
    dynamic: &Partition,
    request: &Request,
) -> Response {
    match fetcher.fetch(request).await {
        Ok(response) => {
            if response.is_success() {
                dynamic.put(request, response.clone());
            }
            response
        }
        Err(e) => {
            debug!(url = %request.url, error = %e, "Network failed, trying cache");
            storage
                .match_any(&request.url)
                .unwrap_or_else(|| offline_placeholder(storage, request))
        }
    }
}

/// Serve from any partition without touching the network; on a miss fetch
/// and store successful responses in `static_partition`.
pub async fn cache_first<F: Fetcher + ?Sized>(
    fetcher: &F,
    storage: &CacheStorage,
    static_partition: &Partition,
    request: &Request,
) -> Response {
    if let Some(cached) = storage.match_any(&request.url) {
        return cached;
    }
    match fetcher.fetch(request).await {
        Ok(response) => {
            if response.is_success() {
                static_partition.put(request, response.clone());
            }
            response
        }
        Err(e) => {
            warn!(url = %request.url, error = %e, "Failed to fetch and cache");
            offline_placeholder(storage, request)
        }
    }
}

/// Return the cached entry straight away and refresh it in the background.
///
/// With no cached entry the caller waits for the network; the returned
/// handle is `None` in that case.
pub async fn stale_while_revalidate<F: Fetcher + 'static>(
    fetcher: Arc<F>,
    partition: Partition,
    request: Request,
) -> (Option<Response>, Option<JoinHandle<()>>) {
    match partition.get(&request) {
        Some(cached) => {
            let refresh = tokio::spawn(async move {
                revalidate(&*fetcher, &partition, &request).await;
            });
            (Some(cached), Some(refresh))
        }
        None => (revalidate(&*fetcher, &partition, &request).await, None),
    }
}

async fn revalidate<F: Fetcher + ?Sized>(
    fetcher: &F,
    partition: &Partition,
    request: &Request,
) -> Option<Response> {
    match fetcher.fetch(request).await {
        Ok(response) => {
            if response.is_success() {
                partition.put(request, response.clone());
            }
            Some(response)
        }
        Err(e) => {
            debug!(url = %request.url, error = %e, "Revalidation failed");
            None
        }
    }
}

/// Documents get the cached application root or a minimal HTML page; every
/// other request gets a 503.
pub fn offline_placeholder(storage: &CacheStorage, request: &Request) -> Response {
    if request.destination == Destination::Document {
        if let Some(root) = request.url.join("/").ok().and_then(|u| storage.match_any(&u)) {
            return root;
        }
        return Response::html(OFFLINE_PAGE);
    }
    Response::new(StatusCode::SERVICE_UNAVAILABLE, "Offline")
}
