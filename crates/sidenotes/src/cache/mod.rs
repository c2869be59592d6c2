//! # Offline Cache Router
//!
//! The foreground UI should keep working without a network. The router sits
//! between the UI and the network and answers each request from one of three
//! strategies, chosen by path prefix:
//!
//! ```text
//! /api/...                         network-first       -> dynamic partition
//! /static/... /images/... /fonts/  cache-first         -> static partition
//! everything else                  stale-while-revalidate (static partition)
//! ```
//!
//! Only same-origin `GET`s are routed. Everything else is a
//! [`RouteOutcome::Passthrough`], except `POST` to the share endpoint which
//! is handled by [`share`].
//!
//! ## Partitions
//!
//! Responses live in named partitions (`<prefix>-static-v<version>` and
//! `<prefix>-dynamic-v<version>`), each a `moka` cache. [`CacheRouter::install`]
//! fills the static partition from the install manifest, all or nothing.
//! [`CacheRouter::activate`] deletes partitions from other versions and
//! claims the open [`Clients`]; it is refused until an install succeeded.
//!
//! ## The Network
//!
//! All network access goes through the [`Fetcher`] trait: [`HttpFetcher`] in
//! production, stubs in tests. Fetch failures never escape the router.

pub mod clients;
pub mod fetcher;
pub mod http;
pub mod notifications;
pub mod partition;
pub mod router;
pub mod routes;
pub mod share;
pub mod strategy;

pub use clients::{ClientId, ClientInfo, ClientMessage, Clients};
pub use fetcher::{FetchError, Fetcher, HttpFetcher};
pub use http::{Destination, Request, Response};
pub use notifications::{Notification, NotificationSink};
pub use partition::{CacheStorage, Partition};
pub use router::{CacheError, CacheRouter, RouteOutcome};
pub use routes::{RouteTable, Strategy};
pub use share::SharedContent;
