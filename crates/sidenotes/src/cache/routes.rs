use crate::config::CacheConfig;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    NetworkFirst,
    CacheFirst,
    StaleWhileRevalidate,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::NetworkFirst => "network-first",
            Strategy::CacheFirst => "cache-first",
            Strategy::StaleWhileRevalidate => "stale-while-revalidate",
        })
    }
}

#[derive(Debug, Clone)]
struct Route {
    prefix: String,
    strategy: Strategy,
}

/// Ordered path-prefix routes; the first match wins, unmatched paths get
/// the fallback.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    fallback: Strategy,
}

impl RouteTable {
    pub fn new(fallback: Strategy) -> Self {
        Self {
            routes: Vec::new(),
            fallback,
        }
    }

    pub fn route(mut self, prefix: impl Into<String>, strategy: Strategy) -> Self {
        self.routes.push(Route {
            prefix: prefix.into(),
            strategy,
        });
        self
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        let table = config
            .network_first
            .iter()
            .fold(Self::new(Strategy::StaleWhileRevalidate), |t, p| {
                t.route(p.clone(), Strategy::NetworkFirst)
            });
        config
            .cache_first
            .iter()
            .fold(table, |t, p| t.route(p.clone(), Strategy::CacheFirst))
    }

    pub fn classify(&self, path: &str) -> Strategy {
        self.routes
            .iter()
            .find(|r| path.starts_with(&r.prefix))
            .map(|r| r.strategy)
            .unwrap_or(self.fallback)
    }
}
