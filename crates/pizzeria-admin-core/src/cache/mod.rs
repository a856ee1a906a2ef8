//! Query result caching.
//!
//! `QueryCache` keeps list and detail results keyed by resource and
//! parameters. Mutations invalidate their resource so the next read
//! reloads; results go stale after 5 minutes.

pub mod query;

pub use query::{resources, CachedData, QueryCache, QueryKey};
