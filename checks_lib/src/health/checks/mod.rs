//! Store subsystem checks

pub mod http_cache_hosts;
pub mod indexer_backlog;
pub mod opcache_hit_rate;
pub mod sansec_shield;
pub mod sentry_connection;

pub use http_cache_hosts::HttpCacheHostsCheck;
pub use indexer_backlog::IndexerBacklogCheck;
pub use opcache_hit_rate::OpcacheHitRateCheck;
pub use sansec_shield::SansecShieldCheck;
pub use sentry_connection::SentryConnectionCheck;

/// Names of every check shipped with this crate, in report order.
pub const ALL_CHECK_NAMES: [&str; 5] = [
    http_cache_hosts::NAME,
    indexer_backlog::NAME,
    opcache_hit_rate::NAME,
    sansec_shield::NAME,
    sentry_connection::NAME,
];
