//! TransLoc feed access: decoding, fetching and caching.

pub mod client;
pub mod config;
pub mod traits;
pub mod transloc;

#[cfg(feature = "client")]
pub mod cache;
#[cfg(feature = "client")]
pub mod http;

pub use client::{NetworkSnapshot, TransLocFeed};
pub use config::{Endpoint, TransLocConfig};
pub use traits::DataFetcher;

#[cfg(feature = "client")]
pub use cache::{CachedFeed, RefreshIntervals, TransitStore};
#[cfg(feature = "client")]
pub use http::HttpFetcher;
