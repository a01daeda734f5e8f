//! Pluggable networking traits.
//!
//! The feed only needs raw response bodies; anything that can produce them
//! (HTTP, fixtures on disk, a recorded session) can drive it.

use std::future::Future;
use std::pin::Pin;

use crate::models::types::Result;

/// Fetch raw bytes from a URL
pub trait DataFetcher: Send + Sync {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>>;
}

impl<T: DataFetcher + ?Sized> DataFetcher for std::sync::Arc<T> {
    fn fetch<'a>(
        &'a self,
        url: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        (**self).fetch(url)
    }
}
