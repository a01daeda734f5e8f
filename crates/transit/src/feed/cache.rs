//! Refresh-on-read caching in front of the feed.
//!
//! The upstream API is rate limited, so each resource is refetched at most
//! once per interval no matter how many readers ask for it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::dissolve::SegmentGroup;
use crate::feed::client::TransLocFeed;
use crate::feed::traits::DataFetcher;
use crate::models::types::*;

/// A value refreshed lazily once it is older than `interval`
pub struct CachedFeed<T> {
    interval: Duration,
    state: Mutex<Option<(Instant, Arc<T>)>>,
}

impl<T> CachedFeed<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            state: Mutex::new(None),
        }
    }

    /// Current value, awaiting `refresh` first if the cache is empty or stale
    ///
    /// Concurrent callers wait on one refresh. A failed refresh leaves the
    /// previous value in place and returns the error.
    pub async fn get<Fut>(&self, refresh: impl FnOnce() -> Fut) -> Result<Arc<T>>
    where
        Fut: Future<Output = Result<T>>,
    {
        let mut state = self.state.lock().await;

        if let Some((fetched_at, value)) = state.as_ref() {
            if fetched_at.elapsed() < self.interval {
                return Ok(Arc::clone(value));
            }
        }

        let value = Arc::new(refresh().await?);
        *state = Some((Instant::now(), Arc::clone(&value)));
        Ok(value)
    }

    /// Drop the cached value so the next read refreshes
    pub async fn invalidate(&self) {
        *self.state.lock().await = None;
    }
}

/// How long each resource stays fresh
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshIntervals {
    pub routes: Duration,
    pub segments: Duration,
    pub stops: Duration,
    pub vehicles: Duration,
    pub arrival_estimates: Duration,
}

impl Default for RefreshIntervals {
    fn default() -> Self {
        Self {
            routes: Duration::from_secs(10),
            segments: Duration::from_secs(10),
            stops: Duration::from_secs(10),
            vehicles: Duration::from_secs(2),
            arrival_estimates: Duration::from_secs(2),
        }
    }
}

/// Cached view of every feed resource, plus the dissolved segment groups
pub struct TransitStore<F> {
    feed: TransLocFeed<F>,
    routes: CachedFeed<RouteMap>,
    segments: CachedFeed<SegmentMap>,
    stops: CachedFeed<StopMap>,
    vehicles: CachedFeed<VehicleMap>,
    arrival_estimates: CachedFeed<Vec<ArrivalEstimate>>,
    dissolved: Mutex<Option<Dissolved>>,
}

/// Segment groups together with the snapshot they were computed from
struct Dissolved {
    routes: Arc<RouteMap>,
    segments: Arc<SegmentMap>,
    groups: Arc<Vec<SegmentGroup>>,
}

impl<F: DataFetcher> TransitStore<F> {
    pub fn new(feed: TransLocFeed<F>, intervals: RefreshIntervals) -> Self {
        Self {
            feed,
            routes: CachedFeed::new(intervals.routes),
            segments: CachedFeed::new(intervals.segments),
            stops: CachedFeed::new(intervals.stops),
            vehicles: CachedFeed::new(intervals.vehicles),
            arrival_estimates: CachedFeed::new(intervals.arrival_estimates),
            dissolved: Mutex::new(None),
        }
    }

    pub fn feed(&self) -> &TransLocFeed<F> {
        &self.feed
    }

    pub async fn routes(&self) -> Result<Arc<RouteMap>> {
        self.routes
            .get(move || logged("routes", self.feed.routes()))
            .await
    }

    pub async fn segments(&self) -> Result<Arc<SegmentMap>> {
        self.segments
            .get(move || logged("segments", self.feed.segments()))
            .await
    }

    pub async fn stops(&self) -> Result<Arc<StopMap>> {
        self.stops
            .get(move || logged("stops", self.feed.stops()))
            .await
    }

    pub async fn vehicles(&self) -> Result<Arc<VehicleMap>> {
        self.vehicles
            .get(move || logged("vehicles", self.feed.vehicles()))
            .await
    }

    pub async fn arrival_estimates(&self) -> Result<Arc<Vec<ArrivalEstimate>>> {
        self.arrival_estimates
            .get(move || logged("arrival estimates", self.feed.arrival_estimates()))
            .await
    }

    /// Segment groups for the current routes and segments
    ///
    /// Always computed from the routes and segments the store currently
    /// holds, and recomputed only when either of them has been refreshed.
    pub async fn dissolved_segments(&self) -> Result<Arc<Vec<SegmentGroup>>> {
        let routes = self.routes().await?;
        let segments = self.segments().await?;

        let mut dissolved = self.dissolved.lock().await;
        if let Some(current) = dissolved.as_ref() {
            if Arc::ptr_eq(&current.routes, &routes) && Arc::ptr_eq(&current.segments, &segments) {
                return Ok(Arc::clone(&current.groups));
            }
        }

        let groups = Arc::new(crate::dissolve::dissolve(&routes, &segments)?);
        info!("Dissolved {} segments into {} groups", segments.len(), groups.len());
        *dissolved = Some(Dissolved {
            routes,
            segments,
            groups: Arc::clone(&groups),
        });
        Ok(groups)
    }
}

async fn logged<T>(resource: &str, refresh: impl Future<Output = Result<T>>) -> Result<T> {
    match refresh.await {
        Ok(value) => {
            info!("Updated {resource}");
            Ok(value)
        }
        Err(e) => {
            warn!("Failed to update {resource}: {e}");
            Err(e)
        }
    }
}
