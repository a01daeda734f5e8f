//! Typed access to the TransLoc feed over any [`DataFetcher`].

use tracing::debug;

use crate::dissolve::{dissolve, SegmentGroup};
use crate::feed::config::{Endpoint, TransLocConfig};
use crate::feed::traits::DataFetcher;
use crate::feed::transloc;
use crate::models::types::*;

/// Routes and segments fetched together, the input of the dissolver
#[derive(Clone, Debug, Default)]
pub struct NetworkSnapshot {
    pub routes: RouteMap,
    pub segments: SegmentMap,
}

impl NetworkSnapshot {
    pub fn dissolve(&self) -> Result<Vec<SegmentGroup>> {
        dissolve(&self.routes, &self.segments)
    }
}

/// One agency's feed
pub struct TransLocFeed<F> {
    fetcher: F,
    config: TransLocConfig,
}

impl<F: DataFetcher> TransLocFeed<F> {
    pub fn new(fetcher: F, config: TransLocConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &TransLocConfig {
        &self.config
    }

    async fn fetch(&self, endpoint: Endpoint) -> Result<Vec<u8>> {
        let url = self.config.url(endpoint);
        let body = self.fetcher.fetch(&url).await?;
        debug!("{} returned {} bytes", endpoint.path(), body.len());
        Ok(body)
    }

    pub async fn routes(&self) -> Result<RouteMap> {
        let body = self.fetch(Endpoint::Routes).await?;
        transloc::parse_routes(&body, &self.config.agency_id)
    }

    pub async fn segments(&self) -> Result<SegmentMap> {
        let body = self.fetch(Endpoint::Segments).await?;
        transloc::parse_segments(&body)
    }

    pub async fn stops(&self) -> Result<StopMap> {
        let body = self.fetch(Endpoint::Stops).await?;
        transloc::parse_stops(&body)
    }

    pub async fn vehicles(&self) -> Result<VehicleMap> {
        let body = self.fetch(Endpoint::Vehicles).await?;
        transloc::parse_vehicles(&body, &self.config.agency_id)
    }

    pub async fn arrival_estimates(&self) -> Result<Vec<ArrivalEstimate>> {
        let body = self.fetch(Endpoint::ArrivalEstimates).await?;
        transloc::parse_arrival_estimates(&body)
    }

    pub async fn snapshot(&self) -> Result<NetworkSnapshot> {
        Ok(NetworkSnapshot {
            routes: self.routes().await?,
            segments: self.segments().await?,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::identifiers::*;

    /// Serves canned bodies by endpoint path and counts requests
    #[derive(Default)]
    pub(crate) struct FixtureFetcher {
        bodies: HashMap<&'static str, String>,
        pub(crate) requests: AtomicUsize,
    }

    impl FixtureFetcher {
        pub(crate) fn with(mut self, endpoint: Endpoint, body: impl Into<String>) -> Self {
            self.bodies.insert(endpoint.path(), body.into());
            self
        }
    }

    impl DataFetcher for FixtureFetcher {
        fn fetch<'a>(
            &'a self,
            url: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
            Box::pin(async move {
                self.requests.fetch_add(1, Ordering::SeqCst);
                self.bodies
                    .iter()
                    .find(|(path, _)| url.contains(**path))
                    .map(|(_, body)| body.clone().into_bytes())
                    .ok_or_else(|| TransitError::Http(format!("404 for {url}")))
            })
        }
    }

    pub(crate) const ROUTES: &str = r#"{"data": {"16": [
        {"route_id": "r1", "short_name": "1", "long_name": "Loop", "segments": [["a", "forward"], ["b", "forward"]], "stops": [], "is_active": true, "color": "cc0000", "text_color": "ffffff"}
    ]}}"#;

    // "a" ends where "b" starts: (38.5, -120.2) -> (40.7, -120.95) -> (43.252, -126.453)
    pub(crate) const SEGMENTS: &str = r#"{"data": {"a": "_p~iF~ps|U_ulLnnqC", "b": "_flwFn`faV_mqNvxq`@"}}"#;

    pub(crate) fn fixture() -> FixtureFetcher {
        FixtureFetcher::default()
            .with(Endpoint::Routes, ROUTES)
            .with(Endpoint::Segments, SEGMENTS)
            .with(Endpoint::Vehicles, r#"{"data": {}}"#)
            .with(Endpoint::Stops, r#"{"data": []}"#)
            .with(Endpoint::ArrivalEstimates, r#"{"data": []}"#)
    }

    #[tokio::test]
    async fn test_snapshot_dissolves_into_one_line() {
        let feed = TransLocFeed::new(fixture(), TransLocConfig::new("key", "host"));

        let snapshot = feed.snapshot().await.unwrap();
        assert_eq!(snapshot.routes.len(), 1);
        assert_eq!(snapshot.segments.len(), 2);

        let groups = snapshot.dissolve().unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].geometry.0.len(), 3);
        assert!(groups[0].routes.contains(&RouteIdentifier::new("r1")));
    }

    #[tokio::test]
    async fn test_empty_resources() {
        let feed = TransLocFeed::new(fixture(), TransLocConfig::new("key", "host"));

        assert!(feed.vehicles().await.unwrap().is_empty());
        assert!(feed.stops().await.unwrap().is_empty());
        assert!(feed.arrival_estimates().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_propagates() {
        let fetcher = FixtureFetcher::default().with(Endpoint::Routes, ROUTES);
        let feed = TransLocFeed::new(fetcher, TransLocConfig::new("key", "host"));

        assert!(matches!(feed.segments().await, Err(TransitError::Http(_))));
    }
}
