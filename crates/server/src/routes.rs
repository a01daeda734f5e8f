use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;
use wolfline_transit::{DataFetcher, TransitError, TransitStore};

type Store<F> = Arc<TransitStore<F>>;

pub fn create_router<F: DataFetcher + 'static>(store: Store<F>) -> Router {
    Router::new()
        .route("/routeData", get(route_data::<F>))
        .route("/segmentData", get(segment_data::<F>))
        .route("/vehicleData", get(vehicle_data::<F>))
        .route("/stopData", get(stop_data::<F>))
        .route("/arrivalEstimateData", get(arrival_estimate_data::<F>))
        .route("/dissolvedSegments", get(dissolved_segments::<F>))
        .route("/health", get(health))
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(store)
}

/// JSON view of cached data, or 502 if the upstream refresh failed
fn respond<T, B: Serialize>(
    result: Result<Arc<T>, TransitError>,
    view: impl FnOnce(&T) -> B,
) -> Response {
    match result {
        Ok(data) => Json(view(&data)).into_response(),
        Err(e) => {
            warn!("Upstream request failed: {e}");
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}

async fn route_data<F: DataFetcher>(State(store): State<Store<F>>) -> Response {
    respond(store.routes().await, |routes| routes.values().cloned().collect::<Vec<_>>())
}

/// Segment id -> encoded polyline, as the upstream API shapes it
async fn segment_data<F: DataFetcher>(State(store): State<Store<F>>) -> Response {
    respond(store.segments().await, |segments| {
        segments
            .iter()
            .map(|(id, segment)| (id.clone(), segment.polyline.clone()))
            .collect::<BTreeMap<_, _>>()
    })
}

async fn vehicle_data<F: DataFetcher>(State(store): State<Store<F>>) -> Response {
    respond(store.vehicles().await, |vehicles| vehicles.values().cloned().collect::<Vec<_>>())
}

async fn stop_data<F: DataFetcher>(State(store): State<Store<F>>) -> Response {
    respond(store.stops().await, |stops| stops.values().cloned().collect::<Vec<_>>())
}

async fn arrival_estimate_data<F: DataFetcher>(State(store): State<Store<F>>) -> Response {
    respond(store.arrival_estimates().await, |estimates| estimates.clone())
}

async fn dissolved_segments<F: DataFetcher>(State(store): State<Store<F>>) -> Response {
    respond(store.dissolved_segments().await, |groups| groups.clone())
}

async fn health() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;

    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;
    use wolfline_transit::{RefreshIntervals, TransLocConfig, TransLocFeed};

    use super::*;

    /// Canned upstream responses; anything else is an upstream failure
    struct Upstream;

    impl DataFetcher for Upstream {
        fn fetch<'a>(
            &'a self,
            url: &'a str,
        ) -> Pin<Box<dyn Future<Output = wolfline_transit::Result<Vec<u8>>> + Send + 'a>> {
            Box::pin(async move {
                let body = if url.contains("/routes.json") {
                    r#"{"data": {"16": [{"route_id": "r1", "short_name": "1", "segments": [["a", "forward"], ["b", "forward"]], "is_active": true, "color": "cc0000", "text_color": "ffffff"}]}}"#
                } else if url.contains("/segments.json") {
                    r#"{"data": {"a": "_p~iF~ps|U_ulLnnqC", "b": "_flwFn`faV_mqNvxq`@"}}"#
                } else if url.contains("/vehicles.json") {
                    r#"{"data": {}}"#
                } else {
                    return Err(TransitError::Http(format!("503 for {url}")));
                };
                Ok(body.as_bytes().to_vec())
            })
        }
    }

    fn app() -> Router {
        let feed = TransLocFeed::new(Upstream, TransLocConfig::new("key", "host"));
        create_router(Arc::new(TransitStore::new(feed, RefreshIntervals::default())))
    }

    async fn get_json(uri: &str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_route_data() {
        let (status, json) = get_json("/routeData").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json[0]["id"], "r1");
        assert_eq!(json[0]["segments"], serde_json::json!(["a", "b"]));
    }

    #[tokio::test]
    async fn test_segment_data_is_keyed_by_id() {
        let (status, json) = get_json("/segmentData").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["a"], "_p~iF~ps|U_ulLnnqC");
    }

    #[tokio::test]
    async fn test_no_vehicles_is_an_empty_list() {
        let (status, json) = get_json("/vehicleData").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_dissolved_segments() {
        let (status, json) = get_json("/dissolvedSegments").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["segments"], serde_json::json!(["a", "b"]));
        assert_eq!(json[0]["routes"], serde_json::json!(["r1"]));
        assert_eq!(json[0]["coordinates"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let (status, _) = get_json("/stopData").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
