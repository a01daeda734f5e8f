//! Decoding of TransLoc 1.2 API responses.
//!
//! Every response wraps its payload in an envelope's `data` field. Routes and
//! vehicles are further keyed by agency id; segments are an id -> polyline
//! object; stops and arrival estimates are plain arrays.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::identifiers::*;
use crate::models::types::*;

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

// ============================================================================
// Raw feed records
// ============================================================================

/// Route segment reference, usually `[id, direction]`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSegmentRef {
    Directed(SegmentIdentifier, String),
    Bare(SegmentIdentifier),
}

impl RawSegmentRef {
    fn into_id(self) -> SegmentIdentifier {
        match self {
            Self::Directed(id, _) | Self::Bare(id) => id,
        }
    }
}

#[derive(Deserialize)]
struct RawRoute {
    route_id: RouteIdentifier,
    #[serde(default)]
    short_name: String,
    #[serde(default)]
    long_name: String,
    #[serde(default)]
    segments: Vec<RawSegmentRef>,
    #[serde(default)]
    stops: Vec<StopIdentifier>,
    #[serde(default)]
    is_active: bool,
    #[serde(default)]
    color: String,
    #[serde(default)]
    text_color: String,
}

impl From<RawRoute> for Route {
    fn from(raw: RawRoute) -> Self {
        Self {
            id: raw.route_id,
            short_name: raw.short_name,
            long_name: raw.long_name,
            segments: raw.segments.into_iter().map(RawSegmentRef::into_id).collect(),
            stops: raw.stops,
            is_active: raw.is_active,
            color: raw.color,
            text_color: raw.text_color,
        }
    }
}

#[derive(Deserialize)]
struct RawStop {
    stop_id: StopIdentifier,
    #[serde(default, alias = "stop_code")]
    code: String,
    #[serde(default)]
    name: String,
    location: Location,
    #[serde(default)]
    routes: Vec<RouteIdentifier>,
}

impl From<RawStop> for Stop {
    fn from(raw: RawStop) -> Self {
        Self {
            id: raw.stop_id,
            code: raw.code,
            name: raw.name,
            location: raw.location,
            routes: raw.routes,
        }
    }
}

#[derive(Deserialize)]
struct RawEstimate {
    route_id: RouteIdentifier,
    stop_id: Option<StopIdentifier>,
    arrival_at: DateTime<FixedOffset>,
}

#[derive(Deserialize)]
struct RawVehicle {
    vehicle_id: VehicleIdentifier,
    route_id: RouteIdentifier,
    #[serde(default)]
    call_name: String,
    location: Location,
    #[serde(default)]
    heading: f64,
    #[serde(default)]
    arrival_estimates: Vec<RawEstimate>,
    #[serde(default)]
    tracking_status: String,
    passenger_load: Option<u32>,
    standing_capacity: Option<u32>,
    seating_capacity: Option<u32>,
}

#[derive(Deserialize)]
struct RawStopArrivals {
    stop_id: StopIdentifier,
    #[serde(default)]
    arrivals: Vec<RawEstimate>,
}

fn estimate(raw: RawEstimate, fallback_stop: Option<&StopIdentifier>) -> Result<ArrivalEstimate> {
    let stop_id = raw
        .stop_id
        .or_else(|| fallback_stop.cloned())
        .ok_or_else(|| {
            TransitError::InvalidData(format!(
                "Arrival estimate for route {} has no stop",
                raw.route_id
            ))
        })?;

    Ok(ArrivalEstimate {
        route_id: raw.route_id,
        stop_id,
        arrival_at: raw.arrival_at,
    })
}

impl TryFrom<RawVehicle> for Vehicle {
    type Error = TransitError;

    fn try_from(raw: RawVehicle) -> Result<Self> {
        let arrival_estimates = raw
            .arrival_estimates
            .into_iter()
            .map(|e| estimate(e, None))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            id: raw.vehicle_id,
            route_id: raw.route_id,
            call_name: raw.call_name,
            location: raw.location,
            heading: raw.heading,
            arrival_estimates,
            tracking_status: raw.tracking_status,
            passenger_load: raw.passenger_load,
            standing_capacity: raw.standing_capacity,
            seating_capacity: raw.seating_capacity,
        })
    }
}

// ============================================================================
// Envelope decoding
// ============================================================================

/// Pull one agency's list out of an agency-keyed `data` payload
///
/// The feed reports "nothing" as a missing key, `null`, or an empty array.
fn agency_list<T: DeserializeOwned>(data: Value, agency_id: &str) -> Result<Option<Vec<T>>> {
    match data {
        Value::Object(mut agencies) => match agencies.remove(agency_id) {
            None | Some(Value::Null) => Ok(None),
            Some(list) => Ok(Some(serde_json::from_value(list)?)),
        },
        Value::Null => Ok(None),
        Value::Array(items) if items.is_empty() => Ok(None),
        other => Err(TransitError::InvalidData(format!(
            "Expected agency-keyed data, found {other}"
        ))),
    }
}

/// Decode `routes.json`
///
/// Returns `Err` if the agency is absent: every agency has routes.
pub fn parse_routes(body: &[u8], agency_id: &str) -> Result<RouteMap> {
    let envelope: Envelope<Value> = serde_json::from_slice(body)?;
    let raw: Vec<RawRoute> = agency_list(envelope.data, agency_id)?.ok_or_else(|| {
        TransitError::InvalidData(format!("No route data for agency {agency_id}"))
    })?;

    Ok(raw
        .into_iter()
        .map(Route::from)
        .map(|route| (route.id.clone(), route))
        .collect())
}

/// Decode `segments.json`
pub fn parse_segments(body: &[u8]) -> Result<SegmentMap> {
    let envelope: Envelope<HashMap<SegmentIdentifier, String>> = serde_json::from_slice(body)?;

    Ok(envelope
        .data
        .into_iter()
        .map(|(id, polyline)| (id.clone(), Segment { id, polyline }))
        .collect())
}

/// Decode `stops.json`
pub fn parse_stops(body: &[u8]) -> Result<StopMap> {
    let envelope: Envelope<Vec<RawStop>> = serde_json::from_slice(body)?;

    Ok(envelope
        .data
        .into_iter()
        .map(Stop::from)
        .map(|stop| (stop.id.clone(), stop))
        .collect())
}

/// Decode `vehicles.json`
///
/// An agency with no vehicles on the road decodes to an empty map.
pub fn parse_vehicles(body: &[u8], agency_id: &str) -> Result<VehicleMap> {
    let envelope: Envelope<Value> = serde_json::from_slice(body)?;
    let raw: Vec<RawVehicle> = agency_list(envelope.data, agency_id)?.unwrap_or_default();

    raw.into_iter()
        .map(|raw| Vehicle::try_from(raw).map(|vehicle| (vehicle.id.clone(), vehicle)))
        .collect()
}

/// Decode `arrival-estimates.json`, flattened across stops
pub fn parse_arrival_estimates(body: &[u8]) -> Result<Vec<ArrivalEstimate>> {
    let envelope: Envelope<Option<Vec<RawStopArrivals>>> = serde_json::from_slice(body)?;

    let mut estimates = Vec::new();
    for stop in envelope.data.unwrap_or_default() {
        for raw in stop.arrivals {
            estimates.push(estimate(raw, Some(&stop.stop_id))?);
        }
    }

    Ok(estimates)
}
