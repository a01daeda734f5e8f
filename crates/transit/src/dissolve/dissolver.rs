//! Merging of adjacent segments with identical route sets.
//!
//! ## Algorithm
//!
//! 1. **Seed**: one group per segment, holding its decoded path and the set
//!    of routes that service it.
//! 2. **Bucket**: groups are bucketed by route set. Only groups with equal
//!    route sets can ever merge, so no geometry is compared across buckets.
//! 3. **Worklist**: within a bucket, a group is popped and merged with any
//!    settled or pending group it joins contiguously, until nothing joins.
//!    It is then settled. A settled group never changes again, and every
//!    group settled after it was checked against it, so the settled list is
//!    a fixed point of the pairwise merge.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use geo::LineString;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::dissolve::index::SegmentRouteIndex;
use crate::geometry::join_lines;
use crate::identifiers::*;
use crate::models::types::*;

/// A set of segments drawn as one contiguous line
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SegmentGroup {
    /// Original segments merged into this group (never empty)
    pub segments: BTreeSet<SegmentIdentifier>,

    /// Routes servicing every member segment
    pub routes: BTreeSet<RouteIdentifier>,

    /// Concatenated member paths
    #[serde(rename = "coordinates", serialize_with = "serialize_coordinates")]
    pub geometry: LineString,
}

impl SegmentGroup {
    /// Single-segment group
    pub fn seed(segment: &Segment, routes: BTreeSet<RouteIdentifier>) -> Result<Self> {
        Ok(Self {
            segments: BTreeSet::from([segment.id.clone()]),
            routes,
            geometry: segment.path()?,
        })
    }

    /// Merge two groups, if they service the same routes and their lines join
    /// end to end
    pub fn try_merge(&self, other: &Self) -> Option<Self> {
        if self.routes != other.routes {
            return None;
        }

        let geometry = join_lines(&self.geometry, &other.geometry)?;

        Some(Self {
            segments: self.segments.union(&other.segments).cloned().collect(),
            routes: self.routes.clone(),
            geometry,
        })
    }
}

fn serialize_coordinates<S: Serializer>(line: &LineString, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_seq(line.0.iter().map(|coord| [coord.x, coord.y]))
}

/// Dissolve every segment into groups of contiguous, identically serviced
/// segments
///
/// Returns `Err` if a route references a segment missing from `segments`, or
/// if a segment's polyline cannot be decoded. Groups are ordered by route set,
/// then by when they settled.
pub fn dissolve(routes: &RouteMap, segments: &SegmentMap) -> Result<Vec<SegmentGroup>> {
    let index = SegmentRouteIndex::build(routes, segments)?;

    let mut buckets: BTreeMap<BTreeSet<RouteIdentifier>, Vec<SegmentGroup>> = BTreeMap::new();
    for segment in segments.values() {
        let servicing = index.routes_for(&segment.id).clone();
        let group = SegmentGroup::seed(segment, servicing.clone())?;
        buckets.entry(servicing).or_default().push(group);
    }

    let bucket_count = buckets.len();
    let dissolved: Vec<SegmentGroup> = buckets.into_values().flat_map(dissolve_bucket).collect();

    debug!(
        "Dissolved {} segments into {} groups across {} route sets",
        segments.len(),
        dissolved.len(),
        bucket_count
    );

    Ok(dissolved)
}

/// Merge groups that all share one route set until no pair joins
fn dissolve_bucket(seeds: Vec<SegmentGroup>) -> Vec<SegmentGroup> {
    let mut pending: VecDeque<SegmentGroup> = seeds.into();
    let mut settled: Vec<SegmentGroup> = Vec::with_capacity(pending.len());

    while let Some(mut group) = pending.pop_front() {
        loop {
            if let Some((i, merged)) = first_merge(&group, settled.iter()) {
                settled.remove(i);
                group = merged;
                continue;
            }

            if let Some((i, merged)) = first_merge(&group, pending.iter()) {
                pending.remove(i);
                group = merged;
                continue;
            }

            break;
        }

        settled.push(group);
    }

    settled
}

fn first_merge<'a>(
    group: &SegmentGroup,
    candidates: impl Iterator<Item = &'a SegmentGroup>,
) -> Option<(usize, SegmentGroup)> {
    candidates
        .enumerate()
        .find_map(|(i, other)| group.try_merge(other).map(|merged| (i, merged)))
}
