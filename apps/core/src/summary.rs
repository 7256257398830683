use serde::Serialize;
use serde_json::Value;

use crate::geo::{segment_bearings, Bounds, LatLon};
use crate::sample::{valid_samples, Identifier, TrajectorySample};

/// What a trajectory response amounts to once filtered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub identifier: Option<Identifier>,
    pub records: usize,
    pub valid_samples: usize,
    pub dropped: usize,
    pub first_timestamp: Option<String>,
    pub last_timestamp: Option<String>,
    /// Whole hours between first and last sample, when both timestamps parse.
    pub duration_hours: Option<i64>,
    pub bounds: Option<Bounds>,
    pub bearings: Vec<f64>,
}

impl TrackSummary {
    pub fn from_records(identifier: Option<Identifier>, records: &[Value]) -> Self {
        let samples = valid_samples(records);
        Self::from_samples(identifier, records.len(), &samples)
    }

    pub fn from_samples(
        identifier: Option<Identifier>,
        records: usize,
        samples: &[TrajectorySample],
    ) -> Self {
        let points: Vec<LatLon> = samples.iter().map(|sample| sample.position).collect();
        let first = samples.first();
        let last = samples.last();
        let duration_hours = first
            .and_then(TrajectorySample::recorded_at)
            .zip(last.and_then(TrajectorySample::recorded_at))
            .map(|(start, end)| (end - start).num_hours());

        Self {
            identifier,
            records,
            valid_samples: samples.len(),
            dropped: records.saturating_sub(samples.len()),
            first_timestamp: first.map(|sample| sample.timestamp.clone()),
            last_timestamp: last.map(|sample| sample.timestamp.clone()),
            duration_hours,
            bounds: Bounds::around(points.iter().copied()),
            bearings: segment_bearings(&points),
        }
    }
}
