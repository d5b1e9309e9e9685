//! Dwell-time and cycle-time measurements.

use serde::Serialize;

/// Time spent in one status across all completed visits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusDwell {
    /// Status name.
    pub status: String,
    /// Completed visits measured.
    pub count: usize,
    /// Mean hours per visit.
    pub mean_hours: f64,
    /// Median hours per visit.
    pub median_hours: f64,
    /// Shortest visit in hours.
    pub min_hours: f64,
    /// Longest visit in hours.
    pub max_hours: f64,
}

/// Lead time, cycle time and throughput over a batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CycleMetrics {
    /// Days from creation to first entry into Done, per finished item.
    pub lead_times_days: Vec<f64>,
    /// Days from first entry into In Progress to the following entry into
    /// Done, per finished item that was worked on.
    pub cycle_times_days: Vec<f64>,
    /// Mean of `lead_times_days`.
    pub average_lead_time_days: f64,
    /// Upper median of `lead_times_days`.
    pub median_lead_time_days: f64,
    /// Mean of `cycle_times_days`.
    pub average_cycle_time_days: f64,
    /// Upper median of `cycle_times_days`.
    pub median_cycle_time_days: f64,
    /// Items that reached Done.
    pub throughput: usize,
}
