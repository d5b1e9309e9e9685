//! Analytics bounded context.
//!
//! Turns reconstructed batches into flow patterns, rework loops, dwell and
//! cycle figures, and calendar-bucketed counter series with drilldown back
//! to contributing items.

pub mod domain;
pub mod services;

#[cfg(test)]
mod tests;
