//! Item history reconstruction.
//!
//! Turns tracked items and their change logs into per-item timelines that
//! answer "what status was this item in at time T?". Status names are
//! mapped onto coarse lifecycle buckets by one shared categorizer. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Categorisation and reconstruction in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
