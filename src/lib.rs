//! Lifeline: status-history analytics for tracked work items.
//!
//! This crate reconstructs the status timeline of every item from its
//! transition log and derives flow patterns, rework loops, dwell and cycle
//! figures, and calendar-bucketed trend series from those timelines. Every
//! aggregate can be drilled back to the items that produced it.
//!
//! # Architecture
//!
//! Lifeline follows hexagonal architecture principles:
//!
//! - **Domain**: Pure types with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports
//! - **Services**: Computations and orchestration over domain types
//!
//! # Modules
//!
//! - [`history`]: Status categorisation and timeline reconstruction
//! - [`analytics`]: Flow mining, temporal aggregation and drilldown
//!
//! The engine performs no I/O and never reads the system clock: the
//! reference instant is always passed in, so identical input yields
//! identical output.

pub mod analytics;
pub mod history;
