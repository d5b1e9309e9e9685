//! Adapter implementations for history ports.

pub mod memory;
