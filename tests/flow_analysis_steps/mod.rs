//! Step definitions for flow analysis BDD scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
