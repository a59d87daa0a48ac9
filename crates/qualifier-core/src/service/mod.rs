//! Ports the flow depends on.
//!
//! Implementations live in `qualifier-infra`; tests substitute in-memory doubles.

pub mod fs;
pub mod remote;
