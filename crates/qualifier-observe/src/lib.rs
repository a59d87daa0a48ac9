//! Observability setup for the qualifier binary.

pub mod tracing_setup;
