//! Shared domain types for the qualifier flow.
//!
//! Wire payloads for the registration and submission exchanges, the artifact
//! model, run configuration, and the error taxonomy.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror, secrecy.

pub mod artifact;
pub mod config;
pub mod error;
pub mod flow;
pub mod registration;
pub mod submission;
