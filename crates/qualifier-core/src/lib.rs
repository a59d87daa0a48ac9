//! Business logic and port trait definitions for the qualifier flow.
//!
//! This crate defines the "ports" (remote service and filesystem traits) that
//! the infrastructure layer implements, the pure artifact selector, and the
//! flow orchestrator. It depends only on `qualifier-types` -- never on
//! `qualifier-infra` or any HTTP/IO crate.

pub mod flow;
pub mod selector;
pub mod service;
