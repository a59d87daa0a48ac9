//! Infrastructure layer for the qualifier flow.
//!
//! Contains implementations of the ports defined in `qualifier-core`: the
//! reqwest-backed remote service, the local filesystem adapter, and the
//! TOML configuration loader.

pub mod config;
pub mod filesystem;
pub mod http;
