//! HTTP adapter for the remote qualification service.

pub mod client;

pub use client::HttpRemoteService;
