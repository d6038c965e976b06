//! # vpnrest App
//!
//! Composition root and command layer of the `vpnrest` binary.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Commands invoked by the CLI
//! - Logging setup
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires the ports of `core` to the adapters of `infra`
//! - Owns the single instance of every shared service

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use context::AppContext;
