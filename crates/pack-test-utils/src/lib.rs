//! Shared test utilities for the pack-sync workspace.
//!
//! This crate provides standardised module fixtures to eliminate duplication
//! across crate test suites. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`module`]: [`TestModule`](module::TestModule) builder for a module
//!   directory with a manifest, data packs and source packs

pub mod module;

pub use module::TestModule;
