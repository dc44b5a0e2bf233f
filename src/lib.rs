//! Startup configuration for bundling a framework from its own source tree.
//!
//! [`ConfigBuilder`](crate::core::ConfigBuilder) probes whether the checkout lives inside the
//! shared-tooling monorepo and either returns a complete standalone
//! [`BundlerConfig`](crate::core::BundlerConfig) or hands a partial one to the monorepo helper.

pub mod cli;
pub mod core;
pub mod infrastructure;
pub mod utils;
