//! File loaders for agent configuration.
//!
//! `agent-core` performs no I/O; hosts that keep their settings on disk load
//! them here:
//! - engine configuration (`AgentConfig`, TOML)
//!
//! Missing fields fall back to the `AgentConfig` defaults, so a file only has
//! to name what it changes.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, LoadResult};
