//! Logging setup shared by the binaries of the workspace. The validation
//! libraries never log themselves; only their callers do.
pub mod config;
pub mod tracing;

pub use config::Config;
