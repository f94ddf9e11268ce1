//! Monitor daemon internals, exposed as a library so integration tests
//! can drive the control cycle directly.

pub mod config;
pub mod cycle;

pub use config::MonitorConfig;
