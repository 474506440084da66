//! Command implementations for the smartra CLI

pub mod config;
pub mod estimate;
pub mod serve;

pub use config::run_config;
pub use estimate::run_estimate;
pub use serve::run_serve;
