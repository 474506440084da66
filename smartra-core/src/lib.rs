//! smartra-core: yarn estimator and shared configuration
//!
//! Pure domain logic with no I/O beyond reading the config file. The HTTP
//! server and the CLI both build on this crate.

pub mod config;
pub mod estimate;

pub use config::{ConfigError, DatabaseSection, SmartraConfig};
pub use estimate::{estimate, EstimateRequest, ProjectType, SizeLabel, YarnEstimate, YarnWeight};
