//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave:
//!
//! - [`DiagnosisParams`] - debate switch, round budget, consensus policy
//! - [`RoutingParams`] - complexity bounds and offline mode
//! - [`ExecutionParams`] - worker pool size and per-call timeout
//! - [`EngineConfig`] - container for all of the above plus model selection

pub mod diagnosis_params;
pub mod engine_config;
pub mod execution_params;
pub mod routing_params;

pub use diagnosis_params::DiagnosisParams;
pub use engine_config::{ConfigError, EngineConfig};
pub use execution_params::ExecutionParams;
pub use routing_params::RoutingParams;
