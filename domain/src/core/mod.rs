//! Core domain concepts shared across all subdomains.
//!
//! - [`model::Model`] - language models serving each producer
//! - [`model_config::ModelConfig`] - role-based model selection
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod model;
pub mod model_config;
