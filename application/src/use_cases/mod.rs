//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod debate;
pub mod local_tier;
pub mod producers;
pub mod route_case;
pub mod run_diagnosis;
pub(crate) mod shared;
pub mod worker_pool;
