//! Progress reporting for long-running operations.

pub mod reporter;
