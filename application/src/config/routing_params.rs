//! Routing parameters.

use consilium_domain::ComplexityBounds;
use serde::{Deserialize, Serialize};

/// Controls the complexity router and the local tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingParams {
    pub bounds: ComplexityBounds,
    /// Start the local tier disconnected.
    pub offline_mode: bool,
}

impl RoutingParams {
    pub fn with_bounds(mut self, bounds: ComplexityBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_offline_mode(mut self, offline: bool) -> Self {
        self.offline_mode = offline;
        self
    }
}
