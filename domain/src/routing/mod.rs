//! Complexity routing domain
//!
//! A case is scored by summing fixed weights for every matched
//! [`ComplexitySignal`]; the clamped score falls into a [`ComplexityBand`]
//! which picks the processing [`Tier`].

pub mod complexity;
pub mod result;
pub mod tier;

pub use complexity::{
    ComplexityAssessment, ComplexityBand, ComplexityBounds, ComplexityScore, ComplexitySignal,
    assess_complexity,
};
pub use result::RoutedResult;
pub use tier::Tier;
