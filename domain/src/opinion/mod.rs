//! Opinion domain
//!
//! An [`Opinion`] is one specialist's assessment of a case. Opinions are never
//! edited: each analysis or revision round produces a new value, and the
//! [`OpinionSet`] holding the live opinion per specialty is replaced wholesale
//! at each round boundary. [`OpinionHistory`] keeps every set so the debate
//! can be reconstructed.

pub mod entities;
pub mod parsing;
pub mod set;

pub use entities::{Opinion, RiskLevel};
pub use parsing::{
    DEFAULT_CONFIDENCE, extract_json, parse_opinion, parse_preliminary, parse_structured_case,
};
pub use set::{OpinionHistory, OpinionSet};
