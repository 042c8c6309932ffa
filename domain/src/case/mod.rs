//! Case records - the read-only input every producer consumes.

pub mod record;

pub use record::{CaseRecord, PatientInfo, StructuredCase};
