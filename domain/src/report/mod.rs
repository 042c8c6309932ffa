//! Diagnostic report assembly.

pub mod assembler;

pub use assembler::{DiagnosticReport, ReportAssembler, ReportMetadata, ReportViews};
