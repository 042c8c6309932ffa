//! Text extraction port
//!
//! Turns document bytes into text plus a confidence score. How that happens
//! (OCR, PDF parsing, plain text) is the adapter's business.

use async_trait::async_trait;
use consilium_domain::CaseRecord;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),
}

/// Extracted text with its confidence in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub text: String,
    pub confidence: f64,
}

#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, document: &[u8]) -> Result<Extraction, ExtractionError>;
}

/// Build a case record from an extraction outcome.
///
/// A failed extraction becomes a zero-confidence record instead of an error,
/// so the pipeline can still run and report the degraded input.
pub fn case_from_extraction(result: Result<Extraction, ExtractionError>) -> CaseRecord {
    match result {
        Ok(extraction) => CaseRecord::new(extraction.text, extraction.confidence),
        Err(e) => {
            tracing::warn!("{}", e);
            CaseRecord::failed_extraction()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_extraction_is_zero_confidence() {
        let case = case_from_extraction(Err(ExtractionError::ExtractionFailed("blurry".into())));
        assert_eq!(case.extraction_confidence(), 0.0);
        assert!(case.raw_text().is_empty());
    }

    #[test]
    fn test_successful_extraction() {
        let case = case_from_extraction(Ok(Extraction {
            text: "chest pain".into(),
            confidence: 0.94,
        }));
        assert_eq!(case.raw_text(), "chest pain");
        assert!((case.extraction_confidence() - 0.94).abs() < 1e-9);
    }
}
