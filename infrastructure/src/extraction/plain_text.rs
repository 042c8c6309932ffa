//! Plain-text extractor for case files that are already text.
//!
//! Valid UTF-8 is taken verbatim with full confidence. Otherwise the bytes
//! are decoded lossily and the confidence drops with the share of characters
//! that had to be replaced.

use async_trait::async_trait;
use consilium_application::{Extraction, ExtractionError, TextExtractor};
use tracing::debug;

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractor for PlainTextExtractor {
    async fn extract(&self, document: &[u8]) -> Result<Extraction, ExtractionError> {
        let (text, confidence) = match std::str::from_utf8(document) {
            Ok(text) => (text.to_string(), 1.0),
            Err(_) => {
                let text = String::from_utf8_lossy(document).into_owned();
                let total = text.chars().count().max(1);
                let replaced = text.chars().filter(|&c| c == char::REPLACEMENT_CHARACTER).count();
                (text, 1.0 - replaced as f64 / total as f64)
            }
        };

        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(ExtractionError::ExtractionFailed(
                "document contains no text".to_string(),
            ));
        }

        debug!("Extracted {} chars (confidence {:.2})", text.chars().count(), confidence);
        Ok(Extraction { text, confidence })
    }
}
