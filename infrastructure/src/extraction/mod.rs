//! Text extraction adapters implementing the [`TextExtractor`] port.
//!
//! [`TextExtractor`]: consilium_application::TextExtractor

mod plain_text;

pub use plain_text::PlainTextExtractor;
