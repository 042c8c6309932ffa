//! Prompt templates for structuring, consultation, revision and local analysis.

pub mod template;

pub use template::PromptTemplate;
