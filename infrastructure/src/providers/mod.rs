//! Model provider adapters implementing the [`LlmGateway`] port.
//!
//! [`LlmGateway`]: consilium_application::LlmGateway

mod openai;

pub use openai::OpenAiCompatibleGateway;
