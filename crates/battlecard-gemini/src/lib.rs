//! Google Gemini client for generating competitor profiles and answering
//! chat questions grounded in a profile's context.

pub mod client;
pub mod error;
pub mod generator;
pub mod prompt;
pub mod schema;
pub mod types;

pub use client::GeminiClient;
pub use error::GenerationError;
pub use generator::{ProfileGenerator, CHAT_EMPTY_ANSWER, CHAT_FALLBACK};
pub use types::GeneratedProfile;
