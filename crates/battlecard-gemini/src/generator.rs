use async_trait::async_trait;
use battlecard_core::CompetitorProfile;

use crate::GenerationError;

/// Appended to the chat transcript when the answer call fails.
pub const CHAT_FALLBACK: &str = "Sorry, something went wrong while answering your question.";
/// Appended when the call succeeds but the model produced no text.
pub const CHAT_EMPTY_ANSWER: &str = "I could not generate an answer.";

/// The remote AI collaborator. One network call per method invocation and
/// no retries.
#[async_trait]
pub trait ProfileGenerator: Send + Sync {
    /// Generate a full profile for `name` at `url`.
    ///
    /// The returned profile's `id` is `existing_id` when given, otherwise a
    /// freshly derived one. `name`, `url` and `last_updated` always reflect
    /// the call's inputs and completion time, whatever the model returned.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] if the call fails or the payload does not
    /// validate.
    async fn generate_profile(
        &self,
        name: &str,
        url: &str,
        existing_id: Option<&str>,
    ) -> Result<CompetitorProfile, GenerationError>;

    /// Answer `question` using only `context`. Never fails: errors are logged
    /// and replaced by [`CHAT_FALLBACK`].
    async fn answer_question(&self, question: &str, context: &str) -> String;
}
