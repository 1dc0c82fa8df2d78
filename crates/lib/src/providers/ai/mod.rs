pub mod azure;

use crate::errors::AnswerServiceError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with a remote chat-completion service.
///
/// Each call is a single stateless request/response exchange: one system
/// message, one user message, and the text of the first generated answer back.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Generates a response from a given system and user prompt.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AnswerServiceError>;
}

dyn_clone::clone_trait_object!(AiProvider);
