use crate::{config::AzureOpenAiConfig, errors::AnswerServiceError, providers::ai::AiProvider};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// The cap on generated tokens for every answer.
pub const MAX_ANSWER_TOKENS: u32 = 500;

// --- Azure OpenAI chat-completion request and response structures ---

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize, Debug)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize, Debug)]
struct ChatResponseMessage {
    content: Option<String>,
}

// --- Azure OpenAI Provider implementation ---

/// A provider for an Azure OpenAI chat-completion deployment.
#[derive(Clone)]
pub struct AzureOpenAiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: String,
}

impl Debug for AzureOpenAiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureOpenAiProvider")
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

impl AzureOpenAiProvider {
    /// Creates a new `AzureOpenAiProvider` from the process-wide configuration.
    pub fn new(config: &AzureOpenAiConfig) -> Result<Self, AnswerServiceError> {
        let client = ReqwestClient::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(AnswerServiceError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url: config.chat_completions_url(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl AiProvider for AzureOpenAiProvider {
    #[instrument(skip_all, fields(api_url = %self.api_url))]
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, AnswerServiceError> {
        let request_body = ChatCompletionRequest {
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            max_tokens: MAX_ANSWER_TOKENS,
        };

        debug!(
            user_prompt_chars = user_prompt.chars().count(),
            "--> Sending chat completion request"
        );

        let response = self
            .client
            .post(&self.api_url)
            .header("api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(AnswerServiceError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Answer service returned an error status");
            return Err(AnswerServiceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(AnswerServiceError::Deserialization)?;

        let answer = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(AnswerServiceError::EmptyResponse)?;

        debug!("<-- Received answer ({} chars)", answer.chars().count());
        Ok(answer)
    }
}
