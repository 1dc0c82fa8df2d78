use thiserror::Error;

/// Errors raised while turning PDF bytes into text or tables.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Failed to parse PDF content: {0}")]
    PdfParse(String),
    #[error("Failed to read page {page}: {message}")]
    Page { page: u32, message: String },
}

/// Errors raised by the remote chat-completion service client.
#[derive(Error, Debug)]
pub enum AnswerServiceError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to the answer service: {0}")]
    Request(reqwest::Error),
    #[error("Failed to deserialize answer service response: {0}")]
    Deserialization(reqwest::Error),
    #[error("Answer service returned an error (status {status}): {body}")]
    Api { status: u16, body: String },
    #[error("Answer service returned no message content")]
    EmptyResponse,
}

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Required setting '{0}' is missing or empty")]
    Missing(&'static str),
    #[error("Configuration error: {0}")]
    General(#[from] config::ConfigError),
}

/// Errors surfaced for a single user request. All of them are terminal for that request.
#[derive(Error, Debug)]
pub enum QaError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("No tables found in the document")]
    NoTablesFound,
    #[error("Please enter a question!")]
    EmptyQuestion,
    #[error("Table index {index} is out of range ({count} tables detected)")]
    TableIndexOutOfRange { index: usize, count: usize },
    #[error(transparent)]
    AnswerService(#[from] AnswerServiceError),
}
