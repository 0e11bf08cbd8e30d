/// Errors raised while loading narration settings.
#[derive(thiserror::Error, Debug)]
pub enum NarrationError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid narration config: {0}")]
    Config(String),
}

/// Errors a speech backend reports when it cannot accept an utterance.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    #[error("Utterance rejected by backend: {0}")]
    Rejected(String),
    #[error("Speech backend unavailable")]
    Unavailable,
}
