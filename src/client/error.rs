use thiserror::Error;

/// Failure of a single model call or of a whole retried call sequence
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelCallError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Provider returned empty content")]
    EmptyContent,

    #[error("API key environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("Model call failed after {attempts} attempts: {last}")]
    Exhausted {
        attempts: u32,
        last: Box<ModelCallError>,
    },
}

impl ModelCallError {
    /// Whether another attempt could plausibly succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::HttpStatus { .. } | Self::EmptyContent => true,
            Self::MissingApiKey(_) | Self::Exhausted { .. } => false,
        }
    }

    /// True when the (final) failure was a response without usable text
    pub fn is_empty_content(&self) -> bool {
        match self {
            Self::EmptyContent => true,
            Self::Exhausted { last, .. } => last.is_empty_content(),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ModelCallError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryability() {
        assert!(ModelCallError::EmptyContent.is_retryable());
        assert!(ModelCallError::Transport("reset".to_string()).is_retryable());
        assert!(!ModelCallError::MissingApiKey("KEY".to_string()).is_retryable());
    }

    #[test]
    fn test_exhausted_reports_last_cause() {
        let error = ModelCallError::Exhausted {
            attempts: 3,
            last: Box::new(ModelCallError::HttpStatus {
                status: 429,
                body: "rate limited".to_string(),
            }),
        };
        assert!(!error.is_empty_content());
        assert!(error.to_string().contains("429"));
    }
}
