/// Failure kinds of a generation call. Callers present each kind
/// differently, so they stay distinct all the way to the HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Missing or rejected credentials. Operator-fixable.
    #[error("Generation is not configured: {0}")]
    Configuration(String),

    /// Transport failure, timeout, non-2xx status, or an unreadable envelope.
    #[error("Generation service error: {0}")]
    Service(String),

    /// The model answered, but not with the expected itinerary shape.
    #[error("Generation output could not be parsed: {0}")]
    Parse(String),
}

impl GenerationError {
    /// Short label for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::Service(_) => "service",
            Self::Parse(_) => "parse",
        }
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Service(format!("request timed out: {err}"))
        } else {
            Self::Service(format!("HTTP request failed: {err}"))
        }
    }
}
