use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzerError {
    /// No API credential was configured; nothing was sent upstream.
    MissingCredential(String),
    /// The assembled prompt blew past the token budget; nothing was
    /// sent upstream.
    InputTooLarge { estimated: usize, limit: usize },
    /// Anything that went wrong after dispatch: transport errors,
    /// non-2xx statuses, malformed response bodies. Carries the
    /// underlying message verbatim.
    Upstream(String),
}

impl fmt::Display for AnalyzerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCredential(msg) => write!(f, "Missing credential: {}", msg),
            Self::InputTooLarge { estimated, limit } => write!(
                f,
                "Code is too long for analysis: ~{} tokens estimated, the limit is {} (about {} characters). Please reduce the code size.",
                estimated,
                limit,
                limit * 4
            ),
            Self::Upstream(msg) => write!(f, "Error analyzing code: {}", msg),
        }
    }
}

impl std::error::Error for AnalyzerError {}
