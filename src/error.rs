use std::path::PathBuf;
use thiserror::Error;

/// Invalid source syntax, located at the first error the parser reported.
/// `line` and `column` are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}, column {column}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ModelInvocationError {
    #[error("request to model API failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("model API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("unexpected response from model API: {0}")]
    InvalidResponse(String),

    #[error("model returned no text: {0}")]
    EmptyResponse(String),
}

#[derive(Debug, Error)]
pub enum CodexError {
    #[error("syntax error at {0}")]
    Parse(#[from] ParseError),

    #[error("error generating response from model: {0}")]
    Model(#[from] ModelInvocationError),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CodexError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CodexError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CodexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = CodexError::from(ParseError {
            line: 2,
            column: 9,
            message: "invalid syntax".to_string(),
        });
        assert_eq!(err.to_string(), "syntax error at line 2, column 9: invalid syntax");
    }

    #[test]
    fn test_io_error_names_path() {
        let err = CodexError::io(
            "missing.py",
            std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        );
        assert!(err.to_string().contains("missing.py"));
        assert!(err.to_string().contains("No such file"));
    }
}
