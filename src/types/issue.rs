use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single code-quality concern found by the heuristics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeIssue {
    pub line: usize,
    pub col: usize,
    pub message: String,
    pub severity: Severity,
    pub suggestion: Option<String>,
}

impl CodeIssue {
    pub fn new(line: usize, col: usize, message: String, severity: Severity) -> Self {
        Self {
            line,
            col,
            message,
            severity,
            suggestion: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// `line:col [severity] message`, one line of a refactor report
    pub fn report_line(&self) -> String {
        format!("{}:{} [{}] {}", self.line, self.col, self.severity, self.message)
    }
}
