use chrono::Local;
use serde::{Deserialize, Serialize};

/// Outcome of refactoring one file. Either the analysis fields are filled in
/// or `error` is set and the rest are left empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefactorResult {
    pub file: String,
    pub issues: String,
    pub issue_count: usize,
    pub suggestions: String,
    pub refactored_code: Option<String>,
    pub error: Option<String>,
}

impl RefactorResult {
    pub fn failed(file: String, error: String) -> Self {
        Self {
            file,
            issues: String::new(),
            issue_count: 0,
            suggestions: String::new(),
            refactored_code: None,
            error: Some(error),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Summary written after a directory batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefactorReport {
    pub timestamp: String,
    pub directory: String,
    pub files_processed: usize,
    pub total_issues: usize,
    pub results: Vec<RefactorResult>,
}

impl RefactorReport {
    pub fn new(directory: String, results: Vec<RefactorResult>) -> Self {
        let total_issues = results.iter().map(|r| r.issue_count).sum();
        Self {
            timestamp: Local::now().to_rfc3339(),
            directory,
            files_processed: results.len(),
            total_issues,
            results,
        }
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_error()).count()
    }
}
