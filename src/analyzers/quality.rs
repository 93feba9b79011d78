use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::types::{CodeIssue, Severity};

use super::python::{ParsedModule, PythonAnalyzer};

const TOO_MANY_PARAMETERS_SUGGESTION: &str =
    "Split into smaller functions or use a data class/dictionary to group related arguments.";
const TOO_LONG_SUGGESTION: &str = "Split this function into smaller, single-responsibility functions.";

/// Limits above which a function is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    pub max_parameters: usize,
    pub max_function_lines: usize,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            max_parameters: 5,
            max_function_lines: 50,
        }
    }
}

/// Scan `source` for refactoring opportunities with the default thresholds.
pub fn analyze_code_quality(source: &str) -> Vec<CodeIssue> {
    analyze_code_quality_with(source, &QualityThresholds::default())
}

/// A syntax error yields a single `error` issue and nothing else.
pub fn analyze_code_quality_with(source: &str, thresholds: &QualityThresholds) -> Vec<CodeIssue> {
    match PythonAnalyzer::new().parse(source) {
        Ok(module) => analyze_module(&module, thresholds),
        Err(e) => vec![syntax_error_issue(&e)],
    }
}

pub fn analyze_module(module: &ParsedModule<'_>, thresholds: &QualityThresholds) -> Vec<CodeIssue> {
    let mut issues = Vec::new();

    for function in module.function_metrics() {
        if function.parameter_count > thresholds.max_parameters {
            issues.push(
                CodeIssue::new(
                    function.line,
                    function.col,
                    format!(
                        "Function '{}' has {} arguments, which is too many. Consider refactoring.",
                        function.name, function.parameter_count
                    ),
                    Severity::Warning,
                )
                .with_suggestion(TOO_MANY_PARAMETERS_SUGGESTION),
            );
        }

        if function.line_count > thresholds.max_function_lines {
            issues.push(
                CodeIssue::new(
                    function.line,
                    function.col,
                    format!(
                        "Function '{}' is {} lines long. Consider refactoring into smaller functions.",
                        function.name, function.line_count
                    ),
                    Severity::Info,
                )
                .with_suggestion(TOO_LONG_SUGGESTION),
            );
        }
    }

    issues
}

fn syntax_error_issue(error: &ParseError) -> CodeIssue {
    CodeIssue::new(
        error.line,
        error.column,
        format!("Syntax error: {}", error.message),
        Severity::Error,
    )
}
