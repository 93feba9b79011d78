pub mod python;
pub mod quality;

use tree_sitter::Node;

pub use python::{FunctionMetrics, ParsedModule, PythonAnalyzer};
pub use quality::{analyze_code_quality, analyze_code_quality_with, QualityThresholds};

/// Source text covered by `node`
pub(crate) fn node_text(node: Node<'_>, source: &str) -> String {
    node.utf8_text(source.as_bytes()).unwrap_or("").to_string()
}
