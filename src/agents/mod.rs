//! Per-command pipelines: read, extract, prompt, call the model, post-process.
//!
//! Files are handled one at a time. Single-file operations return their error;
//! batch operations record per-file failures and keep going.

pub mod docgen;
pub mod refactor;
pub mod summarize;

use std::path::Path;

use crate::error::{CodexError, Result};

pub use docgen::{
    document_directory, document_file, document_files, documentation_path_for, generate_documentation,
    DocumentedFile,
};
pub use refactor::{
    apply_refactoring, get_refactoring_suggestions, output_path_for, refactor_directory, refactor_file,
    refactor_files, save_report, NO_ISSUES_MESSAGE,
};
pub use summarize::{gather_repo_data, summarize_repo, RepoData};

pub(crate) async fn read_source(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CodexError::io(path, e))
}
