use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::read_source;
use crate::analyzers::{quality::analyze_module, PythonAnalyzer, QualityThresholds};
use crate::error::{CodexError, Result};
use crate::llm::ModelClient;
use crate::postprocess::extract_code_block;
use crate::prompts::{refactor_apply_prompt, refactor_suggestions_prompt};
use crate::scanner::RepositoryScanner;
use crate::types::{CodeIssue, RefactorReport, RefactorResult};

pub const NO_ISSUES_MESSAGE: &str = "No significant issues found. The code looks good!";

/// Ask the model how to address `issues`. Clean code gets a fixed answer
/// without a model call.
pub async fn get_refactoring_suggestions(
    code: &str,
    issues: &[CodeIssue],
    client: &dyn ModelClient,
) -> Result<String> {
    if issues.is_empty() {
        return Ok(NO_ISSUES_MESSAGE.to_string());
    }
    let prompt = refactor_suggestions_prompt(code, issues);
    Ok(client.generate(&prompt).await?)
}

/// Rewrite `code` following `suggestions`, keeping only the returned code.
pub async fn apply_refactoring(code: &str, suggestions: &str, client: &dyn ModelClient) -> Result<String> {
    let prompt = refactor_apply_prompt(code, suggestions);
    let response = client.generate(&prompt).await?;
    Ok(extract_code_block(&response, "python"))
}

/// `<output_dir>/<dir of file relative to root>/<stem>_refactored<ext>`.
/// Without a root the file lands directly in `output_dir`.
pub fn output_path_for(file: &Path, root: Option<&Path>, output_dir: &Path) -> PathBuf {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match file.extension() {
        Some(ext) => format!("{}_refactored.{}", stem, ext.to_string_lossy()),
        None => format!("{}_refactored", stem),
    };

    let relative_dir = root
        .and_then(|root| file.parent()?.strip_prefix(root).ok())
        .map(Path::to_path_buf)
        .unwrap_or_default();

    output_dir.join(relative_dir).join(name)
}

async fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| CodexError::io(parent, e))?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| CodexError::io(path, e))
}

async fn try_refactor(
    path: &Path,
    output_path: Option<&Path>,
    client: &dyn ModelClient,
    thresholds: &QualityThresholds,
) -> Result<RefactorResult> {
    let code = read_source(path).await?;
    let module = PythonAnalyzer::new().parse(&code)?;
    let issues = analyze_module(&module, thresholds);
    debug!(file = %path.display(), issues = issues.len(), "Quality analysis complete");

    let suggestions = get_refactoring_suggestions(&code, &issues, client).await?;

    let mut result = RefactorResult {
        file: path.display().to_string(),
        issues: issues.iter().map(CodeIssue::report_line).collect::<Vec<_>>().join("\n"),
        issue_count: issues.len(),
        suggestions,
        refactored_code: None,
        error: None,
    };

    if !issues.is_empty() {
        let refactored = apply_refactoring(&code, &result.suggestions, client).await?;
        if let Some(output_path) = output_path {
            write_output(output_path, &refactored).await?;
            info!(file = %path.display(), output = %output_path.display(), "Refactored code written");
        }
        result.refactored_code = Some(refactored);
    }

    Ok(result)
}

/// Analyze one file and, when it has issues, ask for suggestions and a
/// rewrite. Any failure is captured in `error` instead of being returned.
pub async fn refactor_file(
    path: &Path,
    output_path: Option<&Path>,
    client: &dyn ModelClient,
    thresholds: &QualityThresholds,
) -> RefactorResult {
    match try_refactor(path, output_path, client, thresholds).await {
        Ok(result) => result,
        Err(e) => {
            warn!(file = %path.display(), error = %e, "Refactoring failed");
            RefactorResult::failed(path.display().to_string(), e.to_string())
        }
    }
}

/// Refactor `files` in order. Rewrites are saved under `output_dir`,
/// mirroring each file's location below `root`, when one is given.
pub async fn refactor_files<F>(
    files: &[PathBuf],
    root: &Path,
    output_dir: Option<&Path>,
    client: &dyn ModelClient,
    thresholds: &QualityThresholds,
    mut on_file: F,
) -> Vec<RefactorResult>
where
    F: FnMut(&Path, &RefactorResult),
{
    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let output_path = output_dir.map(|dir| output_path_for(file, Some(root), dir));
        let result = refactor_file(file, output_path.as_deref(), client, thresholds).await;
        on_file(file, &result);
        results.push(result);
    }
    results
}

pub async fn refactor_directory(
    directory: &Path,
    output_dir: Option<&Path>,
    client: &dyn ModelClient,
    thresholds: &QualityThresholds,
    scanner: &RepositoryScanner,
) -> Result<RefactorReport> {
    let files = scanner.scan(directory)?;
    info!(directory = %directory.display(), files = files.len(), "Refactoring directory");

    let results = refactor_files(&files, directory, output_dir, client, thresholds, |_, _| {}).await;
    Ok(RefactorReport::new(directory.display().to_string(), results))
}

/// Write `report` as `refactor_report_<YYYYmmdd_HHMMSS>.json` in `output_dir`.
pub async fn save_report<T: Serialize>(report: &T, output_dir: &Path) -> Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| CodexError::io(output_dir, e))?;

    let report_path = output_dir.join(format!(
        "refactor_report_{}.json",
        Local::now().format("%Y%m%d_%H%M%S")
    ));
    let json = serde_json::to_string_pretty(report)?;
    tokio::fs::write(&report_path, json)
        .await
        .map_err(|e| CodexError::io(&report_path, e))?;

    info!(path = %report_path.display(), "Report saved");
    Ok(report_path)
}
