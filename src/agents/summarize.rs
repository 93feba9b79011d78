use std::path::Path;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::llm::ModelClient;
use crate::prompts::summary_prompt;
use crate::scanner::RepositoryScanner;

/// Inputs of the summary prompt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoData {
    /// One path per line, every matching file
    pub file_listing: String,
    /// Contents of the first readable files, newline-joined
    pub code_snippets: String,
}

pub async fn gather_repo_data(
    path: &Path,
    scanner: &RepositoryScanner,
    max_snippets: usize,
) -> Result<RepoData> {
    let files = scanner.scan(path)?;

    let mut snippets = Vec::new();
    for file in &files {
        if snippets.len() >= max_snippets {
            break;
        }
        match tokio::fs::read_to_string(file).await {
            Ok(contents) => snippets.push(contents),
            Err(e) => warn!(file = %file.display(), error = %e, "Skipping unreadable file"),
        }
    }

    debug!(files = files.len(), snippets = snippets.len(), "Repository data gathered");

    Ok(RepoData {
        file_listing: files
            .iter()
            .map(|f| f.display().to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        code_snippets: snippets.join("\n"),
    })
}

pub async fn summarize_repo(
    path: &Path,
    client: &dyn ModelClient,
    scanner: &RepositoryScanner,
    max_snippets: usize,
) -> Result<String> {
    let data = gather_repo_data(path, scanner, max_snippets).await?;
    let prompt = summary_prompt(&data.file_listing, &data.code_snippets);

    info!(path = %path.display(), prompt_chars = prompt.len(), "Summarizing repository");
    Ok(client.generate(&prompt).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileScanningConfig;
    use crate::error::CodexError;
    use crate::llm::MockModelClient;
    use std::fs;
    use tempfile::TempDir;

    fn summarize_scanner() -> RepositoryScanner {
        RepositoryScanner::new(&["*.py", "*.md"], &FileScanningConfig::default()).unwrap()
    }

    fn repo() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("pkg")).unwrap();
        fs::write(dir.path().join("README.md"), "# Project").unwrap();
        fs::write(dir.path().join("a.py"), "A = 1").unwrap();
        fs::write(dir.path().join("b.py"), "B = 2").unwrap();
        fs::write(dir.path().join("pkg/c.py"), "C = 3").unwrap();
        fs::write(dir.path().join("setup.cfg"), "[metadata]").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_gather_lists_all_and_keeps_first_snippets() {
        let dir = repo();
        let data = gather_repo_data(dir.path(), &summarize_scanner(), 3).await.unwrap();

        let listed: Vec<&str> = data.file_listing.lines().collect();
        assert_eq!(listed.len(), 4);
        assert!(listed[0].ends_with("README.md"));
        assert!(listed[3].ends_with("c.py"));
        assert!(!data.file_listing.contains("setup.cfg"));

        assert_eq!(data.code_snippets, "# Project\nA = 1\nB = 2");
    }

    #[tokio::test]
    async fn test_unreadable_file_is_skipped() {
        let dir = repo();
        fs::write(dir.path().join("a.py"), [0xff, 0xfe, 0x00]).unwrap();

        let data = gather_repo_data(dir.path(), &summarize_scanner(), 3).await.unwrap();
        assert!(data.file_listing.contains("a.py"));
        assert_eq!(data.code_snippets, "# Project\nB = 2\nC = 3");
    }

    #[tokio::test]
    async fn test_summarize_repo_prompt() {
        let dir = repo();
        let mut client = MockModelClient::new();
        client
            .expect_generate()
            .withf(|prompt: &str| {
                prompt.starts_with("You are a senior software engineer.")
                    && prompt.contains("Files:\n")
                    && prompt.contains("Code:\n# Project")
            })
            .times(1)
            .returning(|_| Ok("A small project.".to_string()));

        let summary = summarize_repo(dir.path(), &client, &summarize_scanner(), 3)
            .await
            .unwrap();
        assert_eq!(summary, "A small project.");
    }

    #[tokio::test]
    async fn test_missing_path_fails_without_model_call() {
        let mut client = MockModelClient::new();
        client.expect_generate().never();
        let err = summarize_repo(Path::new("/no/such/repo"), &client, &summarize_scanner(), 3)
            .await
            .unwrap_err();
        assert!(matches!(err, CodexError::Io { .. }));
    }
}
