use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::read_source;
use crate::analyzers::PythonAnalyzer;
use crate::error::Result;
use crate::llm::ModelClient;
use crate::prompts::{documentation_prompt, DocStyle};
use crate::scanner::RepositoryScanner;
use crate::types::CodeStructure;

/// Documentation outcome for one file of a batch
#[derive(Debug)]
pub struct DocumentedFile {
    pub path: PathBuf,
    pub result: Result<String>,
}

/// `<output_dir>/<path of file relative to root>.md`, e.g. `pkg/mod.py.md`
pub fn documentation_path_for(file: &Path, root: &Path, output_dir: &Path) -> PathBuf {
    let relative = file
        .strip_prefix(root)
        .ok()
        .filter(|r| !r.as_os_str().is_empty())
        .or_else(|| file.file_name().map(Path::new))
        .unwrap_or(file);

    let mut name = relative.as_os_str().to_owned();
    name.push(".md");
    output_dir.join(name)
}

pub async fn generate_documentation(
    structure: &CodeStructure,
    style: DocStyle,
    client: &dyn ModelClient,
) -> Result<String> {
    let prompt = documentation_prompt(structure, style);
    Ok(client.generate(&prompt).await?)
}

pub async fn document_file(path: &Path, style: DocStyle, client: &dyn ModelClient) -> Result<String> {
    let source = read_source(path).await?;
    let structure = PythonAnalyzer::new().extract_functions_and_classes(&source)?;
    debug!(file = %path.display(), "{}", structure.summary());

    let documentation = generate_documentation(&structure, style, client).await?;
    info!(file = %path.display(), bytes = documentation.len(), "Documentation generated");
    Ok(documentation)
}

/// Document `files` in order. `on_file` sees each outcome as it completes.
pub async fn document_files<F>(
    files: &[PathBuf],
    style: DocStyle,
    client: &dyn ModelClient,
    mut on_file: F,
) -> Vec<DocumentedFile>
where
    F: FnMut(&DocumentedFile),
{
    let mut documented = Vec::with_capacity(files.len());
    for path in files {
        let result = document_file(path, style, client).await;
        if let Err(e) = &result {
            warn!(file = %path.display(), error = %e, "Failed to document file");
        }

        let entry = DocumentedFile {
            path: path.clone(),
            result,
        };
        on_file(&entry);
        documented.push(entry);
    }
    documented
}

/// Document every file the scanner finds under `directory`. Only a failed
/// scan is an error; per-file failures are carried in the entries.
pub async fn document_directory(
    directory: &Path,
    style: DocStyle,
    client: &dyn ModelClient,
    scanner: &RepositoryScanner,
) -> Result<Vec<DocumentedFile>> {
    let files = scanner.scan(directory)?;
    info!(directory = %directory.display(), files = files.len(), "Documenting directory");
    Ok(document_files(&files, style, client, |_| {}).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FileScanningConfig;
    use crate::error::{CodexError, ModelInvocationError};
    use crate::llm::MockModelClient;
    use std::fs;
    use tempfile::TempDir;

    const GREETER: &str = r#"def greet(name, greeting="Hello"):
    """Return a greeting."""
    return f"{greeting}, {name}!"
"#;

    #[test]
    fn test_documentation_path_mirrors_layout() {
        let out = Path::new("docs");
        assert_eq!(
            documentation_path_for(Path::new("src/pkg/mod.py"), Path::new("src"), out),
            PathBuf::from("docs/pkg/mod.py.md")
        );
        assert_eq!(
            documentation_path_for(Path::new("other/util.py"), Path::new("src"), out),
            PathBuf::from("docs/util.py.md")
        );
    }

    #[tokio::test]
    async fn test_document_file_sends_structure_prompt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("greet.py");
        fs::write(&path, GREETER).unwrap();

        let mut client = MockModelClient::new();
        client
            .expect_generate()
            .withf(|prompt: &str| {
                prompt.contains("Function: greet(name, greeting)")
                    && prompt.contains("Docstring: Return a greeting.")
                    && prompt.contains("in google style")
            })
            .times(1)
            .returning(|_| Ok("# Greeting docs".to_string()));

        let docs = document_file(&path, DocStyle::Google, &client).await.unwrap();
        assert_eq!(docs, "# Greeting docs");
    }

    #[tokio::test]
    async fn test_document_file_parse_error_skips_model() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.py");
        fs::write(&path, "def broken(:\n").unwrap();

        let mut client = MockModelClient::new();
        client.expect_generate().never();

        let err = document_file(&path, DocStyle::Numpy, &client).await.unwrap_err();
        assert!(matches!(err, CodexError::Parse(_)));
    }

    #[tokio::test]
    async fn test_document_file_missing_path() {
        let client = MockModelClient::new();
        let err = document_file(Path::new("/nope/missing.py"), DocStyle::Numpy, &client)
            .await
            .unwrap_err();
        assert!(matches!(err, CodexError::Io { .. }));
    }

    #[tokio::test]
    async fn test_document_directory_continues_past_failures() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a_good.py"), GREETER).unwrap();
        fs::write(dir.path().join("b_bad.py"), "class (:\n").unwrap();
        fs::write(dir.path().join("c_model_fails.py"), "x = 1\n").unwrap();

        let mut client = MockModelClient::new();
        let mut calls = 0;
        client.expect_generate().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok("docs".to_string())
            } else {
                Err(ModelInvocationError::EmptyResponse("no candidates in response".to_string()))
            }
        });

        let scanner = RepositoryScanner::python(&FileScanningConfig::default()).unwrap();
        let documented = document_directory(dir.path(), DocStyle::Numpy, &client, &scanner)
            .await
            .unwrap();

        assert_eq!(documented.len(), 3);
        assert_eq!(documented[0].result.as_deref().unwrap(), "docs");
        assert!(matches!(documented[1].result, Err(CodexError::Parse(_))));
        assert!(matches!(documented[2].result, Err(CodexError::Model(_))));
    }
}
