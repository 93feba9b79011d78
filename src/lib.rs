pub mod types;
pub mod error;
pub mod analyzers;
pub mod config;
pub mod llm;
pub mod prompts;
pub mod postprocess;
pub mod scanner;
pub mod agents;
pub mod cli;
pub mod cli_types;
pub mod ui;

// Re-export commonly used types
pub use types::*;
pub use error::{CodexError, ModelInvocationError, ParseError};
pub use analyzers::{analyze_code_quality, PythonAnalyzer, QualityThresholds};
pub use config::CodexConfig;
pub use llm::{GeminiClient, ModelClient};
pub use prompts::DocStyle;
pub use postprocess::extract_code_block;
pub use scanner::RepositoryScanner;
pub use cli::CliApp;
pub use ui::UIManager;
