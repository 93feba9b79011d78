use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::prompts::DocStyle;

#[derive(Parser, Debug)]
#[command(
    name = "codexagent",
    version,
    about = "Summarize, document and refactor Python code with Gemini"
)]
pub struct Cli {
    /// Configuration file (defaults to ./codexagent.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Summarize a code repository
    #[command(subcommand)]
    Summarize(SummarizeCommand),

    /// Generate documentation for Python code
    #[command(subcommand)]
    Docgen(DocgenCommand),

    /// Suggest and apply refactorings for Python code
    #[command(subcommand)]
    Refactor(RefactorCommand),
}

#[derive(Subcommand, Debug)]
pub enum SummarizeCommand {
    /// Summarize the given code repository
    Run(SummarizeArgs),
}

#[derive(Args, Debug)]
pub struct SummarizeArgs {
    /// Path to the repository
    pub path: PathBuf,

    /// Write the summary to a file instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum DocgenCommand {
    /// Generate documentation for a single Python file
    File(DocgenFileArgs),

    /// Generate documentation for all Python files in a directory
    Dir(DocgenDirArgs),
}

#[derive(Args, Debug)]
pub struct DocgenFileArgs {
    /// Python file to document
    pub path: PathBuf,

    /// Output file
    #[arg(short, long, value_name = "FILE", default_value = "docs.md")]
    pub output: PathBuf,

    /// Docstring style
    #[arg(short, long, value_enum, default_value_t = DocStyle::Numpy)]
    pub style: DocStyle,
}

#[derive(Args, Debug)]
pub struct DocgenDirArgs {
    /// Directory containing Python files
    pub path: PathBuf,

    /// Output directory; one markdown file per source file
    #[arg(short, long = "output-dir", alias = "output", value_name = "DIR", default_value = "docs")]
    pub output_dir: PathBuf,

    /// Docstring style
    #[arg(short, long, value_enum, default_value_t = DocStyle::Numpy)]
    pub style: DocStyle,
}

#[derive(Subcommand, Debug)]
pub enum RefactorCommand {
    /// Refactor a single Python file
    File(RefactorFileArgs),

    /// Refactor all Python files in a directory
    Dir(RefactorDirArgs),
}

#[derive(Args, Debug)]
pub struct RefactorFileArgs {
    /// Python file to refactor
    pub path: PathBuf,

    /// Directory for refactored files and the JSON report
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Save the refactored code (requires --output-dir)
    #[arg(long)]
    pub apply: bool,
}

#[derive(Args, Debug)]
pub struct RefactorDirArgs {
    /// Directory containing Python files
    pub path: PathBuf,

    /// Directory for refactored files and the JSON report
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Save the refactored code (requires --output-dir)
    #[arg(long)]
    pub apply: bool,

    /// Search for Python files recursively (default)
    #[arg(short, long, overrides_with = "no_recursive")]
    pub recursive: bool,

    /// Only look at the directory's own files
    #[arg(long, overrides_with = "recursive")]
    pub no_recursive: bool,
}

impl RefactorDirArgs {
    pub fn is_recursive(&self) -> bool {
        !self.no_recursive
    }
}
