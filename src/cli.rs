use anyhow::{bail, Context, Result};
use std::path::Path;
use tracing::info;

use crate::{
    agents::{
        document_file, document_files, documentation_path_for, output_path_for, refactor_file, refactor_files,
        save_report, summarize_repo, NO_ISSUES_MESSAGE,
    },
    cli_types::{
        Cli, Commands, DocgenCommand, DocgenDirArgs, DocgenFileArgs, RefactorCommand, RefactorDirArgs,
        RefactorFileArgs, SummarizeArgs, SummarizeCommand,
    },
    config::CodexConfig,
    llm::{GeminiClient, ModelClient},
    scanner::RepositoryScanner,
    types::RefactorReport,
    ui::UIManager,
};

pub struct CliApp {
    config: CodexConfig,
    client: Box<dyn ModelClient>,
    verbose: bool,
    ui: UIManager,
}

/// Load configuration, build the app and run the parsed command.
pub async fn run(cli: Cli) -> Result<()> {
    let config = CodexConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let colors_enabled = config.output.colors && !cli.no_color;
    let app = CliApp::new(config, cli.verbose, colors_enabled)?;
    app.execute(cli.command).await
}

async fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

impl CliApp {
    pub fn new(config: CodexConfig, verbose: bool, colors_enabled: bool) -> Result<Self> {
        info!("Initializing codexagent");
        let client = GeminiClient::from_config(&config)?;
        Ok(Self::with_client(config, Box::new(client), verbose, colors_enabled))
    }

    pub fn with_client(config: CodexConfig, client: Box<dyn ModelClient>, verbose: bool, colors_enabled: bool) -> Self {
        let ui = UIManager::new(colors_enabled, !verbose);
        Self {
            config,
            client,
            verbose,
            ui,
        }
    }

    pub async fn execute(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Summarize(SummarizeCommand::Run(args)) => self.summarize(args).await,
            Commands::Docgen(DocgenCommand::File(args)) => self.docgen_file(args).await,
            Commands::Docgen(DocgenCommand::Dir(args)) => self.docgen_dir(args).await,
            Commands::Refactor(RefactorCommand::File(args)) => self.refactor_file(args).await,
            Commands::Refactor(RefactorCommand::Dir(args)) => self.refactor_dir(args).await,
        }
    }

    fn python_scanner(&self) -> Result<RepositoryScanner> {
        RepositoryScanner::python(&self.config.file_scanning).context("Failed to create repository scanner")
    }

    pub async fn summarize(&self, args: SummarizeArgs) -> Result<()> {
        if !args.path.exists() {
            bail!("Path '{}' does not exist.", args.path.display());
        }

        let scanner = RepositoryScanner::new(&self.config.summarize.include_patterns, &self.config.file_scanning)
            .context("Failed to create repository scanner")?;
        let summary = summarize_repo(
            &args.path,
            self.client.as_ref(),
            &scanner,
            self.config.summarize.max_snippets,
        )
        .await
        .with_context(|| format!("Failed to summarize {}", args.path.display()))?;

        match args.output {
            Some(output) => {
                write_file(&output, &summary).await?;
                self.ui.print_success(&format!("Summary written to: {}", output.display()));
            }
            None => println!("{}", summary),
        }
        Ok(())
    }

    pub async fn docgen_file(&self, args: DocgenFileArgs) -> Result<()> {
        if !args.path.is_file() {
            bail!("File '{}' does not exist.", args.path.display());
        }
        if self.verbose {
            self.ui.print_info(&format!("Documenting {} ({} style)", args.path.display(), args.style));
        }

        let documentation = document_file(&args.path, args.style, self.client.as_ref())
            .await
            .with_context(|| format!("Error generating documentation for {}", args.path.display()))?;

        write_file(&args.output, &documentation).await?;
        self.ui
            .print_success(&format!("Documentation generated: {}", args.output.display()));
        Ok(())
    }

    pub async fn docgen_dir(&self, args: DocgenDirArgs) -> Result<()> {
        if !args.path.is_dir() {
            bail!("Directory '{}' does not exist.", args.path.display());
        }

        let files = self
            .python_scanner()?
            .scan(&args.path)
            .with_context(|| format!("Failed to scan {}", args.path.display()))?;
        if files.is_empty() {
            self.ui.print_warning("No Python files found in the specified directory.");
            return Ok(());
        }

        self.ui.print_header("Documentation");
        let progress = self.ui.create_batch_progress(files.len());
        let documented = document_files(&files, args.style, self.client.as_ref(), |entry| {
            progress.set_current_file(&entry.path.display().to_string());
            progress.inc();
        })
        .await;
        progress.finish_and_clear();

        let mut generated = 0;
        for entry in &documented {
            match &entry.result {
                Ok(documentation) => {
                    let output = documentation_path_for(&entry.path, &args.path, &args.output_dir);
                    match write_file(&output, documentation).await {
                        Ok(()) => {
                            generated += 1;
                            self.ui
                                .print_success(&format!("Documentation generated: {}", output.display()));
                        }
                        Err(e) => self.ui.print_warning(&format!("{:#}", e)),
                    }
                }
                Err(e) => self.ui.print_warning(&format!(
                    "Error generating documentation for {}: {}",
                    entry.path.display(),
                    e
                )),
            }
        }

        self.ui.print_info(&format!(
            "\nDocumented {} of {} files into {}",
            generated,
            documented.len(),
            args.output_dir.display()
        ));
        Ok(())
    }

    pub async fn refactor_file(&self, args: RefactorFileArgs) -> Result<()> {
        if !args.path.is_file() {
            bail!("File '{}' does not exist.", args.path.display());
        }

        let output_path = match (&args.output_dir, args.apply) {
            (Some(dir), true) => Some(output_path_for(&args.path, None, dir)),
            _ => None,
        };

        let result = refactor_file(
            &args.path,
            output_path.as_deref(),
            self.client.as_ref(),
            &self.config.quality,
        )
        .await;

        println!();
        self.ui.print_rule();
        self.ui
            .print_info(&format!("Refactoring report for: {}", args.path.display()));
        self.ui.print_rule();

        if let Some(error) = &result.error {
            bail!("{}", error);
        }

        if result.issue_count > 0 {
            self.ui.print_section("Issues found:");
            println!("{}", result.issues);

            self.ui.print_section("Suggestions:");
            println!("{}", result.suggestions);

            if args.apply {
                match (&output_path, &result.refactored_code) {
                    (Some(path), _) => {
                        self.ui
                            .print_success(&format!("Refactored code saved to: {}", path.display()));
                    }
                    (None, Some(code)) => {
                        self.ui
                            .print_section("Refactored code (not saved, use --output-dir to save):");
                        println!("{}", code);
                    }
                    (None, None) => {}
                }
            }
        } else {
            self.ui.print_success(NO_ISSUES_MESSAGE);
        }

        if let Some(output_dir) = &args.output_dir {
            let report_path = save_report(&result, output_dir).await?;
            self.ui
                .print_info(&format!("\nDetailed report saved to: {}", report_path.display()));
        }
        Ok(())
    }

    pub async fn refactor_dir(&self, args: RefactorDirArgs) -> Result<()> {
        if !args.path.is_dir() {
            bail!("Directory '{}' does not exist.", args.path.display());
        }

        let files = self
            .python_scanner()?
            .recursive(args.is_recursive())
            .scan(&args.path)
            .with_context(|| format!("Failed to scan {}", args.path.display()))?;
        if files.is_empty() {
            self.ui.print_info("No Python files found in the specified directory.");
            return Ok(());
        }

        let save_dir = if args.apply { args.output_dir.as_deref() } else { None };
        let total = files.len();
        let progress = self.ui.create_batch_progress(total);
        let mut processed = 0;

        let results = refactor_files(
            &files,
            &args.path,
            save_dir,
            self.client.as_ref(),
            &self.config.quality,
            |file, result| {
                processed += 1;
                progress.set_current_file(&file.display().to_string());
                progress.suspend(|| {
                    println!("\n[{}/{}] Processing: {}", processed, total, file.display());
                    match &result.error {
                        Some(error) => self.ui.print_error(&format!("  {}", error)),
                        None => {
                            println!("  Found {} potential issues", result.issue_count);
                            if let (Some(dir), Some(_)) = (save_dir, &result.refactored_code) {
                                println!(
                                    "  Refactored code saved to: {}",
                                    output_path_for(file, Some(&args.path), dir).display()
                                );
                            }
                        }
                    }
                });
                progress.inc();
            },
        )
        .await;
        progress.finish_and_clear();

        let report = RefactorReport::new(args.path.display().to_string(), results);

        println!();
        self.ui.print_rule();
        self.ui.print_success(&format!(
            "Refactoring complete! Processed {} files.",
            report.files_processed
        ));
        self.ui
            .print_info(&format!("Total issues found: {}", report.total_issues));
        let failed = report.failed_count();
        if failed > 0 {
            self.ui
                .print_warning(&format!("{} of {} files could not be processed", failed, total));
        }

        if let Some(output_dir) = &args.output_dir {
            let report_path = save_report(&report, output_dir).await?;
            self.ui
                .print_info(&format!("\nDetailed report saved to: {}", report_path.display()));
        }
        Ok(())
    }
}
