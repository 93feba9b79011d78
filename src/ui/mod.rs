//! Terminal output: colored status lines and batch progress.
//!
//! Command results go to stdout; warnings and errors go to stderr.

pub mod progress;

use colored::Colorize;

pub use progress::BatchProgress;

pub struct UIManager {
    show_progress: bool,
}

impl UIManager {
    /// With `colors_enabled` the terminal and `NO_COLOR`/`CLICOLOR` decide.
    pub fn new(colors_enabled: bool, show_progress: bool) -> Self {
        if !colors_enabled {
            colored::control::set_override(false);
        }
        Self { show_progress }
    }

    pub fn print_header(&self, title: &str) {
        println!("\n{}", title.bold().cyan());
        println!("{}", "=".repeat(title.chars().count()).cyan());
    }

    /// The full-width separator used around per-file reports
    pub fn print_rule(&self) {
        println!("{}", "=".repeat(80));
    }

    pub fn print_section(&self, title: &str) {
        println!("\n{}", title.bold());
        println!("{}", "-".repeat(40));
    }

    pub fn print_success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    pub fn print_info(&self, message: &str) {
        println!("{}", message);
    }

    pub fn print_warning(&self, message: &str) {
        eprintln!("{} {}", "warning:".yellow().bold(), message.yellow());
    }

    pub fn print_error(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message.red());
    }

    pub fn create_batch_progress(&self, total: usize) -> BatchProgress {
        BatchProgress::new(total as u64, self.show_progress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_colors_emit_plain_text() {
        let _ui = UIManager::new(false, false);
        assert_eq!("failed".red().bold().to_string(), "failed");
    }
}
