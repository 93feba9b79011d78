use indicatif::{ProgressBar, ProgressStyle};

const BATCH_TEMPLATE: &str = "{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Progress over a batch of files. Draws on stderr and stays invisible when
/// stderr is not a terminal.
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    pub fn new(total: u64, enabled: bool) -> Self {
        let bar = if enabled {
            ProgressBar::new(total)
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(
            ProgressStyle::with_template(BATCH_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        Self { bar }
    }

    pub fn set_current_file(&self, file: &str) {
        self.bar.set_message(file.to_string());
    }

    pub fn inc(&self) {
        self.bar.inc(1);
    }

    /// Run `f` with the bar cleared, for printing per-file lines.
    pub fn suspend<F: FnOnce()>(&self, f: F) {
        self.bar.suspend(f);
    }

    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}
