use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while a build command runs
pub struct BuildProgress {
    progress_bar: ProgressBar,
}

impl BuildProgress {
    pub fn new(label: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message(format!("Building {}...", label));
        pb.enable_steady_tick(std::time::Duration::from_millis(120));

        Self { progress_bar: pb }
    }

    pub fn finish_success(&self, label: &str) {
        self.progress_bar
            .finish_with_message(format!("Built {} ✓", label));
    }

    pub fn finish_error(&self, label: &str) {
        self.progress_bar
            .finish_with_message(format!("Building {} failed", label));
    }
}
