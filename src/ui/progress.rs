use crate::batch::ProgressSample;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
        }
    }

    /// Bar for a batch whose file count is not known yet; the length is set
    /// from the first progress sample.
    pub fn create_batch_progress(&self) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let pb = self.multi_progress.add(ProgressBar::new(0));
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>4}/{len:4} boxes {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );
        pb.set_message("Locating box files...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn suspend<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if self.enabled {
            self.multi_progress.suspend(f)
        } else {
            f()
        }
    }
}

pub fn update_batch_progress(pb: &ProgressBar, sample: &ProgressSample) {
    pb.set_length(sample.total as u64);
    pb.set_position(sample.index as u64);
    pb.set_message(batch_progress_message(sample));
}

pub fn batch_progress_message(sample: &ProgressSample) -> String {
    format!(
        "{:.2}% {} | elapsed {} | avg {} | ETA {}",
        sample.percentage(),
        sample.file_name,
        format_clock(sample.total_elapsed),
        format_clock(sample.avg_per_file),
        format_clock(sample.eta)
    )
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    let final_message = format!("{} (completed in {})", message, format_clock(duration));
    pb.finish_with_message(final_message);
}

/// `mm:ss`, or `hh:mm:ss` from one hour up.
pub fn format_clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    let seconds = secs % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
