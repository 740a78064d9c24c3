use crate::batch::{BatchOutcome, BatchState, PlannedReport};
use crate::error::{BoxExportError, UserFriendlyError};
use crate::ui::progress::format_clock;
use console::{style, Emoji, Term};
use serde_json;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

// Emojis with text fallbacks
static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");

pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = match mode {
            OutputMode::Human => Term::stdout().features().colors_supported() && !quiet,
            _ => false,
        };

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn success(&self, message: &str) {
        if self.quiet {
            return;
        }
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Success, message),
            OutputMode::Json => self.print_json_message("success", message),
            OutputMode::Plain => println!("SUCCESS: {}", message),
        }
    }

    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Human => self.print_human_message(MessageType::Error, message),
            OutputMode::Json => self.print_json_message("error", message),
            OutputMode::Plain => eprintln!("ERROR: {}", message),
        }
    }

    pub fn info(&self, message: &str) {
        if self.should_show_message(1) {
            match self.mode {
                OutputMode::Human => self.print_human_message(MessageType::Info, message),
                OutputMode::Json => self.print_json_message("info", message),
                OutputMode::Plain => println!("INFO: {}", message),
            }
        }
    }

    pub fn start_operation(&self, operation: &str) {
        if self.should_show_message(0) {
            match self.mode {
                OutputMode::Human => {
                    if self.use_colors {
                        println!("{}{}", ROCKET, style(operation).bold());
                    } else {
                        println!("> {}", operation);
                    }
                }
                OutputMode::Json => self.print_json_message("operation_start", operation),
                OutputMode::Plain => println!("STARTING: {}", operation),
            }
        }
    }

    pub fn print_user_friendly_error(&self, error: &BoxExportError) {
        let user_message = error.user_message();
        self.error(&user_message);

        if let Some(suggestion) = error.suggestion() {
            match self.mode {
                OutputMode::Human => {
                    eprintln!();
                    if self.use_colors {
                        eprintln!(
                            "{}{}",
                            INFO,
                            style(&format!("Suggestion: {}", suggestion)).cyan()
                        );
                    } else {
                        eprintln!("Suggestion: {}", suggestion);
                    }
                }
                OutputMode::Json => {
                    self.print_json_object(&serde_json::json!({
                        "type": "suggestion",
                        "message": suggestion
                    }));
                }
                OutputMode::Plain => {
                    eprintln!("SUGGESTION: {}", suggestion);
                }
            }
        }
    }

    pub fn print_batch_outcome(&self, outcome: &BatchOutcome) {
        match self.mode {
            OutputMode::Human => {
                if !self.quiet {
                    self.print_human_outcome(outcome);
                }
            }
            OutputMode::Json => {
                self.print_json_object(&outcome_json(outcome));
            }
            OutputMode::Plain => self.print_plain_outcome(outcome),
        }
    }

    pub fn print_plan(&self, plan: &[PlannedReport]) {
        match self.mode {
            OutputMode::Json => {
                let entries: Vec<_> = plan
                    .iter()
                    .map(|p| {
                        serde_json::json!({
                            "input": p.input.file_name,
                            "box_number": p.box_number,
                            "output": p.output_name,
                        })
                    })
                    .collect();
                self.print_json_object(&serde_json::json!({
                    "type": "plan",
                    "files": entries,
                }));
            }
            OutputMode::Human | OutputMode::Plain => {
                for (index, p) in plan.iter().enumerate() {
                    let box_display = p
                        .box_number
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "-".to_string());
                    println!(
                        "  {:>4}. {} -> {} (box {})",
                        index + 1,
                        p.input.file_name,
                        p.output_name,
                        box_display
                    );
                }
            }
        }
    }

    pub fn print_separator(&self) {
        if self.quiet {
            return;
        }

        match self.mode {
            OutputMode::Human => {
                if self.use_colors {
                    println!("{}", style("─".repeat(60)).dim());
                } else {
                    println!("{}", "-".repeat(60));
                }
            }
            OutputMode::Plain => {
                println!("{}", "-".repeat(60));
            }
            OutputMode::Json => {}
        }
    }

    fn should_show_message(&self, min_verbose_level: u8) -> bool {
        !self.quiet && self.verbose_level >= min_verbose_level
    }

    fn print_human_message(&self, msg_type: MessageType, message: &str) {
        #[allow(clippy::type_complexity)]
        let (emoji, color_fn): (Emoji, Box<dyn Fn(&str) -> console::StyledObject<&str>>) =
            match msg_type {
                MessageType::Success => (CHECKMARK, Box::new(|msg| style(msg).green().bold())),
                MessageType::Error => (CROSS, Box::new(|msg| style(msg).red().bold())),
                MessageType::Info => (INFO, Box::new(|msg| style(msg).cyan())),
            };

        if self.use_colors {
            match msg_type {
                MessageType::Error => eprintln!("{}{}", emoji, color_fn(message)),
                _ => println!("{}{}", emoji, color_fn(message)),
            }
        } else {
            let prefix = match msg_type {
                MessageType::Success => "✓",
                MessageType::Error => "✗",
                MessageType::Info => "i",
            };

            match msg_type {
                MessageType::Error => eprintln!("{} {}", prefix, message),
                _ => println!("{} {}", prefix, message),
            }
        }
    }

    fn print_json_message(&self, level: &str, message: &str) {
        self.print_json_object(&serde_json::json!({
            "type": "message",
            "level": level,
            "message": message,
            "timestamp": chrono::Utc::now().to_rfc3339()
        }));
    }

    fn print_json_object(&self, obj: &serde_json::Value) {
        println!(
            "{}",
            serde_json::to_string(obj).unwrap_or_else(|_| "{}".to_string())
        );
    }

    fn print_human_outcome(&self, outcome: &BatchOutcome) {
        println!();
        self.print_separator();

        let headline = match outcome.state {
            BatchState::Completed => "Box catalogues generated!",
            BatchState::Cancelled => "Batch stopped on request.",
        };
        if self.use_colors {
            println!("{} {}", style(headline).green().bold(), CHECKMARK);
        } else {
            println!("✓ {}", headline);
        }

        println!();
        let highlight = |value: String| {
            if self.use_colors {
                style(value).cyan().bold().to_string()
            } else {
                value
            }
        };
        println!(
            "  Boxes processed: {}",
            highlight(format!("{}/{}", outcome.files_processed, outcome.total_files))
        );
        println!(
            "  Sequence range:  {}",
            highlight(sequence_range(outcome))
        );
        println!(
            "  Next sequence:   {}",
            highlight(outcome.next_sequence.to_string())
        );
        println!(
            "  Output:          {}",
            highlight(outcome.output_directory.display().to_string())
        );
        println!(
            "  Time taken:      {}",
            highlight(format_clock(outcome.elapsed))
        );

        self.print_separator();
    }

    fn print_plain_outcome(&self, outcome: &BatchOutcome) {
        let state = match outcome.state {
            BatchState::Completed => "COMPLETED",
            BatchState::Cancelled => "CANCELLED",
        };
        println!("{}: Box catalogue batch", state);
        println!(
            "Boxes processed: {}/{}",
            outcome.files_processed, outcome.total_files
        );
        println!("Sequence range: {}", sequence_range(outcome));
        println!("Next sequence: {}", outcome.next_sequence);
        println!("Output: {}", outcome.output_directory.display());
        println!("Duration: {}", format_clock(outcome.elapsed));
    }
}

fn sequence_range(outcome: &BatchOutcome) -> String {
    if outcome.records_written() == 0 {
        "none".to_string()
    } else {
        format!("{}-{}", outcome.first_sequence, outcome.next_sequence - 1)
    }
}

fn outcome_json(outcome: &BatchOutcome) -> serde_json::Value {
    let state = match outcome.state {
        BatchState::Completed => "completed",
        BatchState::Cancelled => "cancelled",
    };
    let written: Vec<String> = outcome
        .written
        .iter()
        .map(|p| p.display().to_string())
        .collect();

    serde_json::json!({
        "type": "summary",
        "state": state,
        "files_processed": outcome.files_processed,
        "total_files": outcome.total_files,
        "first_sequence": outcome.first_sequence,
        "next_sequence": outcome.next_sequence,
        "output_directory": outcome.output_directory.display().to_string(),
        "written": written,
        "duration_ms": outcome.elapsed.as_millis() as u64,
        "timestamp": chrono::Utc::now().to_rfc3339()
    })
}

#[derive(Debug, Clone, Copy)]
enum MessageType {
    Success,
    Error,
    Info,
}

/// Routes messages through the progress bar so log lines do not tear it.
pub struct ProgressAwareOutput<'a> {
    formatter: &'a OutputFormatter,
    progress_manager: Option<&'a crate::ui::ProgressManager>,
}

impl<'a> ProgressAwareOutput<'a> {
    pub fn new(
        formatter: &'a OutputFormatter,
        progress_manager: Option<&'a crate::ui::ProgressManager>,
    ) -> Self {
        Self {
            formatter,
            progress_manager,
        }
    }

    pub fn suspend_and_print<F>(&self, f: F)
    where
        F: FnOnce(&OutputFormatter),
    {
        if let Some(pm) = self.progress_manager {
            pm.suspend(|| f(self.formatter));
        } else {
            f(self.formatter);
        }
    }

    pub fn info(&self, message: &str) {
        self.suspend_and_print(|f| f.info(message));
    }
}
