pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod logging;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{
    BatchConfig, CliOverrides, Config, EmptyCasePolicy, InputConfig, ReportConfig,
};
pub use error::{BoxExportError, Result, UserFriendlyError};

// Core functionality re-exports
pub use batch::{
    BatchCoordinator, BatchEvent, BatchOutcome, BatchRequest, BatchState, EventSink, FnSink,
    NeverStop, NullSink, PlannedReport, ProgressSample, StopSignal,
};
pub use extractor::{CellValue, OutputManager, Record, RecordExtractor, ReportBuilder, ReportLayout};
pub use scanner::{box_number, FileFilter, InputFile, SortKey, SourceFileLocator};
pub use ui::{GracefulShutdown, OutputFormatter, OutputMode, ProgressAwareOutput, ProgressManager};

use std::path::Path;
use tokio::sync::mpsc::unbounded_channel;
use tokio::task;

/// Main library interface: one configured batch front-end with its own
/// output, progress bar and Ctrl+C handling.
pub struct BoxExport {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    shutdown: GracefulShutdown,
}

impl BoxExport {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);
        let shutdown = GracefulShutdown::new()?;

        Ok(Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        })
    }

    /// Same as [`BoxExport::new`] without installing a Ctrl+C handler, which
    /// can only be registered once per process.
    pub fn new_for_test(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(false);
        let shutdown = GracefulShutdown::new_for_test();

        Self {
            config,
            output_formatter,
            progress_manager,
            shutdown,
        }
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(config, output_mode, cli_args.verbose, cli_args.quiet)
    }

    pub fn request(&self, source_dir: &Path) -> BatchRequest {
        BatchRequest {
            source_dir: source_dir.to_path_buf(),
            start_sequence: self.config.batch.start_sequence,
            output_dir: self.config.batch.output_directory.clone(),
        }
    }

    /// Runs the whole batch for `source_dir`.
    ///
    /// The coordinator works on a blocking thread; its log lines and
    /// progress samples come back over a channel and are rendered here.
    pub async fn run_batch(&self, source_dir: &Path) -> Result<BatchOutcome> {
        self.shutdown.check_shutdown()?;

        self.output_formatter
            .start_operation("Generating box catalogues");

        let request = self.request(source_dir);
        let (tx, mut rx) = unbounded_channel();
        let coordinator = BatchCoordinator::new(&self.config)?
            .with_events(tx)
            .with_stop_signal(self.shutdown.clone());

        let progress = self.progress_manager.create_batch_progress();
        let worker = task::spawn_blocking(move || coordinator.run(&request));

        let output = ProgressAwareOutput::new(&self.output_formatter, Some(&self.progress_manager));
        while let Some(event) = rx.recv().await {
            match event {
                BatchEvent::Log(message) => output.info(&message),
                BatchEvent::Progress(sample) => {
                    ui::progress::update_batch_progress(&progress, &sample)
                }
            }
        }

        let result = worker.await.map_err(|e| BoxExportError::Config {
            message: format!("Batch task failed: {}", e),
        })?;

        match &result {
            Ok(outcome) => {
                let message = match outcome.state {
                    BatchState::Completed => {
                        format!("Exported {} boxes", outcome.files_processed)
                    }
                    BatchState::Cancelled => format!(
                        "Stopped after {} of {} boxes",
                        outcome.files_processed, outcome.total_files
                    ),
                };
                ui::progress::finish_progress_with_summary(&progress, &message, outcome.elapsed);
            }
            Err(_) => progress.abandon(),
        }

        result
    }

    /// Lists the processing order without reading or writing any spreadsheet.
    pub fn plan(&self, source_dir: &Path) -> Result<Vec<PlannedReport>> {
        BatchCoordinator::new(&self.config)?.plan(source_dir)
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn request_shutdown(&self) {
        self.shutdown.request_shutdown();
    }

    pub fn handle_error(&self, error: &BoxExportError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub fn build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
        build_date: option_env!("BUILD_DATE").unwrap_or("unknown"),
        target: std::env::consts::ARCH.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_date: &'static str,
    pub target: String,
}

impl std::fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BoxExport {} ({}) built on {} for {}",
            self.version, self.git_hash, self.build_date, self.target
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    fn xlsx_config(output: &Path) -> Config {
        let mut config = Config::default();
        config.input.extension = "xlsx".to_string();
        config.batch.output_directory = output.to_path_buf();
        config
    }

    fn write_box(dir: &Path, name: &str, records: usize) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for i in 0..records {
            sheet
                .write_string(i as u32 + 2, 2, format!("C{}", i))
                .unwrap();
        }
        workbook.save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_request_uses_config() {
        let out = TempDir::new().unwrap();
        let mut config = xlsx_config(out.path());
        config.batch.start_sequence = 501;

        let app = BoxExport::new_for_test(config, OutputMode::Plain, 0, true);
        let request = app.request(Path::new("/data/boxes"));

        assert_eq!(request.start_sequence, 501);
        assert_eq!(request.output_dir, out.path());
    }

    #[tokio::test]
    async fn test_run_batch_end_to_end() {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_box(source.path(), "000002.xlsx", 2);
        write_box(source.path(), "000001.xlsx", 3);

        let app = BoxExport::new_for_test(xlsx_config(out.path()), OutputMode::Plain, 0, true);
        let outcome = app.run_batch(source.path()).await.unwrap();

        assert_eq!(outcome.state, BatchState::Completed);
        assert_eq!(outcome.files_processed, 2);
        assert_eq!(outcome.next_sequence, 6);
        assert!(out.path().join("000001.xlsx").exists());
        assert!(out.path().join("000002.xlsx").exists());
    }

    #[tokio::test]
    async fn test_run_batch_refuses_after_shutdown() {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_box(source.path(), "1.xlsx", 1);

        let app = BoxExport::new_for_test(xlsx_config(out.path()), OutputMode::Plain, 0, true);
        app.request_shutdown();

        let result = app.run_batch(source.path()).await;
        assert!(matches!(result, Err(BoxExportError::Cancelled)));
        assert!(!out.path().join("1.xlsx").exists());
    }

    #[tokio::test]
    async fn test_run_batch_reports_missing_directory() {
        let out = TempDir::new().unwrap();
        let app = BoxExport::new_for_test(xlsx_config(out.path()), OutputMode::Plain, 0, true);

        let result = app.run_batch(Path::new("/definitely/not/here")).await;
        assert!(matches!(result, Err(BoxExportError::DirectoryAccess { .. })));
    }

    #[test]
    fn test_plan_lists_order() {
        let source = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_box(source.path(), "000010.xlsx", 1);
        write_box(source.path(), "000002.xlsx", 1);
        write_box(source.path(), "notes.xlsx", 1);

        let app = BoxExport::new_for_test(xlsx_config(out.path()), OutputMode::Plain, 0, true);
        let plan = app.plan(source.path()).unwrap();

        let names: Vec<_> = plan.iter().map(|p| p.input.file_name.as_str()).collect();
        assert_eq!(names, vec!["000002.xlsx", "000010.xlsx", "notes.xlsx"]);
        assert_eq!(plan[0].box_number, Some(2));
        assert_eq!(plan[2].box_number, None);
        assert!(std::fs::read_dir(out.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_sample_config_generation() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("sample.toml");

        BoxExport::generate_sample_config(&config_path).unwrap();

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[input]"));
        assert!(content.contains("[report]"));
        assert!(content.contains("[batch]"));

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.batch.start_sequence, 1);
    }

    #[test]
    fn test_version_info() {
        assert!(!version_info().is_empty());

        let build_info = build_info();
        assert!(!build_info.version.is_empty());
        assert!(build_info.to_string().starts_with("BoxExport"));
    }
}
