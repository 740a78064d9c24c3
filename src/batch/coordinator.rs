use crate::batch::events::{BatchEvent, EventSink, NeverStop, NullSink, ProgressSample, StopSignal};
use crate::config::Config;
use crate::error::{BoxExportError, Result};
use crate::extractor::{OutputManager, RecordExtractor, ReportBuilder, ReportLayout};
use crate::scanner::{box_number, InputFile, SourceFileLocator};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub source_dir: PathBuf,
    pub start_sequence: u64,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Completed,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub state: BatchState,
    pub files_processed: usize,
    pub total_files: usize,
    pub first_sequence: u64,
    /// First sequence number not handed out; the start value for a follow-up run.
    pub next_sequence: u64,
    pub output_directory: PathBuf,
    pub written: Vec<PathBuf>,
    pub elapsed: Duration,
}

impl BatchOutcome {
    pub fn records_written(&self) -> u64 {
        self.next_sequence - self.first_sequence
    }
}

/// What a run would do with one input file, without reading it.
#[derive(Debug, Clone)]
pub struct PlannedReport {
    pub input: InputFile,
    pub box_number: Option<u64>,
    pub output_name: String,
}

/// Per-run bookkeeping. Lives for exactly one call to [`BatchCoordinator::run`].
struct BatchRunState {
    files: Vec<InputFile>,
    current: usize,
    sequence: u64,
    started: Instant,
    written: Vec<PathBuf>,
}

impl BatchRunState {
    fn new(files: Vec<InputFile>, sequence: u64) -> Self {
        Self {
            files,
            current: 0,
            sequence,
            started: Instant::now(),
            written: Vec::new(),
        }
    }

    fn total(&self) -> usize {
        self.files.len()
    }
}

pub struct BatchCoordinator {
    locator: SourceFileLocator,
    extractor: RecordExtractor,
    builder: ReportBuilder,
    output_extension: String,
    events: Box<dyn EventSink>,
    stop: Box<dyn StopSignal>,
}

impl BatchCoordinator {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            locator: SourceFileLocator::new(&config.input)?,
            extractor: RecordExtractor::new(&config.input),
            builder: ReportBuilder::new(ReportLayout::from(&config.report)),
            output_extension: config.report.output_extension.clone(),
            events: Box::new(NullSink),
            stop: Box::new(NeverStop),
        })
    }

    pub fn with_events<S: EventSink + 'static>(mut self, sink: S) -> Self {
        self.events = Box::new(sink);
        self
    }

    pub fn with_stop_signal<S: StopSignal + 'static>(mut self, stop: S) -> Self {
        self.stop = Box::new(stop);
        self
    }

    /// Lists what `run` would produce for `source_dir`, in order.
    pub fn plan(&self, source_dir: &Path) -> Result<Vec<PlannedReport>> {
        let files = self.locator.scan_directory(source_dir)?;

        Ok(files
            .into_iter()
            .map(|input| PlannedReport {
                box_number: box_number(&input.file_name),
                output_name: input.output_name(&self.output_extension),
                input,
            })
            .collect())
    }

    /// Converts every input file of the request, one at a time.
    ///
    /// The sequence counter returned by each report is the start of the next
    /// one. A stop request is honored only between files. Any read or write
    /// failure ends the run; reports already written are left in place.
    pub fn run(&self, request: &BatchRequest) -> Result<BatchOutcome> {
        if request.start_sequence == 0 {
            return Err(BoxExportError::InvalidStartSequence {
                value: request.start_sequence,
            });
        }

        let files = self.locator.scan_directory(&request.source_dir)?;
        let output = OutputManager::new(request.output_dir.clone(), &self.output_extension)?;

        let mut state = BatchRunState::new(files, request.start_sequence);
        let total = state.total();
        let mut outcome_state = BatchState::Completed;

        info!(
            files = total,
            start = request.start_sequence,
            source = %request.source_dir.display(),
            "starting batch"
        );

        while state.current < total {
            let input = &state.files[state.current];
            let file_started = Instant::now();

            self.log(format!("Reading: {}", input.file_name));
            let records = self
                .extractor
                .read_records(&input.path)
                .inspect_err(|e| warn!(file = %input.file_name, error = %e, "batch aborted"))?;

            let box_no = box_number(&input.file_name);
            let out_path = output.output_path(input);

            self.log(format!("Exporting: {}", output.output_name(input)));
            let next_sequence = self
                .builder
                .build(&records, box_no, state.sequence, &out_path)
                .inspect_err(|e| warn!(file = %input.file_name, error = %e, "batch aborted"))?;

            let file_name = input.file_name.clone();
            state.sequence = next_sequence;
            state.written.push(out_path);
            state.current += 1;

            self.events.emit(BatchEvent::Progress(ProgressSample::new(
                state.current,
                total,
                file_name,
                file_started.elapsed(),
                state.started.elapsed(),
            )));

            if self.stop.should_stop() {
                self.log("Stop requested; halted after the current file.".to_string());
                // Nothing was left undone when the stop came after the last file.
                if state.current < total {
                    outcome_state = BatchState::Cancelled;
                }
                break;
            }
        }

        self.log(format!(
            "Finished, output directory: {}",
            output.get_output_directory().display()
        ));
        info!(
            processed = state.current,
            next = state.sequence,
            cancelled = outcome_state == BatchState::Cancelled,
            "batch finished"
        );

        Ok(BatchOutcome {
            state: outcome_state,
            files_processed: state.current,
            total_files: total,
            first_sequence: request.start_sequence,
            next_sequence: state.sequence,
            output_directory: output.get_output_directory().to_path_buf(),
            written: state.written,
            elapsed: state.started.elapsed(),
        })
    }

    fn log(&self, message: String) {
        self.events.emit(BatchEvent::Log(message));
    }
}
