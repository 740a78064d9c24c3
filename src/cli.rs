use crate::config::{CliOverrides, Config, EmptyCasePolicy};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "boxexport")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Convert box index spreadsheets into formatted catalogue reports")]
#[command(
    long_about = "BoxExport reads every box index spreadsheet in a directory, in box-number \
                  order, and writes one formatted catalogue workbook per box. Sequence numbers \
                  continue from one box to the next."
)]
#[command(before_help = "📦 BoxExport - Box Catalogue Generator")]
#[command(after_help = "EXAMPLES:\n  \
    boxexport ./boxes\n  \
    boxexport ./boxes --output ./catalogues --start 1201\n  \
    boxexport ./boxes --extension xlsx --exclude '^draft'\n  \
    boxexport ./boxes --dry-run\n  \
    boxexport --generate-config --config boxexport.toml")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Directory holding the box index spreadsheets
    #[arg(value_name = "SOURCE_DIR", required_unless_present = "generate_config")]
    pub source_dir: Option<PathBuf>,

    /// Directory the reports are written to
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Sequence number of the first record of the first box
    #[arg(short, long, value_name = "N", value_parser = parse_start_sequence)]
    pub start: Option<u64>,

    /// Input file extension
    #[arg(short, long, help = "Input file extension (e.g., xls, xlsx)")]
    pub extension: Option<String>,

    /// File name patterns to leave out
    #[arg(long, value_delimiter = ',', help = "Regex patterns of file names to skip")]
    pub exclude: Option<Vec<String>>,

    /// How a row without a case number is handled
    #[arg(long, value_enum)]
    pub empty_case_number: Option<EmptyCasePolicy>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be done without executing)
    #[arg(long, help = "List the processing order without writing any report")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_extension(self.extension.clone())
            .with_exclude(self.exclude.clone())
            .with_start_sequence(self.start)
            .with_output_dir(self.output.clone())
            .with_empty_case_number(self.empty_case_number)
    }
}

pub fn parse_start_sequence(s: &str) -> std::result::Result<u64, String> {
    let value: u64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a whole number", s))?;

    if value == 0 {
        return Err("the start sequence must be at least 1".to_string());
    }

    Ok(value)
}
