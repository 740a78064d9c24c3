use boxexport::{
    logging, BatchState, BoxExport, BoxExportError, Cli, OutputFormatter, OutputMode,
    UserFriendlyError,
};
use clap::Parser;
use std::path::Path;
use std::process;

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    process::exit(exit_code);
}

async fn run() -> i32 {
    let cli = Cli::parse();

    logging::init(cli.verbose, cli.quiet);

    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let Some(source_dir) = cli.source_dir.as_deref() else {
        eprintln!("A source directory is required");
        return 1;
    };

    let app = match BoxExport::from_cli(&cli) {
        Ok(app) => app,
        Err(e) => {
            print_startup_error(&e);
            return exit_code(&e);
        }
    };

    if cli.dry_run {
        return handle_dry_run(&app, source_dir);
    }

    match app.run_batch(source_dir).await {
        Ok(outcome) => {
            app.output_formatter().print_batch_outcome(&outcome);

            match outcome.state {
                BatchState::Completed => 0,
                BatchState::Cancelled => 130,
            }
        }
        Err(e) => {
            app.handle_error(&e);
            exit_code(&e)
        }
    }
}

fn exit_code(error: &BoxExportError) -> i32 {
    match error {
        BoxExportError::Cancelled => 130, // Interrupted (SIGINT)
        BoxExportError::DirectoryAccess { .. } => 2,
        BoxExportError::NoInputFiles { .. } => 3,
        BoxExportError::FileParse { .. } => 4,
        BoxExportError::ReportWrite { .. } => 5,
        BoxExportError::InvalidStartSequence { .. } => 6,
        BoxExportError::OutputDirectory { .. } => 7,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "boxexport.toml".to_string());

    match BoxExport::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  boxexport <source-dir> --config {}", config_path);
            println!("\nEdit the file to set the report labels and numbering.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(app: &BoxExport, source_dir: &Path) -> i32 {
    let formatter = app.output_formatter();
    let config = app.config();

    formatter.info("DRY RUN MODE - No reports will be written");
    formatter.print_separator();

    formatter.info("Configuration that would be used:");
    formatter.info(&format!("  Source directory: {}", source_dir.display()));
    formatter.info(&format!("  Input extension: {}", config.input.extension));
    formatter.info(&format!(
        "  Output directory: {}",
        config.batch.output_directory.display()
    ));
    formatter.info(&format!("  Start sequence: {}", config.batch.start_sequence));
    formatter.info(&format!(
        "  Empty case number: {:?}",
        config.input.empty_case_number
    ));
    formatter.print_separator();

    let plan = match app.plan(source_dir) {
        Ok(plan) => plan,
        Err(e) => {
            app.handle_error(&e);
            return exit_code(&e);
        }
    };

    formatter.info("Processing order:");
    formatter.print_plan(&plan);
    formatter.print_separator();
    formatter.success(&format!("Dry run completed: {} box files found", plan.len()));

    0
}

fn print_startup_error(error: &BoxExportError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
