use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for a verbosity level. `RUST_LOG` wins when set.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "boxexport=error";
    }
    match verbose {
        0 => "boxexport=warn",
        1 => "boxexport=info",
        2 => "boxexport=debug",
        _ => "boxexport=trace",
    }
}

/// Installs the diagnostic subscriber on stderr, leaving stdout to the
/// report summary. Calling it twice is harmless.
pub fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
