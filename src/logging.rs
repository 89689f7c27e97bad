use tracing_subscriber::{fmt, EnvFilter};

fn level_for(verbose: u8, quiet: u8) -> &'static str {
    match i16::from(verbose) - i16::from(quiet) {
        i16::MIN..=-1 => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Dependencies stay at WARN; only this crate's targets follow `level`.
fn directive(level: &str) -> String {
    format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level)
}

/// Default is WARN; notifications are logged at DEBUG so they don't repeat on stderr.
/// `-v` raises it one step per flag, `-q` lowers it; `RUST_LOG` wins over both.
pub fn init_logging(verbose: u8, quiet: u8) {
    let level = level_for(verbose, quiet);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive(level)));

    let show_src = matches!(level, "debug" | "trace");

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(show_src)
        .with_line_number(show_src)
        .compact()
        .init();
}
