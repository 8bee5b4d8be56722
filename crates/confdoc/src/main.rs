//! confdoc - Import markdown documentation templates into Confluence Cloud.
//!
//! Reads `templates/<section>/<page>.md`, converts each file to Confluence
//! storage format and creates or updates the matching page under a
//! project root page. Re-running updates the same pages in place.
//! Configured diagram images are placed in their pages and uploaded as
//! attachments.

mod error;
mod import;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use import::ImportArgs;
use output::Output;

/// Import documentation templates into Confluence Cloud.
#[derive(Parser, Debug)]
#[command(name = "confdoc", version, about)]
struct Cli {
    #[command(flatten)]
    import: ImportArgs,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = cli.import.execute() {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
