//! SVG inspection tool for the SVGKit engine.
//!
//! Provides commands for:
//! - Replaying a document onto the recording backend and printing the calls
//! - Summarizing a document or a single element
//! - Checking a document with strict parsing
//!
//! ## Usage
//!
//! ```bash
//! # Print the draw calls, fitted into a 512x512 viewport
//! svg-dump render icon.svg --viewport 512x512
//!
//! # Same, as JSON, written to a file
//! svg-dump render icon.svg --format json --output calls.json
//!
//! # Describe the element with id "layer1"
//! svg-dump info icon.svg --node layer1
//!
//! # Fail on any markup problem or unknown element
//! svg-dump check icon.svg
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use svgkit_common::{init_logging, LogConfig};
use tracing::{info, warn};

mod report;

use report::{DumpError, OutputFormat};

#[derive(Parser)]
#[command(name = "svg-dump")]
#[command(about = "Inspect SVG documents through the SVGKit recording backend")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON file with render options
    #[arg(long, global = true)]
    options: Option<PathBuf>,

    /// Pixels per inch for absolute units
    #[arg(long, global = true)]
    dpi: Option<f32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a document and print the recorded calls
    Render {
        /// SVG file
        file: PathBuf,
        /// Viewport as WIDTHxHEIGHT; defaults to the document's own size
        #[arg(long)]
        viewport: Option<String>,
        /// Reject malformed markup and unknown elements
        #[arg(long)]
        strict: bool,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Write the report here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Render without paragraph support
        #[arg(long)]
        no_text: bool,
    },

    /// Summarize a document
    Info {
        /// SVG file
        file: PathBuf,
        /// Describe the element with this id instead
        #[arg(long)]
        node: Option<String>,
    },

    /// Parse strictly and report the first problem
    Check {
        /// SVG file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging(LogConfig::from_verbosity(cli.verbose)) {
        eprintln!("warning: {e}");
    }

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), DumpError> {
    match cli.command {
        Commands::Render {
            file,
            viewport,
            strict,
            format,
            output,
            no_text,
        } => {
            let viewport = viewport.as_deref().map(report::parse_viewport).transpose()?;
            let options = report::load_options(cli.options.as_deref(), cli.dpi, strict)?;
            let doc = report::load_document(&file, options)?;

            let calls = report::render_calls(&doc, viewport, !no_text);
            let rendered = report::format_calls(&calls, format)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, rendered)?;
                    info!(calls = calls.len(), path = %path.display(), "report written");
                    println!("{} calls written to: {}", calls.len(), path.display());
                }
                None => print!("{rendered}"),
            }
        }

        Commands::Info { file, node } => {
            let options = report::load_options(cli.options.as_deref(), cli.dpi, false)?;
            let doc = report::load_document(&file, options)?;
            let json = match node {
                Some(id) => serde_json::to_string_pretty(&report::describe_node(&doc, &id)?)?,
                None => serde_json::to_string_pretty(&report::summarize(&doc))?,
            };
            println!("{json}");
        }

        Commands::Check { file } => {
            let options = report::load_options(cli.options.as_deref(), cli.dpi, true)?;
            match report::load_document(&file, options) {
                Ok(doc) => println!("{}: ok ({} nodes)", file.display(), doc.len()),
                Err(DumpError::Svg(e)) if e.is_content_error() => {
                    warn!(category = e.category(), "check failed");
                    println!("{}: {} [{}]", file.display(), e, e.category());
                    std::process::exit(2);
                }
                Err(e) => return Err(e),
            }
        }
    }

    Ok(())
}
