//! slideport command-line tool.
//!
//! Provides the `slideport` binary with two subcommands:
//!
//! - `stdio`: reads newline-delimited `{"op": ...}` commands on stdin and
//!   writes one `{"success", "data" | "error"}` envelope per line on stdout.
//! - `inspect <path>`: opens a saved deck and prints its slides and text as
//!   JSON.
//!
//! Both go through the same `DeckService` the HTTP server uses. Logs go to
//! stderr so stdout stays machine-readable.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use slideport_server::error::ApiError;
use slideport_server::schema::common::ApiResponse;
use slideport_server::service::DeckService;

/// Drive a presentation application through stable object ids.
#[derive(Parser)]
#[command(name = "slideport", about = "Presentation automation with stable object ids")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve JSON commands over stdin/stdout, one per line.
    Stdio {
        /// Show the host application window.
        #[arg(long)]
        visible: bool,
    },
    /// Print the slides and text of a saved deck.
    Inspect {
        /// Deck file to open.
        path: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Stdio { visible } => run_stdio(!visible),
        Commands::Inspect { path } => run_inspect(&path),
    };
    process::exit(exit_code);
}

/// Execute the stdio subcommand.
///
/// Returns exit code: 0 = stdin closed, 3 = I/O error on stdin/stdout.
fn run_stdio(hidden: bool) -> i32 {
    let (mut service, _host) = DeckService::in_memory(hidden);
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Error: failed to read stdin: {}", e);
                return 3;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let response: ApiResponse<serde_json::Value> = service.execute_json(&line).into();
        let encoded = serde_json::to_string(&response)
            .unwrap_or_else(|e| encode_failure(&e.to_string()));
        if let Err(e) = writeln!(stdout, "{}", encoded).and_then(|_| stdout.flush()) {
            eprintln!("Error: failed to write stdout: {}", e);
            return 3;
        }
    }
    tracing::debug!("stdin closed, exiting");
    0
}

/// Execute the inspect subcommand.
///
/// Returns exit code: 0 = success, 1 = the deck could not be read.
fn run_inspect(path: &Path) -> i32 {
    match inspect(path) {
        Ok(report) => {
            let json = serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
                serde_json::json!({ "error": format!("failed to serialize report: {e}") }).to_string()
            });
            println!("{}", json);
            0
        }
        Err(err) => {
            eprintln!("{}: {}", err.kind(), err);
            1
        }
    }
}

/// Error envelope for a response that could not be encoded itself.
fn encode_failure(message: &str) -> String {
    let err = ApiError::HostOperation(format!("failed to encode response: {message}"));
    serde_json::json!({ "success": false, "error": err.detail() }).to_string()
}

fn inspect(path: &Path) -> Result<serde_json::Value, ApiError> {
    let (mut service, _host) = DeckService::in_memory(true);
    let raw = path.display().to_string();
    let info = service.open_presentation(&raw)?;
    let pid = info.id.to_string();
    let sections = service.get_presentation_sections(&pid)?;

    let mut slides = Vec::new();
    for slide in service.get_slides(&pid)?.slides {
        let text = service.get_slide_text(&pid, &slide.id.to_string())?;
        slides.push(serde_json::json!({
            "position": slide.position,
            "layout": slide.layout,
            "title": slide.title,
            "shape_count": slide.shape_count,
            "texts": text.texts.into_iter().map(|t| t.text).collect::<Vec<_>>(),
        }));
    }

    Ok(serde_json::json!({
        "name": info.name,
        "path": info.path,
        "slide_count": info.slide_count,
        "sections": sections.sections,
        "slides": slides,
    }))
}
