//! quill - proofread text or ask a quick programming question from the terminal.
//!
//! Each invocation sends one request to the Anthropic Messages API and prints
//! the reply. In proofread mode the corrected text is also copied to the
//! clipboard.

mod args;
mod clipboard;
mod completion;
mod config;
mod error;
mod mode;

use clap::{ArgAction, Parser};
use clipboard::{ClipboardWriter, CommandClipboard};
use completion::CompletionClient;
use config::Config;
use error::{Error, Result};
use mode::Mode;
use std::io::Write;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quill")]
#[command(author, version, about = "Proofread text or ask a quick programming question")]
#[command(disable_help_flag = true, disable_version_flag = true)]
#[command(after_help = "Modes:\n  -s <text>  proofread <text>, print the result and copy it to the clipboard\n  -q <text>  ask a short programming question\n\nThe API key is read from API_KEY (or ANTHROPIC_API_KEY).")]
struct Cli {
    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Print version
    #[arg(long, action = ArgAction::Version)]
    version: Option<bool>,

    /// Mode flag followed by the text to send
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    args: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("quill: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

/// Initialize logging on stderr so stdout only carries the result.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("QUILL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let filter = match "reqwest=warn".parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let invocation = args::classify(&cli.args);
    let mode = invocation.require_mode()?;
    debug!(mode = mode.name(), flags = ?invocation.flags, "Selected mode");

    let config = Config::load().map_err(Error::Config)?;
    let client = CompletionClient::new(&config)?;

    let text = match mode {
        Mode::Proofread => client.proofread(&invocation.input).await?,
        Mode::Question => client.ask_programming_question(&invocation.input).await?,
    };
    let printed = print_result(&mut std::io::stdout().lock(), &text);

    if mode.copies_to_clipboard() {
        if let Some(clipboard) = CommandClipboard::from_settings(&config.clipboard) {
            copy_result(&clipboard, &text);
        }
    }

    printed
}

/// Write the result to `out`. A closed stdout is an error, not a panic.
fn print_result(out: &mut impl Write, text: &str) -> Result<()> {
    writeln!(out, "{}", text)
        .and_then(|()| out.flush())
        .map_err(Error::Output)
}

/// Copy `text` to the clipboard. Failure is only a warning since the text was already printed.
fn copy_result(clipboard: &impl ClipboardWriter, text: &str) {
    if let Err(e) = clipboard.write(text.as_bytes()) {
        debug!(error = %e, "Clipboard copy failed");
        eprintln!("quill: warning: {}", e);
    }
}
