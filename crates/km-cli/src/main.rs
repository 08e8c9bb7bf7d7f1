//! CLI entry point for the keymap-migration tool.
//!
//! This binary upgrades deprecated syntax in devicetree keymap files.
//!
//! # Usage
//!
//! ```bash
//! # Print the upgraded keymap to stdout
//! km-upgrade my_keyboard.keymap
//!
//! # Upgrade in place
//! km-upgrade --write my_keyboard.keymap
//!
//! # Read from stdin, emit a JSON report with changed ranges
//! cat my_keyboard.keymap | km-upgrade --format json -
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::{Read, Write};

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};
use km_core::Range;
use km_upgrader::{UpgradeOutcome, Upgrader};
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Upgrades deprecated syntax in devicetree keymap files.
///
/// Parses the keymap, rewrites deprecated behavior references, key codes,
/// include headers, node names, `label` properties, and encoder resolution
/// settings, and reports which lines changed.
#[derive(Parser)]
#[command(name = "km-upgrade", version, about, long_about = None)]
struct Cli {
    /// Keymap file to upgrade, or `-` to read from stdin.
    input: Utf8PathBuf,

    /// Rewrite the input file in place instead of printing to stdout.
    ///
    /// Incompatible with stdin input.
    #[arg(short, long)]
    write: bool,

    /// Write the upgraded keymap to this file instead of stdout.
    #[arg(short, long, conflicts_with = "write")]
    output: Option<Utf8PathBuf>,

    /// Output format for stdout.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose logging (debug level).
    #[arg(short, long)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

/// Output format for the upgrade result.
#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// The upgraded keymap text.
    Text,

    /// Only the changed-line highlight string, e.g. `{3,7-9}`.
    Highlight,

    /// JSON report with the text, changed ranges, and highlight string.
    Json,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `warn` level by default so pass
/// diagnostics don't interleave with the upgraded text on a terminal.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "warn" };
        EnvFilter::new(level)
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

// =============================================================================
// INPUT / OUTPUT
// =============================================================================

/// Reads the keymap source from a file or stdin.
fn read_input(input: &Utf8PathBuf) -> color_eyre::Result<String> {
    if input.as_str() == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }

    if !input.exists() {
        return Err(color_eyre::eyre::eyre!("Input file does not exist: {input}"));
    }

    Ok(std::fs::read_to_string(input.as_std_path())?)
}

/// Serializable JSON report of one upgrade.
#[derive(serde::Serialize)]
struct Report<'a> {
    /// The upgraded keymap text.
    text: &'a str,
    /// Changed byte ranges within `text`.
    changed_ranges: &'a [Range],
    /// Changed lines as a highlight directive.
    highlight: &'a str,
}

/// Writes the result in the selected format to stdout.
fn print_outcome(outcome: &UpgradeOutcome, format: OutputFormat) -> color_eyre::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Text => write!(handle, "{}", outcome.text)?,
        OutputFormat::Highlight => writeln!(handle, "{}", outcome.highlight)?,
        OutputFormat::Json => {
            let report = Report {
                text: &outcome.text,
                changed_ranges: &outcome.changed_ranges,
                highlight: &outcome.highlight,
            };
            writeln!(handle, "{}", serde_json::to_string_pretty(&report)?)?;
        }
    }

    Ok(())
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.no_color);

    if cli.write && cli.input.as_str() == "-" {
        return Err(color_eyre::eyre::eyre!("--write requires a file input, not stdin"));
    }

    let source = read_input(&cli.input)?;

    let mut upgrader =
        Upgrader::new().map_err(|e| color_eyre::eyre::eyre!("Failed to initialize parser: {e}"))?;
    let outcome = upgrader
        .upgrade(&source)
        .map_err(|e| color_eyre::eyre::eyre!("Upgrade failed: {e}"))?;

    info!(
        changed = outcome.changed_ranges.len(),
        lines = %outcome.highlight,
        "upgrade complete"
    );

    if cli.write {
        std::fs::write(cli.input.as_std_path(), &outcome.text)?;
        info!(path = %cli.input, "keymap rewritten");
        return Ok(());
    }

    if let Some(output_path) = &cli.output {
        std::fs::write(output_path.as_std_path(), &outcome.text)?;
        info!(path = %output_path, "upgraded keymap written");
        return Ok(());
    }

    print_outcome(&outcome, cli.format)
}
