//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use chapterdoc_core::pipeline::{self, GenerateOutcome, GenerateResult, ProgressReporter};
use chapterdoc_core::writer::WrittenDoc;
use chapterdoc_shared::{init_config, load_config};
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// chapterdoc — generate chapter documentation from annotated test suites.
#[derive(Parser)]
#[command(
    name = "chapterdoc",
    version,
    about = "Generate an overview, chapter pages, and a table of contents from annotated test files.",
    long_about = None,
    args_conflicts_with_subcommands = true,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Project root to generate documentation for (defaults to the current directory).
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Subcommands besides the default generate run.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a chapterdoc.toml with defaults into the project root.
    Init {
        /// Project root (defaults to the current directory).
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration for a project root.
    Show {
        /// Project root (defaults to the current directory).
        path: Option<PathBuf>,
    },
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "chapterdoc=info",
        1 => "chapterdoc=debug",
        _ => "chapterdoc=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        None => cmd_generate(&project_root(cli.path)),
        Some(Command::Config { action }) => match action {
            ConfigAction::Init { path } => cmd_config_init(&project_root(path)),
            ConfigAction::Show { path } => cmd_config_show(&project_root(path)),
        },
    }
}

fn project_root(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| PathBuf::from("."))
}

fn ensure_dir(root: &Path) -> Result<()> {
    if !root.is_dir() {
        return Err(eyre!("directory not found: {}", root.display()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_generate(root: &Path) -> Result<()> {
    ensure_dir(root)?;
    let config = load_config(root)?;

    info!(root = %root.display(), "generating documentation");

    let reporter = CliProgress::new();
    let outcome = pipeline::generate(root, &config, &reporter)?;

    match outcome {
        GenerateOutcome::Generated(result) => print_summary(&result),
        GenerateOutcome::NothingToGenerate { input_dir } => {
            println!();
            println!(
                "  No test files matching *{} found in {}",
                config.input.suffix,
                input_dir.display()
            );
            println!("  Nothing to generate.");
            println!();
        }
    }

    Ok(())
}

fn print_summary(result: &GenerateResult) {
    println!();
    println!("  Documentation generated!");
    println!("  Test files: {}", result.files_parsed);
    println!("  Sections:   {}", result.section_count);
    println!("  Chapters:   {}", result.chapters.len());
    println!("  Written:");
    for doc in &result.written {
        println!(
            "    {:<32} {}  ({} bytes)",
            doc.rel_path.display(),
            short_digest(doc),
            doc.size_bytes
        );
    }
    println!("  Time:       {:.1}s", result.elapsed.as_secs_f64());
    println!();
}

fn short_digest(doc: &WrittenDoc) -> &str {
    doc.sha256.get(..12).unwrap_or(doc.sha256.as_str())
}

fn cmd_config_init(root: &Path) -> Result<()> {
    ensure_dir(root)?;
    let path = init_config(root)?;
    println!("Created {}", path.display());
    Ok(())
}

fn cmd_config_show(root: &Path) -> Result<()> {
    ensure_dir(root)?;
    let config = load_config(root)?;
    let rendered = toml::to_string_pretty(&config)
        .map_err(|e| eyre!("failed to serialize config: {e}"))?;
    print!("{rendered}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn file_parsed(&self, path: &Path, sections: usize, current: usize, total: usize) {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        self.spinner.set_message(format!(
            "Parsing [{current}/{total}] {name} ({sections} sections)"
        ));
    }

    fn document_written(&self, doc: &WrittenDoc) {
        self.spinner
            .set_message(format!("Wrote {}", doc.rel_path.display()));
    }

    fn done(&self, _outcome: &GenerateOutcome) {
        self.spinner.finish_and_clear();
    }
}
