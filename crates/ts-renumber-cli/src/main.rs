use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use ts_renumber::{
    renumber_source, unified_diff, ExitCode, Grammar, InputSource, RenumberError,
    RenumberOptions, RenumberOutcome,
};
use ts_renumber_config::{Config, ConfigError, LoadOptions};

#[derive(Parser, Debug)]
#[command(
    name = "ts-renumber",
    version,
    about = "Renumber TS cross-reference labels in a markdown style guide",
    long_about = None
)]
struct Cli {
    /// Path to markdown file ('-' for stdin). Defaults to the configured input (README.md)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Bullet grammar to renumber
    #[arg(short, long, value_enum)]
    grammar: Option<GrammarArg>,

    /// Section counter value before the first header (-1 numbers the first header 0)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    section_start: Option<i64>,

    /// Explicit config file, layered over .ts-renumber.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Print nothing; exit 1 when any reference would be renumbered
    #[arg(long, conflicts_with = "diff")]
    check: bool,

    /// Print a unified diff instead of the renumbered document
    #[arg(long)]
    diff: bool,

    /// Only log errors and skip the --check listing of stale lines
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GrammarArg {
    /// `  - [TS 1.02]` and bare `  - [TS]` bullets
    General,
    /// `  - [[TS 1.02]]` bullets
    DoubleBracket,
}

impl From<GrammarArg> for Grammar {
    fn from(value: GrammarArg) -> Self {
        match value {
            GrammarArg::General => Grammar::General,
            GrammarArg::DoubleBracket => Grammar::DoubleBracket,
        }
    }
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.quiet);

    let exit = match run(&cli) {
        Ok(exit) => exit,
        Err(err) => {
            error!(error = %err, "renumbering failed");
            for cause in err.chain().skip(1) {
                error!(cause = %cause, "caused by");
            }
            exit_code_for(&err)
        }
    };

    std::process::ExitCode::from(exit as u8)
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let mut load_options = LoadOptions::default();
    if let Some(path) = &cli.config {
        load_options = load_options.with_override_path(path);
    }
    let config = Config::load(load_options).context("failed to load configuration")?;
    debug!(
        working_directory = %config.sources.working_directory.display(),
        layers = config.sources.layers.len(),
        "configuration loaded"
    );

    let source = match &cli.file {
        Some(path) => InputSource::from_arg(path),
        None => InputSource::File(config.renumber.input.clone()),
    };
    let options = build_options(cli, config.renumber.options());

    info!(
        input = %source,
        grammar = %options.grammar,
        section_start = options.section_start,
        "renumbering references"
    );

    let (original, outcome) = renumber_source(&source, &options)
        .with_context(|| format!("unable to renumber {source}"))?;

    info!(
        sections = outcome.sections.len(),
        bullets = outcome.bullets,
        changed_lines = outcome.changes.len(),
        "renumbered"
    );
    for change in &outcome.changes {
        debug!(line = change.line, reference = %change.reference, "relabelled bullet");
    }

    if cli.check {
        return Ok(report_stale(&source, &outcome, cli.quiet));
    }

    if cli.diff {
        if let Some(diff) = unified_diff(&original, &outcome.text, &source.display_name()) {
            write_stdout(&diff)?;
        }
        return Ok(ExitCode::Success);
    }

    write_stdout(&format!("{}\n", outcome.document()))?;
    Ok(ExitCode::Success)
}

fn build_options(cli: &Cli, configured: RenumberOptions) -> RenumberOptions {
    RenumberOptions {
        grammar: cli.grammar.map(Grammar::from).unwrap_or(configured.grammar),
        section_start: cli.section_start.unwrap_or(configured.section_start),
    }
}

/// The stale-line listing is the user-facing result of `--check`, so it goes
/// straight to stderr rather than through the tracing subscriber.
fn report_stale(source: &InputSource, outcome: &RenumberOutcome, quiet: bool) -> ExitCode {
    if !outcome.changed() {
        info!(input = %source, "references are up to date");
        return ExitCode::Success;
    }
    if quiet {
        return ExitCode::Stale;
    }

    eprintln!(
        "{source}: {} reference(s) out of order",
        outcome.changes.len()
    );
    for change in &outcome.changes {
        eprintln!("  line {}: expected {}", change.line, change.reference);
    }
    ExitCode::Stale
}

fn write_stdout(text: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match handle.write_all(text.as_bytes()) {
        Ok(_) => {}
        Err(err) if should_ignore_pipe_error(&err) => return Ok(()),
        Err(err) => return Err(err).context("failed to write to stdout"),
    }

    match handle.flush() {
        Ok(_) => Ok(()),
        Err(err) if should_ignore_pipe_error(&err) => Ok(()),
        Err(err) => Err(err).context("failed to flush stdout"),
    }
}

fn should_ignore_pipe_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::WouldBlock
    )
}

fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(renumber_err) = cause.downcast_ref::<RenumberError>() {
            return renumber_err.exit_code();
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return ExitCode::InvalidArguments;
        }
    }
    ExitCode::Io
}

fn init_tracing(quiet: bool) {
    let env_filter = if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
