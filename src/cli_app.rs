//! Top-level CLI definition and dispatch.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use hec_overseer::backend::{HttpBackend, SimulationCommand};
use hec_overseer::core::config::Config;
use hec_overseer::core::errors::HecError;
use hec_overseer::dashboard::{DashboardView, RunState, Selection, Tone, compose};
use hec_overseer::logger::{
    EventType, FanoutSink, JsonlConfig, JsonlSink, LogSink, MemorySink, StderrSink,
};
use hec_overseer::sync::{RefreshOutcome, SimulationToggle, SyncController, ToggleOutcome};
use hec_overseer::tui::{DashboardRuntimeConfig, run_dashboard};

/// HEC Overseer — live dashboard for the proof-of-labor economic simulation.
#[derive(Debug, Parser)]
#[command(
    name = "hec-overseer",
    author,
    version,
    about = "HEC Overseer - Proof-of-Labor Economic Oracle",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Backend base address, e.g. http://127.0.0.1:8000.
    #[arg(long, global = true, value_name = "URL")]
    url: Option<String>,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Echo activity events to stderr (ignored by `dashboard`).
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Live terminal dashboard.
    Dashboard(DashboardArgs),
    /// Fetch once and print the dashboard.
    Snapshot(OutputArgs),
    /// Pause a running simulation or resume a paused one.
    Toggle(OutputArgs),
    /// Resume the simulation.
    Start(OutputArgs),
    /// Pause the simulation.
    Stop(OutputArgs),
    /// Print the effective configuration as TOML.
    Config,
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct DashboardArgs {
    /// Poll interval in milliseconds (overrides config).
    #[arg(long, value_name = "MILLISECONDS")]
    refresh_ms: Option<u64>,
    /// Number of feed records to request (overrides config).
    #[arg(long, value_name = "N")]
    feed_limit: Option<usize>,
}

#[derive(Debug, Clone, Args, Default)]
struct OutputArgs {
    /// Print JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input or configuration.
    #[error("{0}")]
    User(String),
    /// Backend or environment failure.
    #[error("{0}")]
    Runtime(String),
    /// Internal bug or invariant violation.
    #[error("{0}")]
    Internal(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
        }
    }
}

impl From<HecError> for CliError {
    fn from(err: HecError) -> Self {
        match err {
            HecError::InvalidConfig { .. }
            | HecError::MissingConfig { .. }
            | HecError::ConfigParse { .. } => Self::User(err.to_string()),
            HecError::Serialization { .. } => Self::Internal(err.to_string()),
            _ => Self::Runtime(err.to_string()),
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Dashboard(args) => run_live_dashboard(cli, args),
        Command::Snapshot(args) => run_snapshot(cli, args),
        Command::Toggle(args) => run_command(cli, args, None),
        Command::Start(args) => run_command(cli, args, Some(SimulationCommand::Start)),
        Command::Stop(args) => run_command(cli, args, Some(SimulationCommand::Stop)),
        Command::Config => {
            let config = load_config(cli)?;
            print!("{}", config.to_toml()?);
            Ok(())
        }
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

// ──────────────────── wiring ────────────────────

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = &cli.url {
        config.set_base_url(url)?;
    }
    Ok(config)
}

/// Session wiring shared by every backend-facing command.
struct Session {
    config: Config,
    sync: SyncController<HttpBackend>,
    toggle: SimulationToggle,
    /// In-memory copy of this run's activity, for error messages.
    recent: Arc<MemorySink>,
}

impl Session {
    /// `echo` mirrors every event to stderr; the live dashboard never sets it.
    fn open(config: Config, echo: bool) -> Result<Self, CliError> {
        let recent = Arc::new(MemorySink::new());
        let file: Arc<dyn LogSink> =
            Arc::new(JsonlSink::open(JsonlConfig::new(&config.paths.activity_log)));
        let mut sinks = vec![file, Arc::clone(&recent) as Arc<dyn LogSink>];
        if echo {
            sinks.push(Arc::new(StderrSink));
        }
        let log: Arc<dyn LogSink> = Arc::new(FanoutSink::new(sinks));

        let backend = HttpBackend::new(&config.backend)?;
        let sync = SyncController::from_config(backend, &config.sync, Arc::clone(&log));
        Ok(Self {
            config,
            sync,
            toggle: SimulationToggle::new(log),
            recent,
        })
    }

    /// Message of the latest logged failure of the given kind.
    fn last_error(&self, event: EventType) -> String {
        self.recent
            .entries()
            .into_iter()
            .rev()
            .find(|entry| entry.event == event)
            .and_then(|entry| entry.error_message)
            .unwrap_or_else(|| "no details recorded".to_string())
    }

    fn refresh_or_fail(&mut self) -> Result<(), CliError> {
        match self.sync.refresh() {
            RefreshOutcome::Applied => Ok(()),
            RefreshOutcome::Failed | RefreshOutcome::Discarded => Err(self.refresh_error()),
        }
    }

    fn refresh_error(&self) -> CliError {
        CliError::Runtime(format!(
            "could not refresh from {}: {}",
            self.config.backend.base_url,
            self.last_error(EventType::RefreshFailed)
        ))
    }

    fn view(&self) -> DashboardView {
        compose(self.sync.snapshot(), &Selection::None)
    }
}

// ──────────────────── commands ────────────────────

fn run_live_dashboard(cli: &Cli, args: &DashboardArgs) -> Result<(), CliError> {
    let mut config = load_config(cli)?;
    if let Some(ms) = args.refresh_ms {
        config.sync.poll_interval_ms = ms;
    }
    if let Some(limit) = args.feed_limit {
        config.sync.feed_limit = limit;
    }
    config.validate()?;

    let runtime = DashboardRuntimeConfig {
        poll_interval: config.sync.poll_interval(),
        color: !cli.no_color && std::env::var_os("NO_COLOR").is_none(),
    };
    let mut session = Session::open(config, false)?;
    run_dashboard(&mut session.sync, &session.toggle, &runtime)?;
    Ok(())
}

fn run_snapshot(cli: &Cli, args: &OutputArgs) -> Result<(), CliError> {
    let mut session = Session::open(load_config(cli)?, cli.verbose)?;
    session.refresh_or_fail()?;
    let view = session.view();

    if args.json {
        let payload = json!({
            "command": "snapshot",
            "backend": session.config.backend.base_url,
            "view": serde_json::to_value(&view)?,
        });
        write_json_line(&payload)
    } else {
        print_view(&view)
    }
}

/// `None` means toggle based on the fetched run-state.
fn run_command(
    cli: &Cli,
    args: &OutputArgs,
    explicit: Option<SimulationCommand>,
) -> Result<(), CliError> {
    let mut session = Session::open(load_config(cli)?, cli.verbose)?;
    session.refresh_or_fail()?;

    let outcome = match explicit {
        Some(command) => session.toggle.issue(&mut session.sync, command),
        None => session.toggle.toggle(&mut session.sync),
    };

    let ToggleOutcome::Issued {
        command, accepted, ..
    } = outcome
    else {
        return Err(CliError::Internal(
            "run-state unknown after a successful refresh".to_string(),
        ));
    };
    if !accepted {
        return Err(CliError::Runtime(session.last_error(EventType::CommandFailed)));
    }

    let run_state = session.view().header.run_state;
    if args.json {
        let payload = json!({
            "command": command.as_str(),
            "accepted": accepted,
            "refreshed": outcome.refresh() == RefreshOutcome::Applied,
            "run_state": run_state,
        });
        write_json_line(&payload)
    } else {
        let mut stdout = io::stdout().lock();
        writeln!(
            stdout,
            "Sent {} to {}",
            command.as_str().bold(),
            session.config.backend.base_url
        )?;
        writeln!(stdout, "● {}", paint_run_state(run_state))?;
        Ok(())
    }
}

// ──────────────────── output ────────────────────

fn print_view(view: &DashboardView) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    writeln!(
        stdout,
        "⚡ {} · {}",
        view.header.title.bold(),
        view.header.subtitle
    )?;
    writeln!(stdout, "● {}", paint_run_state(view.header.run_state))?;
    writeln!(stdout)?;

    for card in &view.stats {
        let value = if card.highlight {
            card.value.yellow().bold().to_string()
        } else {
            card.value.bold().to_string()
        };
        writeln!(
            stdout,
            "{} {:<16} {:>14}   {}",
            card.icon,
            card.label,
            value,
            card.trend.dimmed()
        )?;
    }
    writeln!(stdout)?;
    writeln!(stdout, "{} · {}", view.feed_title.bold(), view.feed_count)?;

    for card in &view.feed {
        let verdict = format!("{} {}", card.verdict_icon, card.verdict_label);
        let verdict = match card.tone {
            Tone::Approved => verdict.green(),
            Tone::Rejected => verdict.red(),
            Tone::Neutral => verdict.normal(),
        };
        writeln!(
            stdout,
            "  {} {:<12} {:>8}  {:<12} {}  {}  {}  {}",
            card.task_icon,
            card.task_label,
            card.clock,
            verdict,
            card.worker.dimmed(),
            card.duration,
            card.minted,
            card.usd
        )?;
    }
    Ok(())
}

fn paint_run_state(state: RunState) -> String {
    match state {
        RunState::Active => state.label().green().to_string(),
        RunState::Paused => state.label().yellow().to_string(),
        RunState::Unknown => state.label().dimmed().to_string(),
    }
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

// ──────────────────── tests ────────────────────
