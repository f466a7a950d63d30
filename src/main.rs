//! commitflow - CLI entry point.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commitflow::config::{Config, DEFAULT_GROUP, resolve_config_path, write_template};
use commitflow::error::FlowError;
use commitflow::flow::{FlowOutcome, RunOptions, Session, describe_error};
use commitflow::git::{ShellRunner, check_git_installed, discover_workdir};
use commitflow::ui::Printer;
use commitflow::TerminalPrompter;

/// Environment variable holding a tracing filter, e.g. `commitflow=trace`.
const LOG_ENV_VAR: &str = "COMMITFLOW_LOG";

/// Exit code for a run the user cancelled, as for SIGINT.
const EXIT_CANCELLED: u8 = 130;

/// Stage files and write a conventional commit by answering a few questions.
#[derive(Parser, Debug)]
#[command(name = "commitflow")]
#[command(about = "Stage files and compose conventional commit messages interactively")]
#[command(version)]
struct Cli {
    /// Add all files in the directory to staging
    #[arg(short = 'a', long)]
    all: bool,

    /// Print command executions and debug logs
    #[arg(short = 'v', long)]
    verbose: bool,

    /// Debug mode - commands that change the repository are printed, not executed
    #[arg(short = 'd', long)]
    debug: bool,

    /// Run without scope, description, refs or co-author questions
    #[arg(short = 's', long, conflicts_with_all = ["full", "group"])]
    simple: bool,

    /// Ask every question: scope, description, refs and co-authors
    #[arg(short = 'f', long, conflicts_with = "group")]
    full: bool,

    /// Commit group from the config to use
    #[arg(short = 'g', long, value_name = "NAME")]
    group: Option<String>,

    /// Overwrite the reference text placed before the number
    #[arg(short = 'r', long = "ref", value_name = "REFS_TEXT")]
    refs_text: Option<String>,

    /// Reference number to use instead of asking
    #[arg(short = 'n', long = "number", value_name = "NUM", value_parser = parse_refs_number)]
    refs_number: Option<String>,

    /// Reuse the references and co-authors of the previous commit
    #[arg(short = 'p', long)]
    previous: bool,

    /// Path to the config file
    #[arg(short = 'c', long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the template config file and exit
    #[arg(long)]
    init: bool,
}

impl Cli {
    fn group_name(&self) -> String {
        if let Some(group) = &self.group {
            group.clone()
        } else if self.simple {
            "simple".to_string()
        } else if self.full {
            "full".to_string()
        } else {
            DEFAULT_GROUP.to_string()
        }
    }

    fn run_options(&self) -> RunOptions {
        RunOptions {
            add_all: self.all,
            verbose: self.verbose,
            debug: self.debug,
            group: self.group_name(),
            refs_text: self.refs_text.clone(),
            refs_number: self.refs_number.clone(),
            reuse_previous: self.previous,
        }
    }
}

fn parse_refs_number(value: &str) -> Result<String, String> {
    if !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(value.to_string())
    } else {
        Err(format!("'{}' is not a reference number (digits only)", value))
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "commitflow=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let printer = Printer::new(cli.verbose);
    match run(&cli, &printer) {
        Ok(code) => code,
        Err(err) => {
            printer.error(&format!("{:#}", err));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, printer: &Printer) -> Result<ExitCode> {
    // Step 1: Locate the config file
    let config_path =
        resolve_config_path(cli.config.as_deref()).context("Failed to locate the config file")?;

    if cli.init {
        if write_template(&config_path)? {
            println!("Created config file at {}", config_path.display());
        } else {
            println!("Config file already exists at {}", config_path.display());
        }
        return Ok(ExitCode::SUCCESS);
    }

    // Step 2: Check prerequisites and load the config
    check_git_installed().context("git is required")?;
    let config = Config::load(&config_path)?;

    let options = cli.run_options();
    let group = config.commit_group(&options.group)?;
    debug!("Using commit group '{}': {:?}", options.group, group);

    // Step 3: Find the repository root so every git command runs from it
    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let workdir = match discover_workdir(&cwd) {
        Ok(workdir) => workdir,
        Err(e) => {
            debug!("Repository discovery failed: {}", e);
            printer.exit(&config.exit.not_a_repo);
            return Ok(ExitCode::FAILURE);
        }
    };

    // Step 4: Run the session
    let runner = ShellRunner::in_dir(workdir);
    let prompter = TerminalPrompter::new(*printer);
    let session = Session::new(&config, group, &options, &runner, &prompter);

    match session.run() {
        Ok(FlowOutcome::Committed { message }) => {
            debug!("Committed:\n{}", message);
            Ok(ExitCode::SUCCESS)
        }
        Ok(FlowOutcome::Stopped(reason)) => {
            debug!("Nothing committed: {:?}", reason);
            Ok(ExitCode::SUCCESS)
        }
        Err(FlowError::Cancelled) => Ok(ExitCode::from(EXIT_CANCELLED)),
        Err(err) => {
            debug!("Run failed: {:?}", err);
            printer.error(&describe_error(&err, &config.exit));
            Ok(ExitCode::FAILURE)
        }
    }
}
