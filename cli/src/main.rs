//! CLI entrypoint for conductor
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use conductor_application::{ChildTokens, SchedulerConfig, ToolScheduler};
use conductor_domain::{Severity, ToolCallRequest};
use conductor_infrastructure::{ConfigLoader, FileConfig, LocalToolRegistry};
use conductor_presentation::{
    Cli, ConsoleFormatter, ConsoleRenderer, InteractiveConfirmer, OutputFormatter,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, fmt, prelude::*};

const CTRL_C_REASON: &str = "user pressed ctrl-c";

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    let log_file = cli.log_file.clone().or_else(|| config.logging.file.clone());
    let _log_guard = init_logging(cli.verbose, log_file.as_deref())?;

    report_config_issues(&config)?;
    if !config.output.color {
        colored::control::set_override(false);
    }

    info!("Starting conductor");

    let requests = read_requests(cli.requests_path()).await?;

    // === Dependency Injection ===
    let registry = LocalToolRegistry::builtin(&config.tools.builtin_options())
        .with_aliases(config.tools.aliases.clone());

    let scheduler_config = scheduler_config(&cli, &config);
    let approval_mode = scheduler_config.approval_mode;

    // Cancelling `shutdown` aborts the batch even if the scheduler is never asked to
    let shutdown = CancellationToken::new();
    let mut builder = ToolScheduler::builder(Arc::new(registry))
        .with_config(scheduler_config)
        .with_cancellation_source(Arc::new(ChildTokens::new(shutdown.clone())));
    if !cli.quiet {
        builder = builder.with_observer(Arc::new(
            ConsoleRenderer::new().with_live_output(cli.verbose > 0),
        ));
    }
    let scheduler = builder.build();

    info!(calls = requests.len(), mode = %approval_mode, "Scheduling batch");
    let completion = scheduler.schedule(requests)?;

    // Requests piped through stdin leave it at EOF; answer from the terminal instead
    let confirmer = if cli.requests_path().is_none() {
        match File::open("/dev/tty") {
            Ok(tty) => InteractiveConfirmer::from_reader(BufReader::new(tty)),
            Err(e) => {
                warn!(error = %e, "No terminal for confirmations, they will be declined");
                InteractiveConfirmer::stdin()
            }
        }
    } else {
        InteractiveConfirmer::stdin()
    };
    let stop = CancellationToken::new();
    let confirmer = tokio::spawn(confirmer.run(scheduler.clone(), stop.clone()));

    let interrupt = {
        let scheduler = scheduler.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling batch");
                scheduler.cancel(CTRL_C_REASON);
            }
            // A second interrupt stops anything still in flight
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
        })
    };

    let results = completion.wait().await?;
    stop.cancel();
    interrupt.abort();
    let _ = confirmer.await;

    let format = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();
    print!("{}", ConsoleFormatter.format(&results, format));

    if results.iter().all(|r| r.is_success()) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Approval mode from the command line, falling back to the config file.
fn scheduler_config(cli: &Cli, config: &FileConfig) -> SchedulerConfig {
    let approval_mode = cli
        .approval_override()
        .unwrap_or_else(|| config.scheduler.parse_approval_mode().0);
    SchedulerConfig::new(approval_mode)
}

/// Install the tracing subscriber.
///
/// Verbosity maps to a level (-v = info, -vv = debug, -vvv = trace);
/// `RUST_LOG` wins when set.
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Log every config issue; errors abort startup.
fn report_config_issues(config: &FileConfig) -> Result<()> {
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Warning => warn!("{}", issue.message),
            Severity::Error => error!("{}", issue.message),
        }
    }
    if issues.iter().any(|i| i.is_error()) {
        bail!("Invalid configuration");
    }
    Ok(())
}

/// Read the JSON batch from `path`, or stdin when `None`.
async fn read_requests(path: Option<&PathBuf>) -> Result<Vec<ToolCallRequest>> {
    let (source, raw) = match path {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            (path.display().to_string(), raw)
        }
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("Failed to read requests from stdin")?;
            ("stdin".to_string(), raw)
        }
    };

    serde_json::from_str(&raw)
        .with_context(|| format!("Expected a JSON array of tool call requests in {}", source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use conductor_domain::ApprovalMode;

    fn file_config(approval_mode: &str) -> FileConfig {
        let mut config = ConfigLoader::load_defaults();
        config.scheduler.approval_mode = approval_mode.to_string();
        config
    }

    #[test]
    fn test_scheduler_config_from_file() {
        let cli = Cli::parse_from(["conductor"]);
        let config = scheduler_config(&cli, &file_config("auto_edit"));
        assert_eq!(config.approval_mode, ApprovalMode::AutoEdit);
    }

    #[test]
    fn test_cli_flag_overrides_file() {
        let cli = Cli::parse_from(["conductor", "--yolo"]);
        let config = scheduler_config(&cli, &file_config("auto_edit"));
        assert_eq!(config.approval_mode, ApprovalMode::Yolo);
        assert!(config.skips_confirmation());
    }

    #[test]
    fn test_unknown_file_mode_falls_back_to_default() {
        let cli = Cli::parse_from(["conductor"]);
        let config = scheduler_config(&cli, &file_config("sometimes"));
        assert_eq!(config.approval_mode, ApprovalMode::Default);
    }
}
