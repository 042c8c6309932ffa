//! CLI entrypoint for consilium
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use consilium_application::{
    CaseStructurer, ComplexityRouter, ConversationLogger, DiagnosisOrchestrator, EngineConfig,
    LlmCaseStructurer, LocalProcessingTier, NoConversationLogger, NoProgress, ProgressNotifier,
    RemoteUploader, TextExtractor, case_from_extraction,
};
use consilium_domain::{CaseRecord, OutputFormat};
use consilium_infrastructure::{
    ConfigLoader, FileConfig, FileSyncStore, HttpUploader, JsonlConversationLogger,
    OpenAiCompatibleGateway, PlainTextExtractor, UnconfiguredUploader,
};
use consilium_presentation::{Cli, Command, ConsoleFormatter, ProgressReporter, SimpleProgress};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let Some(command) = cli.command.clone() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    // === Configuration ===
    let mut file_config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };
    apply_cli_overrides(&mut file_config, &cli);

    // Keep the guard alive so the file sink flushes on exit
    let _log_guard = init_logging(cli.verbose, file_config.logging.log_file.as_deref())?;
    info!("Starting consilium");

    let (engine, warnings) = match file_config.into_engine_config() {
        Ok(built) => built,
        Err(e) => {
            for issue in &e.issues {
                eprintln!("{}", issue);
            }
            bail!("refusing to start with an invalid configuration");
        }
    };
    for issue in &warnings {
        eprintln!("{}", issue);
    }

    if !file_config.output.use_color() {
        ConsoleFormatter::disable_color();
    }
    let format: OutputFormat = file_config.output.resolve_format(cli.output.map(Into::into));

    let progress: Box<dyn ProgressNotifier> = if !file_config.output.wants_progress(cli.quiet, format) {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    // Ctrl-C abandons the run; in-flight model calls are left to finish
    let cancellation = CancellationToken::new();
    let on_signal = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling");
            on_signal.cancel();
        }
    });

    // === Dependency Injection ===
    let wiring = Wiring::new(&file_config, &engine);

    match command {
        Command::Diagnose { file } => {
            let case = read_case(&file).await?;
            let orchestrator = wiring.orchestrator()?;
            let report = orchestrator
                .execute_with_progress(&case, progress.as_ref(), Some(&cancellation))
                .await?;
            println!("{}", ConsoleFormatter::format_report(&report, format));
        }
        Command::Route { file } => {
            let case = read_case(&file).await?;
            let router = ComplexityRouter::new(
                Arc::new(wiring.local_tier()),
                Arc::new(wiring.orchestrator()?),
                engine.routing.bounds,
            )
            .with_logger(wiring.logger.clone());
            let result = router
                .route_with_progress(&case, progress.as_ref(), Some(&cancellation))
                .await?;
            println!("{}", ConsoleFormatter::format_routed(&result, format));
        }
        Command::Sync => {
            let summary = wiring.local_tier().sync().await?;
            print!("{}", ConsoleFormatter::format_sync(&summary));
        }
        Command::Status => {
            let status = wiring.local_tier().status().await?;
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print!("{}", ConsoleFormatter::format_status(&status));
            }
        }
    }

    Ok(())
}

/// CLI flags take precedence over every configuration source.
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if cli.offline {
        config.local.offline_mode = true;
    }
    if cli.no_debate {
        config.diagnosis.enable_debate = false;
    }
    if let Some(rounds) = cli.rounds {
        config.diagnosis.max_debate_rounds = rounds as i64;
    }
}

/// Console logging by verbosity (or `RUST_LOG` when no `-v` is given),
/// plus an optional plain-text file sink.
fn init_logging(verbose: u8, log_file: Option<&str>) -> Result<Option<WorkerGuard>> {
    let filter = || match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let console = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(filter());

    let Some(path) = log_file else {
        tracing_subscriber::registry().with(console).init();
        return Ok(None);
    };

    let path = PathBuf::from(path);
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)
        .with_context(|| format!("cannot create log directory {}", dir.display()))?;
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("log_file has no file name: {}", path.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));
    let file = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(writer)
        .with_filter(filter());

    tracing_subscriber::registry().with(console).with(file).init();
    Ok(Some(guard))
}

async fn read_case(path: &Path) -> Result<CaseRecord> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("cannot read case file {}", path.display()))?;
    Ok(case_from_extraction(PlainTextExtractor::new().extract(&bytes).await))
}

/// Shared adapters for one invocation.
struct Wiring<'a> {
    file_config: &'a FileConfig,
    engine: &'a EngineConfig,
    gateway: Arc<OpenAiCompatibleGateway>,
    logger: Arc<dyn ConversationLogger>,
}

impl<'a> Wiring<'a> {
    fn new(file_config: &'a FileConfig, engine: &'a EngineConfig) -> Self {
        let gateway = Arc::new(OpenAiCompatibleGateway::new(
            file_config.provider.base_url.clone(),
            file_config.provider.api_key(),
        ));

        let logger: Arc<dyn ConversationLogger> = match &file_config.logging.transcript {
            Some(path) => match JsonlConversationLogger::open(path) {
                Ok(logger) => {
                    info!(
                        "Writing transcript {} to {}",
                        logger.run_id(),
                        logger.path().display()
                    );
                    Arc::new(logger)
                }
                Err(e) => {
                    warn!("Transcript disabled, cannot open {}: {}", path, e);
                    Arc::new(NoConversationLogger)
                }
            },
            None => Arc::new(NoConversationLogger),
        };

        Self {
            file_config,
            engine,
            gateway,
            logger,
        }
    }

    fn orchestrator(&self) -> Result<DiagnosisOrchestrator> {
        Ok(DiagnosisOrchestrator::with_gateway(
            Arc::clone(&self.gateway),
            self.engine,
            self.file_config.provider.max_tokens,
        )?
        .with_logger(self.logger.clone()))
    }

    fn local_tier(&self) -> LocalProcessingTier<OpenAiCompatibleGateway> {
        let timeout = self.engine.execution.call_timeout;
        let local_model = self.engine.models.local.clone();

        let structurer: Arc<dyn CaseStructurer> = Arc::new(LlmCaseStructurer::new(
            Arc::clone(&self.gateway),
            local_model.clone(),
            timeout,
        ));
        let uploader: Arc<dyn RemoteUploader> = match &self.file_config.sync.endpoint {
            Some(endpoint) => Arc::new(HttpUploader::new(
                endpoint.clone(),
                self.file_config.provider.api_key(),
            )),
            None => Arc::new(UnconfiguredUploader),
        };

        LocalProcessingTier::new(
            Arc::clone(&self.gateway),
            structurer,
            local_model,
            timeout,
            Arc::new(FileSyncStore::new(self.file_config.local.cache_dir())),
            uploader,
        )
        .with_offline_mode(self.engine.routing.offline_mode)
        .with_logger(self.logger.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_win() {
        let cli = Cli::try_parse_from([
            "consilium", "--offline", "--no-debate", "--rounds", "1", "route", "case.txt",
        ])
        .unwrap();
        let mut config = FileConfig::default();
        apply_cli_overrides(&mut config, &cli);

        let (engine, _) = config.into_engine_config().unwrap();
        assert!(engine.routing.offline_mode);
        assert!(!engine.diagnosis.enable_debate);
        assert_eq!(engine.diagnosis.max_debate_rounds, 1);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = Cli::try_parse_from(["consilium", "status"]).unwrap();
        let mut config = FileConfig::default();
        config.diagnosis.max_debate_rounds = 5;
        apply_cli_overrides(&mut config, &cli);
        assert_eq!(config.diagnosis.max_debate_rounds, 5);
        assert!(!config.local.offline_mode);
    }

    #[tokio::test]
    async fn test_read_case_uses_extractor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("case.txt");
        std::fs::write(&path, "  Chest pain, ECG abnormal  ").unwrap();
        let case = read_case(&path).await.unwrap();
        assert_eq!(case.raw_text(), "Chest pain, ECG abnormal");
        assert_eq!(case.extraction_confidence(), 1.0);
    }

    #[tokio::test]
    async fn test_missing_case_file_is_an_error() {
        assert!(read_case(Path::new("/nonexistent/case.txt")).await.is_err());
    }
}
