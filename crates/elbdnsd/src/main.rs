// # elbdnsd - Route 53 / Kubernetes sync daemon
//
// The elbdnsd daemon is a thin integration layer. It is responsible for:
// 1. Reading configuration from flags or environment variables
// 2. Initializing logging and the runtime
// 3. Wiring the Kubernetes source and the Route 53 provider into the engine
// 4. Running the scheduler until SIGINT/SIGTERM
//
// All synchronization logic lives in elbdns-core.
//
// ## Configuration
//
// | Flag              | Environment             | Default         |
// |-------------------|-------------------------|-----------------|
// | `--dry-run`       | `ELBDNS_DRY_RUN`        | `false`         |
// | `--sync-interval` | `ELBDNS_SYNC_INTERVAL`  | `30` (seconds)  |
// | `--namespace`     | `ELBDNS_NAMESPACE`      | all namespaces  |
// | `--log-level`     | `ELBDNS_LOG_LEVEL`      | `info`          |
//
// AWS credentials and region come from the standard AWS chain; the cluster
// connection from the in-cluster service account or the local kubeconfig.
//
// ## Example
//
// ```bash
// elbdnsd --namespace production --sync-interval 60 --dry-run
// ```

use anyhow::{Context, Result};
use clap::Parser;
use elbdns_core::{EngineEvent, Scheduler, SyncConfig, SyncEngine};
use elbdns_provider_route53::Route53Provider;
use elbdns_source_kube::KubeServiceSource;
use std::process::ExitCode;
use tokio::sync::mpsc;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum DaemonExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
}

impl From<DaemonExitCode> for ExitCode {
    fn from(code: DaemonExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Keep Route 53 alias records in sync with Kubernetes load balancers
#[derive(Debug, Parser)]
#[command(name = "elbdnsd", version, about)]
struct Cli {
    /// Don't actually commit the changes to DNS records, just print out what we would have done
    #[arg(long, env = "ELBDNS_DRY_RUN")]
    dry_run: bool,

    /// Sync interval in seconds
    #[arg(
        long,
        env = "ELBDNS_SYNC_INTERVAL",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..=86_400)
    )]
    sync_interval: u64,

    /// Namespace to be monitored (empty for all namespaces)
    #[arg(long, env = "ELBDNS_NAMESPACE", default_value = "")]
    namespace: String,

    /// Log level: trace, debug, info, warn or error
    #[arg(long, env = "ELBDNS_LOG_LEVEL", default_value = "info", value_parser = parse_log_level)]
    log_level: Level,
}

impl Cli {
    fn sync_config(&self) -> SyncConfig {
        SyncConfig::new()
            .with_namespace(self.namespace.clone())
            .with_sync_interval_secs(self.sync_interval)
            .with_dry_run(self.dry_run)
    }
}

fn parse_log_level(level: &str) -> Result<Level, String> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(format!(
            "'{}' is not valid. Valid levels: trace, debug, info, warn, error",
            level
        )),
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => {
            // --help / --version
            let _ = e.print();
            return DaemonExitCode::CleanShutdown.into();
        }
        Err(e) => {
            let _ = e.print();
            return DaemonExitCode::ConfigError.into();
        }
    };

    let config = cli.sync_config();
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    let subscriber = FmtSubscriber::builder().with_max_level(cli.log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    info!("DNS update service started.");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DaemonExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        let engine = match build_engine(config.clone()).await {
            Ok(engine) => engine,
            Err(e) => {
                error!("Startup error: {:#}", e);
                return DaemonExitCode::ConfigError;
            }
        };

        match run_daemon(engine, &config).await {
            Ok(()) => DaemonExitCode::CleanShutdown,
            Err(e) => {
                error!("Daemon error: {:#}", e);
                DaemonExitCode::RuntimeError
            }
        }
    })
    .into()
}

/// Connect to the cluster and AWS and build the engine
async fn build_engine(config: SyncConfig) -> Result<(SyncEngine, mpsc::Receiver<EngineEvent>)> {
    let source = KubeServiceSource::try_default()
        .await
        .context("Failed to connect to Kubernetes")?;

    let provider = Route53Provider::from_env().await;
    if !provider.has_region() {
        anyhow::bail!(
            "No AWS region could be resolved. Set AWS_REGION or run on EC2 with instance metadata available."
        );
    }
    debug!("Using {:?}", provider);

    if config.dry_run {
        warn!("Running in DRY-RUN mode - no DNS changes will be made");
    }

    SyncEngine::new(Box::new(source), Box::new(provider), config)
        .context("Failed to create sync engine")
}

/// Run the scheduler until a shutdown signal arrives
async fn run_daemon(
    (engine, event_rx): (SyncEngine, mpsc::Receiver<EngineEvent>),
    config: &SyncConfig,
) -> Result<()> {
    info!(
        "Watching services in '{}' namespace (every {} secs).",
        config.namespace.as_deref().unwrap_or(""),
        config.sync_interval_secs
    );

    let events = tokio::spawn(log_events(event_rx));
    let handle = Scheduler::new(engine, config.sync_interval())
        .context("Failed to create scheduler")?
        .spawn();

    let signal = wait_for_shutdown().await?;
    info!("Shutdown signal received ({}), exiting...", signal);

    // Waits for an in-flight pass
    handle.shutdown().await?;

    // The engine is dropped with the scheduler, which closes the event channel
    events.await.context("Event logger failed")?;

    Ok(())
}

/// Drain engine events into the debug log
async fn log_events(mut event_rx: mpsc::Receiver<EngineEvent>) {
    while let Some(event) = event_rx.recv().await {
        match event {
            EngineEvent::PassCompleted { summary } => debug!(
                "Pass took {}ms: {} service(s), {} record(s)",
                (summary.finished_at - summary.started_at).num_milliseconds(),
                summary.services_seen,
                summary.records_upserted
            ),
            other => debug!("Engine event: {:?}", other),
        }
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to setup SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to setup SIGINT handler")?;

    Ok(tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    })
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .context("Failed to wait for CTRL-C")?;
    Ok("SIGINT")
}
