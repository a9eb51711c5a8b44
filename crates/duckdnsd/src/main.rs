// # duckdnsd - DuckDNS Updater Daemon
//
// This is a THIN integration layer. All reconciliation logic lives in
// duckdns-core; the daemon only wires concrete implementations together.
//
// The duckdnsd daemon is responsible for:
// 1. Reading daemon configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Building the IP resolver, hostname resolver and update client
// 4. Running the scheduler until SIGTERM/SIGINT
//
// ## Configuration
//
// ### Settings (re-read every tick)
// - `DUCKDNS_SETTINGS_PATH`: JSON settings file; when unset, the variables
//   below are used instead
// - `DUCKDNS_DOMAIN`, `DUCKDNS_TOKEN`, `DUCKDNS_REFRESH_MINUTES`, `DUCKDNS_NOTIFY`
//
// ### Daemon (read once)
// - `DUCKDNS_LOG_LEVEL`: trace, debug, info, warn, error (default info)
// - `DUCKDNS_IP_LOOKUP_URL`: Public IP echo service
// - `DUCKDNS_UPDATE_URL`: Provider update endpoint
// - `DUCKDNS_HOSTNAME_SUFFIX`: Zone of the managed hostname
//
// ## Signals
//
// - SIGTERM / SIGINT: stop after the current tick
// - SIGUSR1: update now
//
// ## Example
//
// ```bash
// export DUCKDNS_DOMAIN=alice
// export DUCKDNS_TOKEN=your_token
// export DUCKDNS_REFRESH_MINUTES=10
//
// duckdnsd
// ```

mod settings;
mod sinks;

use anyhow::Result;
use duckdns_client::DuckDnsClient;
use duckdns_core::config::{DEFAULT_HOSTNAME_SUFFIX, DEFAULT_IP_LOOKUP_URL, DEFAULT_UPDATE_URL};
use duckdns_core::{
    FileSettings, ForceHandle, IpResolver, ReconciliationEngine, Scheduler, SettingsSource,
    StateSnapshot,
};
use duckdns_dns::DnsHostnameResolver;
use duckdns_ip_http::HttpIpResolver;
use settings::EnvSettings;
use sinks::{LogNotifier, LogStatusSink};
use std::env;
use std::process::ExitCode;
use tokio_stream::StreamExt;
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

/// Daemon configuration
struct Config {
    settings_path: Option<String>,
    ip_lookup_url: String,
    update_url: String,
    hostname_suffix: String,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        Self {
            settings_path: env::var("DUCKDNS_SETTINGS_PATH").ok().filter(|p| !p.is_empty()),
            ip_lookup_url: env::var("DUCKDNS_IP_LOOKUP_URL")
                .unwrap_or_else(|_| DEFAULT_IP_LOOKUP_URL.to_string()),
            update_url: env::var("DUCKDNS_UPDATE_URL")
                .unwrap_or_else(|_| DEFAULT_UPDATE_URL.to_string()),
            hostname_suffix: env::var("DUCKDNS_HOSTNAME_SUFFIX")
                .unwrap_or_else(|_| DEFAULT_HOSTNAME_SUFFIX.to_string()),
            log_level: env::var("DUCKDNS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        for (name, url) in [
            ("DUCKDNS_IP_LOOKUP_URL", &self.ip_lookup_url),
            ("DUCKDNS_UPDATE_URL", &self.update_url),
        ] {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                anyhow::bail!("{} must use HTTP or HTTPS scheme. Got: {}", name, url);
            }
        }

        if self.update_url.starts_with("http://") {
            eprintln!(
                "WARNING: DUCKDNS_UPDATE_URL uses HTTP (not HTTPS). \
                Your token will be sent in clear text."
            );
        }

        if self.hostname_suffix.trim_matches('.').is_empty() {
            anyhow::bail!("DUCKDNS_HOSTNAME_SUFFIX cannot be empty");
        }

        if let Some(ref path) = self.settings_path
            && let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            anyhow::bail!(
                "DUCKDNS_SETTINGS_PATH parent directory does not exist: {}",
                parent.display()
            );
        }

        self.max_level()?;

        if self.settings_path.is_none() {
            self.validate_env_settings(|key| env::var(key).ok())?;
        }

        Ok(())
    }

    /// Reject `DUCKDNS_*` settings that every later load would also reject
    fn validate_env_settings(&self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        EnvSettings::from_lookup(lookup)?;
        Ok(())
    }

    fn max_level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "DUCKDNS_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

fn main() -> ExitCode {
    let config = Config::from_env();

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    let log_level = config.max_level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DaemonExitCode::ConfigError.into();
    }

    info!("Starting duckdnsd daemon");

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

    let result = rt.block_on(async {
        let (scheduler, ip_resolver) = match build_scheduler(&config) {
            Ok(built) => built,
            Err(e) => {
                error!("Startup failed: {}", e);
                return DaemonExitCode::ConfigError;
            }
        };

        tokio::spawn(log_public_ip(ip_resolver));

        match run_daemon(scheduler).await {
            Ok(()) => DaemonExitCode::CleanShutdown,
            Err(e) => {
                error!("Daemon error: {}", e);
                DaemonExitCode::RuntimeError
            }
        }
    });

    result.into()
}

/// Build the engine and scheduler from the daemon configuration
///
/// Also returns a copy of the public IP resolver for the startup lookup.
fn build_scheduler(config: &Config) -> Result<(Scheduler, HttpIpResolver)> {
    let settings: Box<dyn SettingsSource> = match &config.settings_path {
        Some(path) => {
            info!("Reading settings from {}", path);
            Box::new(FileSettings::new(path))
        }
        None => {
            info!("Reading settings from DUCKDNS_* environment variables");
            Box::new(EnvSettings)
        }
    };

    let ip_resolver = HttpIpResolver::with_url(&config.ip_lookup_url)?;

    let engine = ReconciliationEngine::new(
        Box::new(ip_resolver.clone()),
        Box::new(DnsHostnameResolver::with_suffix(&config.hostname_suffix)?),
        Box::new(DuckDnsClient::with_endpoint(&config.update_url)?),
    );

    let scheduler = Scheduler::new(
        engine,
        settings,
        Box::new(LogNotifier),
        Box::new(LogStatusSink),
    );

    Ok((scheduler, ip_resolver))
}

/// Run the scheduler until a shutdown signal
async fn run_daemon(scheduler: Scheduler) -> Result<()> {
    tokio::spawn(watch_status(scheduler.snapshot()));
    spawn_force_listener(scheduler.force_handle());

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let scheduler_handle = tokio::spawn(scheduler.run_with_shutdown(Some(shutdown_rx)));

    let signal = wait_for_shutdown().await?;
    info!("Received shutdown signal: {}", signal);

    // The scheduler may already be gone if the runtime is tearing down
    let _ = shutdown_tx.send(());
    scheduler_handle.await?;

    info!("Shutting down daemon");
    Ok(())
}

/// Log the detected public IP without holding up the scheduler
async fn log_public_ip(resolver: HttpIpResolver) {
    let public_ip = resolver.resolve_current_ip().await;
    if public_ip.is_empty() {
        warn!("Public IP could not be determined yet");
    } else {
        info!("Public IP: {}", public_ip);
    }
}

/// Log every change of attempt outcome
async fn watch_status(snapshot: StateSnapshot) {
    let mut changes = snapshot.changes();
    let mut last = None;

    while let Some(state) = changes.next().await {
        if last != Some(state.last_attempt_outcome) {
            debug!(
                "Last attempt: {:?} (last known IP: {})",
                state.last_attempt_outcome,
                if state.last_known_ip.is_empty() { "unknown" } else { state.last_known_ip.as_str() }
            );
            last = Some(state.last_attempt_outcome);
        }
    }
}

/// Map SIGUSR1 to a forced update
#[cfg(unix)]
fn spawn_force_listener(force: ForceHandle) {
    let mut sigusr1 = match signal(SignalKind::user_defined1()) {
        Ok(sig) => sig,
        Err(e) => {
            warn!("Failed to setup SIGUSR1 handler, force update unavailable: {}", e);
            return;
        }
    };

    tokio::spawn(async move {
        while sigusr1.recv().await.is_some() {
            info!("SIGUSR1 received, updating on next tick");
            force.force();
        }
    });
}

#[cfg(not(unix))]
fn spawn_force_listener(_force: ForceHandle) {}

/// Wait for shutdown signals (SIGTERM, SIGINT)
///
/// # Returns
///
/// Returns the name of the signal received.
#[cfg(unix)]
async fn wait_for_shutdown() -> Result<&'static str> {
    let mut sigterm = signal(SignalKind::terminate())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGTERM handler: {}", e))?;
    let mut sigint = signal(SignalKind::interrupt())
        .map_err(|e| anyhow::anyhow!("Failed to setup SIGINT handler: {}", e))?;

    let signal = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    Ok(signal)
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> Result<&'static str> {
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to wait for CTRL-C: {}", e))?;
    Ok("SIGINT")
}
