//! sahaaya dispatch server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), seeds the
//! unit pool and responder roster, and serves the dispatch API over HTTP.

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use sahaaya_api::AppState;
use sahaaya_core::case::SosMode;
use sahaaya_dispatch::{
  AlertSession, Classifier, CoordinatorConfig, DispatchCoordinator, FixedClassifier,
  ResponderMatcher, TcpProbeClassifier, TriggerConfig,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod settings;

use settings::ServerConfig;

#[derive(Parser)]
#[command(author, version, about = "Sahaaya dispatch server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let loaded = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("SAHAAYA"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = loaded
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // Seed the pool and roster, once.
  let units: Vec<_> = server_cfg
    .units
    .iter()
    .cloned()
    .map(settings::UnitSeed::into_unit)
    .collect();
  let responders: Vec<_> = server_cfg
    .responders
    .iter()
    .cloned()
    .map(settings::ResponderSeed::into_responder)
    .collect();
  tracing::info!(units = units.len(), responders = responders.len(), "pool seeded");

  let coordinator = Arc::new(DispatchCoordinator::new(
    CoordinatorConfig { auto_dispatch: server_cfg.auto_dispatch },
    units,
    ResponderMatcher::new(responders),
  ));

  let classifier = match &server_cfg.probe_addr {
    Some(addr) => Classifier::Probe(TcpProbeClassifier::new(
      addr.clone(),
      Duration::from_millis(server_cfg.probe_timeout_ms),
    )),
    None => Classifier::Fixed(FixedClassifier(SosMode::Online)),
  };

  let session = Arc::new(AlertSession::spawn(
    TriggerConfig::default(),
    classifier,
    Arc::clone(&coordinator),
  ));

  let state = AppState { coordinator, session };
  let app = sahaaya_api::api_router(state).layer(TraceLayer::new_for_http());

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
