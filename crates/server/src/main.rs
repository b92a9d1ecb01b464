use anyhow::Context;
use clap::Parser;
use dockwatch::{Config, IngestionScheduler, Snapshots, StationFetcher, WeatherFetcher};
use dockwatch_server::{run_server, spawn_ingestion};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// TOML configuration file; flags and environment override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, env = "INDEGO_API_URL")]
    stations_url: Option<String>,

    #[arg(long, env = "OPEN_WEATHER_MAP_API_URL")]
    weather_url: Option<String>,

    #[arg(long, env = "OPEN_WEATHER_MAP_API_KEY", hide_env_values = true)]
    weather_api_key: Option<String>,

    #[arg(long, env = "DOCKWATCH_TIMEZONE")]
    timezone: Option<String>,

    #[arg(short, long, env = "DOCKWATCH_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Ingest once immediately instead of waiting for the first tick
    #[arg(long)]
    run_on_start: bool,

    /// Serve queries only
    #[arg(long)]
    no_ingest: bool,
}

impl Args {
    fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                Config::from_toml(&raw).with_context(|| format!("parsing {}", path.display()))?
            }
            None => Config::default(),
        };

        if let Some(url) = &self.stations_url {
            config = config.with_stations_url(url.clone());
        }
        if let Some(url) = &self.weather_url {
            config = config.with_weather_url(url.clone());
        }
        if let Some(key) = &self.weather_api_key {
            config = config.with_weather_api_key(key.clone());
        }
        if let Some(timezone) = &self.timezone {
            config = config.with_timezone(timezone.clone());
        }
        if let Some(dir) = &self.data_dir {
            config.persistence.data_dir = Some(dir.clone());
        }

        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dockwatch_server=info,dockwatch=info,info".into()),
        )
        .init();

    let args = Args::parse();
    let config = args.load_config()?;

    let snapshots = Snapshots::builder().config(&config).build()?;

    let (stop_tx, stop_rx) = watch::channel(false);
    let ingestion = if args.no_ingest {
        info!("Ingestion disabled");
        None
    } else {
        config.validate_for_ingestion()?;
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("building HTTP client")?;
        let scheduler = IngestionScheduler::new(
            Arc::new(StationFetcher::new(client.clone(), config.stations_url.clone())),
            Arc::new(WeatherFetcher::new(
                client,
                config.weather_url.clone(),
                config.weather_api_key.clone(),
            )),
            snapshots.clone(),
        );
        Some(spawn_ingestion(
            Arc::new(scheduler),
            config.schedule()?,
            args.run_on_start,
            stop_rx,
        ))
    };

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for ctrl_c signal: {}", e);
            std::future::pending::<()>().await;
        }
    };

    run_server(listener, &snapshots, shutdown).await?;

    let _ = stop_tx.send(true);
    if let Some(worker) = ingestion {
        worker.await?;
    }

    Ok(())
}
