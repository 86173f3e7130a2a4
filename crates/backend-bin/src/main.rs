use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use backend_lib::{
    clock::{Clock, SystemClock},
    config::{Settings, DEFAULT_CONFIG_FILE},
    router,
    storage::MemoryStorage,
    AppState,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Chirpy auth API server
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the TOML config file
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Override the configured bind address
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Pre-register a user as `email:password` (repeatable)
    #[arg(long = "seed-user", value_name = "EMAIL:PASSWORD")]
    seed_users: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load_from(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }

    init_tracing(&settings);
    info!(?settings, "configuration loaded");

    let storage = Arc::new(MemoryStorage::new());
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = Arc::new(AppState::new(Arc::clone(&storage), settings, Arc::clone(&clock)));

    for seed in args.seed_users {
        let (email, password) = seed
            .split_once(':')
            .ok_or_else(|| anyhow!("--seed-user expects EMAIL:PASSWORD"))?;
        let hashed = state.sessions.hash_password(password.to_string()).await?;
        let user = storage.insert_user(email, &hashed, clock.now())?;
        info!(user_id = %user.id, email = %user.email, "seeded user");
    }

    let bind_addr = state.settings.bind_addr;
    let app = router::create_router(state);

    let listener = TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("binding {bind_addr}"))?;
    info!("listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.to_lowercase()));

    if settings.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
