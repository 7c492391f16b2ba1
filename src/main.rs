use std::path::PathBuf;

use clap::Parser;
use policy_portal::{
    config::{AppConfig, ConfigHandle},
    db::Db,
    services::backend,
    AppState,
};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// libSQL database: a `file:` path or a remote server URL.
    #[arg(long, env, default_value = "file:policy-portal.db")]
    database_url: String,

    /// libSQL authentication token (remote servers only).
    #[arg(long, env, default_value = "")]
    auth_token: String,

    /// The address to bind to.
    #[arg(short, long, env, default_value = "127.0.0.1:1414")]
    address: String,

    /// Mark cookies `Secure`; enable when served over HTTPS.
    #[arg(long, env)]
    secure_cookies: bool,

    /// JSON file overlaid on the default portal configuration.
    #[arg(short, long, env)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "tower_http=info,policy_portal=debug".to_owned());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
        .init();

    let args = Args::parse();

    let db = Db::new(args.database_url, args.auth_token).await?;

    let config = ConfigHandle::new(AppConfig::load(args.config.as_deref()).await?);
    #[cfg(unix)]
    if let Some(path) = args.config.clone() {
        policy_portal::config::reload_on_hangup(config.clone(), path)?;
    }

    let state = AppState::new(db, config, backend::http_client()?, args.secure_cookies);
    let app = policy_portal::router(state);

    let address = args.address.parse::<std::net::SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(address).await?;
    tracing::info!("listening on http://{address}");
    axum::serve(listener, app).await?;

    Ok(())
}
