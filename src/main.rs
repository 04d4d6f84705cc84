//! rust-checkers: two-player checkers over websockets.
//!
//! ## Usage
//!
//! - `rust-checkers` - listen on 127.0.0.1:8080 (or `$PORT`)
//! - `rust-checkers --port 9000 --pace 0.5` - faster narration
//!
//! Set `RUST_LOG=debug` to trace every event.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rust_checkers::controller::{TokioScheduler, TurnController};
use rust_checkers::core::GameConfig;
use rust_checkers::transport::ws::{self, AppState, WsHub};

/// Real-time checkers server
#[derive(Parser)]
#[command(name = "rust-checkers")]
#[command(author, version, about, long_about = None)]
struct ServerArgs {
    /// Address to bind
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8080)]
    port: u16,

    /// Fixed RNG seed for reproducible room codes and bot play
    #[arg(long)]
    seed: Option<u64>,

    /// Multiplier applied to every narration delay
    #[arg(long, default_value_t = 1.0)]
    pace: f64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = ServerArgs::parse();
    let mut config = GameConfig::default().with_pace(args.pace);
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }

    let hub = Arc::new(WsHub::new());
    let (scheduler, deferred) = TokioScheduler::new();
    let controller = Arc::new(TurnController::new(config, Arc::clone(&hub), scheduler));
    tokio::spawn(ws::drive_deferred(Arc::clone(&controller), deferred));

    let app = ws::router(AppState { controller, hub });
    let addr = SocketAddr::new(args.host, args.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
