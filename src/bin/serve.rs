//! Dashboard server entrypoint

use std::net::SocketAddr;

use analytics_dashboard::server::router;
use anyhow::Context;
use clap::Parser;
use log::info;

#[derive(Debug, Parser)]
#[command(name = "serve", about = "Serve the analytics dashboard over HTTP")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 5001)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("listening on http://{addr}");
    axum::serve(listener, router())
        .await
        .context("server error")?;
    Ok(())
}
