//! Binary entrypoint for the slideport HTTP server.
//!
//! Configuration comes from the environment, see [`ServerConfig`]. The server
//! drives the in-process host.

use slideport_host::MemoryHost;
use slideport_server::config::ServerConfig;
use slideport_server::router::build_router;
use slideport_server::state::AppState;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::from_env();
    let host = if config.hidden {
        MemoryHost::hidden()
    } else {
        MemoryHost::new()
    };
    let app = build_router(AppState::new(host));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("slideport server listening on {}", addr);
    axum::serve(listener, app).await
}
