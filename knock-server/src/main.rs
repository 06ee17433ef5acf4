mod server;
mod store;

use std::sync::Arc;

use anyhow::Context;
use store::TrialStore;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let db_path = std::env::var("KNOCK_DB").unwrap_or_else(|_| "trial_data.sqlite".into());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3001);

    let store = Arc::new(
        TrialStore::open(&db_path).with_context(|| format!("failed to open database {db_path}"))?,
    );
    info!(db = %db_path, "trial store ready");

    let app = server::create_router(store);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    info!(port, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
