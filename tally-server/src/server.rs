use std::net::SocketAddr;
use std::sync::Arc;

use tally_core::TallyContext;

use crate::router::create_router;

/// Run the API server on the configured `host:port` until the process is stopped
pub async fn run_server(ctx: Arc<TallyContext>) -> anyhow::Result<()> {
    let addr = ctx.config.bind_address().parse::<SocketAddr>()?;
    let app = create_router(ctx);

    tracing::info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
