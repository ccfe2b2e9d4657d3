use std::sync::Arc;

use anyhow::Context;
use tally_core::{config, TallyContext};
use tally_server::run_server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tally_core::logging::init("tally_core=info,tally_server=info,tower_http=debug");

    let data_dir = config::data_dir()?;
    let ctx = TallyContext::new(&data_dir)
        .with_context(|| format!("Failed to open tally directory {}", data_dir.display()))?;

    tracing::info!(
        data_dir = %data_dir.display(),
        storage = ?ctx.config.storage,
        "Tally API server"
    );

    run_server(Arc::new(ctx)).await
}
