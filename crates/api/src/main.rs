use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    inkshop_observability::init();

    let config = inkshop_api::config::Config::from_env()?;
    let app = inkshop_api::app::build_app(&config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        catalog_items = config.catalog.len(),
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
