use anyhow::Context;
use billpress_server::{app, store, AppConfig, AppState};
use template::{load_layout, InvoiceLayout};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "billpress_server=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;

    let layout = match &config.render.layout_path {
        Some(path) => load_layout(path)
            .with_context(|| format!("Failed to load layout from {}", path.display()))?,
        None => InvoiceLayout::default(),
    };
    if !config.render.template_path.exists() {
        tracing::warn!(
            path = %config.render.template_path.display(),
            "Template PDF not found, printing will fail until it is provided"
        );
    }

    let store = store::connect(config.database.as_ref(), config.render.total_policy).await?;
    let state = AppState::new(store, layout, config.render.template_path.clone());

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        total_policy = %config.render.total_policy,
        "billpress listening on {addr}"
    );

    axum::serve(listener, app(state)).await?;
    Ok(())
}
