use abp_infer::{config, model, server};
use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::env;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Init
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "abp_infer=info,tower_http=info".into()),
        )
        .init();
    model::loader::init_ort()?;

    // 2. Load Config
    let config_path = env::var("ABP_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());
    let config = config::AppConfig::load(&config_path)?.with_env_overrides(|key| env::var(key).ok())?;

    // 3. Load model and scalers; any failure here stops the process
    tracing::info!("Loading model and scalers...");
    let bundle = model::ModelBundle::load(&config.artifacts)
        .context("failed to load model or scalers")?;
    tracing::info!("Model and scalers loaded successfully");

    // 4. Create Router
    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("failed to install metrics recorder")?;
    let app = server::routes::create_router(bundle, metrics_handle);

    // 5. Bind & Serve
    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    tracing::info!(
        "Server listening on http://{}:{}",
        config.server.host,
        config.server.port
    );

    axum::serve(listener, app).await?;

    Ok(())
}
