use anyhow::Result;
use reqwest::Client;
use statscraper::{
    config::Settings,
    geocode::{enrich, Geocoder},
};
use tokio::time::Instant;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    let started = Instant::now();
    let settings = Settings::from_env()?;
    let client = Client::builder()
        .user_agent(settings.user_agent.clone())
        .build()?;
    let geocoder = Geocoder::new(client, settings.geocoder_endpoint.clone());

    enrich::enrich_locations(&settings, &geocoder).await?;

    info!(elapsed = ?started.elapsed(), "all done");
    Ok(())
}
