use anyhow::Result;
use reqwest::Client;
use statscraper::{config::Settings, labor};
use std::fs;
use tokio::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    let started = Instant::now();

    // ─── 2) configure run ────────────────────────────────────────────
    let settings = Settings::from_env()?;
    fs::create_dir_all(&settings.storage_dir)?;
    let client = Client::builder()
        .user_agent(settings.user_agent.clone())
        .build()?;

    // ─── 3) fetch per-state series into intermediates ────────────────
    let summary = labor::fetch_all(&client, &settings).await?;
    info!(written = summary.written, "fetch pass complete");
    for (state, period) in &summary.skipped {
        warn!(
            state = %state,
            start = period.start_year,
            end = period.end_year,
            "pair skipped: malformed reply"
        );
    }
    for (state, period) in &summary.empty {
        warn!(
            state = %state,
            start = period.start_year,
            end = period.end_year,
            "pair fetched no rows"
        );
    }

    // ─── 4) merge intermediates and clean up ─────────────────────────
    let report = labor::merge::merge_intermediates(&settings)?;
    info!(
        rows = report.rows,
        states = report.states_merged,
        removed = report.removed_files,
        elapsed = ?started.elapsed(),
        "all done"
    );

    Ok(())
}
