// src/fetch.rs

use crate::error::{AcquireError, Result};
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};
use url::Url;

const MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;

async fn get_text_once(client: &Client, url: &Url) -> std::result::Result<String, reqwest::Error> {
    debug!(%url, "GET");
    client
        .get(url.clone())
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

/// GET `url` as text, retrying failed sends and non-success statuses with
/// exponential backoff. Exhausting the retries is a transient-service error.
pub async fn get_text_with_retry(client: &Client, url: &Url) -> Result<String> {
    let mut attempts = 0;
    loop {
        match get_text_once(client, url).await {
            Ok(text) => return Ok(text),
            Err(e) if attempts < MAX_RETRIES => {
                attempts += 1;
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempts - 1);
                warn!(%url, attempt = attempts, delay_ms = backoff, error = %e, "retrying");
                sleep(Duration::from_millis(backoff)).await;
            }
            Err(e) => {
                return Err(AcquireError::Transient {
                    url: url.to_string(),
                    attempts: attempts + 1,
                    source: e,
                })
            }
        }
    }
}
