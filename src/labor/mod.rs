//! Retrieval, normalization, and merge of state unemployment time series.

pub mod merge;
pub mod series;
pub mod states;

use crate::config::Settings;
use crate::error::{AcquireError, Result};
use crate::fetch;
use reqwest::Client;
use std::fs;
use tracing::{info, warn};
use url::Url;

use merge::write_intermediate;
use series::{normalize, series_data};
use states::{intermediate_name, series_id, Period, PERIODS, STATE_DIRECTORY};

/// What one full fetch pass did, for the run summary.
#[derive(Debug, Default)]
pub struct FetchSummary {
    /// Intermediates written.
    pub written: usize,
    /// Pairs whose reply held no data rows.
    pub empty: Vec<(String, Period)>,
    /// Pairs skipped because the reply would not parse.
    pub skipped: Vec<(String, Period)>,
}

fn series_url(settings: &Settings, number: &str, period: Period) -> Result<Url> {
    let mut url = settings
        .bls_endpoint
        .join(&series_id(number))
        .map_err(|e| {
            AcquireError::Config(format!(
                "joining series id onto {}: {e}",
                settings.bls_endpoint
            ))
        })?;
    {
        let mut query = url.query_pairs_mut();
        query.append_pair("startyear", &period.start_year.to_string());
        query.append_pair("endyear", &period.end_year.to_string());
        if let Some(key) = &settings.bls_api_key {
            query.append_pair("registrationkey", key);
        }
    }
    Ok(url)
}

/// Fetch every (state, period) series and write one scratch CSV per pair
/// that had data. A reply that will not parse skips its pair; an empty
/// reply writes nothing. Both outcomes land in the summary instead of
/// silently shrinking the merged output.
pub async fn fetch_all(client: &Client, settings: &Settings) -> Result<FetchSummary> {
    fs::create_dir_all(&settings.work_dir)?;

    let mut summary = FetchSummary::default();
    for &period in PERIODS {
        for &(number, _) in STATE_DIRECTORY {
            let url = series_url(settings, number, period)?;
            let body = fetch::get_text_with_retry(client, &url).await?;

            let points = match series_data(&body) {
                Ok(points) => points,
                Err(AcquireError::Malformed(reason)) => {
                    warn!(
                        state = number,
                        start = period.start_year,
                        end = period.end_year,
                        %reason,
                        "skipping pair"
                    );
                    summary.skipped.push((number.to_string(), period));
                    continue;
                }
                Err(e) => return Err(e),
            };

            let (rows, dropped) = normalize(points);
            if dropped > 0 {
                warn!(state = number, dropped, "dropped non-monthly points");
            }
            if rows.is_empty() {
                info!(
                    state = number,
                    start = period.start_year,
                    end = period.end_year,
                    "no data for pair"
                );
                summary.empty.push((number.to_string(), period));
                continue;
            }

            let path = settings.work_dir.join(intermediate_name(number, period));
            write_intermediate(&path, &rows)?;
            info!(state = number, end = period.end_year, rows = rows.len(), "wrote intermediate");
            summary.written += 1;
        }
    }

    Ok(summary)
}
