use anyhow::{Context, Result};
use std::{env, path::PathBuf};
use url::Url;

const DEFAULT_STORAGE_DIR: &str = "storage";
const DEFAULT_WORK_DIR: &str = ".";
const DEFAULT_BLS_ENDPOINT: &str = "https://api.bls.gov/publicAPI/v2/timeseries/data/";
const DEFAULT_GEOCODER_ENDPOINT: &str = "https://nominatim.openstreetmap.org/reverse";
const DEFAULT_USER_AGENT: &str = concat!("statscraper/", env!("CARGO_PKG_VERSION"));

/// Run configuration, sourced from the environment with production defaults.
///
/// `storage_dir` holds the final outputs; `work_dir` holds the per-state
/// intermediates that are deleted after the merge.
#[derive(Debug, Clone)]
pub struct Settings {
    pub storage_dir: PathBuf,
    pub work_dir: PathBuf,
    pub bls_endpoint: Url,
    /// BLS registration key; requests go out unauthenticated when unset.
    pub bls_api_key: Option<String>,
    pub geocoder_endpoint: Url,
    pub user_agent: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let bls_endpoint = env::var("BLS_ENDPOINT").unwrap_or_else(|_| DEFAULT_BLS_ENDPOINT.into());
        let geocoder_endpoint =
            env::var("GEOCODER_ENDPOINT").unwrap_or_else(|_| DEFAULT_GEOCODER_ENDPOINT.into());

        Ok(Settings {
            storage_dir: env::var("STORAGE_DIR")
                .unwrap_or_else(|_| DEFAULT_STORAGE_DIR.into())
                .into(),
            work_dir: env::var("WORK_DIR")
                .unwrap_or_else(|_| DEFAULT_WORK_DIR.into())
                .into(),
            bls_endpoint: Url::parse(&bls_endpoint)
                .with_context(|| format!("parsing BLS_ENDPOINT {bls_endpoint:?}"))?,
            bls_api_key: env::var("BLS_API_KEY").ok().filter(|k| !k.is_empty()),
            geocoder_endpoint: Url::parse(&geocoder_endpoint)
                .with_context(|| format!("parsing GEOCODER_ENDPOINT {geocoder_endpoint:?}"))?,
            user_agent: env::var("GEOCODER_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.into()),
        })
    }
}
