use crate::error::{AcquireError, Result};
use crate::fetch;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize)]
struct ReverseReply {
    #[serde(default)]
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
struct Address {
    #[serde(default)]
    county: Option<String>,
}

/// Reverse-geocoding client against a Nominatim-compatible endpoint.
///
/// Nominatim rejects requests without a User-Agent, so the `Client` handed
/// in here must have been built with one.
pub struct Geocoder {
    client: Client,
    endpoint: Url,
}

impl Geocoder {
    pub fn new(client: Client, endpoint: Url) -> Self {
        Geocoder { client, endpoint }
    }

    /// Look up the county for a coordinate pair. `Ok(None)` means the
    /// service answered but has no county for the point.
    pub async fn reverse_county(&self, lat: f64, lon: f64) -> Result<Option<String>> {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("format", "jsonv2")
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &lon.to_string());

        let body = fetch::get_text_with_retry(&self.client, &url).await?;
        parse_reverse_reply(&body)
    }
}

/// Pull the `address.county` field out of a reverse reply. Replies without
/// an address block resolve to `None`, including the `{"error": ...}` shape
/// Nominatim returns for unmappable coordinates such as open ocean.
pub fn parse_reverse_reply(body: &str) -> Result<Option<String>> {
    let reply: ReverseReply = serde_json::from_str(body)
        .map_err(|e| AcquireError::Malformed(format!("reverse geocode reply: {e}")))?;
    Ok(reply.address.and_then(|a| a.county))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_with_county() {
        let body = r#"{
            "display_name": "Main St, Springfield",
            "address": {"road": "Main St", "county": "Sangamon County", "state": "Illinois"}
        }"#;
        assert_eq!(
            parse_reverse_reply(body).unwrap(),
            Some("Sangamon County".to_string())
        );
    }

    #[test]
    fn reply_without_county_field() {
        let body = r#"{"address": {"city": "Baltimore", "state": "Maryland"}}"#;
        assert_eq!(parse_reverse_reply(body).unwrap(), None);
    }

    #[test]
    fn unmappable_coordinate_reply_is_absent_not_an_error() {
        // Nominatim's answer for (0, 0) and similar points.
        let body = r#"{"error": "Unable to geocode"}"#;
        assert_eq!(parse_reverse_reply(body).unwrap(), None);
    }

    #[test]
    fn non_json_reply_is_malformed() {
        let err = parse_reverse_reply("<html>gateway timeout</html>").unwrap_err();
        assert!(matches!(err, AcquireError::Malformed(_)));
    }
}
