use crate::error::{AcquireError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// One observation exactly as the timeseries API reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPoint {
    pub year: String,
    pub period: String,
    #[serde(rename = "periodName", default)]
    pub period_name: String,
    #[serde(default)]
    pub latest: Option<String>,
    pub value: String,
    #[serde(default)]
    pub footnotes: Value,
}

/// One normalized monthly observation. `periodName` and `footnotes` are
/// deliberately not carried over from [`ApiPoint`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRow {
    pub year: String,
    /// Calendar month, 1–12.
    pub period: u8,
    pub latest: Option<String>,
    pub value: String,
}

/// Map a monthly period token to its calendar month. Annual averages
/// ("M13") and anything else non-monthly have no mapping.
pub fn month_number(code: &str) -> Option<u8> {
    match code {
        "M01" => Some(1),
        "M02" => Some(2),
        "M03" => Some(3),
        "M04" => Some(4),
        "M05" => Some(5),
        "M06" => Some(6),
        "M07" => Some(7),
        "M08" => Some(8),
        "M09" => Some(9),
        "M10" => Some(10),
        "M11" => Some(11),
        "M12" => Some(12),
        _ => None,
    }
}

/// Extract the data points of the single requested series from a reply.
///
/// The upstream API has been observed rendering `Results.series` as a
/// string-encoded list rather than a JSON array; both shapes are accepted
/// here so nothing downstream ever sees the difference. An empty series
/// list counts as "no data", not an error.
pub fn series_data(body: &str) -> Result<Vec<ApiPoint>> {
    let envelope: Value = serde_json::from_str(body)
        .map_err(|e| AcquireError::Malformed(format!("timeseries reply: {e}")))?;

    if let Some(status) = envelope.get("status").and_then(Value::as_str) {
        if status != "REQUEST_SUCCEEDED" {
            let messages = envelope
                .get("message")
                .map(|m| m.to_string())
                .unwrap_or_default();
            return Err(AcquireError::Malformed(format!(
                "request status {status}: {messages}"
            )));
        }
    }

    let series = envelope
        .get("Results")
        .and_then(|r| r.get("series"))
        .ok_or_else(|| AcquireError::Malformed("no Results.series in reply".into()))?;

    let series = match series {
        Value::String(s) => serde_json::from_str::<Value>(s)
            .map_err(|e| AcquireError::Malformed(format!("string-encoded series list: {e}")))?,
        other => other.clone(),
    };

    let entry = match series {
        Value::Array(items) => match items.into_iter().next() {
            Some(entry) => entry,
            None => return Ok(Vec::new()),
        },
        entry @ Value::Object(_) => entry,
        other => {
            return Err(AcquireError::Malformed(format!(
                "series list has unexpected shape: {other}"
            )))
        }
    };

    let data = entry
        .get("data")
        .cloned()
        .ok_or_else(|| AcquireError::Malformed("series entry has no data list".into()))?;

    serde_json::from_value(data)
        .map_err(|e| AcquireError::Malformed(format!("series data list: {e}")))
}

/// Convert raw points into normalized rows. Points without a monthly period
/// token are logged and dropped; the returned count says how many were.
pub fn normalize(points: Vec<ApiPoint>) -> (Vec<SeriesRow>, usize) {
    let mut rows = Vec::with_capacity(points.len());
    let mut dropped = 0;
    for point in points {
        match month_number(&point.period) {
            Some(month) => rows.push(SeriesRow {
                year: point.year,
                period: month,
                latest: point.latest,
                value: point.value,
            }),
            None => {
                warn!(year = %point.year, period = %point.period, "skipping non-monthly point");
                dropped += 1;
            }
        }
    }
    (rows, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn envelope(series: &str) -> String {
        format!(
            r#"{{"status":"REQUEST_SUCCEEDED","responseTime":120,"message":[],"Results":{{"series":{series}}}}}"#
        )
    }

    const ONE_POINT: &str = r#"[{"seriesID":"LASST010000000000003","data":[
        {"year":"2015","period":"M06","periodName":"June","value":"5.0","footnotes":[{}]}
    ]}]"#;

    #[test]
    fn month_mapping_is_a_bijection_over_the_twelve_codes() {
        let mut seen = HashSet::new();
        for m in 1..=12u8 {
            let code = format!("M{m:02}");
            let mapped = month_number(&code).expect("monthly code must map");
            assert_eq!(mapped, m);
            assert!(seen.insert(mapped));
        }
        assert_eq!(seen.len(), 12);
        for bad in ["M13", "M00", "06", "June", ""] {
            assert_eq!(month_number(bad), None);
        }
    }

    #[test]
    fn point_normalizes_to_integer_month_with_value_preserved() {
        let points = series_data(&envelope(ONE_POINT)).unwrap();
        let (rows, dropped) = normalize(points);
        assert_eq!(dropped, 0);
        assert_eq!(
            rows,
            vec![SeriesRow {
                year: "2015".into(),
                period: 6,
                latest: None,
                value: "5.0".into(),
            }]
        );

        // The persisted header carries neither footnotes nor periodName.
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.serialize(&rows[0]).unwrap();
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert_eq!(out.lines().next(), Some("year,period,latest,value"));
    }

    #[test]
    fn string_encoded_series_parses_like_the_array_shape() {
        let as_array = series_data(&envelope(ONE_POINT)).unwrap();
        let encoded = serde_json::to_string(ONE_POINT.trim()).unwrap();
        let as_string = series_data(&envelope(&encoded)).unwrap();
        assert_eq!(as_array.len(), as_string.len());
        assert_eq!(as_array[0].value, as_string[0].value);
        assert_eq!(as_array[0].period, as_string[0].period);
    }

    #[test]
    fn empty_data_list_yields_no_rows() {
        let points = series_data(&envelope(r#"[{"seriesID":"x","data":[]}]"#)).unwrap();
        assert!(points.is_empty());
        let points = series_data(&envelope("[]")).unwrap();
        assert!(points.is_empty());
    }

    #[test]
    fn failed_status_is_malformed() {
        let body = r#"{"status":"REQUEST_NOT_PROCESSED","message":["bad key"],"Results":{}}"#;
        let err = series_data(body).unwrap_err();
        assert!(matches!(err, AcquireError::Malformed(_)));
    }

    #[test]
    fn annual_average_points_are_dropped_not_kept_as_tokens() {
        let series = r#"[{"seriesID":"x","data":[
            {"year":"2015","period":"M13","periodName":"Annual","value":"5.1","footnotes":[]},
            {"year":"2015","period":"M12","periodName":"December","value":"5.0","footnotes":[]}
        ]}]"#;
        let points = series_data(&envelope(series)).unwrap();
        let (rows, dropped) = normalize(points);
        assert_eq!(dropped, 1);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].period, 12);
    }

    #[test]
    fn latest_marker_survives_normalization() {
        let series = r#"[{"seriesID":"x","data":[
            {"year":"2020","period":"M12","periodName":"December","latest":"true","value":"6.7","footnotes":[]}
        ]}]"#;
        let points = series_data(&envelope(series)).unwrap();
        let (rows, _) = normalize(points);
        assert_eq!(rows[0].latest.as_deref(), Some("true"));
    }
}
