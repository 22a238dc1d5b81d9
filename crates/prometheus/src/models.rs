use std::collections::HashMap;

use serde::Deserialize;

/// Envelope of every `/api/v1` query response.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    pub status: String,
    #[serde(default)]
    pub error: Option<String>,
    pub data: Option<QueryData>,
}

#[derive(Debug, Deserialize)]
pub struct QueryData {
    #[serde(rename = "resultType")]
    pub result_type: String,
    pub result: Vec<SeriesResult>,
}

/// One range vector: a label set and its `[timestamp, "value"]` pairs.
/// Prometheus encodes sample values as strings.
#[derive(Debug, Deserialize)]
pub struct SeriesResult {
    #[serde(default)]
    pub metric: HashMap<String, String>,
    #[serde(default)]
    pub values: Vec<(f64, String)>,
}

/// A decoded time series: ordered (unix seconds, value) points.
#[derive(Debug, Clone)]
pub struct Series {
    pub labels: HashMap<String, String>,
    pub samples: Vec<(f64, f64)>,
}

impl SeriesResult {
    /// Decode string-encoded sample values. Unparsable or non-finite points
    /// ("NaN", "+Inf" stale markers) are dropped rather than failing the
    /// whole series.
    pub fn into_series(self) -> Series {
        let samples = self
            .values
            .into_iter()
            .filter_map(|(ts, value)| {
                value
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(|v| (ts, v))
            })
            .collect();

        Series {
            labels: self.metric,
            samples,
        }
    }
}
