use allocpad_protocol::{Sample, TraceStore};
use serde::Deserialize;
use thiserror::Error;

use super::{OutOfOrder, check_order};

#[derive(Debug, Error)]
pub enum JsonParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    OutOfOrder(#[from] OutOfOrder),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSample {
    size: i64,
    timestamp: f64,
    #[serde(default)]
    trace_idx: Option<usize>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTrace {
    Store { allocated: Vec<RawSample> },
    Samples(Vec<RawSample>),
}

/// Parse an allocation trace from JSON.
///
/// Accepts either a bare array of samples or a store object:
///
/// ```json
/// { "allocated": [ { "size": 64, "timestamp": 0.5, "traceIdx": 0 } ] }
/// ```
///
/// A missing `traceIdx` defaults to the sample's position in the array. An
/// empty array is a valid, empty trace.
pub fn parse_json_trace(data: &[u8]) -> Result<TraceStore, JsonParseError> {
    let raw = match serde_json::from_slice::<RawTrace>(data)? {
        RawTrace::Store { allocated } => allocated,
        RawTrace::Samples(samples) => samples,
    };
    let allocated: Vec<Sample> = raw
        .into_iter()
        .enumerate()
        .map(|(i, s)| Sample::new(s.size, s.timestamp, s.trace_idx.unwrap_or(i)))
        .collect();
    check_order(&allocated)?;

    Ok(TraceStore::new(allocated))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_store_object() {
        let input = br#"{"allocated": [
            {"size": 4096, "timestamp": 1.0, "traceIdx": 7},
            {"size": -4096, "timestamp": 2.5, "traceIdx": 8}
        ]}"#;
        let store = parse_json_trace(input).unwrap();
        assert_eq!(store.allocated[0], Sample::new(4096, 1.0, 7));
        assert_eq!(store.allocated[1].trace_idx, 8);
    }

    #[test]
    fn bare_array_defaults_indices() {
        let input = br#"[{"size": 1, "timestamp": 0}, {"size": 2, "timestamp": 0}]"#;
        let store = parse_json_trace(input).unwrap();
        let indices: Vec<usize> = store.allocated.iter().map(|s| s.trace_idx).collect();
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn rejects_backwards_timestamps() {
        let input = br#"[{"size": 1, "timestamp": 3}, {"size": 2, "timestamp": 1}]"#;
        assert!(matches!(
            parse_json_trace(input),
            Err(JsonParseError::OutOfOrder(_))
        ));
    }

    #[test]
    fn empty_trace_is_an_empty_store() {
        assert_eq!(
            parse_json_trace(br#"{"allocated": []}"#).unwrap(),
            TraceStore::default()
        );
        assert!(parse_json_trace(b"[]").unwrap().is_empty());
    }

    #[test]
    fn malformed_json_errors() {
        assert!(matches!(
            parse_json_trace(b"[{\"size\": \"big\"}]"),
            Err(JsonParseError::Json(_))
        ));
    }
}
