pub mod json;
pub mod lines;

use allocpad_protocol::{Sample, TraceStore};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("json: {0}")]
    Json(#[from] json::JsonParseError),
    #[error("lines: {0}")]
    Lines(#[from] lines::LinesParseError),
    #[error("unable to detect format")]
    UnknownFormat,
}

/// A sample whose timestamp goes backwards.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("sample {index} has timestamp {timestamp}, before the previous {previous}")]
pub struct OutOfOrder {
    pub index: usize,
    pub timestamp: f64,
    pub previous: f64,
}

/// Reject traces whose timestamps decrease.
pub(crate) fn check_order(samples: &[Sample]) -> Result<(), OutOfOrder> {
    for (index, pair) in samples.windows(2).enumerate() {
        if pair[1].timestamp < pair[0].timestamp {
            return Err(OutOfOrder {
                index: index + 1,
                timestamp: pair[1].timestamp,
                previous: pair[0].timestamp,
            });
        }
    }
    Ok(())
}

/// Detect the trace format and parse it.
///
/// JSON input (a sample array or an `{"allocated": [...]}` store) is tried
/// first; anything else is read as whitespace-separated
/// `timestamp size` lines.
pub fn parse_auto(data: &[u8]) -> Result<TraceStore, ParseError> {
    let first = data.iter().copied().find(|b| !b.is_ascii_whitespace());
    match first {
        Some(b'[' | b'{') => Ok(json::parse_json_trace(data)?),
        Some(_) => Ok(lines::parse_lines_trace(data)?),
        None => Err(ParseError::UnknownFormat),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_json_store() {
        let store = parse_auto(br#" {"allocated": [{"size": 16, "timestamp": 0}]} "#).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn detects_lines() {
        let store = parse_auto(b"0 16\n5 -16\n").unwrap();
        assert_eq!(store.total_size(), 0);
    }

    #[test]
    fn detects_empty_stores() {
        assert!(parse_auto(br#"{"allocated": []}"#).unwrap().is_empty());
        assert!(parse_auto(b"[]").unwrap().is_empty());
    }

    #[test]
    fn blank_input_is_unknown() {
        assert!(matches!(parse_auto(b"  \n"), Err(ParseError::UnknownFormat)));
    }

    #[test]
    fn order_check_reports_first_regression() {
        let samples = [
            Sample::new(1, 5.0, 0),
            Sample::new(1, 5.0, 1),
            Sample::new(1, 4.0, 2),
        ];
        let err = check_order(&samples).unwrap_err();
        assert_eq!(err.index, 2);
        assert_eq!(err.previous, 5.0);
    }
}
