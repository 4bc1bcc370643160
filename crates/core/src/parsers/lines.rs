use allocpad_protocol::{Sample, TraceStore};
use thiserror::Error;

use super::{OutOfOrder, check_order};

#[derive(Debug, Error)]
pub enum LinesParseError {
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("line {line}: expected `timestamp size`, got {content:?}")]
    InvalidLine { line: usize, content: String },
    #[error(transparent)]
    OutOfOrder(#[from] OutOfOrder),
}

/// Parse a plain-text allocation trace.
///
/// One sample per line: `timestamp size`, separated by whitespace or a
/// comma. Blank lines and lines starting with `#` are skipped. Samples are
/// indexed in the order they appear; a file of only comments is an empty
/// trace.
pub fn parse_lines_trace(data: &[u8]) -> Result<TraceStore, LinesParseError> {
    let text = std::str::from_utf8(data)?;
    let mut allocated = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty());
        let parsed = match (fields.next(), fields.next(), fields.next()) {
            (Some(ts), Some(size), None) => ts.parse::<f64>().ok().zip(size.parse::<i64>().ok()),
            _ => None,
        };
        let Some((timestamp, size)) = parsed else {
            return Err(LinesParseError::InvalidLine {
                line: line_no + 1,
                content: line.to_string(),
            });
        };

        let trace_idx = allocated.len();
        allocated.push(Sample::new(size, timestamp, trace_idx));
    }

    check_order(&allocated)?;

    Ok(TraceStore::new(allocated))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_space_and_comma_separated() {
        let input = b"# ts size\n0.0 512\n\n1.5,-256\n";
        let store = parse_lines_trace(input).unwrap();
        assert_eq!(
            store.allocated,
            vec![Sample::new(512, 0.0, 0), Sample::new(-256, 1.5, 1)]
        );
    }

    #[test]
    fn reports_bad_line_number() {
        let err = parse_lines_trace(b"0 1\n1 lots\n").unwrap_err();
        assert!(matches!(err, LinesParseError::InvalidLine { line: 2, .. }));
    }

    #[test]
    fn extra_columns_are_rejected() {
        assert!(parse_lines_trace(b"0 1 2\n").is_err());
    }

    #[test]
    fn comments_only_is_empty() {
        let store = parse_lines_trace(b"# nothing\n").unwrap();
        assert!(store.is_empty());
    }
}
