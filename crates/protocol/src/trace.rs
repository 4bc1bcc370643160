use serde::{Deserialize, Serialize};

/// Shape shared by everything the pad can plot: a signed magnitude placed at
/// a point in time.
pub trait Plottable {
    fn size(&self) -> i64;
    fn timestamp(&self) -> f64;
}

/// One allocation-trace record.
///
/// `size` is positive for an allocation and negative for a release.
/// `trace_idx` is the record's position in the source trace and survives
/// reduction unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub size: i64,
    pub timestamp: f64,
    pub trace_idx: usize,
}

impl Sample {
    pub fn new(size: i64, timestamp: f64, trace_idx: usize) -> Self {
        Self {
            size,
            timestamp,
            trace_idx,
        }
    }
}

impl Plottable for Sample {
    fn size(&self) -> i64 {
        self.size
    }

    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

/// An aggregated stand-in for a contiguous run of samples.
///
/// `size` is the signed sum of the run, `timestamp` the first sample's, and
/// `trace_idx` the run's original indices in ascending order (never empty).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub size: i64,
    pub timestamp: f64,
    pub trace_idx: Vec<usize>,
}

impl Bucket {
    /// Fold a non-empty run of samples into a bucket. Returns `None` for an
    /// empty run.
    pub fn from_run(run: &[Sample]) -> Option<Self> {
        let first = run.first()?;
        Some(Self {
            size: saturating_total(run.iter().map(|s| s.size)),
            timestamp: first.timestamp,
            trace_idx: run.iter().map(|s| s.trace_idx).collect(),
        })
    }
}

impl Plottable for Bucket {
    fn size(&self) -> i64 {
        self.size
    }

    fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

/// The data source behind a pad: the allocation trace in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceStore {
    pub allocated: Vec<Sample>,
}

impl TraceStore {
    pub fn new(allocated: Vec<Sample>) -> Self {
        Self { allocated }
    }

    pub fn len(&self) -> usize {
        self.allocated.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocated.is_empty()
    }

    /// Net magnitude of the whole trace.
    pub fn total_size(&self) -> i64 {
        saturating_total(self.allocated.iter().map(|s| s.size))
    }
}

/// Sum of signed sizes, clamped to the `i64` range instead of overflowing.
pub fn saturating_total(sizes: impl IntoIterator<Item = i64>) -> i64 {
    sizes.into_iter().fold(0i64, i64::saturating_add)
}

/// Notification emitted when a drag selection completes.
///
/// Bounds are in original-sample units and are not ordered: a right-to-left
/// drag yields `start_point > end_point`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeAllocated {
    pub start_point: f64,
    pub end_point: f64,
}

impl RangeAllocated {
    /// `(low, high)` regardless of drag direction.
    pub fn normalized(&self) -> (f64, f64) {
        if self.start_point <= self.end_point {
            (self.start_point, self.end_point)
        } else {
            (self.end_point, self.start_point)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_sums_signed_sizes() {
        let run = [
            Sample::new(64, 1.0, 4),
            Sample::new(-64, 2.0, 5),
            Sample::new(32, 3.0, 6),
        ];
        let bucket = Bucket::from_run(&run).unwrap();
        assert_eq!(bucket.size, 32);
        assert_eq!(bucket.timestamp, 1.0);
        assert_eq!(bucket.trace_idx, vec![4, 5, 6]);
    }

    #[test]
    fn bucket_sum_saturates_instead_of_overflowing() {
        let run = [
            Sample::new(i64::MAX, 0.0, 0),
            Sample::new(1, 1.0, 1),
            Sample::new(1, 2.0, 2),
        ];
        assert_eq!(Bucket::from_run(&run).unwrap().size, i64::MAX);
        assert_eq!(saturating_total([i64::MIN, -1]), i64::MIN);
    }

    #[test]
    fn empty_run_has_no_bucket() {
        assert!(Bucket::from_run(&[]).is_none());
    }

    #[test]
    fn sample_uses_camel_case_keys() {
        let json = serde_json::to_string(&Sample::new(-8, 12.5, 3)).unwrap();
        assert_eq!(json, r#"{"size":-8,"timestamp":12.5,"traceIdx":3}"#);
    }

    #[test]
    fn range_normalizes_reverse_drag() {
        let range = RangeAllocated {
            start_point: 750.0,
            end_point: 250.0,
        };
        assert_eq!(range.normalized(), (250.0, 750.0));
    }
}
