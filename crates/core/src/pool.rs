use allocpad_protocol::{Bucket, Plottable, Sample, saturating_total};

/// The sequence actually drawn: either the raw samples or their buckets,
/// never a mix of both.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPool {
    Samples(Vec<Sample>),
    Buckets(Vec<Bucket>),
}

impl Default for RenderPool {
    fn default() -> Self {
        Self::Samples(Vec::new())
    }
}

impl RenderPool {
    pub fn len(&self) -> usize {
        match self {
            Self::Samples(samples) => samples.len(),
            Self::Buckets(buckets) => buckets.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_reduced(&self) -> bool {
        matches!(self, Self::Buckets(_))
    }

    /// Plotted units in draw order.
    pub fn units(&self) -> Box<dyn Iterator<Item = &dyn Plottable> + '_> {
        match self {
            Self::Samples(samples) => Box::new(samples.iter().map(|s| s as &dyn Plottable)),
            Self::Buckets(buckets) => Box::new(buckets.iter().map(|b| b as &dyn Plottable)),
        }
    }

    /// Largest absolute magnitude in the pool, 0 when empty.
    pub fn max_abs_size(&self) -> u64 {
        self.units()
            .map(|unit| unit.size().unsigned_abs())
            .max()
            .unwrap_or(0)
    }

    /// Net magnitude across the pool.
    pub fn total_size(&self) -> i64 {
        saturating_total(self.units().map(|unit| unit.size()))
    }
}

/// Output of [`reduce`]: the pool plus how many source samples each plotted
/// unit stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct Reduction {
    pub pool: RenderPool,
    pub step: usize,
}

/// Compress `source` into at most `limit` plotted units.
///
/// A trace that already fits is passed through with `step = 1`. Otherwise
/// `step = round(n / limit)` and the trace is cut into `limit` contiguous
/// chunks of `step` samples, each summed into one [`Bucket`]. Chunks that
/// start past the end of the trace are skipped. The last chunk runs to the
/// end of the trace so rounding never drops samples.
///
/// Sizes are summed, not enveloped: a spike narrower than `step` that is
/// cancelled by its neighbours is flattened.
///
/// A `limit` of 0 disables reduction.
pub fn reduce(source: &[Sample], limit: usize) -> Reduction {
    let n = source.len();
    if n <= limit || limit == 0 {
        return Reduction {
            pool: RenderPool::Samples(source.to_vec()),
            step: 1,
        };
    }

    let step = chunk_step(n, limit);
    let mut buckets = Vec::with_capacity(limit.min(n.div_ceil(step)));
    for chunk in 0..limit {
        let start = chunk * step;
        if start >= n {
            break;
        }
        let end = if chunk + 1 == limit {
            n
        } else {
            ((chunk + 1) * step).min(n)
        };
        if let Some(bucket) = Bucket::from_run(&source[start..end]) {
            buckets.push(bucket);
        }
    }

    log::trace!(
        "reduced {n} samples to {} buckets (step {step})",
        buckets.len()
    );

    Reduction {
        pool: RenderPool::Buckets(buckets),
        step,
    }
}

/// `round(n / limit)`, never 0.
fn chunk_step(n: usize, limit: usize) -> usize {
    let step = (n as f64 / limit as f64).round() as usize;
    step.max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace(n: usize) -> Vec<Sample> {
        (0..n)
            .map(|i| {
                let size = if i % 3 == 0 { -(i as i64) } else { i as i64 * 2 };
                Sample::new(size, i as f64 * 10.0, i)
            })
            .collect()
    }

    #[test]
    fn short_trace_passes_through() {
        let source = trace(500);
        let reduction = reduce(&source, 1000);
        assert_eq!(reduction.step, 1);
        assert_eq!(reduction.pool, RenderPool::Samples(source));
    }

    #[test]
    fn exact_limit_passes_through() {
        let source = trace(1000);
        let reduction = reduce(&source, 1000);
        assert_eq!(reduction.step, 1);
        assert!(!reduction.pool.is_reduced());
    }

    #[test]
    fn double_length_pairs_samples() {
        let source = trace(2000);
        let reduction = reduce(&source, 1000);
        assert_eq!(reduction.step, 2);
        let RenderPool::Buckets(buckets) = &reduction.pool else {
            panic!("expected buckets");
        };
        assert_eq!(buckets.len(), 1000);
        for (i, bucket) in buckets.iter().enumerate() {
            let pair = &source[i * 2..i * 2 + 2];
            assert_eq!(bucket.size, pair[0].size + pair[1].size);
            assert_eq!(bucket.timestamp, pair[0].timestamp);
            assert_eq!(bucket.trace_idx, vec![i * 2, i * 2 + 1]);
        }
    }

    #[test]
    fn rounding_up_skips_chunks_past_the_end() {
        // 2500 / 1000 rounds to 3: only 834 chunks start inside the trace.
        let source = trace(2500);
        let reduction = reduce(&source, 1000);
        assert_eq!(reduction.step, 3);
        assert_eq!(reduction.pool.len(), 834);
        let RenderPool::Buckets(buckets) = &reduction.pool else {
            panic!("expected buckets");
        };
        assert_eq!(buckets.last().map(|b| b.trace_idx.clone()), Some(vec![2499]));
    }

    #[test]
    fn rounding_down_folds_remainder_into_last_bucket() {
        // 1400 / 1000 rounds to 1: the final chunk takes the trailing 401.
        let source = trace(1400);
        let reduction = reduce(&source, 1000);
        assert_eq!(reduction.step, 1);
        assert_eq!(reduction.pool.len(), 1000);
        let RenderPool::Buckets(buckets) = &reduction.pool else {
            panic!("expected buckets");
        };
        assert_eq!(buckets[999].trace_idx.len(), 401);
    }

    #[test]
    fn reduction_preserves_total_magnitude() {
        for n in [0, 1, 999, 1001, 1400, 1500, 2000, 2500, 2999, 7321] {
            let source = trace(n);
            let expected: i64 = source.iter().map(|s| s.size).sum();
            let reduction = reduce(&source, 1000);
            assert_eq!(reduction.pool.total_size(), expected, "n = {n}");
            assert!(reduction.pool.len() <= 1000, "n = {n}");
        }
    }

    #[test]
    fn bucket_indices_are_ascending_and_cover_trace() {
        let source = trace(3333);
        let reduction = reduce(&source, 1000);
        let RenderPool::Buckets(buckets) = &reduction.pool else {
            panic!("expected buckets");
        };
        let flat: Vec<usize> = buckets.iter().flat_map(|b| b.trace_idx.clone()).collect();
        assert!(buckets.iter().all(|b| !b.trace_idx.is_empty()));
        assert_eq!(flat, (0..3333).collect::<Vec<_>>());
    }

    #[test]
    fn oversized_samples_saturate() {
        let source = [
            Sample::new(i64::MAX, 0.0, 0),
            Sample::new(1, 1.0, 1),
            Sample::new(1, 2.0, 2),
        ];
        let reduction = reduce(&source, 1);
        assert_eq!(reduction.step, 3);
        assert_eq!(reduction.pool.total_size(), i64::MAX);
        assert_eq!(reduction.pool.max_abs_size(), i64::MAX as u64);
    }

    #[test]
    fn cancelling_chunk_nets_to_zero() {
        let source: Vec<Sample> = (0..4)
            .map(|i| Sample::new(if i % 2 == 0 { 4096 } else { -4096 }, i as f64, i))
            .collect();
        let reduction = reduce(&source, 2);
        assert_eq!(reduction.pool.max_abs_size(), 0);
    }

    #[test]
    fn empty_pool_has_zero_extrema() {
        let pool = RenderPool::default();
        assert!(pool.is_empty());
        assert_eq!(pool.max_abs_size(), 0);
    }
}
