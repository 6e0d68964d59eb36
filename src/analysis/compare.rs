//! Descriptive comparison of MRCA age distributions.
//!
//! Distributions from different inference runs are compared two ways: as
//! equal-width binned frequency counts over a shared range (for side-by-side
//! histograms) and as a keyed dispersion summary (the share of taxon pairs
//! whose age distribution got tighter from one run to the other).

use std::collections::HashMap;
use std::hash::Hash;

/// Bin count used when callers have no display preference
pub const DEFAULT_NUM_BINS: usize = 30;

// =#========================================================================#=
// HISTOGRAM
// =#========================================================================#=
/// Equal-width binned frequency counts of one distribution over a fixed
/// range.
///
/// Built via [binned_comparison], which gives all histograms of one
/// comparison the same range so their bins line up.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    counts: Vec<usize>,
    min: f64,
    max: f64,
}

impl Histogram {
    /// Bins `values` into `num_bins` equal-width bins over `[min, max]`.
    /// Values outside the range are dropped, not clamped.
    fn bin(values: &[f64], num_bins: usize, min: f64, max: f64) -> Self {
        let mut counts = vec![0; num_bins];
        let width = (max - min) / num_bins as f64;

        for &value in values {
            if value < min || value > max {
                continue;
            }
            // The range maximum falls into the last bin
            let bin = (((value - min) / width) as usize).min(num_bins - 1);
            counts[bin] += 1;
        }

        Histogram { counts, min, max }
    }

    /// Returns the per-bin frequency counts.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Returns the number of bins.
    pub fn num_bins(&self) -> usize {
        self.counts.len()
    }

    /// Returns the binned range `(min, max)`.
    pub fn range(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Returns the width of one bin.
    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.counts.len() as f64
    }

    /// Returns the total count over all bins, i.e. the number of values
    /// that fell inside the range.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Bins each distribution over one shared range, for side-by-side display.
///
/// The shared range spans all observed values across all distributions,
/// clipped to `clip` when given; when the observed values lie entirely
/// outside the clip, or with no observed values at all, the clip range is
/// used as-is, or `[0, 1]` as a last resort. Empty distributions yield
/// all-zero counts rather than a panic, so "no data" stays representable
/// downstream.
///
/// # Panics
/// Panics if `num_bins` is zero.
///
/// # Example
/// ```
/// use mrcascan::analysis::binned_comparison;
///
/// let with_prior = vec![10.0, 12.0, 14.0];
/// let without_prior = vec![10.0, 20.0, 30.0];
/// let histograms = binned_comparison(&[&with_prior, &without_prior], 30, None);
/// assert_eq!(histograms.len(), 2);
/// assert_eq!(histograms[0].range(), histograms[1].range());
/// ```
pub fn binned_comparison(
    distributions: &[&[f64]],
    num_bins: usize,
    clip: Option<(f64, f64)>,
) -> Vec<Histogram> {
    assert!(num_bins > 0, "histogram needs at least one bin");

    let observed = distributions
        .iter()
        .flat_map(|d| d.iter().copied())
        .fold(None, |range: Option<(f64, f64)>, v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });

    let (mut min, mut max) = match (observed, clip) {
        (Some((lo, hi)), Some((clip_lo, clip_hi))) => {
            let (min, max) = (lo.max(clip_lo), hi.min(clip_hi));
            if max <= min {
                // Observed values barely touch, or lie entirely outside, the
                // clip; binning over the clip itself keeps them dropped
                (clip_lo, clip_hi)
            } else {
                (min, max)
            }
        }
        (Some(range), None) => range,
        (None, Some(clip_range)) => clip_range,
        (None, None) => (0.0, 1.0),
    };
    if max <= min {
        // Degenerate range (all values equal, or a zero-width clip)
        max = min + 1.0;
    }

    distributions
        .iter()
        .map(|values| Histogram::bin(values, num_bins, min, max))
        .collect()
}

/// Sample standard deviation, or `None` for fewer than two values.
///
/// The dispersion of an empty (or single-value) distribution is undefined;
/// representing it as missing rather than zero keeps "no data" from being
/// read as "no spread".
pub fn std_dev(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values
        .iter()
        .map(|v| (v - mean) * (v - mean))
        .sum::<f64>()
        / (n - 1) as f64;

    Some(variance.sqrt())
}

/// Over the key intersection of two keyed distribution maps, the percentage
/// of keys where `b`'s dispersion is strictly lower than `a`'s.
///
/// Keys present in only one map are ignored, as are keys where either side
/// has undefined dispersion. Returns `None` when no key is comparable.
///
/// # Example
/// ```
/// use std::collections::HashMap;
/// use mrcascan::analysis::lower_dispersion_share;
///
/// let mut plain: HashMap<&str, Vec<f64>> = HashMap::new();
/// plain.insert("A|B", vec![10.0, 20.0, 30.0]);
/// let mut with_prior: HashMap<&str, Vec<f64>> = HashMap::new();
/// with_prior.insert("A|B", vec![14.0, 15.0, 16.0]);
/// with_prior.insert("A|C", vec![1.0, 2.0]); // no counterpart, ignored
///
/// assert_eq!(lower_dispersion_share(&plain, &with_prior), Some(100.0));
/// ```
pub fn lower_dispersion_share<K: Eq + Hash>(
    a: &HashMap<K, Vec<f64>>,
    b: &HashMap<K, Vec<f64>>,
) -> Option<f64> {
    let mut comparable = 0usize;
    let mut lower = 0usize;

    for (key, values_a) in a {
        let Some(values_b) = b.get(key) else {
            continue;
        };
        let (Some(sd_a), Some(sd_b)) = (std_dev(values_a), std_dev(values_b)) else {
            continue;
        };

        comparable += 1;
        if sd_b < sd_a {
            lower += 1;
        }
    }

    if comparable == 0 {
        None
    } else {
        Some(100.0 * lower as f64 / comparable as f64)
    }
}
