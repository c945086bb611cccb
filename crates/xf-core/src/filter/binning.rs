//! Fixed-count binning for continuous numeric dimensions

/// Number of buckets for the text-length histogram
pub const LENGTH_BIN_COUNT: u32 = 10;

/// Maps a continuous value domain onto a fixed number of bins
///
/// `min` and `range` come from the *unfiltered* extremes of the field, so
/// bin boundaries stay put while filters change. The maximum value of the
/// domain lands on bin index `bin_count` itself, one past the last full
/// bin; consumers receive the scaled key alongside the index so axis
/// positions are real values, not bucket numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinScale {
    min: f64,
    range: f64,
    bin_count: u32,
}

impl BinScale {
    pub fn new(min: f64, max: f64, bin_count: u32) -> Self {
        Self {
            min,
            range: max - min,
            bin_count,
        }
    }

    /// Scale over the min/max of `values`; `None` when there are no values
    pub fn from_values(values: impl IntoIterator<Item = f64>, bin_count: u32) -> Option<Self> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut seen = false;
        for v in values {
            seen = true;
            min = min.min(v);
            max = max.max(v);
        }
        seen.then(|| Self::new(min, max, bin_count))
    }

    /// Bin index for a value: `floor((value - min) / range * bin_count)`
    pub fn bin(&self, value: f64) -> u32 {
        if self.range <= 0.0 {
            return 0;
        }
        let raw = ((value - self.min) / self.range * self.bin_count as f64).floor();
        raw.max(0.0) as u32
    }

    /// Real-valued position of a bin's lower edge
    pub fn scaled_key(&self, bin: u32) -> f64 {
        self.min + bin as f64 / self.bin_count as f64 * self.range
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn range(&self) -> f64 {
        self.range
    }

    pub fn bin_count(&self) -> u32 {
        self.bin_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binning_from_unfiltered_extremes() {
        let scale = BinScale::from_values([1.0, 5.0, 10.0], 10).unwrap();
        assert_eq!(scale.min(), 1.0);
        assert_eq!(scale.range(), 9.0);

        assert_eq!(scale.bin(5.0), 4);
        assert!((scale.scaled_key(4) - 4.6).abs() < 1e-12);
    }

    #[test]
    fn test_domain_edges() {
        let scale = BinScale::from_values([1.0, 5.0, 10.0], 10).unwrap();
        assert_eq!(scale.bin(1.0), 0);
        // The maximum lands one past the last full bin.
        assert_eq!(scale.bin(10.0), 10);
        assert_eq!(scale.scaled_key(10), 10.0);
    }

    #[test]
    fn test_zero_width_domain() {
        let scale = BinScale::from_values([3.0, 3.0, 3.0], 10).unwrap();
        assert_eq!(scale.bin(3.0), 0);
    }

    #[test]
    fn test_empty_domain() {
        assert!(BinScale::from_values([], 10).is_none());
    }
}
