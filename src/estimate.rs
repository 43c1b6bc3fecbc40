//! Frame height heuristics.
//!
//! Heights are estimated in constant time from character counts rather than
//! measured by shaping text, which keeps pagination deterministic. The
//! numbers are calibrated for 12pt body text.

/// Point size the text heuristic is calibrated for.
pub const BASE_POINT_SIZE: f64 = 12.0;

/// Estimated height of a table frame.
///
/// This is an approximation: tables are not measured per row or per cell
/// yet, every table gets the same frame height.
pub const DEFAULT_TABLE_HEIGHT: f64 = 300.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeightEstimator {
    inner_width: f64,
    table_height: f64,
}

impl HeightEstimator {
    pub fn new(inner_width: f64) -> Self {
        Self {
            inner_width,
            table_height: DEFAULT_TABLE_HEIGHT,
        }
    }

    pub fn with_table_height(mut self, table_height: f64) -> Self {
        self.table_height = table_height;
        self
    }

    pub fn inner_width(&self) -> f64 {
        self.inner_width
    }

    /// `(length / inner_width) * 60 + 10`, scaled by point size and leading
    /// relative to 12pt.
    pub fn text_height(&self, length: usize, point_size: f64, leading: f64) -> f64 {
        let mut height = length as f64 / self.inner_width * 60.0 + 10.0;
        height *= point_size / BASE_POINT_SIZE;
        height *= leading / BASE_POINT_SIZE;
        height
    }

    /// Placeholder table height, see [`DEFAULT_TABLE_HEIGHT`].
    pub fn table_height(&self) -> f64 {
        self.table_height
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const INNER_WIDTH: f64 = 495.2755905488;

    #[test]
    fn test_body_text_formula() {
        let estimator = HeightEstimator::new(INNER_WIDTH);
        let expected = 100.0 / INNER_WIDTH * 60.0 + 10.0;
        assert!((estimator.text_height(100, 12.0, 12.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_heading_scaling() {
        let estimator = HeightEstimator::new(INNER_WIDTH);
        let body = estimator.text_height(100, 12.0, 12.0);
        let h1 = estimator.text_height(100, 30.0, 30.0);
        assert!((h1 - body * 6.25).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_has_base_height() {
        let estimator = HeightEstimator::new(INNER_WIDTH);
        assert_eq!(estimator.text_height(0, 12.0, 12.0), 10.0);
    }

    #[test]
    fn test_table_height_is_constant_approximation() {
        let estimator = HeightEstimator::new(INNER_WIDTH);
        assert_eq!(estimator.table_height(), 300.0);
        assert_eq!(estimator.with_table_height(120.0).table_height(), 120.0);
    }

    proptest! {
        #[test]
        fn prop_doubling_length_never_shrinks(
            length in 0usize..100_000,
            point_size in 1.0f64..96.0,
            leading in 1.0f64..96.0,
        ) {
            let estimator = HeightEstimator::new(INNER_WIDTH);
            let single = estimator.text_height(length, point_size, leading);
            let double = estimator.text_height(length * 2, point_size, leading);
            prop_assert!(double >= single);
        }
    }
}
