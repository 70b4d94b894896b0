//! Conversion of bin centers into bin edges.
use ndarray::{Array1, ArrayView1};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BinningError {
    #[error("Need at least 2 bin centers to derive edges, got {0}")]
    TooFewCenters(usize),
    #[error("Bin center {value} at index {index} is not finite")]
    NonFiniteCenter { index: usize, value: f64 },
}

/// How the two outer edges are rounded before the edges are spread out.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRounding {
    /// Round to the nearest integer, with exact .5 ties going to the even
    /// neighbor (so 0.5 -> 0, 1.5 -> 2, 2.5 -> 2).
    #[default]
    NearestEven,
    /// Keep the outer edges exactly half a bin outside the outer centers.
    Exact,
}

impl EdgeRounding {
    fn apply(&self, value: f64) -> f64 {
        match self {
            Self::NearestEven => value.round_ties_even(),
            Self::Exact => value,
        }
    }
}

/// Convert N bin center points into N+1 evenly spaced bin edges.
///
/// The outer edges are placed half a bin outside the first and last centers,
/// using the spacing of the two centers at each end, and rounded to the
/// nearest integer (ties to even). The N+1 edges are then spread evenly
/// between those two. Two things callers should be aware of:
///
/// - only the end gaps are used, so any irregular spacing in the interior of
///   `centers` is smoothed away;
/// - the rounding is lossy. It suits coordinates on a coarse grid (meters,
///   seconds) but will visibly shift edges for centers with fractional
///   spacing. Use [`derive_edges_with`] and [`EdgeRounding::Exact`] to avoid it.
///
/// # Example
/// ```
/// # use cloudnet_rs::binning::derive_edges;
/// let edges = derive_edges([10.0, 20.0, 30.0].as_slice().into()).unwrap();
/// assert_eq!(edges.to_vec(), vec![5.0, 15.0, 25.0, 35.0]);
/// ```
pub fn derive_edges(centers: ArrayView1<f64>) -> Result<Array1<f64>, BinningError> {
    derive_edges_with(centers, EdgeRounding::default())
}

/// Like [`derive_edges`], but with a choice of how to round the outer edges.
///
/// Returns [`BinningError::NonFiniteCenter`] if one of the two centers at
/// either end is NaN or infinite, since the edges would be meaningless.
///
/// ```
/// # use cloudnet_rs::binning::{derive_edges_with, EdgeRounding};
/// let edges = derive_edges_with([1.0, 2.0, 3.0].as_slice().into(), EdgeRounding::Exact).unwrap();
/// assert_eq!(edges.to_vec(), vec![0.5, 1.5, 2.5, 3.5]);
/// ```
pub fn derive_edges_with(
    centers: ArrayView1<f64>,
    rounding: EdgeRounding,
) -> Result<Array1<f64>, BinningError> {
    let n = centers.len();
    if n < 2 {
        return Err(BinningError::TooFewCenters(n));
    }

    // Only the two centers at each end feed into the edges
    for index in [0, 1, n - 2, n - 1] {
        let value = centers[index];
        if !value.is_finite() {
            return Err(BinningError::NonFiniteCenter { index, value });
        }
    }

    let first = rounding.apply(centers[0] - (centers[1] - centers[0]) / 2.0);
    let last = rounding.apply(centers[n - 1] + (centers[n - 1] - centers[n - 2]) / 2.0);
    Ok(Array1::linspace(first, last, n + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use itertools::Itertools;
    use ndarray::array;

    fn assert_all_close(actual: &Array1<f64>, expected: &[f64]) {
        for (a, e) in actual.iter().zip_eq(expected) {
            assert_abs_diff_eq!(a, e, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_even_grid() {
        let edges = derive_edges(array![10.0, 20.0, 30.0].view()).unwrap();
        assert_eq!(edges, array![5.0, 15.0, 25.0, 35.0]);
    }

    #[test]
    fn test_unit_spacing_exact() {
        let edges = derive_edges_with(array![1.0, 2.0, 3.0].view(), EdgeRounding::Exact).unwrap();
        assert_eq!(edges, array![0.5, 1.5, 2.5, 3.5]);
    }

    #[test]
    fn test_unit_spacing_rounded() {
        // 0.5 and 3.5 are both ties: 0.5 goes down to 0, 3.5 up to 4
        let edges = derive_edges(array![1.0, 2.0, 3.0].view()).unwrap();
        assert_all_close(&edges, &[0.0, 4.0 / 3.0, 8.0 / 3.0, 4.0]);
    }

    #[test]
    fn test_ties_go_to_even() {
        // First edge is 1.5 -> 2, last edge is 4.5 -> 4
        let edges = derive_edges(array![2.0, 3.0, 4.0].view()).unwrap();
        assert_all_close(&edges, &[2.0, 2.0 + 2.0 / 3.0, 2.0 + 4.0 / 3.0, 4.0]);
    }

    #[test]
    fn test_irregular_interior_is_smoothed() {
        let edges = derive_edges(array![0.0, 10.0, 15.0, 40.0, 50.0].view()).unwrap();
        assert_eq!(edges.len(), 6);
        assert_all_close(&edges, &[-5.0, 7.0, 19.0, 31.0, 43.0, 55.0]);
    }

    #[test]
    fn test_too_few_centers() {
        let err = derive_edges(array![1.0].view()).unwrap_err();
        assert_eq!(err, BinningError::TooFewCenters(1));
        let err = derive_edges(Array1::<f64>::zeros(0).view()).unwrap_err();
        assert_eq!(err, BinningError::TooFewCenters(0));
    }

    #[test]
    fn test_non_finite_end_centers() {
        let err = derive_edges(array![f64::NAN, 2.0].view()).unwrap_err();
        assert!(matches!(err, BinningError::NonFiniteCenter { index: 0, .. }));

        let err = derive_edges(array![1.0, 2.0, 3.0, f64::INFINITY].view()).unwrap_err();
        assert!(matches!(err, BinningError::NonFiniteCenter { index: 3, .. }));

        // Interior centers are never used, so they do not matter
        let edges = derive_edges(array![10.0, 20.0, f64::NAN, 40.0, 50.0].view()).unwrap();
        assert_eq!(edges, array![5.0, 15.0, 25.0, 35.0, 45.0, 55.0]);
    }
}
