//! Rebinning of 2D fields along their first (row) axis.
//!
//! The typical use is putting a radar or lidar field, sampled at the
//! instrument's native times, onto the common time grid from
//! [`crate::time_axis`]: rows are the original coordinate, columns are
//! independent series (e.g. range gates), and each output cell is the mean of
//! all valid input samples that fall into that output bin.
use itertools::Itertools;
use ndarray::{Array2, ArrayView1, ArrayView2};
use rayon::prelude::*;

use crate::{
    binning::{derive_edges, BinningError},
    masked::MaskedArray2,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RebinError {
    #[error("Input coordinate has {x_len} points but the data has {n_rows} rows")]
    LengthMismatch { x_len: usize, n_rows: usize },
    #[error("Could not derive bin edges from the new coordinate: {0}")]
    Binning(#[from] BinningError),
}

/// What to do with output bins whose mean is exactly zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZeroMeans {
    Mask,
    Keep,
}

/// Rebin `data` along its rows onto the bin centers `x_new` using the mean.
///
/// `x_in` gives the coordinate of each row of `data`. Bin edges come from
/// [`derive_edges`], so they are rounded to whole units of the coordinate.
/// Each bin covers `[edges[i], edges[i+1])` except the last, which also
/// includes its right edge; samples outside the edges are ignored, as are
/// masked or non-finite values and rows with a non-finite coordinate. Every
/// column is binned independently.
///
/// The output has shape `(x_new.len(), data.ncols())`. Cells are masked where
/// the bin received no valid samples **or where the mean is exactly 0**. This
/// mirrors the long-standing behavior of the Cloudnet processing, in which 0 is
/// the "no data" marker; a bin whose true mean is 0 therefore reads as missing.
/// Use [`rebin_mean_keep_zeros`] if zero means must stay valid.
///
/// # Errors
/// - [`RebinError::LengthMismatch`] if `x_in.len() != data.nrows()`,
/// - [`RebinError::Binning`] if `x_new` has fewer than 2 points or one of its
///   two outermost points at either end is not finite.
pub fn rebin_mean(
    x_in: ArrayView1<f64>,
    data: &MaskedArray2<f64>,
    x_new: ArrayView1<f64>,
) -> Result<MaskedArray2<f64>, RebinError> {
    rebin_mean_inner(x_in, data, x_new, ZeroMeans::Mask)
}

/// Same as [`rebin_mean`], but only bins without any valid samples are masked.
/// A bin whose samples average to exactly 0 keeps the value 0.
pub fn rebin_mean_keep_zeros(
    x_in: ArrayView1<f64>,
    data: &MaskedArray2<f64>,
    x_new: ArrayView1<f64>,
) -> Result<MaskedArray2<f64>, RebinError> {
    rebin_mean_inner(x_in, data, x_new, ZeroMeans::Keep)
}

/// Convenience wrapper around [`rebin_mean`] for plain arrays that use NaN
/// (or infinity) to mark invalid cells.
pub fn rebin_mean_nan(
    x_in: ArrayView1<f64>,
    data: ArrayView2<f64>,
    x_new: ArrayView1<f64>,
) -> Result<MaskedArray2<f64>, RebinError> {
    let data = MaskedArray2::masked_invalid(data.to_owned());
    rebin_mean(x_in, &data, x_new)
}

fn rebin_mean_inner(
    x_in: ArrayView1<f64>,
    data: &MaskedArray2<f64>,
    x_new: ArrayView1<f64>,
    zeros: ZeroMeans,
) -> Result<MaskedArray2<f64>, RebinError> {
    if x_in.len() != data.nrows() {
        return Err(RebinError::LengthMismatch {
            x_len: x_in.len(),
            n_rows: data.nrows(),
        });
    }

    let edges = derive_edges(x_new)?.to_vec();
    let nbins = x_new.len();
    let ncols = data.ncols();

    let columns: Vec<ColumnMeans> = (0..ncols)
        .into_par_iter()
        .map(|icol| {
            let samples = x_in
                .iter()
                .copied()
                .zip(data.column(icol))
                .filter_map(|(x, v)| {
                    let v = v?;
                    (x.is_finite() && v.is_finite()).then_some((x, v))
                });
            ColumnMeans::compute(samples, &edges)
        })
        .collect();

    let n_dropped: usize = columns.iter().map(|c| c.n_dropped).sum();
    let n_empty = columns
        .iter()
        .flat_map(|c| c.means.iter())
        .filter(|m| m.is_none())
        .count();
    log::debug!(
        "Rebinned {} x {ncols} field onto {nbins} bins spanning {:?} to {:?}: {n_dropped} valid samples outside the bins, {n_empty} empty output cells",
        data.nrows(),
        edges.first(),
        edges.last(),
    );

    let means = Array2::from_shape_fn((nbins, ncols), |(ibin, icol)| {
        columns[icol].means[ibin].filter(|m| m.is_finite())
    });
    let rebinned = MaskedArray2::from_options(means.view(), 0.0);
    match zeros {
        ZeroMeans::Mask => Ok(rebinned.mask_equal(0.0)),
        ZeroMeans::Keep => Ok(rebinned),
    }
}

/// Per-bin means of a single column; `None` for bins with no samples.
struct ColumnMeans {
    means: Vec<Option<f64>>,
    n_dropped: usize,
}

impl ColumnMeans {
    fn compute<I: Iterator<Item = (f64, f64)>>(samples: I, edges: &[f64]) -> Self {
        let nbins = edges.len().saturating_sub(1);
        let mut sums = vec![0.0; nbins];
        let mut counts = vec![0usize; nbins];
        let mut n_dropped = 0;

        for (x, v) in samples {
            if let Some(ibin) = find_bin(x, edges) {
                sums[ibin] += v;
                counts[ibin] += 1;
            } else {
                n_dropped += 1;
            }
        }

        let means = sums
            .into_iter()
            .zip_eq(counts)
            .map(|(s, n)| (n > 0).then(|| s / n as f64))
            .collect_vec();
        Self { means, n_dropped }
    }
}

/// Index of the bin containing `x`, given ascending `edges`. Bins are closed
/// on the left and open on the right, except the last which is closed on
/// both sides.
fn find_bin(x: f64, edges: &[f64]) -> Option<usize> {
    let (&first, &last) = (edges.first()?, edges.last()?);
    let nbins = edges.len().checked_sub(1).filter(|&n| n > 0)?;
    if x < first || x > last {
        return None;
    }
    if x == last {
        return Some(nbins - 1);
    }
    let ibin = edges.partition_point(|&e| e <= x).checked_sub(1)?;
    Some(ibin.min(nbins - 1))
}
