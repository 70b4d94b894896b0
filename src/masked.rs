//! Two dimensional fields with an explicit per-cell validity mask.
//!
//! Measurement fields in Cloudnet processing regularly contain cells with no
//! usable data. Rather than overloading a sentinel value (NaN, 0, a fill value)
//! to mean "missing", [`MaskedArray2`] carries a boolean mask next to the data,
//! where `true` marks an invalid cell. Valid zeros stay distinguishable from
//! missing data as long as a field stays in this form.
use ndarray::{Array2, ArrayView1, ArrayView2, Zip};
use num_traits::Float;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MaskError {
    #[error("Mask shape {mask:?} does not match data shape {data:?}")]
    ShapeMismatch {
        data: (usize, usize),
        mask: (usize, usize),
    },
}

/// A 2D array plus a mask of the same shape; `true` in the mask means the
/// corresponding data value is invalid and must not be used.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedArray2<T> {
    data: Array2<T>,
    mask: Array2<bool>,
}

impl<T: Clone> MaskedArray2<T> {
    pub fn new(data: Array2<T>, mask: Array2<bool>) -> Result<Self, MaskError> {
        if data.dim() != mask.dim() {
            return Err(MaskError::ShapeMismatch {
                data: data.dim(),
                mask: mask.dim(),
            });
        }
        Ok(Self { data, mask })
    }

    /// Wrap `data` with every cell valid.
    pub fn unmasked(data: Array2<T>) -> Self {
        let mask = Array2::from_elem(data.dim(), false);
        Self { data, mask }
    }

    /// Build from per-cell options, `None` becoming a masked `fill` value.
    pub fn from_options(values: ArrayView2<Option<T>>, fill: T) -> Self {
        let data = values.map(|v| v.clone().unwrap_or_else(|| fill.clone()));
        let mask = values.map(|v| v.is_none());
        Self { data, mask }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    pub fn nrows(&self) -> usize {
        self.data.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.data.ncols()
    }

    pub fn data(&self) -> ArrayView2<T> {
        self.data.view()
    }

    pub fn mask(&self) -> ArrayView2<bool> {
        self.mask.view()
    }

    /// Get the value at `(row, col)`, `None` if it is masked. Panics if the
    /// index is out of bounds, like indexing an [`Array2`].
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if self.mask[[row, col]] {
            None
        } else {
            Some(self.data[[row, col]].clone())
        }
    }

    pub fn is_masked(&self, row: usize, col: usize) -> bool {
        self.mask[[row, col]]
    }

    pub fn count_valid(&self) -> usize {
        self.mask.iter().filter(|&&m| !m).count()
    }

    /// Iterate over one column as options, masked cells giving `None`.
    pub fn column(&self, col: usize) -> impl Iterator<Item = Option<T>> + '_ {
        let data: ArrayView1<T> = self.data.column(col);
        let mask: ArrayView1<bool> = self.mask.column(col);
        data.into_iter()
            .zip(mask)
            .map(|(v, &m)| if m { None } else { Some(v.clone()) })
    }

    /// Copy of the data with every masked cell replaced by `fill`.
    pub fn filled(&self, fill: T) -> Array2<T> {
        let mut out = self.data.clone();
        Zip::from(&mut out).and(&self.mask).for_each(|v, &m| {
            if m {
                *v = fill.clone();
            }
        });
        out
    }
}

impl<T: Float> MaskedArray2<T> {
    /// Wrap `data`, masking every NaN or infinite cell.
    pub fn masked_invalid(data: Array2<T>) -> Self {
        let mask = data.map(|v| !v.is_finite());
        Self { data, mask }
    }

    /// Additionally mask every cell exactly equal to `value`.
    pub fn mask_equal(mut self, value: T) -> Self {
        Zip::from(&mut self.mask).and(&self.data).for_each(|m, &v| {
            if v == value {
                *m = true;
            }
        });
        self
    }
}
