use smallvec::SmallVec;
use snafu::prelude::*;

use crate::{SizeMismatchSnafu, SymbolicError};

/// An n-dimensional array of floating-point values, stored row-major.
///
/// Control points of a curve or a triangular patch are laid out as a 2D array of shape
/// `(dimension, num_points)`: row `d` holds coordinate `d` of every control point.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeArray {
    // The flattened values. The last dimension has stride 1.
    values: Vec<f64>,

    // The number of values along each dimension.
    shape: SmallVec<[usize; 2]>,

    // The stride lengths for each dimension in the flattened values.
    strides: SmallVec<[usize; 2]>,
}

impl NodeArray {
    /// Create a new array with the given values and shape.
    ///
    /// # Arguments
    /// - `values`: Flattened values, organized such that each dimension has decreasing
    ///    stride length, ending with 1. For shape [2, 3] the indexes are
    ///    `[[0, 0], [0, 1], [0, 2], [1, 0], [1, 1], [1, 2]]`.
    /// - `shape`: Number of values along each dimension.
    pub fn new(values: impl Into<Vec<f64>>, shape: &[usize]) -> Result<Self, SymbolicError> {
        let values = values.into();
        let expected = shape.iter().product::<usize>();
        ensure!(
            values.len() == expected,
            SizeMismatchSnafu {
                shape: shape.to_vec(),
                expected,
                actual: values.len(),
            }
        );
        Ok(Self::from_parts(values, shape))
    }

    /// Build a 2D array from its rows.
    pub fn from_rows<const N: usize>(rows: &[[f64; N]]) -> Self {
        let values = rows.iter().flatten().copied().collect::<Vec<_>>();
        Self::from_parts(values, &[rows.len(), N])
    }

    pub(crate) fn from_parts(values: Vec<f64>, shape: &[usize]) -> Self {
        Self {
            values,
            strides: Self::calc_strides(shape),
            shape: SmallVec::from_slice(shape),
        }
    }

    /// Number of dimensions (the rank) of the array.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// All values in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: &[usize]) -> Option<f64> {
        if index.len() != self.ndim() || index.iter().zip(&self.shape).any(|(i, n)| i >= n) {
            return None;
        }
        self.values.get(self.flat_index(index)).copied()
    }

    fn flat_index(&self, index: &[usize]) -> usize {
        index.iter().zip(&self.strides).map(|(i, s)| i * s).sum()
    }

    fn calc_strides(shape: &[usize]) -> SmallVec<[usize; 2]> {
        let mut strides = SmallVec::from_elem(1, shape.len());
        for d in (0..shape.len().saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * shape[d + 1];
        }
        strides
    }
}

impl<const D: usize, const N: usize> From<[[f64; N]; D]> for NodeArray {
    fn from(rows: [[f64; N]; D]) -> Self {
        Self::from_rows(&rows)
    }
}
