use num_rational::BigRational;
use num_traits::ToPrimitive;
use snafu::prelude::*;

use crate::{MultivarPoly, NodeArray, ShapeMismatchSnafu, SymbolicError};

/// A dense matrix of exact rational numbers, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExactMatrix {
    values: Vec<BigRational>,
    rows: usize,
    cols: usize,
}

impl ExactMatrix {
    /// # Panics
    /// Panics if `values.len() != rows * cols`.
    pub fn new(values: Vec<BigRational>, rows: usize, cols: usize) -> Self {
        assert!(
            values.len() == rows * cols,
            "Matrix shape mismatch with number of values"
        );
        Self { values, rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&BigRational> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.values.get(row * self.cols + col)
    }

    pub fn row(&self, row: usize) -> &[BigRational] {
        &self.values[row * self.cols..(row + 1) * self.cols]
    }

    /// Round every entry to the nearest `f64`.
    ///
    /// For a matrix built from floats this reproduces the original values exactly.
    pub fn to_f64(&self) -> NodeArray {
        let values = self
            .values
            .iter()
            .map(|v| v.to_f64().unwrap_or(f64::NAN))
            .collect();
        NodeArray::from_parts(values, &[self.rows, self.cols])
    }

    /// Multiply by a column vector of polynomials, giving one polynomial per row.
    pub fn mul_column(&self, column: &[MultivarPoly]) -> Result<Vec<MultivarPoly>, SymbolicError> {
        ensure!(
            column.len() == self.cols,
            ShapeMismatchSnafu {
                rows: self.rows,
                cols: self.cols,
                weights: column.len(),
            }
        );

        let mut output = Vec::with_capacity(self.rows);
        for r in 0..self.rows {
            let mut sum = MultivarPoly::new();
            for (value, poly) in self.row(r).iter().zip(column) {
                sum = sum + poly.scale(value);
            }
            output.push(sum);
        }
        Ok(output)
    }
}
