//! Exact symbolic forms of Bezier curves and triangular Bezier patches.
//!
//! Control points given as floating-point [`NodeArray`]s are converted to exact rational
//! matrices, combined with Bernstein (curve) or barycentric (surface) basis weights into
//! polynomials of the curve/surface parameters, and optionally implicitized by eliminating
//! the parameters with resultants.
//!
//! ```rust
//! use symbez::{NodeArray, SymbolicConverter};
//!
//! let converter = SymbolicConverter::new();
//! let nodes = NodeArray::from([[0.0, 1.0], [0.0, 2.0]]);
//! let implicit = converter.implicitize_curve(&nodes, 1).unwrap();
//! assert_eq!(implicit.to_string(), "2*x - y");
//! ```

mod binomial;
mod converter;
mod engine;
mod factor;
mod matrix;
mod monomial;
mod multivar_poly;
mod nodes;
mod resultant;
mod symbol;
mod tri_index;
mod weights;

#[cfg(test)]
mod test_utils;

pub use binomial::*;
pub use converter::*;
pub use engine::*;
pub use factor::Factored;
pub use matrix::ExactMatrix;
pub use monomial::Monomial;
pub use multivar_poly::*;
pub use nodes::NodeArray;
pub use resultant::*;
pub use symbol::Symbol;
pub use tri_index::*;
pub use weights::WeightVector;

pub use num_rational::BigRational;

use snafu::prelude::*;

#[derive(Debug, Snafu)]
pub enum SymbolicError {
    #[snafu(display("This operation requires an exact-arithmetic engine, but none is available"))]
    EngineUnavailable,

    #[snafu(display("Nodes must be 2-dimensional, not {}", ndim))]
    InvalidShape { ndim: usize },

    #[snafu(display(
        "Node array of shape {:?} needs {} values, got {}",
        shape,
        expected,
        actual
    ))]
    SizeMismatch {
        shape: Vec<usize>,
        expected: usize,
        actual: usize,
    },

    #[snafu(display("Non-finite value {} has no exact rational form", value))]
    NonFiniteValue { value: f64 },

    #[snafu(display(
        "Cannot multiply a {}x{} node matrix by {} basis weights",
        rows,
        cols,
        weights
    ))]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        weights: usize,
    },

    #[snafu(display("Expected {} polynomial components, found {}", expected, actual))]
    ComponentCount { expected: usize, actual: usize },

    #[snafu(display("No value given for symbol {}", name))]
    UnboundSymbol { name: String },

    #[snafu(display("Algorithm error (bug in library): {}", message))]
    AlgorithmError { message: String },
}
