use num_rational::BigRational;
use snafu::prelude::*;

use crate::{Factored, MultivarPoly, NonFiniteValueSnafu, Symbol, SymbolicError};

/// The exact-arithmetic capabilities the converter is built on.
///
/// [`crate::SymbolicConverter`] performs no algebra of its own: it threads nodes, weights and
/// polynomials through these primitives, so its results are fully determined by the engine.
pub trait AlgebraEngine {
    /// Exact rational equal to the binary floating-point `value`.
    fn rational(&self, value: f64) -> Result<BigRational, SymbolicError>;

    /// A symbol with the given name.
    fn symbol(&self, name: &str) -> Symbol;

    /// Rewrite an expression as a canonical, expanded polynomial.
    fn simplify(&self, expr: &Factored) -> MultivarPoly;

    /// Factor a polynomial over the rationals.
    fn factor(&self, poly: &MultivarPoly) -> Factored;

    /// Eliminate `var` from `p` and `q`.
    fn resultant(
        &self,
        p: &MultivarPoly,
        q: &MultivarPoly,
        var: &Symbol,
    ) -> Result<MultivarPoly, SymbolicError>;
}

/// Default limit on the constant and leading coefficients for which the factorer enumerates
/// rational roots. Trial division up to the square root of 2^40 stays cheap.
pub const DEFAULT_ROOT_SEARCH_LIMIT: u64 = 1 << 40;

/// Built-in engine over [`MultivarPoly`] with arbitrary-precision rational coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExactEngine {
    root_search_limit: u64,
}

impl ExactEngine {
    pub fn new() -> Self {
        Self {
            root_search_limit: DEFAULT_ROOT_SEARCH_LIMIT,
        }
    }

    /// Bound the magnitude of the integer coefficients whose divisors the factorer tries as
    /// rational roots. Zero disables the search.
    pub fn with_root_search_limit(mut self, limit: u64) -> Self {
        self.root_search_limit = limit;
        self
    }

    pub fn root_search_limit(&self) -> u64 {
        self.root_search_limit
    }
}

impl Default for ExactEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AlgebraEngine for ExactEngine {
    fn rational(&self, value: f64) -> Result<BigRational, SymbolicError> {
        BigRational::from_float(value).context(NonFiniteValueSnafu { value })
    }

    fn symbol(&self, name: &str) -> Symbol {
        Symbol::new(name)
    }

    fn simplify(&self, expr: &Factored) -> MultivarPoly {
        expr.expand()
    }

    fn factor(&self, poly: &MultivarPoly) -> Factored {
        crate::factor::factor(poly, self.root_search_limit)
    }

    fn resultant(
        &self,
        p: &MultivarPoly,
        q: &MultivarPoly,
        var: &Symbol,
    ) -> Result<MultivarPoly, SymbolicError> {
        crate::resultant(p, q, var)
    }
}
