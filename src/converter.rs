use smallvec::SmallVec;
use snafu::prelude::*;

use crate::{
    AlgebraEngine, ComponentCountSnafu, EngineUnavailableSnafu, ExactEngine, ExactMatrix,
    Factored, InvalidShapeSnafu, MultivarPoly, NodeArray, Symbol, SymbolicError, WeightVector,
};

/// The polynomial form `B(s)` of a curve or `B(s, t)` of a surface: one factored polynomial
/// per coordinate of the nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParametricPolynomial {
    components: SmallVec<[Factored; 3]>,
}

impl ParametricPolynomial {
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn components(&self) -> &[Factored] {
        &self.components
    }

    pub fn get(&self, index: usize) -> Option<&Factored> {
        self.components.get(index)
    }

    pub fn expanded(&self) -> Vec<MultivarPoly> {
        self.components.iter().map(Factored::expand).collect()
    }

    /// Exactly `N` components, or the arity failure of implicitizing the wrong dimension.
    fn unpack<const N: usize>(&self) -> Result<[&Factored; N], SymbolicError> {
        let actual = self.components.len();
        ensure!(actual == N, ComponentCountSnafu { expected: N, actual });
        Ok(std::array::from_fn(|i| &self.components[i]))
    }
}

/// Converts Bezier control points into exact polynomial and implicit forms.
///
/// The converter holds no state besides its engine. Without an engine every operation fails
/// with [`SymbolicError::EngineUnavailable`] before looking at its arguments.
#[derive(Debug, Clone)]
pub struct SymbolicConverter<E = ExactEngine> {
    engine: Option<E>,
}

impl SymbolicConverter<ExactEngine> {
    /// A converter backed by the built-in [`ExactEngine`].
    pub fn new() -> Self {
        Self::with_engine(ExactEngine::default())
    }
}

impl Default for SymbolicConverter<ExactEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: AlgebraEngine> SymbolicConverter<E> {
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine: Some(engine),
        }
    }

    /// A converter with no engine, on which every operation fails.
    pub fn unavailable() -> Self {
        Self { engine: None }
    }

    pub fn from_optional(engine: Option<E>) -> Self {
        Self { engine }
    }

    pub fn is_available(&self) -> bool {
        self.engine.is_some()
    }

    fn engine(&self) -> Result<&E, SymbolicError> {
        self.engine.as_ref().context(EngineUnavailableSnafu)
    }

    /// Convert a 2D node array to a matrix of exact rationals.
    ///
    /// Each value becomes the rational equal to its binary floating-point value (so `0.1`
    /// becomes `3602879701896397 / 2^55`, not `1/10`).
    pub fn to_exact(&self, nodes: &NodeArray) -> Result<ExactMatrix, SymbolicError> {
        let engine = self.engine()?;
        ensure!(nodes.ndim() == 2, InvalidShapeSnafu { ndim: nodes.ndim() });

        let values = nodes
            .values()
            .iter()
            .map(|&v| engine.rational(v))
            .collect::<Result<Vec<_>, _>>()?;
        let shape = nodes.shape();
        Ok(ExactMatrix::new(values, shape[0], shape[1]))
    }

    /// De Casteljau (Bernstein) weights of a curve, as a `degree + 1` column.
    ///
    /// Not cached; building them is cheap next to the algebra that consumes them.
    pub fn curve_weights(&self, degree: u32, s: &Symbol) -> Result<WeightVector, SymbolicError> {
        self.engine()?;
        Ok(crate::weights::curve_weights(degree, s))
    }

    /// Weights of a triangular patch, as a `(degree + 1)(degree + 2) / 2` column in
    /// triangular numbering (see [`crate::triangle_indices`]).
    pub fn surface_weights(
        &self,
        degree: u32,
        s: &Symbol,
        t: &Symbol,
    ) -> Result<WeightVector, SymbolicError> {
        self.engine()?;
        Ok(crate::weights::surface_weights(degree, s, t))
    }

    /// Convert curve nodes into the polynomial `B(s)`.
    ///
    /// `degree` is assumed to match the number of nodes. If it does not, the node matrix and
    /// weights cannot be multiplied and the call fails with [`SymbolicError::ShapeMismatch`].
    ///
    /// Returns the fresh symbol `s` together with `B(s)`.
    pub fn curve_as_polynomial(
        &self,
        nodes: &NodeArray,
        degree: u32,
    ) -> Result<(Symbol, ParametricPolynomial), SymbolicError> {
        let engine = self.engine()?;
        let nodes_exact = self.to_exact(nodes)?;

        let s = engine.symbol("s");
        let weights = self.curve_weights(degree, &s)?;
        let polynomial = self.assemble(&nodes_exact, &weights)?;
        Ok((s, polynomial))
    }

    /// Convert triangular patch nodes into the polynomial `B(s, t)`.
    ///
    /// Node columns must follow the triangular numbering of [`crate::triangle_indices`].
    /// Returns the fresh symbols `s` and `t` together with `B(s, t)`.
    pub fn surface_as_polynomial(
        &self,
        nodes: &NodeArray,
        degree: u32,
    ) -> Result<(Symbol, Symbol, ParametricPolynomial), SymbolicError> {
        let engine = self.engine()?;
        let nodes_exact = self.to_exact(nodes)?;

        let s = engine.symbol("s");
        let t = engine.symbol("t");
        let weights = self.surface_weights(degree, &s, &t)?;
        let polynomial = self.assemble(&nodes_exact, &weights)?;
        Ok((s, t, polynomial))
    }

    /// Multiply nodes by weights, then factor every coordinate independently.
    fn assemble(
        &self,
        nodes: &ExactMatrix,
        weights: &WeightVector,
    ) -> Result<ParametricPolynomial, SymbolicError> {
        let engine = self.engine()?;
        let column = weights
            .entries()
            .iter()
            .map(|w| engine.simplify(w))
            .collect::<Vec<_>>();
        let product = nodes.mul_column(&column)?;
        log::debug!(
            "assembled {}x{} nodes into polynomials with {:?} terms",
            nodes.rows(),
            nodes.cols(),
            product.iter().map(MultivarPoly::num_terms).collect::<Vec<_>>()
        );

        let components = product.iter().map(|p| engine.factor(p)).collect();
        Ok(ParametricPolynomial { components })
    }

    /// Implicitize the plane curve `(x(s), y(s))`.
    ///
    /// Returns `f(x, y)`, with fresh symbols `x` and `y`, such that `f(x(s), y(s)) = 0`. It is
    /// the resultant of `x(s) - x` and `y(s) - y` with respect to `s`, factored.
    pub fn implicitize_2d(
        &self,
        x_fn: &Factored,
        y_fn: &Factored,
        s: &Symbol,
    ) -> Result<Factored, SymbolicError> {
        let engine = self.engine()?;
        let x = MultivarPoly::symbol(&engine.symbol("x"));
        let y = MultivarPoly::symbol(&engine.symbol("y"));

        let p = engine.simplify(x_fn) - x;
        let q = engine.simplify(y_fn) - y;
        let res = engine.resultant(&p, &q, s)?;
        Ok(engine.factor(&res))
    }

    /// Implicitize a plane curve given its nodes.
    ///
    /// The nodes are assumed (not checked) to describe a 2D curve; nodes of any other
    /// dimension fail with [`SymbolicError::ComponentCount`] when the curve polynomial is
    /// split into `x(s)` and `y(s)`.
    ///
    /// ```rust
    /// use symbez::{NodeArray, SymbolicConverter};
    ///
    /// let converter = SymbolicConverter::new();
    /// // The parabola x = 2s, y = 4s(1 - s)
    /// let nodes = NodeArray::from([[0.0, 1.0, 2.0], [0.0, 2.0, 0.0]]);
    /// let implicit = converter.implicitize_curve(&nodes, 2).unwrap();
    /// assert_eq!(implicit.to_string(), "-4*(x² - 2*x + y)");
    /// ```
    pub fn implicitize_curve(&self, nodes: &NodeArray, degree: u32) -> Result<Factored, SymbolicError> {
        let (s, polynomial) = self.curve_as_polynomial(nodes, degree)?;
        let [x_fn, y_fn] = polynomial.unpack::<2>()?;
        self.implicitize_2d(x_fn, y_fn, &s)
    }

    /// Implicitize the surface `(x(s, t), y(s, t), z(s, t))`.
    ///
    /// Eliminates `s` twice, `f_xy = res(x(s, t) - x, y(s, t) - y; s)` and
    /// `f_yz = res(y(s, t) - x, z(s, t) - z; s)`, then `t` via `res(f_xy, f_yz; t)`, and
    /// factors the result. Note that `f_yz` subtracts the ambient `x` (not `y`) from
    /// `y(s, t)`; this elimination order is kept as is, since it determines the returned
    /// polynomial.
    pub fn implicitize_3d(
        &self,
        x_fn: &Factored,
        y_fn: &Factored,
        z_fn: &Factored,
        s: &Symbol,
        t: &Symbol,
    ) -> Result<Factored, SymbolicError> {
        let engine = self.engine()?;
        let x = MultivarPoly::symbol(&engine.symbol("x"));
        let y = MultivarPoly::symbol(&engine.symbol("y"));
        let z = MultivarPoly::symbol(&engine.symbol("z"));

        let x_fn = engine.simplify(x_fn);
        let y_fn = engine.simplify(y_fn);
        let z_fn = engine.simplify(z_fn);

        let f_xy = engine.resultant(&(x_fn - x.clone()), &(y_fn.clone() - y), s)?;
        let f_yz = engine.resultant(&(y_fn - x), &(z_fn - z), s)?;
        let res = engine.resultant(&f_xy, &f_yz, t)?;
        Ok(engine.factor(&res))
    }

    /// Implicitize a surface given its nodes.
    ///
    /// The nodes are assumed (not checked) to describe a patch in 3D; nodes of any other
    /// dimension fail with [`SymbolicError::ComponentCount`].
    pub fn implicitize_surface(
        &self,
        nodes: &NodeArray,
        degree: u32,
    ) -> Result<Factored, SymbolicError> {
        let (s, t, polynomial) = self.surface_as_polynomial(nodes, degree)?;
        let [x_fn, y_fn, z_fn] = polynomial.unpack::<3>()?;
        self.implicitize_3d(x_fn, y_fn, z_fn, &s, &t)
    }
}
