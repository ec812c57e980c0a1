use num_bigint::BigInt;
use num_rational::BigRational;

use crate::{
    Factored, MultivarPoly, Symbol, binomial_coefficient, binomial_product, triangle_indices,
};

/// Column vector of basis polynomials, one per control point.
///
/// Entries are kept factored (e.g. `3*s²*(-s + 1)`) until they are multiplied with the nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightVector {
    entries: Vec<Factored>,
}

impl WeightVector {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Factored] {
        &self.entries
    }

    /// Sum of all entries, expanded. This is identically one for a basis.
    pub fn sum(&self) -> MultivarPoly {
        self.entries
            .iter()
            .fold(MultivarPoly::new(), |acc, w| acc + w.expand())
    }
}

fn integer(value: num_bigint::BigUint) -> BigRational {
    BigRational::from_integer(BigInt::from(value))
}

/// Bernstein weights `C(n, k) * s^k * (1 - s)^(n - k)` for `k = 0..=n`.
pub(crate) fn curve_weights(degree: u32, s: &Symbol) -> WeightVector {
    let s_poly = MultivarPoly::symbol(s);
    let one_minus_s = MultivarPoly::one() - s_poly.clone();

    let entries = (0..=degree)
        .map(|k| {
            Factored::new(
                integer(binomial_coefficient(degree, k)),
                [(s_poly.clone(), k), (one_minus_s.clone(), degree - k)],
            )
        })
        .collect();
    WeightVector { entries }
}

/// Barycentric weights of a triangular patch, in triangular numbering (`k` outer, `j` inner).
///
/// With `λ₁ = 1 - s - t`, `λ₂ = s` and `λ₃ = t`, the entry for `[i, j, k]` is
/// `n! / (i! j! k!) * λ₁^i * λ₂^j * λ₃^k`. The trinomial coefficient is computed as
/// `C(n, k) * C(n - k, j)`.
pub(crate) fn surface_weights(degree: u32, s: &Symbol, t: &Symbol) -> WeightVector {
    let lambda2 = MultivarPoly::symbol(s);
    let lambda3 = MultivarPoly::symbol(t);
    let lambda1 = MultivarPoly::one() - lambda2.clone() - lambda3.clone();

    let entries = triangle_indices(degree)
        .map(|[i, j, k]| {
            let coeff = binomial_product([degree, degree - k], [k, j]);
            Factored::new(
                integer(coeff),
                [
                    (lambda1.clone(), i),
                    (lambda2.clone(), j),
                    (lambda3.clone(), k),
                ],
            )
        })
        .collect();
    WeightVector { entries }
}

#[cfg(test)]
mod tests {
    use pretty_assertions as pa;

    use super::*;
    use crate::{
        test_utils::{int, sym},
        triangle_len,
    };

    #[test]
    fn curve_weights_partition_of_unity() {
        let s = sym("s");
        for degree in 0..10 {
            let weights = curve_weights(degree, &s);
            assert_eq!(weights.len(), degree as usize + 1);
            pa::assert_eq!(weights.sum(), MultivarPoly::one(), "degree {}", degree);
        }
    }

    #[test]
    fn curve_weights_cubic() {
        let s = sym("s");
        let weights = curve_weights(3, &s);
        let rendered = weights
            .entries()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        pa::assert_eq!(
            rendered,
            vec!["(-s + 1)³", "3*s*(-s + 1)²", "3*s²*(-s + 1)", "s³"]
        );
    }

    #[test]
    fn surface_weights_partition_of_unity() {
        let s = sym("s");
        let t = sym("t");
        for degree in 0..7 {
            let weights = surface_weights(degree, &s, &t);
            assert_eq!(weights.len(), triangle_len(degree));
            pa::assert_eq!(weights.sum(), MultivarPoly::one(), "degree {}", degree);
        }
    }

    #[test]
    fn surface_weights_linear_order() {
        let s = sym("s");
        let t = sym("t");
        let weights = surface_weights(1, &s, &t);
        let expanded = weights
            .entries()
            .iter()
            .map(Factored::expand)
            .collect::<Vec<_>>();

        let s_poly = MultivarPoly::symbol(&s);
        let t_poly = MultivarPoly::symbol(&t);
        pa::assert_eq!(
            expanded,
            vec![
                MultivarPoly::one() - s_poly.clone() - t_poly.clone(),
                s_poly,
                t_poly,
            ]
        );
    }

    #[test]
    fn surface_weights_quadratic_coefficients() {
        let weights = surface_weights(2, &sym("s"), &sym("t"));
        let units = weights
            .entries()
            .iter()
            .map(|w| w.unit().clone())
            .collect::<Vec<_>>();
        pa::assert_eq!(units, vec![int(1), int(2), int(1), int(2), int(2), int(1)]);
    }
}
