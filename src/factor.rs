use std::collections::BTreeSet;

use fmtastic::Superscript;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use smallvec::SmallVec;

use crate::{Monomial, MultivarPoly, Symbol};

/// A polynomial kept as a product `unit * f₀^e₀ * f₁^e₁ * ...`.
///
/// Used both for expressions that are naturally built as products (basis weights such as
/// `3 * s^2 * (1 - s)`) and for the output of factoring. Factors are never constant, and
/// their product is not expanded until [`Factored::expand`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Factored {
    pub(crate) unit: BigRational,
    pub(crate) factors: SmallVec<[(MultivarPoly, u32); 4]>,
}

impl Factored {
    /// Build a product. Constant factors are folded into the unit and zero exponents dropped.
    pub fn new(unit: BigRational, factors: impl IntoIterator<Item = (MultivarPoly, u32)>) -> Self {
        let mut result = Self {
            unit,
            factors: SmallVec::new(),
        };
        for (factor, exp) in factors {
            if exp == 0 {
                continue;
            }
            match factor.as_constant() {
                Some(c) => result.unit *= num_traits::pow(c, exp as usize),
                None => result.factors.push((factor, exp)),
            }
        }
        if result.unit.is_zero() {
            result.factors.clear();
        }
        result
    }

    pub fn unit(&self) -> &BigRational {
        &self.unit
    }

    pub fn factors(&self) -> impl Iterator<Item = (&MultivarPoly, u32)> {
        self.factors.iter().map(|(f, e)| (f, *e))
    }

    pub fn is_zero(&self) -> bool {
        self.unit.is_zero()
    }

    /// Multiply out into canonical polynomial form.
    pub fn expand(&self) -> MultivarPoly {
        let mut result = MultivarPoly::constant(self.unit.clone());
        for (factor, exp) in &self.factors {
            result = &result * &factor.pow(*exp);
        }
        result
    }
}

impl From<MultivarPoly> for Factored {
    fn from(poly: MultivarPoly) -> Self {
        Self::new(BigRational::one(), [(poly, 1)])
    }
}

impl core::fmt::Display for Factored {
    /// Writes e.g. `-4*(x² - 2*x + y)` or `2*s*(s - 1)²`.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.factors.is_empty() {
            return write!(f, "{}", self.unit);
        }

        let wrap = self.factors.len() > 1 || !self.unit.is_one();
        if self.unit == -BigRational::one() {
            f.write_str("-")?;
        } else if !self.unit.is_one() {
            write!(f, "{}*", self.unit)?;
        }
        for (n, (factor, exp)) in self.factors.iter().enumerate() {
            if n > 0 {
                f.write_str("*")?;
            }
            if factor.num_terms() > 1 && (wrap || *exp > 1) {
                write!(f, "({})", factor)?;
            } else {
                write!(f, "{}", factor)?;
            }
            if *exp > 1 {
                write!(f, "{}", Superscript(*exp))?;
            }
        }
        Ok(())
    }
}

/// Factor `poly` over the rationals as far as this crate can.
///
/// Splits off, in order:
/// 1. the signed rational content, so the remaining factors have coprime integer coefficients
///    and positive leading coefficients,
/// 2. the common power of each symbol (e.g. `s²` out of `s³ - s²`),
/// 3. repeated factors, by square-free decomposition (e.g. `(2*x - y)²` out of
///    `4*x² - 4*x*y + y²`),
/// 4. for each univariate square-free part, every linear factor `q*v - p` with a rational root
///    `p/q`. Candidate roots are only enumerated while the constant and leading coefficients
///    are at most `root_search_limit` in magnitude.
///
/// Whatever is left of a square-free part is kept as a single factor, which may still be
/// reducible.
pub(crate) fn factor(poly: &MultivarPoly, root_search_limit: u64) -> Factored {
    let (unit, primitive) = poly.primitive_part();
    if primitive.is_zero() {
        return Factored::new(BigRational::zero(), []);
    }

    let mut factors = SmallVec::<[(MultivarPoly, u32); 4]>::new();

    let common = primitive.monomial_gcd();
    let cofactor = if common.is_constant() {
        primitive
    } else {
        for (sym, exp) in common.powers() {
            factors.push((MultivarPoly::symbol(sym), exp));
        }
        // Dividing each term by the polynomial's own monomial gcd is always exact.
        MultivarPoly {
            terms: primitive
                .terms
                .iter()
                .filter_map(|m| m.div(&common))
                .collect(),
        }
    };

    let parts = square_free(&cofactor).unwrap_or_else(|| vec![(cofactor, 1)]);
    for (mut part, multiplicity) in parts {
        let symbols = part.symbols();
        if let [sym] = symbols.iter().collect::<Vec<_>>().as_slice() {
            for (root, linear) in rational_roots(&part, sym, root_search_limit) {
                let mut count = 0;
                while part.total_degree() > 0 {
                    match is_root(&part, sym, &root)
                        .then(|| part.div_exact(&linear))
                        .flatten()
                    {
                        Some(quotient) => {
                            part = quotient;
                            count += 1;
                        }
                        None => break,
                    }
                }
                if count > 0 {
                    factors.push((linear, count * multiplicity));
                }
            }
        }
        factors.push((part, multiplicity));
    }

    log::debug!(
        "factored {} terms into {} factors",
        poly.num_terms(),
        factors.len()
    );
    Factored::new(unit, factors)
}

/// Square-free decomposition of a primitive polynomial into pairwise coprime parts with
/// their multiplicities. Each part is primitive with a positive leading coefficient, so the
/// product of the powers is `poly` itself. Constants have no parts.
///
/// `None` if an exact division unexpectedly fails.
fn square_free(poly: &MultivarPoly) -> Option<Vec<(MultivarPoly, u32)>> {
    let Some(sym) = poly.symbols().into_iter().next() else {
        return Some(vec![]);
    };
    // The content in `sym` is free of `sym` and decomposed on its own.
    let content = poly.content_in(&sym);
    let primitive = poly.div_exact(&content)?;

    let mut parts = square_free_in(&primitive, &sym)?;
    parts.extend(square_free(&content)?);
    Some(parts)
}

/// Yun's algorithm with respect to `sym`, for `poly` primitive in `sym`.
fn square_free_in(poly: &MultivarPoly, sym: &Symbol) -> Option<Vec<(MultivarPoly, u32)>> {
    let deriv = poly.derivative(sym);
    let repeated = poly.gcd(&deriv);
    let mut rest = poly.div_exact(&repeated)?;
    let mut d = deriv.div_exact(&repeated)? - rest.derivative(sym);

    let mut parts = vec![];
    for multiplicity in 1..=poly.degree(sym) {
        if rest.total_degree() == 0 {
            break;
        }
        let part = rest.gcd(&d);
        rest = rest.div_exact(&part)?;
        d = d.div_exact(&part)? - rest.derivative(sym);
        if part.total_degree() > 0 {
            parts.push((part, multiplicity));
        }
    }
    (rest.total_degree() == 0).then_some(parts)
}

fn is_root(poly: &MultivarPoly, sym: &Symbol, root: &BigRational) -> bool {
    poly.eval_exact(&[(sym.clone(), root.clone())])
        .map(|v| v.is_zero())
        .unwrap_or(false)
}

/// Candidate rational roots `±p/q` (p dividing the constant coefficient, q the leading one),
/// paired with the primitive linear factor `q*sym - p`, in ascending order of the root.
fn rational_roots(
    poly: &MultivarPoly,
    sym: &Symbol,
    limit: u64,
) -> Vec<(BigRational, MultivarPoly)> {
    let coeffs = poly.coeffs_in(sym);
    let (Some(first), Some(last)) = (coeffs.first(), coeffs.last()) else {
        return vec![];
    };
    let (Some(constant), Some(leading)) = (first.as_constant(), last.as_constant()) else {
        return vec![];
    };
    if constant.is_zero() {
        return vec![];
    }
    let (Some(p_divs), Some(q_divs)) = (
        small_divisors(constant.numer(), limit),
        small_divisors(leading.numer(), limit),
    ) else {
        return vec![];
    };

    let mut roots = BTreeSet::new();
    for p in &p_divs {
        for q in &q_divs {
            let root = BigRational::new(BigInt::from(*p), BigInt::from(*q));
            roots.insert(-root.clone());
            roots.insert(root);
        }
    }

    roots
        .into_iter()
        .map(|root| {
            let linear = MultivarPoly::from_monomials([
                Monomial::new(BigRational::from(root.denom().clone()), [(sym.clone(), 1)]),
                Monomial::constant(-BigRational::from(root.numer().clone())),
            ]);
            (root, linear)
        })
        .collect()
}

/// Positive divisors of `n`, or `None` when `|n|` exceeds `limit`.
fn small_divisors(n: &BigInt, limit: u64) -> Option<Vec<u64>> {
    let n = n.abs().to_u64()?;
    if n == 0 || n > limit {
        return None;
    }
    let mut divisors = Vec::new();
    let mut d = 1;
    while d <= n / d {
        if n % d == 0 {
            divisors.push(d);
            if d != n / d {
                divisors.push(n / d);
            }
        }
        d += 1;
    }
    divisors.sort_unstable();
    Some(divisors)
}
