use std::{
    cmp::Ordering,
    collections::BTreeSet,
    ops::{Add, Mul, Neg, Sub},
};

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use smallvec::{SmallVec, smallvec};

use crate::{
    Monomial, Symbol, SymbolicError,
    monomial::{Powers, lex_cmp},
};

/// A multivariate polynomial with exact rational coefficients.
///
/// Terms are kept in canonical form: sorted ascending in lexicographic monomial order, with
/// like terms combined and zero coefficients removed. Two polynomials are therefore equal
/// exactly when their term lists are equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MultivarPoly {
    pub(crate) terms: SmallVec<[Monomial; 8]>,
}

impl MultivarPoly {
    pub fn new() -> Self {
        Self {
            terms: SmallVec::new(),
        }
    }

    pub fn one() -> Self {
        Self::constant(BigRational::one())
    }

    pub fn constant(value: BigRational) -> Self {
        if value.is_zero() {
            return Self::new();
        }
        Self {
            terms: smallvec![Monomial::constant(value)],
        }
    }

    /// The polynomial consisting of the single symbol `sym`.
    pub fn symbol(sym: &Symbol) -> Self {
        Self {
            terms: smallvec![Monomial::new(BigRational::one(), [(sym.clone(), 1)])],
        }
    }

    pub fn from_monomials(monomials: impl IntoIterator<Item = Monomial>) -> Self {
        Self::new().add_monomials(monomials)
    }

    pub fn terms(&self) -> impl DoubleEndedIterator<Item = &Monomial> {
        self.terms.iter()
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }

    pub fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }

    /// The value of a polynomial without symbols, `None` otherwise.
    pub fn as_constant(&self) -> Option<BigRational> {
        match self.terms.as_slice() {
            [] => Some(BigRational::zero()),
            [m] if m.is_constant() => Some(m.coeff.clone()),
            _ => None,
        }
    }

    /// Leading term in lexicographic order, `None` for the zero polynomial.
    pub fn leading_term(&self) -> Option<&Monomial> {
        self.terms.last()
    }

    /// Highest exponent of `sym` over all terms.
    pub fn degree(&self, sym: &Symbol) -> u32 {
        self.terms.iter().map(|m| m.exp(sym)).max().unwrap_or(0)
    }

    pub fn total_degree(&self) -> u32 {
        self.terms
            .iter()
            .map(Monomial::total_degree)
            .max()
            .unwrap_or(0)
    }

    pub fn symbols(&self) -> BTreeSet<Symbol> {
        self.terms
            .iter()
            .flat_map(|m| m.powers.iter().map(|(sym, _)| sym.clone()))
            .collect()
    }

    /// View the polynomial as univariate in `sym`: entry `k` of the result is the coefficient
    /// (a polynomial in the remaining symbols) of `sym^k`.
    pub fn coeffs_in(&self, sym: &Symbol) -> Vec<MultivarPoly> {
        let mut buckets = vec![Vec::new(); self.degree(sym) as usize + 1];
        for m in &self.terms {
            let exp = m.exp(sym);
            let rest = Monomial {
                coeff: m.coeff.clone(),
                powers: m.powers.iter().filter(|(s, _)| s != sym).cloned().collect(),
            };
            buckets[exp as usize].push(rest);
        }
        buckets.into_iter().map(Self::from_monomials).collect()
    }

    /// Evaluate exactly. Every symbol of the polynomial must be given a value.
    pub fn eval_exact(&self, vars: &[(Symbol, BigRational)]) -> Result<BigRational, SymbolicError> {
        let mut result = BigRational::zero();
        for monomial in &self.terms {
            result += monomial.eval_exact(vars)?;
        }
        Ok(result)
    }

    /// Evaluate in floating point at the given symbol values.
    pub fn eval(&self, vars: &[(Symbol, f64)]) -> Result<f64, SymbolicError> {
        let mut result = 0.0;
        for monomial in &self.terms {
            result += monomial.eval(vars)?;
        }
        Ok(result)
    }

    /// Substitute each listed symbol with the paired polynomial. Unlisted symbols are kept.
    pub fn sub_polys(&self, subs: &[(Symbol, MultivarPoly)]) -> Self {
        let mut output = MultivarPoly::new();
        for monomial in &self.terms {
            output = output.merge(monomial.sub_polys(subs));
        }
        output
    }

    pub fn mul_monomial(&self, monomial: &Monomial) -> Self {
        if monomial.coeff.is_zero() {
            return Self::new();
        }
        // Multiplying every term by the same monomial preserves the monomial order.
        Self {
            terms: self.terms.iter().map(|m| m.mul(monomial)).collect(),
        }
    }

    pub fn scale(&self, factor: &BigRational) -> Self {
        self.mul_monomial(&Monomial::constant(factor.clone()))
    }

    pub fn pow(&self, exp: u32) -> Self {
        let mut result = Self::one();
        for _ in 0..exp {
            result = &result * self;
        }
        result
    }

    /// Exact division. Returns `None` unless `divisor` divides `self` with zero remainder.
    pub fn div_exact(&self, divisor: &Self) -> Option<Self> {
        let lead = divisor.leading_term()?;
        let mut remainder = self.clone();
        let mut quotient = SmallVec::<[Monomial; 8]>::new();

        // If divisor | self, the leading term of each remainder is divisible by `lead`, and
        // each step strictly lowers the leading term.
        while let Some(lt) = remainder.leading_term() {
            let q = lt.div(lead)?;
            remainder = remainder - divisor.mul_monomial(&q);
            quotient.push(q);
        }
        Some(Self::from_monomials(quotient))
    }

    /// Positive rational content: gcd of the numerators over lcm of the denominators.
    ///
    /// Dividing by the content leaves integer coefficients without a common factor. The
    /// content of the zero polynomial is one.
    pub fn content(&self) -> BigRational {
        let mut num_gcd: Option<BigInt> = None;
        let mut den_lcm: Option<BigInt> = None;

        for m in &self.terms {
            let num = m.coeff.numer().abs();
            let den = m.coeff.denom().clone();
            num_gcd = Some(match num_gcd {
                None => num,
                Some(g) => g.gcd(&num),
            });
            den_lcm = Some(match den_lcm {
                None => den,
                Some(l) => l.lcm(&den),
            });
        }

        match (num_gcd, den_lcm) {
            (Some(n), Some(d)) => BigRational::new(n, d),
            _ => BigRational::one(),
        }
    }

    /// Split into `(unit, primitive)` with `self == unit * primitive`, where `primitive` has
    /// coprime integer coefficients and a positive leading coefficient.
    pub fn primitive_part(&self) -> (BigRational, Self) {
        let Some(lead) = self.leading_term() else {
            return (BigRational::zero(), Self::new());
        };
        let mut unit = self.content();
        if lead.coeff.is_negative() {
            unit = -unit;
        }
        (unit.clone(), self.scale(&unit.recip()))
    }

    /// Partial derivative with respect to `sym`.
    pub fn derivative(&self, sym: &Symbol) -> Self {
        Self::from_monomials(self.terms.iter().filter_map(|m| {
            let exp = m.exp(sym);
            (exp > 0).then(|| {
                let powers = m
                    .powers
                    .iter()
                    .map(|(s, e)| (s.clone(), if s == sym { e - 1 } else { *e }));
                Monomial::new(&m.coeff * BigRational::from_integer(BigInt::from(exp)), powers)
            })
        }))
    }

    /// Greatest common divisor, with coprime integer coefficients and a positive leading
    /// coefficient. The gcd with a nonzero constant is one.
    ///
    /// Both inputs are split into content and primitive part with respect to one symbol. The
    /// contents are handled recursively in the remaining symbols, and the primitive parts are
    /// reduced by a primitive pseudo-remainder sequence.
    pub fn gcd(&self, other: &Self) -> Self {
        if self.is_zero() {
            return other.primitive_part().1;
        }
        if other.is_zero() {
            return self.primitive_part().1;
        }
        if self.total_degree() == 0 || other.total_degree() == 0 {
            return Self::one();
        }

        let symbols = self.symbols();
        let other_symbols = other.symbols();
        let Some(sym) = symbols.union(&other_symbols).next().cloned() else {
            return Self::one();
        };

        let a_content = self.content_in(&sym);
        let b_content = other.content_in(&sym);
        let content = a_content.gcd(&b_content);
        let (Some(mut a), Some(mut b)) = (self.div_exact(&a_content), other.div_exact(&b_content))
        else {
            return content;
        };

        if a.degree(&sym) < b.degree(&sym) {
            core::mem::swap(&mut a, &mut b);
        }
        while !b.is_zero() {
            let rem = a.pseudo_rem(&b, &sym);
            a = b;
            b = rem.primitive_in(&sym);
        }
        (&content * &a.primitive_in(&sym)).primitive_part().1
    }

    /// Gcd of the coefficients of `self` viewed as univariate in `sym`.
    pub fn content_in(&self, sym: &Symbol) -> Self {
        self.coeffs_in(sym)
            .iter()
            .fold(Self::new(), |acc, coeff| acc.gcd(coeff))
    }

    /// `self` divided by its content in `sym`, scaled to be primitive.
    pub(crate) fn primitive_in(&self, sym: &Symbol) -> Self {
        if self.is_zero() {
            return Self::new();
        }
        let content = self.content_in(sym);
        self.div_exact(&content)
            .unwrap_or_else(|| self.clone())
            .primitive_part()
            .1
    }

    /// Pseudo-remainder `r` of `self` by `divisor` in `sym`, such that
    /// `lc(divisor)^k * self = q * divisor + r` with `deg(r) < deg(divisor)`.
    pub(crate) fn pseudo_rem(&self, divisor: &Self, sym: &Symbol) -> Self {
        let divisor_degree = divisor.degree(sym);
        let Some(divisor_lead) = divisor.coeffs_in(sym).pop() else {
            return self.clone();
        };

        let mut rem = self.clone();
        while !rem.is_zero() && rem.degree(sym) >= divisor_degree {
            let shift = rem.degree(sym) - divisor_degree;
            let Some(rem_lead) = rem.coeffs_in(sym).pop() else {
                break;
            };
            let shift = Monomial::new(BigRational::one(), [(sym.clone(), shift)]);
            rem = &rem * &divisor_lead - &divisor.mul_monomial(&shift) * &rem_lead;
        }
        rem
    }

    /// Largest power product dividing every term, e.g. `s*t` for `s²*t + s*t²`.
    pub fn monomial_gcd(&self) -> Monomial {
        let mut terms = self.terms.iter();
        let Some(first) = terms.next() else {
            return Monomial::constant(BigRational::one());
        };
        let mut common: Powers = first.powers.clone();
        for m in terms {
            common = common
                .into_iter()
                .map(|(sym, exp)| {
                    let e = exp.min(m.exp(&sym));
                    (sym, e)
                })
                .filter(|(_, e)| *e != 0)
                .collect();
        }
        Monomial::new(BigRational::one(), common)
    }

    pub fn merge(mut self, other: Self) -> Self {
        let mut merged = SmallVec::with_capacity(self.terms.len() + other.terms.len());

        let mut a_iter = self.terms.into_iter().peekable();
        let mut b_iter = other.terms.into_iter().peekable();

        // The inputs should already be sorted. Keep them sorted while merging.
        while let (Some(a), Some(b)) = (a_iter.peek(), b_iter.peek()) {
            match lex_cmp(&a.powers, &b.powers) {
                Ordering::Less => merged.push(a_iter.next().unwrap()),
                Ordering::Greater => merged.push(b_iter.next().unwrap()),
                Ordering::Equal => {
                    // Equal exponents, combine coefficients
                    let combined_coeff = &a.coeff + &b.coeff;
                    if !combined_coeff.is_zero() {
                        let powers = a.powers.clone();
                        merged.push(Monomial {
                            coeff: combined_coeff,
                            powers,
                        });
                    }
                    a_iter.next();
                    b_iter.next();
                }
            }
        }
        merged.extend(a_iter);
        merged.extend(b_iter);
        self.terms = merged;
        self
    }

    /// Add arbitrary (unsorted, possibly repeated or zero) monomials.
    pub fn add_monomials(self, monomials: impl IntoIterator<Item = Monomial>) -> Self {
        let mut other: SmallVec<[Monomial; 8]> = monomials
            .into_iter()
            .filter(|m| !m.coeff.is_zero())
            .collect();
        other.sort_by(|a, b| lex_cmp(&a.powers, &b.powers));

        // Combine repeated power products so the merge input is strictly sorted.
        let mut combined: SmallVec<[Monomial; 8]> = SmallVec::with_capacity(other.len());
        for m in other {
            match combined.last_mut() {
                Some(last) if last.powers == m.powers => last.coeff += m.coeff,
                _ => combined.push(m),
            }
        }
        combined.retain(|m| !m.coeff.is_zero());
        self.merge(MultivarPoly { terms: combined })
    }
}

impl core::fmt::Display for MultivarPoly {
    /// Terms are written from the leading term down, e.g. `x² - 2*x + y`.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.terms.is_empty() {
            return f.write_str("0");
        }
        for (n, m) in self.terms.iter().rev().enumerate() {
            match (n, m.coeff.is_negative()) {
                (0, true) => f.write_str("-")?,
                (0, false) => {}
                (_, true) => f.write_str(" - ")?,
                (_, false) => f.write_str(" + ")?,
            }
            m.fmt_abs(f)?;
        }
        Ok(())
    }
}

impl From<Monomial> for MultivarPoly {
    fn from(monomial: Monomial) -> Self {
        Self::from_monomials([monomial])
    }
}

impl Add for MultivarPoly {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.merge(rhs)
    }
}

impl Sub for MultivarPoly {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.merge(-rhs)
    }
}

impl Neg for MultivarPoly {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        for m in self.terms.iter_mut() {
            m.coeff = -&m.coeff;
        }
        self
    }
}

impl Mul<&MultivarPoly> for &MultivarPoly {
    type Output = MultivarPoly;

    fn mul(self, rhs: &MultivarPoly) -> Self::Output {
        let mut output = MultivarPoly::new();
        for m in &self.terms {
            output = output.merge(rhs.mul_monomial(m));
        }
        output
    }
}

impl Mul for MultivarPoly {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        &self * &rhs
    }
}

#[cfg(test)]
mod tests {
    use assertables::assert_ok;
    use pretty_assertions as pa;

    use super::*;
    use crate::test_utils::{int, rat, sym};

    fn var(name: &str) -> MultivarPoly {
        MultivarPoly::symbol(&sym(name))
    }

    fn c(v: i64) -> MultivarPoly {
        MultivarPoly::constant(int(v))
    }

    #[test]
    fn from_monomials_combines_like_terms() {
        let s = sym("s");
        let poly = MultivarPoly::from_monomials([
            Monomial::new(int(2), [(s.clone(), 1)]),
            Monomial::constant(int(3)),
            Monomial::new(int(-2), [(s.clone(), 1)]),
            Monomial::new(int(1), [(s.clone(), 2)]),
            Monomial::constant(int(0)),
        ]);

        pa::assert_eq!(
            poly,
            MultivarPoly::from_monomials([
                Monomial::new(int(1), [(s.clone(), 2)]),
                Monomial::constant(int(3)),
            ])
        );
        assert_eq!(poly.num_terms(), 2);
    }

    #[test]
    fn binomial_expansion() {
        // (1 - s)^3 = 1 - 3s + 3s^2 - s^3
        let poly = (c(1) - var("s")).pow(3);
        let expected = c(1) - var("s").scale(&int(3)) + var("s").pow(2).scale(&int(3))
            - var("s").pow(3);
        pa::assert_eq!(poly, expected);
        assert_eq!(poly.to_string(), "-s³ + 3*s² - 3*s + 1");
    }

    #[test]
    fn subtraction_cancels() {
        let poly = (var("x") + var("y")).pow(2);
        let diff = poly.clone() - poly;
        assert!(diff.is_zero());
        assert_eq!(diff.to_string(), "0");
    }

    #[test]
    fn degrees_and_symbols() {
        let poly = var("s").pow(2) * var("t") + var("t").pow(3) + c(4);
        assert_eq!(poly.degree(&sym("s")), 2);
        assert_eq!(poly.degree(&sym("t")), 3);
        assert_eq!(poly.degree(&sym("x")), 0);
        assert_eq!(poly.total_degree(), 3);
        assert_eq!(
            poly.symbols().into_iter().collect::<Vec<_>>(),
            vec![sym("s"), sym("t")]
        );
    }

    #[test]
    fn coeffs_in_symbol() {
        // (x + 1) s^2 - y s + 3
        let poly = (var("x") + c(1)) * var("s").pow(2) - var("y") * var("s") + c(3);
        let coeffs = poly.coeffs_in(&sym("s"));
        pa::assert_eq!(coeffs, vec![c(3), -var("y"), var("x") + c(1)]);
    }

    #[test]
    fn eval_circle() {
        // f(x, y) = -1 + x^2 + y^2
        let circle = var("x").pow(2) + var("y").pow(2) - c(1);
        let x = sym("x");
        let y = sym("y");

        pa::assert_eq!(
            assert_ok!(circle.eval(&[(x.clone(), 0.0), (y.clone(), 0.0)])),
            -1.0
        );
        pa::assert_eq!(
            assert_ok!(circle.eval(&[(x.clone(), -1.0), (y.clone(), 0.0)])),
            0.0
        );
        pa::assert_eq!(
            assert_ok!(circle.eval(&[(x.clone(), 1.0), (y.clone(), 1.0)])),
            1.0
        );
        pa::assert_eq!(
            assert_ok!(circle.eval_exact(&[(x.clone(), rat(3, 5)), (y.clone(), rat(4, 5))])),
            int(0)
        );
    }

    #[test]
    fn sub_polys_circle_affine() {
        // x -> 2u - 3, y -> 2v on the unit circle
        let circle = var("x").pow(2) + var("y").pow(2) - c(1);
        let subs = [
            (sym("x"), var("u").scale(&int(2)) - c(3)),
            (sym("y"), var("v").scale(&int(2))),
        ];

        let result = circle.sub_polys(&subs);

        let expected = c(8) - var("u").scale(&int(12))
            + var("u").pow(2).scale(&int(4))
            + var("v").pow(2).scale(&int(4));
        pa::assert_eq!(result, expected);
    }

    #[test]
    fn div_exact_product() {
        let a = var("x") - var("s").scale(&int(2)) + c(1);
        let b = var("s").pow(2) * var("y") - var("x").scale(&rat(1, 3));
        let product = &a * &b;

        pa::assert_eq!(product.div_exact(&a), Some(b.clone()));
        pa::assert_eq!(product.div_exact(&b), Some(a.clone()));
        pa::assert_eq!(a.div_exact(&b), None);
        pa::assert_eq!(a.div_exact(&MultivarPoly::new()), None);
        pa::assert_eq!(MultivarPoly::new().div_exact(&a), Some(MultivarPoly::new()));
    }

    #[test]
    fn primitive_part_and_content() {
        // -3/2 x^2 + 3 y - 9/4
        let poly = var("x").pow(2).scale(&rat(-3, 2)) + var("y").scale(&int(3)) - c(9).scale(&rat(1, 4));
        assert_eq!(poly.content(), rat(3, 4));

        let (unit, primitive) = poly.primitive_part();
        assert_eq!(unit, rat(-3, 4));
        pa::assert_eq!(
            primitive,
            var("x").pow(2).scale(&int(2)) - var("y").scale(&int(4)) + c(3)
        );
        pa::assert_eq!(primitive.scale(&unit), poly);
    }

    #[test]
    fn monomial_gcd() {
        let poly = var("s").pow(2) * var("t") + var("s") * var("t").pow(2);
        let gcd = poly.monomial_gcd();
        assert_eq!(gcd, Monomial::new(int(1), [(sym("s"), 1), (sym("t"), 1)]));

        let with_constant = poly + c(1);
        assert!(with_constant.monomial_gcd().is_constant());
    }

    #[test]
    fn as_constant() {
        assert_eq!(c(5).as_constant(), Some(int(5)));
        assert_eq!(MultivarPoly::new().as_constant(), Some(int(0)));
        assert_eq!(var("s").as_constant(), None);
    }

    #[test]
    fn derivative() {
        // d/dx (x^2 y + 3x - y) = 2xy + 3
        let poly = var("x").pow(2) * var("y") + var("x").scale(&int(3)) - var("y");
        pa::assert_eq!(
            poly.derivative(&sym("x")),
            (var("x") * var("y")).scale(&int(2)) + c(3)
        );
        assert!(poly.derivative(&sym("z")).is_zero());
    }

    #[test]
    fn pseudo_remainder() {
        // 4 (x^2 + y) = (2x + 1)(2x - 1) + 4y + 1
        let x = sym("x");
        let rem = (var("x").pow(2) + var("y")).pseudo_rem(&(var("x").scale(&int(2)) - c(1)), &x);
        pa::assert_eq!(rem, var("y").scale(&int(4)) + c(1));
    }

    #[test]
    fn gcd_multivariate() {
        let a = ((var("x") + var("y")) * (var("x") - var("y")).pow(2)).scale(&int(3));
        let b = ((var("x") + var("y")).pow(2) * (var("x") + c(1))).scale(&rat(1, 2));
        pa::assert_eq!(a.gcd(&b), var("x") + var("y"));
        pa::assert_eq!(b.gcd(&a), var("x") + var("y"));

        // Common factor free of the leading symbol.
        let a = (var("y") + c(1)) * (var("x") + c(1));
        let b = (var("y") + c(1)) * (var("x") - c(2)) * (var("y") - c(1));
        pa::assert_eq!(a.gcd(&b), var("y") + c(1));

        let coprime = (var("x").pow(2) + var("y")).gcd(&(var("x") + c(1)));
        pa::assert_eq!(coprime, MultivarPoly::one());
    }

    #[test]
    fn gcd_with_zero_and_constants() {
        let poly = var("x").scale(&int(-2)) + var("y").scale(&int(4));
        pa::assert_eq!(MultivarPoly::new().gcd(&poly), var("x") - var("y").scale(&int(2)));
        pa::assert_eq!(poly.gcd(&c(6)), MultivarPoly::one());
        pa::assert_eq!(c(4).gcd(&c(6)), MultivarPoly::one());
        assert!(MultivarPoly::new().gcd(&MultivarPoly::new()).is_zero());
    }

    #[test]
    fn content_in_symbol() {
        // (y^2 - 1) x + (y + 1) = (y + 1) ((y - 1) x + 1)
        let poly = (var("y").pow(2) - c(1)) * var("x") + var("y") + c(1);
        pa::assert_eq!(poly.content_in(&sym("x")), var("y") + c(1));
    }
}
