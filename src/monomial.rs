use std::cmp::Ordering;

use fmtastic::Superscript;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use smallvec::SmallVec;

use crate::{Symbol, SymbolicError};

/// Sparse exponent list: `(symbol, exponent)` pairs sorted by symbol, exponents non-zero.
pub(crate) type Powers = SmallVec<[(Symbol, u32); 4]>;

/// A single term `coeff * v₀^e₀ * v₁^e₁ * ...` with an exact rational coefficient.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Monomial {
    /// Coefficient of the monomial
    ///
    /// For example, in 7/2 * s^2 * t, the coefficient is 7/2
    pub(crate) coeff: BigRational,

    /// Exponents of the symbols present in this monomial
    ///
    /// For example, 3 * s^2 * t is stored as [(s, 2), (t, 1)]. Symbols with exponent zero
    /// are never stored.
    pub(crate) powers: Powers,
}

impl Monomial {
    /// Build a monomial, normalizing the exponent list.
    ///
    /// Repeated symbols have their exponents added and zero exponents are dropped, so
    /// `new(c, [(s, 1), (t, 0), (s, 2)])` is `c * s^3`.
    pub fn new(coeff: BigRational, powers: impl IntoIterator<Item = (Symbol, u32)>) -> Self {
        let mut sorted = powers.into_iter().filter(|(_, e)| *e != 0).collect::<Powers>();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));

        let mut merged = Powers::with_capacity(sorted.len());
        for (sym, exp) in sorted {
            match merged.last_mut() {
                Some((last, last_exp)) if *last == sym => *last_exp += exp,
                _ => merged.push((sym, exp)),
            }
        }
        Self {
            coeff,
            powers: merged,
        }
    }

    pub fn constant(coeff: BigRational) -> Self {
        Self {
            coeff,
            powers: Powers::new(),
        }
    }

    pub fn coeff(&self) -> &BigRational {
        &self.coeff
    }

    pub fn powers(&self) -> impl Iterator<Item = (&Symbol, u32)> {
        self.powers.iter().map(|(sym, exp)| (sym, *exp))
    }

    /// Exponent of `sym` in this monomial (zero when absent).
    pub fn exp(&self, sym: &Symbol) -> u32 {
        self.powers
            .iter()
            .find(|(s, _)| s == sym)
            .map_or(0, |(_, e)| *e)
    }

    pub fn total_degree(&self) -> u32 {
        self.powers.iter().map(|(_, e)| e).sum()
    }

    pub fn is_constant(&self) -> bool {
        self.powers.is_empty()
    }

    /// Check if every exponent in self is less than or equal to the one in other, i.e. whether
    /// the power product of self divides the power product of other.
    pub fn exp_all_le(&self, other: &Monomial) -> bool {
        self.powers.iter().all(|(sym, exp)| *exp <= other.exp(sym))
    }

    pub fn mul(&self, other: &Monomial) -> Monomial {
        let mut powers = Powers::with_capacity(self.powers.len() + other.powers.len());
        let mut a_iter = self.powers.iter().peekable();
        let mut b_iter = other.powers.iter().peekable();

        while let (Some(a), Some(b)) = (a_iter.peek(), b_iter.peek()) {
            match a.0.cmp(&b.0) {
                Ordering::Less => powers.push(a_iter.next().unwrap().clone()),
                Ordering::Greater => powers.push(b_iter.next().unwrap().clone()),
                Ordering::Equal => {
                    powers.push((a.0.clone(), a.1 + b.1));
                    a_iter.next();
                    b_iter.next();
                }
            }
        }
        powers.extend(a_iter.cloned());
        powers.extend(b_iter.cloned());

        Monomial {
            coeff: &self.coeff * &other.coeff,
            powers,
        }
    }

    /// Divide by `divisor`, or `None` if its power product does not divide this one.
    pub fn div(&self, divisor: &Monomial) -> Option<Monomial> {
        if divisor.coeff.is_zero() || !divisor.exp_all_le(self) {
            return None;
        }
        let powers = self
            .powers
            .iter()
            .map(|(sym, exp)| (sym.clone(), exp - divisor.exp(sym)))
            .filter(|(_, exp)| *exp != 0)
            .collect();
        Some(Monomial {
            coeff: &self.coeff / &divisor.coeff,
            powers,
        })
    }

    /// Substitute each listed symbol in this monomial with the given polynomial.
    ///
    /// Symbols that are not listed are kept as they are. Example: substituting `s = 1 - u`
    /// into `3 * s^2 * t` gives `3 * t - 6 * u * t + 3 * u^2 * t`.
    pub fn sub_polys(&self, subs: &[(Symbol, crate::MultivarPoly)]) -> crate::MultivarPoly {
        let mut kept = Powers::new();
        let mut result = crate::MultivarPoly::one();
        for (sym, exp) in &self.powers {
            match subs.iter().find(|(s, _)| s == sym) {
                Some((_, poly)) => result = &result * &poly.pow(*exp),
                None => kept.push((sym.clone(), *exp)),
            }
        }
        result.mul_monomial(&Monomial {
            coeff: self.coeff.clone(),
            powers: kept,
        })
    }

    /// Evaluate exactly, with a value for every symbol of the monomial.
    pub fn eval_exact(&self, vars: &[(Symbol, BigRational)]) -> Result<BigRational, SymbolicError> {
        let mut result = self.coeff.clone();
        for (sym, exp) in &self.powers {
            let value = lookup(vars, sym)?;
            result *= num_traits::pow(value.clone(), *exp as usize);
        }
        Ok(result)
    }

    pub fn eval(&self, vars: &[(Symbol, f64)]) -> Result<f64, SymbolicError> {
        let mut result = self.coeff.to_f64().unwrap_or(f64::NAN);
        for (sym, exp) in &self.powers {
            let value = lookup(vars, sym)?;
            result *= value.powi(*exp as i32);
        }
        Ok(result)
    }

    /// Write the power product, e.g. `s²*t`.
    pub(crate) fn fmt_powers(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (n, (sym, exp)) in self.powers.iter().enumerate() {
            if n > 0 {
                f.write_str("*")?;
            }
            if *exp == 1 {
                write!(f, "{}", sym)?;
            } else {
                write!(f, "{}{}", sym, Superscript(*exp))?;
            }
        }
        Ok(())
    }

    /// Write the term without its sign, e.g. `3*s²` for both `3*s²` and `-3*s²`.
    pub(crate) fn fmt_abs(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let abs = self.coeff.abs();
        if self.powers.is_empty() {
            return write!(f, "{}", abs);
        }
        if !abs.is_one() {
            write!(f, "{}*", abs)?;
        }
        self.fmt_powers(f)
    }
}

fn lookup<'a, T>(vars: &'a [(Symbol, T)], sym: &Symbol) -> Result<&'a T, SymbolicError> {
    vars.iter()
        .find(|(s, _)| s == sym)
        .map(|(_, v)| v)
        .ok_or_else(|| SymbolicError::UnboundSymbol {
            name: sym.name().to_string(),
        })
}

/// Lexicographic monomial order over exponent lists, with symbols earlier in name order
/// taking precedence. For symbols `s < t`: `1 < t < t² < s < s*t < s²`.
///
/// This is a monomial order (compatible with multiplication), which keeps sorted term lists
/// sorted under multiplication by a monomial and makes leading terms well defined.
pub(crate) fn lex_cmp(a: &[(Symbol, u32)], b: &[(Symbol, u32)]) -> Ordering {
    let mut a_iter = a.iter();
    let mut b_iter = b.iter();
    loop {
        match (a_iter.next(), b_iter.next()) {
            (None, None) => return Ordering::Equal,
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (Some((sa, ea)), Some((sb, eb))) => match sa.cmp(sb) {
                // `a` has a positive exponent for an earlier symbol that `b` lacks.
                Ordering::Less => return Ordering::Greater,
                Ordering::Greater => return Ordering::Less,
                Ordering::Equal => match ea.cmp(eb) {
                    Ordering::Equal => continue,
                    ord => return ord,
                },
            },
        }
    }
}

impl Ord for Monomial {
    fn cmp(&self, other: &Self) -> Ordering {
        match lex_cmp(&self.powers, &other.powers) {
            Ordering::Equal => self.coeff.cmp(&other.coeff),
            ord => ord,
        }
    }
}

impl PartialOrd for Monomial {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl core::fmt::Display for Monomial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.coeff.is_negative() {
            f.write_str("-")?;
        }
        self.fmt_abs(f)
    }
}

impl core::fmt::Debug for Monomial {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use assertables::assert_ok;

    use super::*;
    use crate::{
        MultivarPoly,
        test_utils::{int, rat, sym},
    };

    #[test]
    fn build_monomial_normalizes_powers() {
        let monomial = Monomial::new(
            int(3),
            [(sym("t"), 1), (sym("s"), 1), (sym("u"), 0), (sym("s"), 2)],
        );
        assert_eq!(monomial.coeff, int(3));
        assert_eq!(monomial.exp(&sym("s")), 3);
        assert_eq!(monomial.exp(&sym("t")), 1);
        assert_eq!(monomial.exp(&sym("u")), 0);
        assert_eq!(monomial.total_degree(), 4);
        assert_eq!(monomial.powers().count(), 2);
    }

    #[test]
    fn lex_order() {
        let s = sym("s");
        let t = sym("t");
        let ordered = [
            Monomial::constant(int(1)),
            Monomial::new(int(1), [(t.clone(), 1)]),
            Monomial::new(int(1), [(t.clone(), 2)]),
            Monomial::new(int(1), [(s.clone(), 1)]),
            Monomial::new(int(1), [(s.clone(), 1), (t.clone(), 1)]),
            Monomial::new(int(1), [(s.clone(), 2)]),
        ];
        for pair in ordered.windows(2) {
            assert_eq!(
                lex_cmp(&pair[0].powers, &pair[1].powers),
                Ordering::Less,
                "{} < {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn lex_order_is_multiplicative() {
        let s = sym("s");
        let t = sym("t");
        let a = Monomial::new(int(1), [(t.clone(), 3)]);
        let b = Monomial::new(int(1), [(s.clone(), 1)]);
        let c = Monomial::new(int(1), [(s.clone(), 2), (t.clone(), 1)]);
        assert_eq!(lex_cmp(&a.powers, &b.powers), Ordering::Less);
        assert_eq!(
            lex_cmp(&a.mul(&c).powers, &b.mul(&c).powers),
            Ordering::Less
        );
    }

    #[test]
    fn mul_and_div() {
        let s = sym("s");
        let t = sym("t");
        let a = Monomial::new(rat(3, 2), [(s.clone(), 2)]);
        let b = Monomial::new(int(4), [(s.clone(), 1), (t.clone(), 1)]);

        let product = a.mul(&b);
        assert_eq!(product, Monomial::new(int(6), [(s.clone(), 3), (t.clone(), 1)]));

        assert_eq!(product.div(&b), Some(a.clone()));
        assert_eq!(a.div(&b), None);
    }

    #[test]
    fn exp_all_le() {
        let s = sym("s");
        let t = sym("t");
        let small = Monomial::new(int(2), [(s.clone(), 1)]);
        let big = Monomial::new(int(5), [(s.clone(), 2), (t.clone(), 1)]);
        assert!(small.exp_all_le(&big));
        assert!(!big.exp_all_le(&small));
        assert!(Monomial::constant(int(7)).exp_all_le(&small));
    }

    #[test]
    fn sub_polys_affine() {
        let s = sym("s");
        let t = sym("t");
        let u = sym("u");
        let monomial = Monomial::new(int(3), [(s.clone(), 2), (t.clone(), 1)]);
        // s = 1 - u
        let subs = [(s.clone(), MultivarPoly::one() - MultivarPoly::symbol(&u))];

        let result = monomial.sub_polys(&subs);

        let expected = MultivarPoly::from_monomials([
            Monomial::new(int(3), [(t.clone(), 1)]),
            Monomial::new(int(-6), [(u.clone(), 1), (t.clone(), 1)]),
            Monomial::new(int(3), [(u.clone(), 2), (t.clone(), 1)]),
        ]);
        assert_eq!(result, expected);
    }

    #[test]
    fn eval_exact_and_float() {
        let s = sym("s");
        let t = sym("t");
        let monomial = Monomial::new(rat(1, 2), [(s.clone(), 2), (t.clone(), 1)]);

        let exact = assert_ok!(monomial.eval_exact(&[(s.clone(), int(3)), (t.clone(), rat(2, 3))]));
        assert_eq!(exact, int(3));

        let float = assert_ok!(monomial.eval(&[(s.clone(), 3.0), (t.clone(), 0.5)]));
        approx::assert_abs_diff_eq!(float, 2.25);
    }

    #[test]
    fn eval_unbound_symbol() {
        let monomial = Monomial::new(int(1), [(sym("s"), 1)]);
        let result = monomial.eval_exact(&[(sym("t"), int(1))]);
        assert!(matches!(
            result,
            Err(SymbolicError::UnboundSymbol { name }) if name == "s"
        ));
    }

    #[test]
    fn display() {
        let s = sym("s");
        let t = sym("t");
        let monomial = Monomial::new(int(-3), [(s.clone(), 2), (t.clone(), 1)]);
        assert_eq!(monomial.to_string(), "-3*s²*t");
        assert_eq!(Monomial::new(int(1), [(s, 1)]).to_string(), "s");
        assert_eq!(Monomial::constant(rat(-5, 2)).to_string(), "-5/2");
    }
}
