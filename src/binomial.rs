use num_bigint::BigUint;
use num_traits::{One, Zero};

/// Product of binomial coefficients `C(ns[0], ks[0]) * C(ns[1], ks[1]) * ...`
pub fn binomial_product<const N: usize>(ns: [u32; N], ks: [u32; N]) -> BigUint {
    let mut product = BigUint::one();
    for i in 0..ns.len() {
        product *= binomial_coefficient(ns[i], ks[i]);
    }
    product
}

/// Exact binomial coefficient `C(n, k)`, zero when `k > n`.
pub fn binomial_coefficient(n: u32, mut k: u32) -> BigUint {
    if k > n {
        return BigUint::zero();
    }
    k = k.min(n - k);
    let mut res = BigUint::one();
    // Each partial product res * (n - i) / (i + 1) is itself a binomial, so the division is exact.
    for i in 0..k {
        res = res * (n - i) / (i + 1);
    }
    res
}
