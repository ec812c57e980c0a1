use crate::{MultivarPoly, Symbol, SymbolicError};

/// Sylvester matrix of `p` and `q` with respect to `var`.
///
/// With `m = deg(p)` and `n = deg(q)` in `var`, the matrix is `(m + n) x (m + n)`: `n` shifted
/// rows of the coefficients of `p` followed by `m` shifted rows of those of `q`, highest degree
/// first. Entries are polynomials in the remaining symbols.
pub fn sylvester_matrix(p: &MultivarPoly, q: &MultivarPoly, var: &Symbol) -> Vec<Vec<MultivarPoly>> {
    let p_coeffs = p.coeffs_in(var);
    let q_coeffs = q.coeffs_in(var);
    let m = p_coeffs.len() - 1;
    let n = q_coeffs.len() - 1;
    let size = m + n;

    let mut matrix = vec![vec![MultivarPoly::new(); size]; size];
    for r in 0..n {
        for (k, coeff) in p_coeffs.iter().enumerate() {
            matrix[r][r + m - k] = coeff.clone();
        }
    }
    for r in 0..m {
        for (k, coeff) in q_coeffs.iter().enumerate() {
            matrix[n + r][r + n - k] = coeff.clone();
        }
    }
    matrix
}

/// Resultant of `p` and `q` with respect to `var`: a polynomial in the remaining symbols that
/// vanishes exactly where `p` and `q` share a root in `var`.
///
/// Computed as the determinant of the Sylvester matrix. The resultant with a zero polynomial
/// is zero, and two polynomials that do not involve `var` have resultant one.
pub fn resultant(
    p: &MultivarPoly,
    q: &MultivarPoly,
    var: &Symbol,
) -> Result<MultivarPoly, SymbolicError> {
    if p.is_zero() || q.is_zero() {
        return Ok(MultivarPoly::new());
    }
    let matrix = sylvester_matrix(p, q, var);
    log::debug!(
        "resultant in {}: degrees {} and {}, {}x{} Sylvester matrix",
        var,
        p.degree(var),
        q.degree(var),
        matrix.len(),
        matrix.len()
    );
    let det = determinant(matrix)?;
    log::debug!("resultant in {} has {} terms", var, det.num_terms());
    Ok(det)
}

/// Determinant by fraction-free (Bareiss) elimination.
///
/// Every intermediate entry is itself a minor of the input, so each division by the previous
/// pivot is exact and entries stay polynomial.
pub fn determinant(mut matrix: Vec<Vec<MultivarPoly>>) -> Result<MultivarPoly, SymbolicError> {
    let n = matrix.len();
    if n == 0 {
        return Ok(MultivarPoly::one());
    }
    if matrix.iter().any(|row| row.len() != n) {
        return Err(SymbolicError::AlgorithmError {
            message: format!("determinant of a non-square matrix with {} rows", n),
        });
    }

    let mut negate = false;
    let mut prev_pivot = MultivarPoly::one();
    for k in 0..n - 1 {
        if matrix[k][k].is_zero() {
            let Some(swap) = (k + 1..n).find(|&r| !matrix[r][k].is_zero()) else {
                return Ok(MultivarPoly::new());
            };
            matrix.swap(k, swap);
            negate = !negate;
        }

        for i in k + 1..n {
            for j in k + 1..n {
                let numer = &matrix[i][j] * &matrix[k][k] - &matrix[i][k] * &matrix[k][j];
                matrix[i][j] = numer.div_exact(&prev_pivot).ok_or_else(|| {
                    SymbolicError::AlgorithmError {
                        message: format!("inexact division at Bareiss step {}", k),
                    }
                })?;
            }
            matrix[i][k] = MultivarPoly::new();
        }
        prev_pivot = matrix[k][k].clone();
    }

    let det = matrix[n - 1][n - 1].clone();
    Ok(if negate { -det } else { det })
}
