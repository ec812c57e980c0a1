/// Iterates over the barycentric multi-indices `[i, j, k]` of a triangular patch of the
/// given degree, with `i + j + k == degree`.
///
/// The order is the canonical control point numbering of triangular patches: `k` is the
/// outer index and `j` the inner one, both ascending, and `i = degree - j - k`. For degree 2:
///
/// ```text
/// [2, 0, 0], [1, 1, 0], [0, 2, 0], [1, 0, 1], [0, 1, 1], [0, 0, 2]
/// ```
pub fn triangle_indices(degree: u32) -> impl Iterator<Item = [u32; 3]> {
    let mut j = 0;
    let mut k = 0;
    let mut done = false;

    std::iter::from_fn(move || {
        if done {
            return None;
        }

        let current = [degree - j - k, j, k];

        // Increment indices
        if j < degree - k {
            j += 1;
        } else if k < degree {
            j = 0;
            k += 1;
        } else {
            done = true;
        }

        Some(current)
    })
}

/// Number of control points of a triangular patch, `(degree + 1)(degree + 2) / 2`.
pub fn triangle_len(degree: u32) -> usize {
    let n = degree as usize;
    (n + 1) * (n + 2) / 2
}
