use std::sync::Arc;

/// A named algebraic variable, such as the curve parameter `s` or the ambient coordinate `x`.
///
/// Symbols are identified by name: two symbols created separately with the same name are the
/// same variable. Ordering is by name, which also fixes the variable precedence of the
/// lexicographic monomial order used by [`crate::MultivarPoly`].
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(Arc<str>);

impl Symbol {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Symbol {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl core::fmt::Debug for Symbol {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
