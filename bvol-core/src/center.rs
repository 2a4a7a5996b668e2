use crate::elements::is_metallic;
use crate::error::{BvolError, Result};

/// Picks the atom the measurement sphere is centered on.
///
/// The first metallic atom in file order wins. Without one, the first
/// user-supplied fallback index is used as-is; it is not range-checked here,
/// the measurement engine rejects indices outside the structure.
pub fn resolve_center<S: AsRef<str>>(elements: &[S], fallback: &[usize]) -> Result<usize> {
    if let Some(idx) = elements.iter().position(|e| is_metallic(e.as_ref())) {
        return Ok(idx);
    }
    fallback.first().copied().ok_or(BvolError::NoCenterAtomFound)
}
