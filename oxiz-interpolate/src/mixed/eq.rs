//! Mixed equalities.

use oxiz_core::ast::traversal::{rewrite, substitute_one, Visit};
use oxiz_core::ast::{TermId, TermKind, TermManager};
use oxiz_core::error::Result;

/// `I1[I2[s]]` for `I1[EqMarker(x, s)]` and `I2(x)`.
///
/// `eq_interpolant` belongs to the clause containing the equality,
/// `neq_interpolant` to the clause containing its negation. Every marker
/// on `aux` becomes a copy of `neq_interpolant` with `aux` replaced by the
/// marker's term. Substitution also reaches into `LaAnnot` wrappers.
pub fn mixed_eq_interpolate(
    tm: &mut TermManager,
    eq_interpolant: TermId,
    neq_interpolant: TermId,
    aux: TermId,
) -> Result<TermId> {
    rewrite(tm, eq_interpolant, |tm, id| match *tm.kind(id) {
        TermKind::EqMarker(var, replacement) if var == aux => Ok(Visit::Replace(substitute_one(
            tm,
            neq_interpolant,
            aux,
            replacement,
        ))),
        _ => Ok(Visit::Descend),
    })
}
