//! SMT-LIB style printing of terms.

use super::{TermId, TermKind, TermManager};
use crate::sort::{SortId, SortKind};
use std::fmt;

/// A term paired with its manager, printable with `{}`.
pub struct TermDisplay<'a> {
    tm: &'a TermManager,
    id: TermId,
}

impl TermManager {
    /// Printable view of a term.
    #[must_use]
    pub fn display(&self, id: TermId) -> TermDisplay<'_> {
        TermDisplay { tm: self, id }
    }

    /// SMT-LIB name of a sort.
    #[must_use]
    pub fn sort_name(&self, sort: SortId) -> String {
        struct SortName<'a>(&'a TermManager, SortId);
        impl fmt::Display for SortName<'_> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.write_sort(f, self.1)
            }
        }
        SortName(self, sort).to_string()
    }

    fn write_sort(&self, f: &mut fmt::Formatter<'_>, sort: SortId) -> fmt::Result {
        match self.sorts.get(sort).map(|s| &s.kind) {
            Some(SortKind::Bool) => write!(f, "Bool"),
            Some(SortKind::Int) => write!(f, "Int"),
            Some(SortKind::Real) => write!(f, "Real"),
            Some(SortKind::Array { domain, range }) => {
                write!(f, "(Array ")?;
                self.write_sort(f, *domain)?;
                write!(f, " ")?;
                self.write_sort(f, *range)?;
                write!(f, ")")
            }
            Some(SortKind::Uninterpreted(name)) => write!(f, "{}", self.resolve(*name)),
            None => write!(f, "?{}", sort.raw()),
        }
    }

    fn write_app(&self, f: &mut fmt::Formatter<'_>, op: &str, args: &[TermId]) -> fmt::Result {
        write!(f, "({op}")?;
        for &arg in args {
            write!(f, " ")?;
            self.write_term(f, arg)?;
        }
        write!(f, ")")
    }

    fn write_term(&self, f: &mut fmt::Formatter<'_>, id: TermId) -> fmt::Result {
        let Some(term) = self.get(id) else {
            return write!(f, "?t{}", id.raw());
        };
        match &term.kind {
            TermKind::True => write!(f, "true"),
            TermKind::False => write!(f, "false"),
            TermKind::IntConst(n) if n.sign() == num_bigint::Sign::Minus => {
                write!(f, "(- {})", n.magnitude())
            }
            TermKind::IntConst(n) => write!(f, "{n}"),
            TermKind::RealConst(r) => {
                let negative = r.numer().sign() == num_bigint::Sign::Minus;
                let numer = r.numer().magnitude();
                let body = if r.is_integer() {
                    format!("{numer}.0")
                } else {
                    format!("(/ {numer} {})", r.denom())
                };
                if negative {
                    write!(f, "(- {body})")
                } else {
                    write!(f, "{body}")
                }
            }
            TermKind::Var(name) | TermKind::BoundVar(name) => write!(f, "{}", self.resolve(*name)),
            TermKind::Not(a) => self.write_app(f, "not", &[*a]),
            TermKind::And(args) => self.write_app(f, "and", args),
            TermKind::Or(args) => self.write_app(f, "or", args),
            TermKind::Implies(a, b) => self.write_app(f, "=>", &[*a, *b]),
            TermKind::Ite(c, t, e) => self.write_app(f, "ite", &[*c, *t, *e]),
            TermKind::Eq(a, b) => self.write_app(f, "=", &[*a, *b]),
            TermKind::Add(args) => self.write_app(f, "+", args),
            TermKind::Sub(a, b) => self.write_app(f, "-", &[*a, *b]),
            TermKind::Neg(a) => self.write_app(f, "-", &[*a]),
            TermKind::Mul(args) => self.write_app(f, "*", args),
            TermKind::Div(a, b) if term.sort == self.sorts.int_sort => {
                self.write_app(f, "div", &[*a, *b])
            }
            TermKind::Div(a, b) => self.write_app(f, "/", &[*a, *b]),
            TermKind::Le(a, b) => self.write_app(f, "<=", &[*a, *b]),
            TermKind::Lt(a, b) => self.write_app(f, "<", &[*a, *b]),
            TermKind::Ge(a, b) => self.write_app(f, ">=", &[*a, *b]),
            TermKind::Gt(a, b) => self.write_app(f, ">", &[*a, *b]),
            TermKind::Select(a, i) => self.write_app(f, "select", &[*a, *i]),
            TermKind::Store(a, i, v) => self.write_app(f, "store", &[*a, *i, *v]),
            TermKind::Apply { func, args } => self.write_app(f, self.resolve(*func), args),
            TermKind::EqMarker(a, b) => self.write_app(f, "@EQ", &[*a, *b]),
            TermKind::Let { bindings, body } => {
                write!(f, "(let (")?;
                for (i, (name, value)) in bindings.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "({} ", self.resolve(*name))?;
                    self.write_term(f, *value)?;
                    write!(f, ")")?;
                }
                write!(f, ") ")?;
                self.write_term(f, *body)?;
                write!(f, ")")
            }
            TermKind::Forall { vars, body } | TermKind::Exists { vars, body } => {
                let q = if matches!(term.kind, TermKind::Forall { .. }) {
                    "forall"
                } else {
                    "exists"
                };
                write!(f, "({q} (")?;
                for (i, (name, sort)) in vars.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "({} ", self.resolve(*name))?;
                    self.write_sort(f, *sort)?;
                    write!(f, ")")?;
                }
                write!(f, ") ")?;
                self.write_term(f, *body)?;
                write!(f, ")")
            }
            TermKind::LaAnnot(la) => {
                write!(f, "(! ")?;
                self.write_term(f, la.formula)?;
                write!(f, " :LA ((+")?;
                for (t, c) in la.s.summands() {
                    write!(f, " (* {c} ")?;
                    self.write_term(f, t)?;
                    write!(f, ")")?;
                }
                write!(f, " {}) {}))", la.s.constant(), la.k)
            }
        }
    }
}

impl fmt::Display for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.tm.write_term(f, self.id)
    }
}

impl fmt::Debug for TermDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
