// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Assignability, implicit widening and operand unification.

use tpl_ast::node::{CastKind, Literal, UnaryOp};
use tpl_ast::types::BuiltinKind;
use tpl_ast::{NodeId, NodeKind, TypeId, TypeTable};

use crate::sema::Sema;

/// The cast that widens `from` to `to` without losing information, if any.
///
/// Integers widen within their signedness, and unsigned integers widen to
/// strictly larger signed ones. Any integer converts to a float, and
/// `float32` widens to `float64`.
pub fn widening_cast(types: &TypeTable, from: TypeId, to: TypeId) -> Option<CastKind> {
    let from = types.builtin_kind(from)?;
    let to = types.builtin_kind(to)?;
    let from_size = from.size()?;
    let to_size = to.size()?;

    if from.is_integer() && to.is_integer() {
        let widens = if from.is_signed_integer() == to.is_signed_integer() {
            to_size > from_size
        } else {
            from.is_unsigned_integer() && to_size > from_size
        };
        return widens.then_some(CastKind::IntegralCast);
    }
    if from.is_integer() && to.is_float() {
        return Some(CastKind::IntToFloat);
    }
    if from == BuiltinKind::Float32 && to == BuiltinKind::Float64 {
        return Some(CastKind::FloatWiden);
    }
    None
}

/// Whether `value` is representable in the integer type `kind`.
fn fits(value: i64, kind: BuiltinKind) -> bool {
    let (min, max): (i128, i128) = match kind {
        BuiltinKind::Int8 => (i8::MIN.into(), i8::MAX.into()),
        BuiltinKind::Int16 => (i16::MIN.into(), i16::MAX.into()),
        BuiltinKind::Int32 => (i32::MIN.into(), i32::MAX.into()),
        BuiltinKind::Int64 => (i64::MIN.into(), i64::MAX.into()),
        BuiltinKind::UInt8 => (0, u8::MAX.into()),
        BuiltinKind::UInt16 => (0, u16::MAX.into()),
        BuiltinKind::UInt32 => (0, u32::MAX.into()),
        BuiltinKind::UInt64 => (0, u64::MAX.into()),
        _ => return false,
    };
    (min..=max).contains(&i128::from(value))
}

impl Sema<'_> {
    /// Make the expression at `id` acceptable where a `target` is expected,
    /// wrapping it in an implicit cast if it needs widening.
    ///
    /// Returns false if the value cannot be converted. Expressions that have
    /// no type (because of an earlier error) are accepted silently.
    pub(crate) fn coerce(&mut self, id: NodeId, target: TypeId) -> bool {
        let Some(source) = self.ctx.ty(id) else {
            return true;
        };
        if source == target {
            return true;
        }
        let types = self.ctx.types();
        if types.is_nil(source) && types.is_pointer(target) {
            return true;
        }
        if self.retype_int_literal(id, target) {
            return true;
        }
        match widening_cast(self.ctx.types(), source, target) {
            Some(cast) => {
                self.ctx.wrap_in_implicit_cast(id, cast, target);
                true
            }
            None => false,
        }
    }

    /// Integer literals (optionally negated) take on any integer type that
    /// can hold their value, without a cast.
    pub(crate) fn retype_int_literal(&mut self, id: NodeId, target: TypeId) -> bool {
        let Some(kind) = self.ctx.types().builtin_kind(target) else {
            return false;
        };
        let (value, literal) = match self.ctx.kind(id) {
            NodeKind::LitExpr { lit: Literal::Int { value, .. } } => (*value, id),
            NodeKind::UnaryOpExpr { op: UnaryOp::Neg, expr } => match self.ctx.kind(*expr) {
                NodeKind::LitExpr { lit: Literal::Int { value, .. } } => (value.wrapping_neg(), *expr),
                _ => return false,
            },
            _ => return false,
        };
        if !kind.is_integer() || !fits(value, kind) {
            return false;
        }
        self.ctx.set_ty(literal, target);
        self.ctx.set_ty(id, target);
        true
    }

    /// Bring two numeric operands to a common type. Returns that type, or
    /// `None` if neither side converts to the other.
    pub(crate) fn unify_numeric(&mut self, left: NodeId, right: NodeId) -> Option<TypeId> {
        let (lt, rt) = (self.ctx.ty(left)?, self.ctx.ty(right)?);
        if lt == rt {
            return Some(lt);
        }
        if self.retype_int_literal(right, lt) {
            return Some(lt);
        }
        if self.retype_int_literal(left, rt) {
            return Some(rt);
        }
        if let Some(cast) = widening_cast(self.ctx.types(), lt, rt) {
            self.ctx.wrap_in_implicit_cast(left, cast, rt);
            return Some(rt);
        }
        if let Some(cast) = widening_cast(self.ctx.types(), rt, lt) {
            self.ctx.wrap_in_implicit_cast(right, cast, lt);
            return Some(lt);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_widening() {
        let t = TypeTable::new();
        let b = |k| t.builtin(k);
        use BuiltinKind::*;

        assert_eq!(widening_cast(&t, b(Int8), b(Int32)), Some(CastKind::IntegralCast));
        assert_eq!(widening_cast(&t, b(UInt8), b(UInt64)), Some(CastKind::IntegralCast));
        assert_eq!(widening_cast(&t, b(UInt16), b(Int32)), Some(CastKind::IntegralCast));
        assert_eq!(widening_cast(&t, b(UInt32), b(Int32)), None);
        assert_eq!(widening_cast(&t, b(Int8), b(UInt64)), None);
        assert_eq!(widening_cast(&t, b(Int64), b(Int32)), None);
    }

    #[test]
    fn float_widening() {
        let t = TypeTable::new();
        let b = |k| t.builtin(k);
        use BuiltinKind::*;

        assert_eq!(widening_cast(&t, b(Int32), b(Float32)), Some(CastKind::IntToFloat));
        assert_eq!(widening_cast(&t, b(Float32), b(Float64)), Some(CastKind::FloatWiden));
        assert_eq!(widening_cast(&t, b(Float64), b(Float32)), None);
        assert_eq!(widening_cast(&t, b(Float32), b(Int64)), None);
        assert_eq!(widening_cast(&t, b(Bool), b(Int32)), None);
        assert_eq!(widening_cast(&t, b(String), b(Int32)), None);
    }

    #[test]
    fn literal_ranges() {
        assert!(fits(127, BuiltinKind::Int8));
        assert!(!fits(128, BuiltinKind::Int8));
        assert!(fits(-128, BuiltinKind::Int8));
        assert!(!fits(-1, BuiltinKind::UInt64));
        assert!(fits(i64::MAX, BuiltinKind::UInt64));
        assert!(!fits(1, BuiltinKind::Float32));
    }
}
