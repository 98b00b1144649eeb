//! Operator-overload front-end.
//!
//! Rust reserves `&&`/`||` for short-circuit control flow and its
//! comparison operators must return `bool`, so boolean composition rides
//! on repurposed arithmetic and bitwise tokens instead:
//!
//! | token | on `Expr`       | on `Condition` |
//! |-------|-----------------|----------------|
//! | `+`   | addition        | OR             |
//! | `-`   | subtraction     |                |
//! | `*`   | multiplication  | AND            |
//! | `/`   | division        |                |
//! | `&`   |                 | AND            |
//! | `\|`  | concatenation   | OR             |
//! | `!`   |                 | NOT            |
//!
//! The mapping lives in [`EXPR_TOKENS`] and [`CONDITION_TOKENS`]; every
//! impl below consults the tables, so the substitution is auditable in
//! one place. Chained relational syntax (`a < b < c`) has no operator
//! form in Rust; use the comparison methods on [`Condition`] or the
//! [`chain`](crate::ast::chain) builder.

use crate::ast::{BinaryOp, Condition, Expr, LogicalOp, and_, lit, not_, or_};
use std::ops::{Add, BitAnd, BitOr, Div, Mul, Not, Sub};

/// Host operator tokens the front-end repurposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostToken {
    Add,
    Sub,
    Mul,
    Div,
    BitAnd,
    BitOr,
    Not,
}

/// Expression arithmetic: host token → SQL binary operator.
pub const EXPR_TOKENS: &[(HostToken, BinaryOp)] = &[
    (HostToken::Add, BinaryOp::Add),
    (HostToken::Sub, BinaryOp::Sub),
    (HostToken::Mul, BinaryOp::Mul),
    (HostToken::Div, BinaryOp::Div),
    (HostToken::BitOr, BinaryOp::Concat),
];

/// Boolean composition: host token → logical operation.
pub const CONDITION_TOKENS: &[(HostToken, LogicalOp)] = &[
    (HostToken::Mul, LogicalOp::And),
    (HostToken::BitAnd, LogicalOp::And),
    (HostToken::Add, LogicalOp::Or),
    (HostToken::BitOr, LogicalOp::Or),
    (HostToken::Not, LogicalOp::Not),
];

fn expr_op(token: HostToken) -> BinaryOp {
    EXPR_TOKENS
        .iter()
        .find(|(t, _)| *t == token)
        .map(|(_, op)| *op)
        .expect("host token missing from EXPR_TOKENS")
}

fn condition_op(token: HostToken) -> LogicalOp {
    CONDITION_TOKENS
        .iter()
        .find(|(t, _)| *t == token)
        .map(|(_, op)| *op)
        .expect("host token missing from CONDITION_TOKENS")
}

fn combine(token: HostToken, a: Condition, b: Condition) -> Condition {
    match condition_op(token) {
        LogicalOp::And => and_(a, b),
        LogicalOp::Or => or_(a, b),
        LogicalOp::Not => unreachable!("binary token {:?} mapped to unary NOT", token),
    }
}

// ==================== Arithmetic on Expr ====================

impl<R: Into<Expr>> Add<R> for Expr {
    type Output = Expr;

    fn add(self, rhs: R) -> Expr {
        self.binary(expr_op(HostToken::Add), rhs)
    }
}

impl<R: Into<Expr>> Sub<R> for Expr {
    type Output = Expr;

    fn sub(self, rhs: R) -> Expr {
        self.binary(expr_op(HostToken::Sub), rhs)
    }
}

impl<R: Into<Expr>> Mul<R> for Expr {
    type Output = Expr;

    fn mul(self, rhs: R) -> Expr {
        self.binary(expr_op(HostToken::Mul), rhs)
    }
}

impl<R: Into<Expr>> Div<R> for Expr {
    type Output = Expr;

    fn div(self, rhs: R) -> Expr {
        self.binary(expr_op(HostToken::Div), rhs)
    }
}

/// `|` is string concatenation on expressions, disjoint from numeric `+`.
impl<R: Into<Expr>> BitOr<R> for Expr {
    type Output = Expr;

    fn bitor(self, rhs: R) -> Expr {
        self.binary(expr_op(HostToken::BitOr), rhs)
    }
}

// Scalar-on-the-left forms: 703 * expr, 50 + expr.

impl Add<Expr> for i64 {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        lit(self).binary(expr_op(HostToken::Add), rhs)
    }
}

impl Sub<Expr> for i64 {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        lit(self).binary(expr_op(HostToken::Sub), rhs)
    }
}

impl Mul<Expr> for i64 {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        lit(self).binary(expr_op(HostToken::Mul), rhs)
    }
}

impl Div<Expr> for i64 {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        lit(self).binary(expr_op(HostToken::Div), rhs)
    }
}

impl Add<Expr> for f64 {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        lit(self).binary(expr_op(HostToken::Add), rhs)
    }
}

impl Sub<Expr> for f64 {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        lit(self).binary(expr_op(HostToken::Sub), rhs)
    }
}

impl Mul<Expr> for f64 {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        lit(self).binary(expr_op(HostToken::Mul), rhs)
    }
}

impl Div<Expr> for f64 {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        lit(self).binary(expr_op(HostToken::Div), rhs)
    }
}

// ==================== Boolean composition on Condition ====================

impl Mul for Condition {
    type Output = Condition;

    fn mul(self, rhs: Condition) -> Condition {
        combine(HostToken::Mul, self, rhs)
    }
}

impl BitAnd for Condition {
    type Output = Condition;

    fn bitand(self, rhs: Condition) -> Condition {
        combine(HostToken::BitAnd, self, rhs)
    }
}

impl Add for Condition {
    type Output = Condition;

    fn add(self, rhs: Condition) -> Condition {
        combine(HostToken::Add, self, rhs)
    }
}

impl BitOr for Condition {
    type Output = Condition;

    fn bitor(self, rhs: Condition) -> Condition {
        combine(HostToken::BitOr, self, rhs)
    }
}

impl Not for Condition {
    type Output = Condition;

    fn not(self) -> Condition {
        match condition_op(HostToken::Not) {
            LogicalOp::Not => not_(self),
            other => unreachable!("unary token '!' mapped to binary {:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::col;

    #[test]
    fn test_condition_token_table() {
        assert_eq!(
            CONDITION_TOKENS,
            &[
                (HostToken::Mul, LogicalOp::And),
                (HostToken::BitAnd, LogicalOp::And),
                (HostToken::Add, LogicalOp::Or),
                (HostToken::BitOr, LogicalOp::Or),
                (HostToken::Not, LogicalOp::Not),
            ]
        );
    }

    #[test]
    fn test_expr_token_table() {
        assert_eq!(
            EXPR_TOKENS,
            &[
                (HostToken::Add, BinaryOp::Add),
                (HostToken::Sub, BinaryOp::Sub),
                (HostToken::Mul, BinaryOp::Mul),
                (HostToken::Div, BinaryOp::Div),
                (HostToken::BitOr, BinaryOp::Concat),
            ]
        );
    }

    #[test]
    fn test_mul_is_and() {
        let cond = col("a").is_null() * col("b").is_null();
        assert!(matches!(cond, Condition::And(ref v) if v.len() == 2));
        let cond = col("a").is_null() & col("b").is_null();
        assert!(matches!(cond, Condition::And(ref v) if v.len() == 2));
    }

    #[test]
    fn test_add_is_or() {
        let cond = col("a").is_null() + col("b").is_null();
        assert!(matches!(cond, Condition::Or(ref v) if v.len() == 2));
        let cond = col("a").is_null() | col("b").is_null();
        assert!(matches!(cond, Condition::Or(ref v) if v.len() == 2));
    }

    #[test]
    fn test_bang_is_not() {
        let cond = !col("a").is_null();
        assert!(matches!(cond, Condition::Not(_)));
    }

    #[test]
    fn test_expr_arithmetic_tokens() {
        let e = col("weight") / col("height").pow(2) * 703;
        assert!(matches!(e, Expr::Binary { op: BinaryOp::Mul, .. }));
        let e = col("first") | " " | col("last");
        assert!(matches!(e, Expr::Binary { op: BinaryOp::Concat, .. }));
    }

    #[test]
    fn test_scalar_on_the_left() {
        let e = 703 * col("bmi");
        assert!(matches!(e, Expr::Binary { op: BinaryOp::Mul, .. }));
        let e = 2.5 * col("x");
        assert!(matches!(e, Expr::Binary { op: BinaryOp::Mul, .. }));
    }
}
