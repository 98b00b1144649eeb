//! Tree-to-SQL rendering.
//!
//! A single recursive descent over the expression/condition tree produces
//! a [`Fragment`]: SQL text with `?` placeholders plus the bound values in
//! placeholder order. Rendering never mutates a node; the fragment is the
//! only state and is owned by one render call.

use crate::ast::{CmpOp, Condition, Expr, LogicalOp, MembershipSource, Value};
use serde::{Deserialize, Serialize};

/// A rendered SQL fragment: text plus its bound parameters.
///
/// The i-th `?` in `sql` (left to right) binds `params[i]`. The same type
/// carries caller-supplied subqueries, which are treated as opaque
/// pre-rendered fragments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Fragment {
    pub fn new<V: Into<Value>>(
        sql: impl Into<String>,
        params: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            sql: sql.into(),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Emit one placeholder and bind `value` to it. Placeholder and
    /// parameter are appended together, so their order cannot diverge.
    pub fn push_param(&mut self, value: Value) {
        self.sql.push('?');
        self.params.push(value);
    }

    /// Number of `?` placeholders in the text.
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }

    /// The `(sql, params)` pair by value.
    pub fn into_pair(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }
}

/// Render a node to parameterized SQL. Total for well-formed trees.
pub trait ToSql {
    /// Write this node into `frag` in root form, without outer
    /// parentheses. Nested nodes are parenthesized by their parent.
    fn write_sql(&self, frag: &mut Fragment);

    /// Render to a fresh fragment.
    fn to_sql(&self) -> Fragment {
        let mut frag = Fragment::default();
        self.write_sql(&mut frag);
        frag
    }

    /// Render and keep only the SQL text.
    fn to_sql_string(&self) -> String {
        self.to_sql().sql
    }
}

impl Expr {
    /// Write as an operand of an enclosing node. Binary arithmetic is
    /// always parenthesized when nested; leaves and calls never need it.
    fn write_operand(&self, frag: &mut Fragment) {
        if matches!(self, Expr::Binary { .. }) {
            frag.sql.push('(');
            self.write_sql(frag);
            frag.sql.push(')');
        } else {
            self.write_sql(frag);
        }
    }
}

impl ToSql for Expr {
    fn write_sql(&self, frag: &mut Fragment) {
        match self {
            Expr::Column(name) => frag.sql.push_str(name),
            Expr::Literal(Value::Null) => frag.sql.push_str("NULL"),
            Expr::Literal(value) => frag.push_param(value.clone()),
            Expr::Binary { left, op, right } => {
                left.write_operand(frag);
                frag.sql.push(' ');
                frag.sql.push_str(op.sql_symbol());
                frag.sql.push(' ');
                right.write_operand(frag);
            }
            Expr::FunctionCall { name, args } => {
                frag.sql.push_str(name);
                frag.sql.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        frag.sql.push_str(", ");
                    }
                    arg.write_operand(frag);
                }
                frag.sql.push(')');
            }
        }
    }
}

impl ToSql for Condition {
    fn write_sql(&self, frag: &mut Fragment) {
        match self {
            Condition::Comparison { left, op, right } => {
                write_comparison(frag, left, *op, right);
            }
            Condition::NullCheck { expr, negated } => {
                expr.write_operand(frag);
                frag.sql
                    .push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Condition::Membership {
                expr,
                negated,
                source,
            } => {
                expr.write_operand(frag);
                frag.sql.push_str(if *negated { " NOT IN (" } else { " IN (" });
                match source {
                    MembershipSource::List(values) => {
                        for (i, value) in values.iter().enumerate() {
                            if i > 0 {
                                frag.sql.push_str(", ");
                            }
                            frag.push_param(value.clone());
                        }
                    }
                    // Opaque splice: the subquery's own placeholders are
                    // already in its text, so its params land exactly here.
                    MembershipSource::Subquery(sub) => {
                        frag.sql.push_str(&sub.sql);
                        frag.params.extend(sub.params.iter().cloned());
                    }
                }
                frag.sql.push(')');
            }
            Condition::Pattern {
                expr,
                negated,
                pattern,
            } => {
                expr.write_operand(frag);
                frag.sql
                    .push_str(if *negated { " NOT LIKE " } else { " LIKE " });
                pattern.write_operand(frag);
            }
            Condition::And(operands) => write_joined(frag, operands, LogicalOp::And),
            Condition::Or(operands) => write_joined(frag, operands, LogicalOp::Or),
            Condition::Not(operand) => {
                frag.sql.push_str(LogicalOp::Not.sql_symbol());
                frag.sql.push_str(" (");
                operand.write_sql(frag);
                frag.sql.push(')');
            }
            Condition::Chain { terms, ops } => {
                for (i, op) in ops.iter().enumerate() {
                    if i > 0 {
                        frag.sql.push_str(" AND ");
                    }
                    frag.sql.push('(');
                    write_comparison(frag, &terms[i], *op, &terms[i + 1]);
                    frag.sql.push(')');
                }
            }
        }
    }
}

fn write_comparison(frag: &mut Fragment, left: &Expr, op: CmpOp, right: &Expr) {
    left.write_operand(frag);
    frag.sql.push(' ');
    frag.sql.push_str(op.sql_symbol());
    frag.sql.push(' ');
    right.write_operand(frag);
}

/// Join operands with the logical keyword, parenthesizing every operand.
fn write_joined(frag: &mut Fragment, operands: &[Condition], op: LogicalOp) {
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            frag.sql.push(' ');
            frag.sql.push_str(op.sql_symbol());
            frag.sql.push(' ');
        }
        frag.sql.push('(');
        operand.write_sql(frag);
        frag.sql.push(')');
    }
}
