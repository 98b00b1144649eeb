use crate::ast::{Expr, Value, lit};
use crate::error::{ExprSqlError, ExprSqlResult};
use crate::render::Fragment;
use serde::{Deserialize, Serialize};

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
    Ne,
}

impl CmpOp {
    /// SQL token for this operator - single source of truth.
    pub fn sql_symbol(&self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Lte => "<=",
            CmpOp::Gt => ">",
            CmpOp::Gte => ">=",
            CmpOp::Eq => "=",
            CmpOp::Ne => "!=",
        }
    }

    /// Parse a comparison token. Accepts the `==`/`<>` spellings as well.
    pub fn from_token(token: &str) -> Option<CmpOp> {
        match token {
            "<" => Some(CmpOp::Lt),
            "<=" => Some(CmpOp::Lte),
            ">" => Some(CmpOp::Gt),
            ">=" => Some(CmpOp::Gte),
            "=" | "==" => Some(CmpOp::Eq),
            "!=" | "<>" => Some(CmpOp::Ne),
            _ => None,
        }
    }
}

impl std::fmt::Display for CmpOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql_symbol())
    }
}

/// Logical combinators between conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
    Not,
}

impl LogicalOp {
    pub fn sql_symbol(&self) -> &'static str {
        match self {
            LogicalOp::And => "AND",
            LogicalOp::Or => "OR",
            LogicalOp::Not => "NOT",
        }
    }
}

/// Where the values of a membership test come from: an explicit list or a
/// caller-supplied pre-rendered subquery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MembershipSource {
    List(Vec<Value>),
    Subquery(Fragment),
}

/// A condition: anything that evaluates to a boolean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// left op right
    Comparison { left: Expr, op: CmpOp, right: Expr },
    /// expr IS [NOT] NULL
    NullCheck { expr: Expr, negated: bool },
    /// expr [NOT] IN (...)
    Membership {
        expr: Expr,
        negated: bool,
        source: MembershipSource,
    },
    /// expr [NOT] LIKE pattern
    Pattern {
        expr: Expr,
        negated: bool,
        pattern: Expr,
    },
    /// Conjunction of two or more operands, flattened on construction.
    And(Vec<Condition>),
    /// Disjunction of two or more operands, flattened on construction.
    Or(Vec<Condition>),
    Not(Box<Condition>),
    /// Chained comparison over adjacent terms: terms[i] ops[i] terms[i+1],
    /// all ANDed. `terms.len() == ops.len() + 1`.
    Chain { terms: Vec<Expr>, ops: Vec<CmpOp> },
}

impl Condition {
    /// Checked comparison constructor. Rejects a NULL literal on either
    /// side: under three-valued logic `x = NULL` never matches, so the
    /// null-check constructors are the only route to null tests.
    pub fn compare(
        left: impl Into<Expr>,
        op: CmpOp,
        right: impl Into<Expr>,
    ) -> ExprSqlResult<Condition> {
        let (left, right) = (left.into(), right.into());
        if left.is_null_literal() || right.is_null_literal() {
            return Err(ExprSqlError::null_comparison(op));
        }
        Ok(Condition::Comparison { left, op, right })
    }

    /// General membership constructor. Exactly one of `values` and
    /// `subquery` must be given; the sugar on [`Expr`] (`isin`,
    /// `in_subquery`, ...) goes through the well-formed cases directly.
    pub fn membership(
        expr: impl Into<Expr>,
        negated: bool,
        values: Option<Vec<Value>>,
        subquery: Option<Fragment>,
    ) -> ExprSqlResult<Condition> {
        let source = match (values, subquery) {
            (Some(values), None) => MembershipSource::List(values),
            (None, Some(subquery)) => MembershipSource::Subquery(subquery),
            _ => return Err(ExprSqlError::AmbiguousMembershipSource),
        };
        Ok(Condition::Membership {
            expr: expr.into(),
            negated,
            source,
        })
    }
}

// ==================== Comparison and predicate sugar on Expr ====================

impl Expr {
    pub fn eq(self, other: impl Into<Expr>) -> ExprSqlResult<Condition> {
        Condition::compare(self, CmpOp::Eq, other)
    }

    pub fn ne(self, other: impl Into<Expr>) -> ExprSqlResult<Condition> {
        Condition::compare(self, CmpOp::Ne, other)
    }

    pub fn gt(self, other: impl Into<Expr>) -> ExprSqlResult<Condition> {
        Condition::compare(self, CmpOp::Gt, other)
    }

    pub fn gte(self, other: impl Into<Expr>) -> ExprSqlResult<Condition> {
        Condition::compare(self, CmpOp::Gte, other)
    }

    pub fn lt(self, other: impl Into<Expr>) -> ExprSqlResult<Condition> {
        Condition::compare(self, CmpOp::Lt, other)
    }

    pub fn lte(self, other: impl Into<Expr>) -> ExprSqlResult<Condition> {
        Condition::compare(self, CmpOp::Lte, other)
    }

    /// Inclusive range check: `(self >= low) AND (self <= high)`.
    ///
    /// # Example
    /// ```ignore
    /// col("age").between(18, 65)  // (age >= ?) AND (age <= ?)
    /// ```
    pub fn between(
        self,
        low: impl Into<Expr>,
        high: impl Into<Expr>,
    ) -> ExprSqlResult<Condition> {
        let lower = Condition::compare(self.clone(), CmpOp::Gte, low)?;
        let upper = Condition::compare(self, CmpOp::Lte, high)?;
        Ok(and_(lower, upper))
    }

    pub fn not_between(
        self,
        low: impl Into<Expr>,
        high: impl Into<Expr>,
    ) -> ExprSqlResult<Condition> {
        Ok(not_(self.between(low, high)?))
    }

    pub fn is_null(self) -> Condition {
        Condition::NullCheck {
            expr: self,
            negated: false,
        }
    }

    pub fn is_not_null(self) -> Condition {
        Condition::NullCheck {
            expr: self,
            negated: true,
        }
    }

    /// Membership in an explicit value list.
    ///
    /// # Example
    /// ```ignore
    /// col("age").isin([20, 30, 40])  // age IN (?, ?, ?)
    /// ```
    pub fn isin<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Condition {
        Condition::Membership {
            expr: self,
            negated: false,
            source: MembershipSource::List(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn not_in<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Condition {
        Condition::Membership {
            expr: self,
            negated: true,
            source: MembershipSource::List(values.into_iter().map(Into::into).collect()),
        }
    }

    /// Membership in a pre-rendered subquery. The subquery is opaque: its
    /// text is spliced verbatim and its params keep their internal order.
    ///
    /// # Example
    /// ```ignore
    /// col("employee_id").in_subquery("SELECT id FROM managers WHERE level > ?", vec![5])
    /// ```
    pub fn in_subquery<V: Into<Value>>(
        self,
        sql: impl Into<String>,
        params: impl IntoIterator<Item = V>,
    ) -> Condition {
        Condition::Membership {
            expr: self,
            negated: false,
            source: MembershipSource::Subquery(Fragment::new(sql, params)),
        }
    }

    pub fn not_in_subquery<V: Into<Value>>(
        self,
        sql: impl Into<String>,
        params: impl IntoIterator<Item = V>,
    ) -> Condition {
        Condition::Membership {
            expr: self,
            negated: true,
            source: MembershipSource::Subquery(Fragment::new(sql, params)),
        }
    }

    /// Pattern match. A literal pattern still renders as a placeholder.
    pub fn like(self, pattern: impl Into<Expr>) -> Condition {
        Condition::Pattern {
            expr: self,
            negated: false,
            pattern: pattern.into(),
        }
    }

    pub fn not_like(self, pattern: impl Into<Expr>) -> Condition {
        Condition::Pattern {
            expr: self,
            negated: true,
            pattern: pattern.into(),
        }
    }

    /// Sugar for `LIKE 'prefix%'`.
    pub fn starts_with(self, prefix: impl AsRef<str>) -> Condition {
        self.like(format!("{}%", prefix.as_ref()))
    }

    /// Sugar for `LIKE '%suffix'`.
    pub fn ends_with(self, suffix: impl AsRef<str>) -> Condition {
        self.like(format!("%{}", suffix.as_ref()))
    }
}

// ==================== Logical combination ====================

/// AND two conditions. Same-op operands flatten from both sides, so
/// `and_(and_(a, b), c)` and `and_(a, and_(b, c))` build the same node.
/// Duplicate operands are preserved.
pub fn and_(a: Condition, b: Condition) -> Condition {
    let mut operands = Vec::new();
    for c in [a, b] {
        match c {
            Condition::And(inner) => operands.extend(inner),
            other => operands.push(other),
        }
    }
    Condition::And(operands)
}

/// OR two conditions, flattening like [`and_`].
pub fn or_(a: Condition, b: Condition) -> Condition {
    let mut operands = Vec::new();
    for c in [a, b] {
        match c {
            Condition::Or(inner) => operands.extend(inner),
            other => operands.push(other),
        }
    }
    Condition::Or(operands)
}

/// Negate a condition. Double negation is kept as nested NOT nodes.
pub fn not_(c: Condition) -> Condition {
    Condition::Not(Box::new(c))
}

// ==================== Chained comparisons ====================

/// One element of an interleaved chain argument list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChainPart {
    Term(Expr),
    /// Raw comparison token, validated by [`chain`].
    Op(String),
}

impl From<Expr> for ChainPart {
    fn from(e: Expr) -> Self {
        ChainPart::Term(e)
    }
}

/// A string in a chain argument list is an operator token, never a term;
/// literal text terms go through `lit`.
impl From<&str> for ChainPart {
    fn from(token: &str) -> Self {
        ChainPart::Op(token.to_string())
    }
}

impl From<i64> for ChainPart {
    fn from(n: i64) -> Self {
        ChainPart::Term(lit(n))
    }
}

impl From<i32> for ChainPart {
    fn from(n: i32) -> Self {
        ChainPart::Term(lit(n))
    }
}

impl From<f64> for ChainPart {
    fn from(n: f64) -> Self {
        ChainPart::Term(lit(n))
    }
}

/// Build a chained comparison from an interleaved `term, op, term, op,
/// term, ...` list. Semantically the AND of each adjacent pair, never
/// left-to-right boolean chaining.
///
/// # Example
/// ```ignore
/// chain([col("a").into(), "<".into(), col("b").into(), "<=".into(), lit(10).into()])
/// // (a < b) AND (b <= ?)
/// ```
pub fn chain(parts: impl IntoIterator<Item = ChainPart>) -> ExprSqlResult<Condition> {
    let parts: Vec<ChainPart> = parts.into_iter().collect();
    if parts.len() < 3 || parts.len() % 2 == 0 {
        return Err(ExprSqlError::malformed_chain(format!(
            "expected term, op, term, ... with odd length of at least 3, got {} parts",
            parts.len()
        )));
    }
    let mut terms = Vec::with_capacity(parts.len() / 2 + 1);
    let mut ops = Vec::with_capacity(parts.len() / 2);
    for (i, part) in parts.into_iter().enumerate() {
        match (i % 2 == 0, part) {
            (true, ChainPart::Term(term)) => terms.push(term),
            (false, ChainPart::Op(token)) => {
                let op = CmpOp::from_token(&token).ok_or_else(|| {
                    ExprSqlError::malformed_chain(format!(
                        "'{}' is not a comparison operator",
                        token
                    ))
                })?;
                ops.push(op);
            }
            (true, ChainPart::Op(token)) => {
                return Err(ExprSqlError::malformed_chain(format!(
                    "expected a term at position {}, found operator '{}'",
                    i, token
                )));
            }
            (false, ChainPart::Term(_)) => {
                return Err(ExprSqlError::malformed_chain(format!(
                    "expected an operator at position {}, found a term",
                    i
                )));
            }
        }
    }
    // Every term participates in an adjacent comparison, so a NULL term is
    // a null comparison no matter where it sits.
    for (k, term) in terms.iter().enumerate() {
        if term.is_null_literal() {
            let op = if k == 0 { ops[0] } else { ops[k - 1] };
            return Err(ExprSqlError::null_comparison(op));
        }
    }
    Ok(Condition::Chain { terms, ops })
}

// ==================== Chain extension on Condition ====================
// A comparison applied to an existing comparison or chain grows the
// chain, capturing `a < b < c` as `(a < b) AND (b < c)`.

impl Condition {
    pub fn lt(self, rhs: impl Into<Expr>) -> ExprSqlResult<Condition> {
        self.extend_chain(CmpOp::Lt, rhs.into())
    }

    pub fn lte(self, rhs: impl Into<Expr>) -> ExprSqlResult<Condition> {
        self.extend_chain(CmpOp::Lte, rhs.into())
    }

    pub fn gt(self, rhs: impl Into<Expr>) -> ExprSqlResult<Condition> {
        self.extend_chain(CmpOp::Gt, rhs.into())
    }

    pub fn gte(self, rhs: impl Into<Expr>) -> ExprSqlResult<Condition> {
        self.extend_chain(CmpOp::Gte, rhs.into())
    }

    pub fn eq(self, rhs: impl Into<Expr>) -> ExprSqlResult<Condition> {
        self.extend_chain(CmpOp::Eq, rhs.into())
    }

    pub fn ne(self, rhs: impl Into<Expr>) -> ExprSqlResult<Condition> {
        self.extend_chain(CmpOp::Ne, rhs.into())
    }

    fn extend_chain(self, op: CmpOp, rhs: Expr) -> ExprSqlResult<Condition> {
        if rhs.is_null_literal() {
            return Err(ExprSqlError::null_comparison(op));
        }
        match self {
            Condition::Comparison {
                left,
                op: first,
                right,
            } => Ok(Condition::Chain {
                terms: vec![left, right, rhs],
                ops: vec![first, op],
            }),
            Condition::Chain { mut terms, mut ops } => {
                terms.push(rhs);
                ops.push(op);
                Ok(Condition::Chain { terms, ops })
            }
            _ => Err(ExprSqlError::invalid_operand(
                "only a comparison or a chain can be extended with another comparison",
            )),
        }
    }
}

/// Diagnostic form with values inlined; a chain prints as a mathematical
/// inequality. Use `ToSql` for executable SQL.
impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Condition::Comparison { left, op, right } => {
                write!(f, "{} {} {}", left, op, right)
            }
            Condition::NullCheck { expr, negated } => {
                write!(f, "{} IS {}NULL", expr, if *negated { "NOT " } else { "" })
            }
            Condition::Membership {
                expr,
                negated,
                source,
            } => {
                write!(f, "{} {}IN (", expr, if *negated { "NOT " } else { "" })?;
                match source {
                    MembershipSource::List(values) => {
                        for (i, v) in values.iter().enumerate() {
                            if i > 0 {
                                write!(f, ", ")?;
                            }
                            write!(f, "{}", v)?;
                        }
                    }
                    MembershipSource::Subquery(sub) => write!(f, "{}", sub.sql)?,
                }
                write!(f, ")")
            }
            Condition::Pattern {
                expr,
                negated,
                pattern,
            } => {
                write!(
                    f,
                    "{} {}LIKE {}",
                    expr,
                    if *negated { "NOT " } else { "" },
                    pattern
                )
            }
            Condition::And(operands) => write_joined_display(f, operands, LogicalOp::And),
            Condition::Or(operands) => write_joined_display(f, operands, LogicalOp::Or),
            Condition::Not(operand) => write!(f, "NOT ({})", operand),
            Condition::Chain { terms, ops } => {
                let Some(first) = terms.first() else {
                    return Ok(());
                };
                write!(f, "{}", first)?;
                for (op, term) in ops.iter().zip(&terms[1..]) {
                    write!(f, " {} {}", op, term)?;
                }
                Ok(())
            }
        }
    }
}

fn write_joined_display(
    f: &mut std::fmt::Formatter<'_>,
    operands: &[Condition],
    op: LogicalOp,
) -> std::fmt::Result {
    for (i, operand) in operands.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", op.sql_symbol())?;
        }
        write!(f, "({})", operand)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::col;

    #[test]
    fn test_compare_builds_comparison() {
        let cond = col("age").gt(18).unwrap();
        assert!(matches!(cond, Condition::Comparison { op: CmpOp::Gt, .. }));
    }

    #[test]
    fn test_compare_rejects_null() {
        let err = col("age").eq(Value::Null).unwrap_err();
        assert!(matches!(err, ExprSqlError::NullComparison { op: "=" }));
        let err = col("age").lt(Value::from(Option::<i64>::None)).unwrap_err();
        assert!(matches!(err, ExprSqlError::NullComparison { op: "<" }));
    }

    #[test]
    fn test_and_flattens_both_sides() {
        let [a, b, c] = ["a", "b", "c"].map(|n| col(n).is_null());
        let left_heavy = and_(and_(a.clone(), b.clone()), c.clone());
        let right_heavy = and_(a.clone(), and_(b.clone(), c.clone()));
        assert_eq!(left_heavy, right_heavy);
        assert_eq!(left_heavy, Condition::And(vec![a, b, c]));
    }

    #[test]
    fn test_or_keeps_duplicates() {
        let a = col("a").is_null();
        let both = or_(a.clone(), a.clone());
        assert_eq!(both, Condition::Or(vec![a.clone(), a]));
    }

    #[test]
    fn test_double_negation_is_kept() {
        let inner = col("a").is_null();
        let twice = not_(not_(inner.clone()));
        assert_eq!(twice, Condition::Not(Box::new(Condition::Not(Box::new(inner)))));
    }

    #[test]
    fn test_chain_valid() {
        let cond = chain([
            col("a").into(),
            "<".into(),
            col("b").into(),
            "<=".into(),
            lit(10).into(),
        ])
        .unwrap();
        match cond {
            Condition::Chain { terms, ops } => {
                assert_eq!(terms.len(), 3);
                assert_eq!(ops, vec![CmpOp::Lt, CmpOp::Lte]);
            }
            other => panic!("expected chain, got {:?}", other),
        }
    }

    #[test]
    fn test_chain_rejects_even_and_short_lists() {
        let err = chain([col("a").into(), "<".into()]).unwrap_err();
        assert!(matches!(err, ExprSqlError::MalformedChain(_)));
        let err = chain([col("a").into()]).unwrap_err();
        assert!(matches!(err, ExprSqlError::MalformedChain(_)));
    }

    #[test]
    fn test_chain_rejects_bad_token() {
        let err = chain([col("a").into(), "LIKE".into(), col("b").into()]).unwrap_err();
        assert!(matches!(err, ExprSqlError::MalformedChain(_)));
    }

    #[test]
    fn test_chain_rejects_null_terms() {
        let err = chain([col("a").into(), "<".into(), lit(Value::Null).into()]).unwrap_err();
        assert!(matches!(err, ExprSqlError::NullComparison { op: "<" }));
    }

    #[test]
    fn test_chain_rejects_broken_alternation() {
        let err = chain([col("a").into(), col("b").into(), "<".into()]).unwrap_err();
        assert!(matches!(err, ExprSqlError::MalformedChain(_)));
    }

    #[test]
    fn test_comparison_extends_into_chain() {
        let cond = lit(50).lt(col("score")).unwrap().lt(80).unwrap();
        match cond {
            Condition::Chain { terms, ops } => {
                assert_eq!(terms.len(), 3);
                assert_eq!(ops, vec![CmpOp::Lt, CmpOp::Lt]);
            }
            other => panic!("expected chain, got {:?}", other),
        }
    }

    #[test]
    fn test_non_comparison_does_not_extend() {
        let err = col("a").is_null().lt(5).unwrap_err();
        assert!(matches!(err, ExprSqlError::InvalidOperand(_)));
    }

    #[test]
    fn test_membership_requires_single_source() {
        let err = Condition::membership(col("x"), false, None, None).unwrap_err();
        assert!(matches!(err, ExprSqlError::AmbiguousMembershipSource));
        let err = Condition::membership(
            col("x"),
            false,
            Some(vec![Value::Int(1)]),
            Some(Fragment::new("SELECT 1", Vec::<Value>::new())),
        )
        .unwrap_err();
        assert!(matches!(err, ExprSqlError::AmbiguousMembershipSource));
        let ok = Condition::membership(col("x"), true, Some(vec![Value::Int(1)]), None).unwrap();
        assert!(matches!(ok, Condition::Membership { negated: true, .. }));
    }

    #[test]
    fn test_starts_with_appends_wildcard() {
        let cond = col("name").starts_with("A");
        match cond {
            Condition::Pattern { pattern, .. } => {
                assert_eq!(pattern, lit("A%"));
            }
            other => panic!("expected pattern, got {:?}", other),
        }
    }

    #[test]
    fn test_chain_display_is_math_inequality() {
        let cond = chain([
            col("col1").into(),
            "<".into(),
            col("col2").into(),
            "<=".into(),
            col("col3").into(),
        ])
        .unwrap();
        assert_eq!(cond.to_string(), "col1 < col2 <= col3");
    }
}
