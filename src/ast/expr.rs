use crate::ast::Value;
use serde::{Deserialize, Serialize};

/// Binary operators for value expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Concat,
    Add,
    Sub,
    Mul,
    Div,
    /// Exponentiation (^)
    Pow,
}

impl BinaryOp {
    /// SQL token for this operator - single source of truth.
    pub fn sql_symbol(&self) -> &'static str {
        match self {
            BinaryOp::Concat => "||",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql_symbol())
    }
}

/// A value expression: anything that evaluates to a scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Column reference, rendered verbatim.
    Column(String),
    /// Literal value. Always rendered as a placeholder, except NULL which
    /// renders as the literal token.
    Literal(Value),
    /// Binary expression (left op right)
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    /// Function call expression (UPPER, LENGTH, COALESCE, ...)
    FunctionCall { name: String, args: Vec<Expr> },
}

/// Create a column reference.
///
/// # Example
/// ```
/// use exprsql::ast::col;
/// let age = col("age");
/// ```
pub fn col(name: impl Into<String>) -> Expr {
    Expr::Column(name.into())
}

/// Create several column references at once, for array destructuring.
///
/// # Example
/// ```
/// use exprsql::ast::cols;
/// let [age, salary] = cols(["age", "salary"]);
/// ```
pub fn cols<const N: usize>(names: [&str; N]) -> [Expr; N] {
    names.map(col)
}

/// Wrap a scalar as a literal expression.
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal(value.into())
}

/// Create a function call expression.
///
/// # Example
/// ```
/// use exprsql::ast::{col, func};
/// let upper = func("UPPER", [col("name")]);
/// let today = func("CURRENT_DATE", []);
/// ```
pub fn func(name: impl Into<String>, args: impl IntoIterator<Item = Expr>) -> Expr {
    Expr::FunctionCall {
        name: name.into(),
        args: args.into_iter().collect(),
    }
}

impl Expr {
    /// Combine with another expression under a binary operator.
    pub fn binary(self, op: BinaryOp, rhs: impl Into<Expr>) -> Expr {
        Expr::Binary {
            left: Box::new(self),
            op,
            right: Box::new(rhs.into()),
        }
    }

    /// Exponentiation. Rust has no `**` operator, so this is a method.
    pub fn pow(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Pow, rhs)
    }

    /// String concatenation, also reachable through the `|` operator.
    pub fn concat(self, rhs: impl Into<Expr>) -> Expr {
        self.binary(BinaryOp::Concat, rhs)
    }

    pub(crate) fn is_null_literal(&self) -> bool {
        matches!(self, Expr::Literal(Value::Null))
    }
}

/// Diagnostic form with values inlined. Use `ToSql` for executable SQL.
impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Column(name) => write!(f, "{}", name),
            Expr::Literal(value) => write!(f, "{}", value),
            Expr::Binary { left, op, right } => write!(f, "({} {} {})", left, op, right),
            Expr::FunctionCall { name, args } => {
                let args_str: Vec<String> = args.iter().map(|a| a.to_string()).collect();
                write!(f, "{}({})", name, args_str.join(", "))
            }
        }
    }
}

// ==================== From Implementations for Ergonomic API ====================
// Raw scalars coerce to literals. A string is a literal, never a column:
// columns are always explicit `col(..)` calls.

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Expr::Literal(value)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        lit(s)
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        lit(s)
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        lit(b)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        lit(n)
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit(n)
    }
}

impl From<f64> for Expr {
    fn from(n: f64) -> Self {
        lit(n)
    }
}
