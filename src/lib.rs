//! Composable SQL expression and condition algebra.
//!
//! Build WHERE-clause fragments as typed, immutable trees and render them
//! to parameterized SQL: text with `?` placeholders plus the bound values
//! in placeholder order. No connectivity, no ORM layer; the output pair is
//! handed to whatever executes the query.
//!
//! ```
//! use exprsql::prelude::*;
//!
//! let cond = col("age").gt(30)? * col("department").eq("HR")?;
//! let frag = cond.to_sql();
//! assert_eq!(frag.sql, "(age > ?) AND (department = ?)");
//! assert_eq!(frag.params, vec![Value::Int(30), Value::String("HR".into())]);
//! # Ok::<(), exprsql::ExprSqlError>(())
//! ```

pub mod ast;
pub mod error;
pub mod render;

pub use error::{ExprSqlError, ExprSqlResult};

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::error::*;
    pub use crate::render::{Fragment, ToSql};
}
