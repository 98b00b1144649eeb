pub mod conditions;
pub mod expr;
pub mod ops;
pub mod values;

pub use self::conditions::{
    ChainPart, CmpOp, Condition, LogicalOp, MembershipSource, and_, chain, not_, or_,
};
pub use self::expr::{BinaryOp, Expr, col, cols, func, lit};
pub use self::ops::{CONDITION_TOKENS, EXPR_TOKENS, HostToken};
pub use self::values::Value;
