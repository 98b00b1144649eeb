use crate::error::ExprSqlError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A scalar value bound to a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Uuid(Uuid),
    Decimal(Decimal),
    Timestamp(DateTime<Utc>),
    /// Binary data (bytea)
    Bytes(Vec<u8>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Inline literal form, for diagnostics only. Rendered SQL never inlines
/// values; every non-null literal becomes a placeholder.
impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "'{}'", s),
            Value::Uuid(u) => write!(f, "'{}'", u),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::Timestamp(ts) => write!(f, "'{}'", ts.to_rfc3339()),
            Value::Bytes(bytes) => {
                write!(f, "'\\x")?;
                for byte in bytes {
                    write!(f, "{:02x}", byte)?;
                }
                write!(f, "'")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i16> for Value {
    fn from(n: i16) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(n as f64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Uuid> for Value {
    fn from(u: Uuid) -> Self {
        Value::Uuid(u)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::Decimal(d)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(ts: DateTime<Utc>) -> Self {
        Value::Timestamp(ts)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

/// JSON scalars map onto SQL scalars; arrays and objects have no scalar
/// rendering and are rejected.
impl TryFrom<serde_json::Value> for Value {
    type Error = ExprSqlError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        match json {
            serde_json::Value::Null => Ok(Value::Null),
            serde_json::Value::Bool(b) => Ok(Value::Bool(b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Value::Int)
                .or_else(|| n.as_f64().map(Value::Float))
                .ok_or_else(|| {
                    ExprSqlError::invalid_operand(format!("unrepresentable JSON number: {}", n))
                }),
            serde_json::Value::String(s) => Ok(Value::String(s)),
            serde_json::Value::Array(_) => {
                Err(ExprSqlError::invalid_operand("JSON array is not a scalar"))
            }
            serde_json::Value::Object(_) => {
                Err(ExprSqlError::invalid_operand("JSON object is not a scalar"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_option_none_is_null() {
        let v: Value = Option::<i64>::None.into();
        assert!(v.is_null());
        let v: Value = Some("x").into();
        assert_eq!(v, Value::String("x".to_string()));
    }

    #[test]
    fn test_json_scalars_coerce() {
        assert_eq!(Value::try_from(json!(42)).unwrap(), Value::Int(42));
        assert_eq!(Value::try_from(json!(2.5)).unwrap(), Value::Float(2.5));
        assert_eq!(Value::try_from(json!(true)).unwrap(), Value::Bool(true));
        assert_eq!(Value::try_from(json!(null)).unwrap(), Value::Null);
    }

    #[test]
    fn test_json_compounds_rejected() {
        let err = Value::try_from(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ExprSqlError::InvalidOperand(_)));
        let err = Value::try_from(json!({"a": 1})).unwrap_err();
        assert!(matches!(err, ExprSqlError::InvalidOperand(_)));
    }

    #[test]
    fn test_display_quotes_strings() {
        assert_eq!(Value::String("Alice".into()).to_string(), "'Alice'");
        assert_eq!(Value::Int(5).to_string(), "5");
        assert_eq!(Value::Null.to_string(), "NULL");
    }
}
