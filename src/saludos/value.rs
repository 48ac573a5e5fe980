//! Typed parameter values and the conversions from raw tokens.

use serde::Serialize;
use std::fmt;

/// The type a raw token is converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueType {
    #[default]
    Text,
    Bool,
    Integer,
    Float,
}

impl ValueType {
    /// Metavar shown in help and usage lines.
    pub fn metavar(&self) -> &'static str {
        match self {
            ValueType::Text => "TEXT",
            ValueType::Bool => "BOOLEAN",
            ValueType::Integer => "INTEGER",
            ValueType::Float => "FLOAT",
        }
    }

    /// Converts one raw string. The error is the user-facing reason.
    pub fn parse(&self, raw: &str) -> Result<Value, String> {
        match self {
            ValueType::Text => Ok(Value::Text(raw.to_string())),
            ValueType::Bool => parse_bool(raw)
                .map(Value::Bool)
                .ok_or_else(|| format!("'{}' is not a valid boolean.", raw)),
            ValueType::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| format!("'{}' is not a valid integer.", raw)),
            ValueType::Float => raw
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| format!("'{}' is not a valid float.", raw)),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "t" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "f" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    List(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                f.write_str(&parts.join(" "))
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_variants() {
        for raw in ["1", "true", "Yes", "y", "ON"] {
            assert_eq!(ValueType::Bool.parse(raw), Ok(Value::Bool(true)));
        }
        for raw in ["0", "False", "no", "off"] {
            assert_eq!(ValueType::Bool.parse(raw), Ok(Value::Bool(false)));
        }
        assert!(ValueType::Bool.parse("maybe").is_err());
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(ValueType::Integer.parse("42"), Ok(Value::Int(42)));
        assert_eq!(ValueType::Integer.parse("-7"), Ok(Value::Int(-7)));
        assert_eq!(
            ValueType::Integer.parse("4.2"),
            Err("'4.2' is not a valid integer.".to_string())
        );
    }

    #[test]
    fn test_parse_float_accepts_integers() {
        assert_eq!(ValueType::Float.parse("3"), Ok(Value::Float(3.0)));
    }

    #[test]
    fn test_display_list_joins_with_spaces() {
        let value = Value::from(vec!["a", "b"]);
        assert_eq!(value.to_string(), "a b");
    }

    #[test]
    fn test_serializes_untagged() {
        let value = Value::from(vec![Value::Int(1), Value::Bool(true)]);
        assert_eq!(serde_json::to_string(&value).unwrap(), "[1,true]");
    }
}
