use serde::{Deserialize, Serialize};

use super::{Error, Result};

/// A loosely typed argument as a dynamic host passes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HostValue {
    /// The host's null.
    None,
    /// A boolean. Rejected where an integer is required.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A float. Rejected where an integer is required, even when integral.
    Float(f64),
    /// A string.
    Str(String),
}

impl HostValue {
    /// Host type name, as used in error messages.
    pub const fn type_name(&self) -> &'static str {
        match self {
            HostValue::None => "none",
            HostValue::Bool(_) => "bool",
            HostValue::Int(_) => "int",
            HostValue::Float(_) => "float",
            HostValue::Str(_) => "str",
        }
    }

    /// Extracts an integer argument, failing with a positional type error.
    pub(crate) fn expect_int(&self, op: &'static str, position: usize) -> Result<i64> {
        match *self {
            HostValue::Int(value) => Ok(value),
            _ => Err(Error::ArgumentType {
                op,
                position,
                found: self.type_name(),
            }),
        }
    }
}

impl From<i64> for HostValue {
    fn from(value: i64) -> Self {
        HostValue::Int(value)
    }
}

impl From<i32> for HostValue {
    fn from(value: i32) -> Self {
        HostValue::Int(i64::from(value))
    }
}

impl From<bool> for HostValue {
    fn from(value: bool) -> Self {
        HostValue::Bool(value)
    }
}

impl From<f64> for HostValue {
    fn from(value: f64) -> Self {
        HostValue::Float(value)
    }
}

impl From<&str> for HostValue {
    fn from(value: &str) -> Self {
        HostValue::Str(value.to_owned())
    }
}

impl From<String> for HostValue {
    fn from(value: String) -> Self {
        HostValue::Str(value)
    }
}

impl<T: Into<HostValue>> From<Option<T>> for HostValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(HostValue::None, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ints_are_accepted() {
        assert_eq!(HostValue::from(7).expect_int("add", 2).unwrap(), 7);

        for bad in [
            HostValue::from(true),
            HostValue::from(1.0),
            HostValue::from("1"),
            HostValue::from(None::<i64>),
        ] {
            let err = bad.expect_int("add", 2).unwrap_err();
            assert_eq!(err.kind(), "argument_type");
            assert!(err.to_string().contains(bad.type_name()));
        }
    }

    #[test]
    fn untagged_json_shapes() {
        let values: Vec<HostValue> = serde_json::from_str(r#"[null, true, 3, 2.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                HostValue::None,
                HostValue::Bool(true),
                HostValue::Int(3),
                HostValue::Float(2.5),
                HostValue::Str("x".into()),
            ]
        );
    }
}
