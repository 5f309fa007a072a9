use crate::Value;

use thiserror::Error as ThisError;

use std::collections::BTreeMap;

/// A `<fault>` response, indicating that a request failed.
///
/// The XML-RPC specification requires that a `<faultCode>` and `<faultString>` is returned in the
/// `<fault>` case, further describing the error.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("{string} ({code})")]
pub struct Fault {
    /// `faultCode` received from the server.
    code: i32,
    /// `faultString` received from the server.
    string: String,
}

impl Fault {
    /// Creates a new `Fault` from an error code and a message.
    pub fn new<S: Into<String>>(code: i32, string: S) -> Fault {
        Fault {
            code,
            string: string.into(),
        }
    }

    /// Returns the fault code.
    ///
    /// The meaning of this code is not specified by XML-RPC and depends on the service you are
    /// implementing/using.
    pub fn code(&self) -> i32 {
        self.code
    }

    /// Returns the error message sent by the server.
    pub fn string(&self) -> &str {
        &self.string
    }

    /// Creates a `Fault` from a `Value`.
    ///
    /// The `Value` must be a `Value::Struct` with a `faultCode` and `faultString` member. Servers
    /// are not consistent about the member types, so `faultCode` may also be a string holding an
    /// integer, and `faultString` may be any scalar. Other members are ignored.
    ///
    /// Returns `None` if the value isn't a valid `Fault`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_struct()?;

        let code = match map.get("faultCode")? {
            Value::Int(code) => *code,
            Value::String(code) => code.trim().parse().ok()?,
            _ => return None,
        };
        let string = match map.get("faultString")? {
            Value::String(string) => string.clone(),
            Value::Int(i) => i.to_string(),
            Value::Double(d) => d.to_string(),
            Value::Bool(b) => b.to_string(),
            _ => return None,
        };

        Some(Fault { code, string })
    }

    /// Turns this `Fault` into an equivalent `Value`.
    ///
    /// The returned value can be parsed back into a `Fault` using `Fault::from_value`.
    pub fn to_value(&self) -> Value {
        let mut map = BTreeMap::new();
        map.insert("faultCode".to_string(), Value::from(self.code));
        map.insert("faultString".to_string(), Value::from(self.string.as_str()));

        Value::Struct(map)
    }
}
