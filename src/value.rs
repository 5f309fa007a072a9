//! Contains the different types of values understood by XML-RPC.

use crate::utils::{escape_xml, format_datetime};

use base64::encode;
use iso8601::DateTime;

use std::collections::BTreeMap;
use std::io::{self, Write};

/// The possible XML-RPC values.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// `<i4>` or `<int>`, 32-bit signed integer.
    Int(i32),
    /// `<boolean>`, 0 == `false`, 1 == `true`.
    Bool(bool),
    /// `<string>`, or a `<value>` without a type tag.
    String(String),
    /// `<double>`
    Double(f64),
    /// `<dateTime.iso8601>`, an ISO 8601 formatted date/time value.
    DateTime(DateTime),
    /// `<base64>`, base64-encoded binary data.
    Base64(Vec<u8>),

    /// `<struct>`, a mapping of named values.
    Struct(BTreeMap<String, Value>),
    /// `<array>`, a list of arbitrary (heterogeneous) values.
    Array(Vec<Value>),

    /// `<nil/>`, the empty (Unit) value.
    ///
    /// This is an XMLRPC [extension][ext] and may not be supported by all clients / servers.
    ///
    /// [ext]: https://web.archive.org/web/20050911054235/http://ontosys.com/xml-rpc/extensions.php
    Nil,
}

impl Value {
    /// Returns the name of the XML tag used for this kind of value.
    pub fn type_name(&self) -> &'static str {
        match *self {
            Value::Int(_) => "int",
            Value::Bool(_) => "boolean",
            Value::String(_) => "string",
            Value::Double(_) => "double",
            Value::DateTime(_) => "dateTime.iso8601",
            Value::Base64(_) => "base64",
            Value::Struct(_) => "struct",
            Value::Array(_) => "array",
            Value::Nil => "nil",
        }
    }

    /// If `self` is a `Value::Int`, returns the integer.
    pub fn as_i32(&self) -> Option<i32> {
        match *self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }

    /// If `self` is a `Value::Bool`, returns the boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// If `self` is a `Value::String`, returns it as a `&str`.
    pub fn as_str(&self) -> Option<&str> {
        match *self {
            Value::String(ref s) => Some(s),
            _ => None,
        }
    }

    /// If `self` is a `Value::Double`, returns the number.
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Double(d) => Some(d),
            _ => None,
        }
    }

    /// If `self` is a `Value::DateTime`, returns the date and time.
    pub fn as_datetime(&self) -> Option<DateTime> {
        match *self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// If `self` is a `Value::Base64`, returns the decoded bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match *self {
            Value::Base64(ref data) => Some(data),
            _ => None,
        }
    }

    /// If `self` is a `Value::Array`, returns its elements.
    pub fn as_array(&self) -> Option<&[Value]> {
        match *self {
            Value::Array(ref array) => Some(array),
            _ => None,
        }
    }

    /// If `self` is a `Value::Struct`, returns its members.
    pub fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match *self {
            Value::Struct(ref map) => Some(map),
            _ => None,
        }
    }

    /// Returns `true` if `self` is `Value::Nil`.
    pub fn is_nil(&self) -> bool {
        *self == Value::Nil
    }

    /// Looks up a member of a `<struct>`.
    ///
    /// Returns `None` if `self` is not a `Value::Struct` or has no member called `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_struct().and_then(|map| map.get(key))
    }

    /// Returns `false` if this value (or any value nested in it) has no textual XML-RPC form.
    ///
    /// The only such values are non-finite `Double`s: XML-RPC has no spelling for NaN or infinity.
    pub(crate) fn is_encodable(&self) -> bool {
        match *self {
            Value::Double(d) => d.is_finite(),
            Value::Struct(ref map) => map.values().all(Value::is_encodable),
            Value::Array(ref array) => array.iter().all(Value::is_encodable),
            _ => true,
        }
    }

    /// Formats this `Value` as an XML `<value>` element.
    pub fn write_as_xml<W: Write>(&self, fmt: &mut W) -> io::Result<()> {
        write!(fmt, "<value>")?;

        match *self {
            Value::Int(i) => {
                write!(fmt, "<int>{}</int>", i)?;
            }
            Value::Bool(b) => {
                write!(fmt, "<boolean>{}</boolean>", if b { "1" } else { "0" })?;
            }
            Value::String(ref s) => {
                write!(fmt, "<string>{}</string>", escape_xml(s))?;
            }
            Value::Double(d) => {
                write!(fmt, "<double>{}</double>", d)?;
            }
            Value::DateTime(ref date_time) => {
                write!(fmt, "<dateTime.iso8601>{}</dateTime.iso8601>", format_datetime(date_time))?;
            }
            Value::Base64(ref data) => {
                write!(fmt, "<base64>{}</base64>", encode(data))?;
            }
            Value::Struct(ref map) => {
                writeln!(fmt, "<struct>")?;
                for (name, value) in map {
                    write!(fmt, "<member><name>{}</name>", escape_xml(name))?;
                    value.write_as_xml(fmt)?;
                    writeln!(fmt, "</member>")?;
                }
                write!(fmt, "</struct>")?;
            }
            Value::Array(ref array) => {
                writeln!(fmt, "<array><data>")?;
                for value in array {
                    value.write_as_xml(fmt)?;
                    writeln!(fmt)?;
                }
                write!(fmt, "</data></array>")?;
            }
            Value::Nil => {
                write!(fmt, "<nil/>")?;
            }
        }

        write!(fmt, "</value>")?;
        Ok(())
    }
}

impl From<i32> for Value {
    fn from(other: i32) -> Self {
        Value::Int(other)
    }
}

impl From<i16> for Value {
    fn from(other: i16) -> Self {
        Value::Int(other.into())
    }
}

impl From<i8> for Value {
    fn from(other: i8) -> Self {
        Value::Int(other.into())
    }
}

impl From<u16> for Value {
    fn from(other: u16) -> Self {
        Value::Int(other.into())
    }
}

impl From<u8> for Value {
    fn from(other: u8) -> Self {
        Value::Int(other.into())
    }
}

impl From<bool> for Value {
    fn from(other: bool) -> Self {
        Value::Bool(other)
    }
}

impl From<String> for Value {
    fn from(other: String) -> Self {
        Value::String(other)
    }
}

impl<'a> From<&'a str> for Value {
    fn from(other: &'a str) -> Self {
        Value::String(other.to_string())
    }
}

impl From<f64> for Value {
    fn from(other: f64) -> Self {
        Value::Double(other)
    }
}

impl From<f32> for Value {
    fn from(other: f32) -> Self {
        Value::Double(other.into())
    }
}

impl From<DateTime> for Value {
    fn from(other: DateTime) -> Self {
        Value::DateTime(other)
    }
}

impl<'a> From<&'a [u8]> for Value {
    fn from(other: &'a [u8]) -> Self {
        Value::Base64(other.to_vec())
    }
}

impl From<Vec<Value>> for Value {
    fn from(other: Vec<Value>) -> Self {
        Value::Array(other)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(other: BTreeMap<String, Value>) -> Self {
        Value::Struct(other)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::str;

    fn xml(value: &Value) -> String {
        let mut output: Vec<u8> = Vec::new();
        value.write_as_xml(&mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn escapes_strings() {
        assert_eq!(
            xml(&Value::from("<xml>&nbsp;string")),
            "<value><string>&lt;xml&gt;&amp;nbsp;string</string></value>"
        );
    }

    #[test]
    fn escapes_quotes() {
        assert_eq!(
            xml(&Value::from(r#"it's "quoted""#)),
            "<value><string>it&apos;s &quot;quoted&quot;</string></value>"
        );
    }

    #[test]
    fn escapes_struct_member_names() {
        let mut map: BTreeMap<String, Value> = BTreeMap::new();
        map.insert("x&<x".to_string(), Value::from(true));

        assert_eq!(
            xml(&Value::Struct(map)),
            "<value><struct>\n<member><name>x&amp;&lt;x</name><value><boolean>1</boolean></value></member>\n</struct></value>"
        );
    }

    #[test]
    fn formats_scalars() {
        assert_eq!(xml(&Value::Int(0)), "<value><int>0</int></value>");
        assert_eq!(xml(&Value::Int(-17)), "<value><int>-17</int></value>");
        assert_eq!(xml(&Value::Bool(false)), "<value><boolean>0</boolean></value>");
        assert_eq!(xml(&Value::Double(-0.5)), "<value><double>-0.5</double></value>");
        assert_eq!(xml(&Value::Base64(b"hi".to_vec())), "<value><base64>aGk=</base64></value>");
        assert_eq!(xml(&Value::Nil), "<value><nil/></value>");
    }

    #[test]
    fn doubles_keep_precision() {
        let tricky = 0.1 + 0.2;
        let text = xml(&Value::Double(tricky));
        let inner = text
            .trim_start_matches("<value><double>")
            .trim_end_matches("</double></value>");
        assert_eq!(inner.parse::<f64>().unwrap(), tricky);
    }

    #[test]
    fn rejects_non_finite_doubles() {
        assert!(Value::Double(1.5).is_encodable());
        assert!(!Value::Double(f64::NAN).is_encodable());
        assert!(!Value::Array(vec![Value::Int(1), Value::Double(f64::INFINITY)]).is_encodable());
    }

    #[test]
    fn accessors() {
        let mut map = BTreeMap::new();
        map.insert("answer".to_string(), Value::Int(42));
        let value = Value::Struct(map);

        assert_eq!(value.get("answer").and_then(Value::as_i32), Some(42));
        assert_eq!(value.get("question"), None);
        assert_eq!(Value::from("s").as_str(), Some("s"));
        assert_eq!(Value::Int(1).as_str(), None);
        assert!(Value::from(()).is_nil());
        assert_eq!(Value::from(&b"\x00\x01"[..]).as_bytes(), Some(&b"\x00\x01"[..]));
        assert_eq!(Value::from(7u16).type_name(), "int");
    }
}
