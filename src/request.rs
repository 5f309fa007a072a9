use crate::error::{EncodeError, SerializeError};
use crate::ser::to_params;
use crate::utils::escape_xml;
use crate::Value;

use serde::Serialize;

use std::io::Write;

/// A request to call a procedure.
#[derive(Clone, Debug, PartialEq)]
pub struct Request {
    name: String,
    args: Vec<Value>,
}

impl Request {
    /// Creates a new request to call a function named `name`.
    ///
    /// By default, no arguments are passed. Use the `arg` method to append arguments.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Request {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Creates a request whose arguments are taken from a serializable value.
    ///
    /// A tuple, array, slice or `Vec` supplies one argument per element and `()` supplies none.
    /// Anything else is passed as the only argument.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::UnsupportedType`] with the position of the first argument that has
    /// no XML-RPC representation.
    pub fn with_args<S, A>(name: S, args: &A) -> Result<Self, EncodeError>
    where
        S: Into<String>,
        A: Serialize + ?Sized,
    {
        Ok(Request {
            name: name.into(),
            args: to_params(args)?,
        })
    }

    /// Appends an argument to be passed to the current list of arguments.
    pub fn arg<T: Into<Value>>(mut self, value: T) -> Self {
        self.args.push(value.into());
        self
    }

    /// Returns the name of the method to call.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the arguments passed to the method.
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Checks that this request can be put on the wire.
    fn validate(&self) -> Result<(), EncodeError> {
        if self.name.is_empty() {
            return Err(EncodeError::EmptyMethodName);
        }

        match self.args.iter().position(|arg| !arg.is_encodable()) {
            Some(position) => Err(EncodeError::UnsupportedType {
                position,
                source: SerializeError::new("NaN and infinite doubles cannot be sent"),
            }),
            None => Ok(()),
        }
    }

    /// Formats this `Request` as a UTF-8 encoded XML document.
    ///
    /// # Errors
    ///
    /// Fails if the method name is empty or an argument holds a non-finite `Double`. Any errors
    /// reported by the writer will be propagated to the caller.
    pub fn write_as_xml<W: Write>(&self, fmt: &mut W) -> Result<(), EncodeError> {
        self.validate()?;

        write!(fmt, r#"<?xml version="1.0"?>"#)?;
        write!(fmt, r#"<methodCall>"#)?;
        write!(fmt, r#"<methodName>{}</methodName>"#, escape_xml(&self.name))?;
        writeln!(fmt, r#"<params>"#)?;
        for value in &self.args {
            write!(fmt, r#"<param>"#)?;
            value.write_as_xml(fmt)?;
            writeln!(fmt, r#"</param>"#)?;
        }
        write!(fmt, r#"</params>"#)?;
        writeln!(fmt, r#"</methodCall>"#)?;
        Ok(())
    }

    /// Encodes this `Request` into a buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        let mut body = Vec::new();
        self.write_as_xml(&mut body)?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;
    use std::collections::BTreeMap;
    use std::str;

    fn encode(request: &Request) -> String {
        String::from_utf8(request.to_bytes().unwrap()).unwrap()
    }

    /// Encodes `value` as the only argument of a request and parses it back.
    fn roundtrip(value: Value) {
        let xml = encode(&Request::new("m").arg(value.clone()));
        let start = xml.find("<value>").unwrap();
        let end = xml.rfind("</value>").unwrap() + "</value>".len();
        let mut fragment = xml[start..end].as_bytes();

        let decoded = Parser::new(&mut fragment).parse_value().unwrap();
        assert_eq!(decoded, value, "round trip through {}", &xml[start..end]);
    }

    #[test]
    fn escapes_method_names() {
        let req = Request::new("x<&x");

        assert!(encode(&req).contains("<methodName>x&lt;&amp;x</methodName>"));
    }

    #[test]
    fn writes_envelope() {
        let req = Request::new("sum").arg(2).arg(3);

        assert_eq!(
            encode(&req),
            "<?xml version=\"1.0\"?><methodCall><methodName>sum</methodName><params>\n\
             <param><value><int>2</int></value></param>\n\
             <param><value><int>3</int></value></param>\n\
             </params></methodCall>\n"
        );
    }

    #[test]
    fn rejects_empty_method_name() {
        assert!(matches!(Request::new("").to_bytes(), Err(EncodeError::EmptyMethodName)));
    }

    #[test]
    fn rejects_non_finite_doubles() {
        let req = Request::new("m").arg(1).arg(vec![Value::Double(f64::NAN)]);

        match req.to_bytes() {
            Err(EncodeError::UnsupportedType { position, .. }) => assert_eq!(position, 1),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn builds_from_serializable_args() {
        let req = Request::with_args("sum", &(2, 3)).unwrap();
        assert_eq!(req, Request::new("sum").arg(2).arg(3));

        match Request::with_args("sum", &(2, u64::MAX)) {
            Err(EncodeError::UnsupportedType { position, .. }) => assert_eq!(position, 1),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn roundtrips_scalars() {
        roundtrip(Value::Int(0));
        roundtrip(Value::Int(i32::MIN));
        roundtrip(Value::Int(i32::MAX));
        roundtrip(Value::Bool(true));
        roundtrip(Value::Bool(false));
        roundtrip(Value::Double(0.0));
        roundtrip(Value::Double(-1.25));
        roundtrip(Value::Double(0.1 + 0.2));
        roundtrip(Value::Double(1e300));
        roundtrip(Value::Nil);
        roundtrip(Value::DateTime(iso8601::datetime("19980717T14:08:55").unwrap()));
    }

    #[test]
    fn roundtrips_strings() {
        roundtrip(Value::from(""));
        roundtrip(Value::from("   "));
        roundtrip(Value::from("&"));
        roundtrip(Value::from("<"));
        roundtrip(Value::from(">"));
        roundtrip(Value::from("'"));
        roundtrip(Value::from("\""));
        roundtrip(Value::from("<tag attr=\"v\">Tom & Jerry's</tag>"));
        roundtrip(Value::from("multi\nline\ttext"));
        roundtrip(Value::from("ünïcödé ✓"));
    }

    #[test]
    fn roundtrips_base64() {
        roundtrip(Value::Base64(Vec::new()));
        roundtrip(Value::Base64(vec![0, 159, 146, 150, 255]));
    }

    #[test]
    fn roundtrips_containers() {
        roundtrip(Value::Array(Vec::new()));
        roundtrip(Value::Struct(BTreeMap::new()));

        let mut inner = BTreeMap::new();
        inner.insert("a & b".to_string(), Value::Array(vec![Value::Int(1), Value::from("x")]));
        inner.insert("empty".to_string(), Value::Struct(BTreeMap::new()));
        let mut outer = BTreeMap::new();
        outer.insert("inner".to_string(), Value::Struct(inner));
        outer.insert("list".to_string(), Value::Array(vec![Value::Array(Vec::new()), Value::Nil]));

        roundtrip(Value::Struct(outer.clone()));
        roundtrip(Value::Array(vec![Value::Struct(outer), Value::Double(3.5)]));
    }
}
