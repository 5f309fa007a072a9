//! XML-RPC response parser.

use crate::error::DecodeError;
use crate::{Fault, Value};

use iso8601::datetime;
use xml::common::Position;
use xml::name::OwnedName;
use xml::reader::{Error as XmlError, ErrorKind, EventReader, XmlEvent};
use xml::ParserConfig;

use std::collections::BTreeMap;
use std::io::Read;

/// The outcome of a well-formed XML-RPC call: a single return value or a `<fault>`.
pub type Response = Result<Value, Fault>;

pub type ParseResult<T> = Result<T, DecodeError>;

/// Longest piece of unexpected text quoted in an error message.
const MAX_FRAGMENT_LEN: usize = 64;

/// How deeply `<value>`s may be nested inside arrays and structs.
const MAX_DEPTH: usize = 128;

const BOM: &[u8] = b"\xEF\xBB\xBF";

pub struct Parser<'a, R: Read + 'a> {
    reader: EventReader<&'a mut R>,
    /// Number of `<value>` elements currently open.
    depth: usize,
}

impl<'a, R: Read> Parser<'a, R> {
    pub fn new(reader: &'a mut R) -> Self {
        Parser {
            reader: ParserConfig::new()
                .cdata_to_characters(true)
                .create_reader(reader),
            depth: 0,
        }
    }

    /// Turns a syntax error of the XML reader into a `DecodeError`.
    ///
    /// Unclosed tags and truncated documents are reported like any other structural problem, with
    /// the reader's message as the offending fragment.
    fn syntax_error(error: XmlError) -> DecodeError {
        let found = match *error.kind() {
            ErrorKind::Syntax(ref message) => Some(message.to_string()),
            ErrorKind::UnexpectedEof => Some("end of document".to_string()),
            _ => None,
        };

        match found {
            Some(found) => DecodeError::MalformedResponse {
                expected: "well-formed XML".to_string(),
                found: Some(found),
                position: error.position(),
            },
            None => DecodeError::MalformedXml(error),
        }
    }

    /// Reads an `XmlEvent` from a reader, disposing of events that carry no content.
    ///
    /// When encountering a new element, returns an `Err` if it has any attributes.
    fn pull_event(&mut self) -> ParseResult<XmlEvent> {
        loop {
            let event = self.reader.next().map_err(Self::syntax_error)?;
            match event {
                XmlEvent::StartDocument { .. }
                | XmlEvent::Comment(_)
                | XmlEvent::ProcessingInstruction { .. } => continue, // skip these
                XmlEvent::StartElement { ref attributes, ref name, .. } => {
                    if !attributes.is_empty() {
                        return self.expected(format!("tag <{}> without attributes", name), None);
                    }
                }
                XmlEvent::EndElement { .. }
                | XmlEvent::EndDocument
                | XmlEvent::CData(_)
                | XmlEvent::Whitespace(_)
                | XmlEvent::Characters(_) => {}
            }

            return Ok(event);
        }
    }

    /// Like `pull_event`, but also skips whitespace between elements.
    fn pull_markup(&mut self) -> ParseResult<XmlEvent> {
        loop {
            match self.pull_event()? {
                XmlEvent::Whitespace(_) => continue,
                event => return Ok(event),
            }
        }
    }

    /// Expects an opening tag like `<tag>` without attributes (and a local name without namespaces).
    fn expect_open(&mut self, tag: &str) -> ParseResult<()> {
        match self.pull_markup()? {
            XmlEvent::StartElement { ref name, .. } if *name == OwnedName::local(tag) => Ok(()),
            event => self.expected(format!("<{}>", tag), Some(&event)),
        }
    }

    /// Expects a closing tag like `</tag>` with a local name without namespaces.
    fn expect_close(&mut self, tag: &str) -> ParseResult<()> {
        match self.pull_markup()? {
            XmlEvent::EndElement { ref name } if *name == OwnedName::local(tag) => Ok(()),
            event => self.expected(format!("</{}>", tag), Some(&event)),
        }
    }

    /// Builds and returns an `Err(MalformedResponse)`.
    fn expected<T, E: ToString>(&self, expected: E, found: Option<&XmlEvent>) -> ParseResult<T> {
        Err(DecodeError::MalformedResponse {
            expected: expected.to_string(),
            found: found.map(describe),
            position: self.reader.position(),
        })
    }

    /// Collects the text content of `<tag>` up to and including its closing tag.
    fn read_text(&mut self, tag: &str) -> ParseResult<String> {
        let mut text = String::new();
        loop {
            match self.pull_event()? {
                XmlEvent::Characters(s) | XmlEvent::Whitespace(s) | XmlEvent::CData(s) => {
                    text.push_str(&s)
                }
                XmlEvent::EndElement { ref name } if *name == OwnedName::local(tag) => {
                    return Ok(text)
                }
                event => return self.expected(format!("characters or </{}>", tag), Some(&event)),
            }
        }
    }

    fn parse_response(&mut self) -> ParseResult<Response> {
        let response: Response;

        // <methodResponse>
        self.expect_open("methodResponse")?;

        // <fault> / <params>
        match self.pull_markup()? {
            XmlEvent::StartElement { ref name, .. } if *name == OwnedName::local("fault") => {
                let value = self.parse_value()?;
                self.expect_close("fault")?;

                response = match Fault::from_value(&value) {
                    Some(fault) => Err(fault),
                    None => return Err(DecodeError::MalformedFault { found: value }),
                };
            }
            XmlEvent::StartElement { ref name, .. } if *name == OwnedName::local("params") => {
                // <param>
                self.expect_open("param")?;

                let value = self.parse_value()?;
                response = Ok(value);

                // </param>
                self.expect_close("param")?;

                // </params>, a second <param> is an error
                self.expect_close("params")?;
            }
            event => return self.expected("<fault> or <params>", Some(&event)),
        }

        // </methodResponse>
        self.expect_close("methodResponse")?;

        match self.pull_markup()? {
            XmlEvent::EndDocument => Ok(response),
            event => self.expected("end of document", Some(&event)),
        }
    }

    /// Parses a complete `<value>` element.
    pub fn parse_value(&mut self) -> ParseResult<Value> {
        // <value>
        self.expect_open("value")?;

        self.parse_value_inner()
    }

    /// Parses the contents of a `<value>` element whose opening tag was already consumed,
    /// including the closing `</value>`.
    fn parse_value_inner(&mut self) -> ParseResult<Value> {
        if self.depth == MAX_DEPTH {
            return self.expected(format!("at most {} nested values", MAX_DEPTH), None);
        }

        self.depth += 1;
        let value = self.parse_value_contents();
        self.depth -= 1;
        value
    }

    fn parse_value_contents(&mut self) -> ParseResult<Value> {
        // Raw string or specific type tag
        let mut text = String::new();
        loop {
            match self.pull_event()? {
                XmlEvent::Characters(s) | XmlEvent::Whitespace(s) | XmlEvent::CData(s) => {
                    text.push_str(&s)
                }
                XmlEvent::EndElement { ref name } if *name == OwnedName::local("value") => {
                    // A `<value>` without a type tag is a string
                    return Ok(Value::String(text));
                }
                XmlEvent::StartElement { ref name, .. } if text.trim().is_empty() => {
                    let value = self.parse_typed(name)?;

                    // </value>
                    self.expect_close("value")?;

                    return Ok(value);
                }
                event => return self.expected("type tag or characters", Some(&event)),
            }
        }
    }

    /// Parses the body of a type tag like `<int>` and its closing tag.
    fn parse_typed(&mut self, name: &OwnedName) -> ParseResult<Value> {
        let position = self.reader.position();
        let invalid_value = |for_type: &'static str, found: String| DecodeError::MalformedValue {
            for_type,
            found,
            position,
        };

        let tag = match name.prefix {
            None => name.local_name.as_str(),
            Some(_) => {
                return Err(DecodeError::UnknownType {
                    tag: name.to_string(),
                    position,
                })
            }
        };

        let value = match tag {
            "struct" => {
                let mut members = BTreeMap::new();
                loop {
                    match self.pull_markup()? {
                        XmlEvent::EndElement { ref name } if *name == OwnedName::local("struct") => break,
                        XmlEvent::StartElement { ref name, .. } if *name == OwnedName::local("member") => {
                            // <member>

                            // <name>NAME</name>
                            self.expect_open("name")?;
                            let name = self.read_text("name")?;

                            // Value
                            let value = self.parse_value()?;

                            // </member>
                            self.expect_close("member")?;

                            members.insert(name, value);
                        }
                        event => return self.expected("</struct> or <member>", Some(&event)),
                    }
                }

                Value::Struct(members)
            }
            "array" => {
                let mut elements: Vec<Value> = Vec::new();
                self.expect_open("data")?;
                loop {
                    match self.pull_markup()? {
                        XmlEvent::EndElement { ref name } if *name == OwnedName::local("data") => break,
                        XmlEvent::StartElement { ref name, .. } if *name == OwnedName::local("value") => {
                            elements.push(self.parse_value_inner()?);
                        }
                        event => return self.expected("</data> or <value>", Some(&event)),
                    }
                }
                self.expect_close("array")?;
                Value::Array(elements)
            }
            "nil" => {
                let data = self.read_text("nil")?;
                if !data.is_empty() {
                    return Err(invalid_value("nil", data));
                }
                Value::Nil
            }
            "string" => Value::String(self.read_text("string")?),
            "base64" => {
                let data = self.read_text("base64")?;
                // Long payloads are commonly wrapped over several lines.
                let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
                match base64::decode(&compact) {
                    Ok(bytes) => Value::Base64(bytes),
                    Err(_) => return Err(invalid_value("base64", data)),
                }
            }
            "i4" | "int" => {
                let data = self.read_text(tag)?;
                match data.trim().parse::<i32>() {
                    Ok(i) => Value::Int(i),
                    Err(_) => return Err(invalid_value("int", data)),
                }
            }
            "boolean" => {
                let data = self.read_text(tag)?;
                match data.trim() {
                    "0" => Value::Bool(false),
                    "1" => Value::Bool(true),
                    _ => return Err(invalid_value("boolean", data)),
                }
            }
            "double" => {
                let data = self.read_text(tag)?;
                match data.trim().parse::<f64>() {
                    Ok(d) => Value::Double(d),
                    Err(_) => return Err(invalid_value("double", data)),
                }
            }
            "dateTime.iso8601" => {
                let data = self.read_text(tag)?;
                match datetime(data.trim()) {
                    Ok(date_time) => Value::DateTime(date_time),
                    Err(_) => return Err(invalid_value("dateTime.iso8601", data)),
                }
            }
            _ => {
                return Err(DecodeError::UnknownType {
                    tag: tag.to_string(),
                    position,
                })
            }
        };

        Ok(value)
    }
}

/// Renders an event the way it appeared in the document, for error messages.
fn describe(event: &XmlEvent) -> String {
    match *event {
        XmlEvent::StartElement { ref name, .. } => format!("<{}>", name),
        XmlEvent::EndElement { ref name } => format!("</{}>", name),
        XmlEvent::Characters(ref s) | XmlEvent::Whitespace(ref s) | XmlEvent::CData(ref s) => {
            let fragment: String = s.chars().take(MAX_FRAGMENT_LEN).collect();
            if fragment.len() < s.len() {
                format!("{:?}...", fragment)
            } else {
                format!("{:?}", fragment)
            }
        }
        XmlEvent::EndDocument => "end of document".to_string(),
        ref other => format!("{:?}", other),
    }
}

/// Parses a response from an XML reader.
///
/// Returns `Ok(Ok(value))` for a successful call, `Ok(Err(fault))` when the server reported a
/// `<fault>`, and `Err(_)` when the document is not a valid XML-RPC response.
///
/// Whitespace and a byte order mark in front of the document are skipped.
pub fn parse_response<R: Read>(reader: &mut R) -> ParseResult<Response> {
    let mut document = Vec::new();
    reader.read_to_end(&mut document)?;

    let mut body = skip_prolog(&document);
    Parser::new(&mut body).parse_response()
}

/// Strips whitespace and a UTF-8 byte order mark from the start of a document.
fn skip_prolog(mut document: &[u8]) -> &[u8] {
    loop {
        if let Some(rest) = document.strip_prefix(BOM) {
            document = rest;
        } else if let Some((first, rest)) = document.split_first() {
            if !first.is_ascii_whitespace() {
                return document;
            }
            document = rest;
        } else {
            return document;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fmt::Debug;
    use xml::common::TextPosition;

    fn position_of(error: &DecodeError) -> Option<TextPosition> {
        match *error {
            DecodeError::MalformedResponse { position, .. }
            | DecodeError::UnknownType { position, .. }
            | DecodeError::MalformedValue { position, .. } => Some(position),
            _ => None,
        }
    }

    fn read_response(xml: &str) -> ParseResult<Response> {
        parse_response(&mut xml.as_bytes())
    }

    fn read_value(xml: &str) -> ParseResult<Value> {
        Parser::new(&mut xml.as_bytes()).parse_value()
    }

    /// Test helper function that will panic with the `Err` if a `Result` is not an `Ok`.
    fn assert_ok<T: Debug, E: Debug>(result: Result<T, E>) {
        match result {
            Ok(_) => {}
            Err(e) => panic!("assert_ok called on Err value: {:?}", e),
        }
    }

    /// Test helper function that will panic with the `Ok` if a `Result` is not an `Err`.
    fn assert_err<T: Debug, E: Debug>(result: Result<T, E>) {
        match result {
            Ok(t) => panic!("assert_err called on Ok value: {:?}", t),
            Err(_) => {}
        }
    }

    #[test]
    fn parses_response() {
        assert_eq!(
            read_response(
                r##"
<?xml version="1.0"?>
<methodResponse>
    <params>
        <param>
            <value>teststring</value>
        </param>
    </params>
</methodResponse>
"##
            )
            .unwrap(),
            Ok(Value::String("teststring".into()))
        );
    }

    #[test]
    fn parses_fault() {
        assert_eq!(
            read_response(
                r##"
<?xml version="1.0"?>
<methodResponse>
   <fault>
      <value>
         <struct>
            <member>
               <name>faultCode</name>
               <value><int>4</int></value>
               </member>
            <member>
               <name>faultString</name>
               <value><string>Too many parameters.</string></value>
               </member>
            </struct>
         </value>
      </fault>
   </methodResponse>"##
            )
            .unwrap(),
            Err(Fault::new(4, "Too many parameters."))
        );
    }

    #[test]
    fn ignores_additional_fault_fields() {
        assert_eq!(
            read_response(
                r##"
<?xml version="1.0"?>
<methodResponse>
   <fault>
      <value>
         <struct>
            <member>
               <name>faultCode</name>
               <value><int>4</int></value>
               </member>
            <member>
               <name>faultString</name>
               <value><string>Too many parameters.</string></value>
               </member>
            <member>
               <name>unnecessaryParameter</name>
               <value><string>Too many parameters.</string></value>
               </member>
            </struct>
         </value>
      </fault>
   </methodResponse>"##
            )
            .unwrap(),
            Err(Fault::new(4, "Too many parameters."))
        );
    }

    #[test]
    fn rejects_invalid_faults() {
        // Make sure to reject type errors in <fault>s - They're specified to contain specifically
        // typed fields.
        let err = read_response(
            r##"
<?xml version="1.0"?>
<methodResponse>
   <fault>
      <value>
         <struct>
            <member>
               <name>faultCode</name>
               <value><string>I'm not an int!</string></value>
               </member>
            <member>
               <name>faultString</name>
               <value><string>Too many parameters.</string></value>
               </member>
            </struct>
         </value>
      </fault>
   </methodResponse>"##,
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::MalformedFault { .. }), "{:?}", err);

        let err = read_response(
            r##"
<?xml version="1.0"?>
<methodResponse>
   <fault>
      <value>
         <struct>
            <member>
               <name>faultCode</name>
               <value><int>4</int></value>
               </member>
            </struct>
         </value>
      </fault>
   </methodResponse>"##,
        )
        .unwrap_err();
        assert!(matches!(err, DecodeError::MalformedFault { .. }), "{:?}", err);
    }

    #[test]
    fn rejects_multiple_params() {
        let err = read_response(
            r##"<methodResponse><params>
                <param><value><int>1</int></value></param>
                <param><value><int>2</int></value></param>
            </params></methodResponse>"##,
        )
        .unwrap_err();
        match err {
            DecodeError::MalformedResponse { expected, found, .. } => {
                assert_eq!(expected, "</params>");
                assert_eq!(found.as_deref(), Some("<param>"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn rejects_empty_params() {
        assert_err(read_response("<methodResponse><params></params></methodResponse>"));
    }

    #[test]
    fn rejects_missing_envelope() {
        let err = read_response("<params><param><value><int>1</int></value></param></params>").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedResponse { .. }), "{:?}", err);

        assert_err(read_response("<value><int>1</int></value>"));
        assert_err(read_response(""));
    }

    #[test]
    fn rejects_unterminated_tags() {
        let err = read_response(
            "<methodResponse><params><param><value><int>5</int></value></param></params>",
        )
        .unwrap_err();
        match err {
            DecodeError::MalformedResponse { expected, found, .. } => {
                assert_eq!(expected, "well-formed XML");
                assert!(found.is_some());
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = read_response("<methodResponse><params><param><value><int>5</int>").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedResponse { .. }), "{:?}", err);

        let err = read_response("<methodResponse><params></param></methodResponse>").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedResponse { .. }), "{:?}", err);
    }

    #[test]
    fn skips_leading_whitespace_and_bom() {
        let body = "<methodResponse><params><param><value><int>1</int></value></param></params></methodResponse>";

        assert_eq!(read_response(&format!("\r\n  {}", body)).unwrap(), Ok(Value::Int(1)));
        assert_eq!(read_response(&format!("\u{feff}{}", body)).unwrap(), Ok(Value::Int(1)));
        assert_eq!(
            read_response(&format!("\n\u{feff}<?xml version=\"1.0\"?>\n{}", body)).unwrap(),
            Ok(Value::Int(1))
        );
    }

    fn nested_arrays(depth: usize) -> String {
        let mut xml = String::from("<methodResponse><params><param>");
        for _ in 0..depth {
            xml.push_str("<value><array><data>");
        }
        for _ in 0..depth {
            xml.push_str("</data></array></value>");
        }
        xml.push_str("</param></params></methodResponse>");
        xml
    }

    #[test]
    fn limits_nesting_depth() {
        assert_ok(read_response(&nested_arrays(MAX_DEPTH)));

        for &depth in &[MAX_DEPTH + 1, 300, 5000] {
            match read_response(&nested_arrays(depth)).unwrap_err() {
                DecodeError::MalformedResponse { expected, .. } => {
                    assert_eq!(expected, "at most 128 nested values")
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[test]
    fn rejects_trailing_elements() {
        assert_err(read_response(
            "<methodResponse><params><param><value>x</value></param></params><params/></methodResponse>",
        ));
    }

    #[test]
    fn parses_string_value_with_whitespace() {
        assert_eq!(
            read_value("<value><string>  I'm a string!  </string></value>").unwrap(),
            Value::String("  I'm a string!  ".into())
        );
        assert_eq!(
            read_value("<value><string>   </string></value>").unwrap(),
            Value::String("   ".into())
        );
    }

    #[test]
    fn parses_int_with_plus_sign() {
        // "You can include a plus or minus at the beginning of a string of numeric characters."
        assert_eq!(read_value("<value><int>+1234</int></value>").unwrap(), Value::Int(1234));
        assert_eq!(read_value("<value><i4>-12</i4></value>").unwrap(), Value::Int(-12));
    }

    #[test]
    fn rejects_out_of_range_int() {
        let err = read_value("<value><int>2147483648</int></value>").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedValue { for_type: "int", .. }), "{:?}", err);
    }

    #[test]
    fn parses_date_values() {
        assert_ok(read_value("<value><dateTime.iso8601>2015-02-18T23:16:09Z</dateTime.iso8601></value>"));
        assert_ok(read_value("<value><dateTime.iso8601>19980717T14:08:55</dateTime.iso8601></value>"));
        assert_err(read_value("<value><dateTime.iso8601></dateTime.iso8601></value>"));
        assert_err(read_value("<value><dateTime.iso8601>ILLEGAL VALUE :(</dateTime.iso8601></value>"));
    }

    #[test]
    fn parses_array_values() {
        assert_eq!(
            read_value(
                r#"
                <value><array><data>
                    <value><i4>5</i4></value>
                    <value><string>a</string></value>
                </data></array></value>"#
            )
            .unwrap(),
            Value::Array(vec![Value::Int(5), Value::String("a".into())])
        );
    }

    #[test]
    fn parses_nested_struct_values() {
        let value = read_value(
            r#"<value><struct>
                <member><name>inner</name><value><struct>
                    <member><name>list</name><value><array><data></data></array></value></member>
                </struct></value></member>
                <member><name>flag</name><value><boolean>1</boolean></value></member>
            </struct></value>"#,
        )
        .unwrap();

        let inner = value.get("inner").unwrap();
        assert_eq!(inner.get("list"), Some(&Value::Array(Vec::new())));
        assert_eq!(value.get("flag"), Some(&Value::Bool(true)));
    }

    #[test]
    fn parses_raw_value_as_string() {
        assert_eq!(
            read_value("<value>\t  I'm a string!  </value>").unwrap(),
            Value::String("\t  I'm a string!  ".into())
        );
        assert_eq!(read_value("<value></value>").unwrap(), Value::String(String::new()));
        assert_eq!(read_value("<value/>").unwrap(), Value::String(String::new()));
    }

    #[test]
    fn parses_nil_values() {
        assert_eq!(read_value("<value><nil/></value>").unwrap(), Value::Nil);
        assert_eq!(read_value("<value><nil></nil></value>").unwrap(), Value::Nil);
        assert_err(read_value("<value><nil>ILLEGAL</nil></value>"));
    }

    #[test]
    fn unescapes_values() {
        assert_eq!(
            read_value("<value><string>abc&lt;abc&amp;abc&apos;&quot;&gt;</string></value>").unwrap(),
            Value::String("abc<abc&abc'\">".into())
        );
        assert_eq!(
            read_value("<value><string><![CDATA[<raw & text>]]></string></value>").unwrap(),
            Value::String("<raw & text>".into())
        );
    }

    #[test]
    fn parses_empty_string() {
        assert_eq!(read_value("<value><string></string></value>").unwrap(), Value::String(String::new()));
        assert_eq!(read_value("<value><string/></value>").unwrap(), Value::String(String::new()));
    }

    #[test]
    fn parses_base64() {
        assert_eq!(read_value("<value><base64></base64></value>").unwrap(), Value::Base64(Vec::new()));
        assert_eq!(read_value("<value><base64/></value>").unwrap(), Value::Base64(Vec::new()));
        assert_eq!(
            read_value("<value><base64>aGVs\n  bG8=</base64></value>").unwrap(),
            Value::Base64(b"hello".to_vec())
        );
        assert_err(read_value("<value><base64>not base64!</base64></value>"));
    }

    #[test]
    fn rejects_unknown_types() {
        let err = read_value("<value><i8>12345</i8></value>").unwrap_err();
        match err {
            DecodeError::UnknownType { tag, .. } => assert_eq!(tag, "i8"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn rejects_attributes() {
        assert_err(read_value(r#"<value name="ble">\t  I'm a string!  </value>"#));

        assert_err(read_response(
            r##"
<?xml version="1.0"?>
<methodResponse invalid="1">
    <params>
        <param>
            <value>teststring</value>
        </param>
    </params>
</methodResponse>
"##,
        ));
        assert_err(read_response(
            r##"
<?xml version="1.0"?>
<methodResponse>
    <params>
        <param>
            <value><int invalid="1">4</int></value>
        </param>
    </params>
</methodResponse>
"##,
        ));
    }

    #[test]
    fn error_messages() {
        fn errstr(value: &str) -> String {
            read_value(value).unwrap_err().to_string()
        }

        let attributes = errstr(r#"<value name="ble">\t  I'm a string!  </value>"#);
        assert!(attributes.starts_with("unexpected XML at 1:"), "{}", attributes);
        assert!(
            attributes.ends_with("(expected tag <value> without attributes)"),
            "{}",
            attributes
        );

        assert_eq!(
            errstr(r#"<value><SURPRISE></SURPRISE></value>"#),
            "unknown value type <SURPRISE> at 1:8"
        );

        assert_eq!(
            errstr(r#"<value><int>bla</int></value>"#),
            "invalid value for type 'int' at 1:8: bla"
        );
    }

    #[test]
    fn reports_positions() {
        let err = read_value("<value>\n<struct><oops/></struct></value>").unwrap_err();
        let position = position_of(&err).unwrap();
        assert_eq!(position.row, 1);
    }
}
