//! Defines error types used by this library.

use crate::{Fault, Value};

use thiserror::Error as ThisError;
use xml::common::TextPosition;
use xml::reader::Error as XmlError;

use std::error::Error as StdError;
use std::io;

/// A call could not be completed.
///
/// Each variant corresponds to the phase the call failed in, so callers can decide what to do
/// without looking at the message: only [`Error::Communication`] is worth retrying, and
/// [`Error::Fault`] means the exchange itself succeeded.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The request could not be encoded. Nothing was sent.
    #[error("failed to encode request: {0}")]
    Encoding(#[from] EncodeError),

    /// The transport failed to deliver the request or to receive the response.
    #[error("communication error: {0}")]
    Communication(#[source] Box<dyn StdError + Send + Sync>),

    /// The response could not be parsed. This can happen when the server doesn't correctly
    /// implement the XML-RPC spec.
    #[error("failed to decode response: {0}")]
    Decoding(#[from] DecodeError),

    /// The server responded with a `<fault>`.
    #[error("server returned a fault: {0}")]
    Fault(#[from] Fault),
}

impl Error {
    /// If this `Error` was caused by the server responding with a `<fault>` response,
    /// returns the `Fault` in question.
    pub fn fault(&self) -> Option<&Fault> {
        match *self {
            Error::Fault(ref fault) => Some(fault),
            _ => None,
        }
    }
}

/// The client could not be constructed from the given configuration.
#[derive(Debug, ThisError)]
pub enum ConfigError {
    /// The address is not a valid URL.
    #[error("invalid address '{address}': {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: url::ParseError,
    },

    /// An `scgi://` address without a host or a port.
    #[error("SCGI address '{0}' must name a host and a port")]
    IncompleteScgiAddress(String),

    /// The address needs a transport this build does not provide.
    #[error("scheme '{0}' is not supported by this client")]
    UnsupportedScheme(String),

    /// The HTTP client could not be built.
    #[error("could not build HTTP client: {0}")]
    HttpClient(#[source] Box<dyn StdError + Send + Sync>),
}

/// A `Request` could not be turned into an XML document.
#[derive(Debug, ThisError)]
pub enum EncodeError {
    /// XML-RPC calls need a method name.
    #[error("method name must not be empty")]
    EmptyMethodName,

    /// An argument has no XML-RPC representation.
    #[error("argument {position} cannot be represented in XML-RPC: {source}")]
    UnsupportedType {
        /// Zero-based index of the offending argument.
        position: usize,
        #[source]
        source: SerializeError,
    },

    /// The writer returned an error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// A value could not be converted to a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
#[error("{message}")]
pub struct SerializeError {
    message: String,
}

impl SerializeError {
    pub(crate) fn new<S: Into<String>>(message: S) -> Self {
        SerializeError {
            message: message.into(),
        }
    }
}

/// Describes possible errors that can occur when parsing a response.
#[derive(Debug, ThisError)]
pub enum DecodeError {
    /// The document could not be read, for example because of an I/O error or invalid UTF-8.
    ///
    /// Syntax errors such as unclosed tags or a truncated document are reported as
    /// [`DecodeError::MalformedResponse`] instead.
    #[error("malformed XML: {0}")]
    MalformedXml(#[from] XmlError),

    /// Found an unexpected tag, attribute, etc., or the document is not well-formed XML.
    #[error("unexpected XML at {position} (expected {expected}{})", found_suffix(.found))]
    MalformedResponse {
        /// A short description of the kind of data that was expected.
        expected: String,
        /// What was found instead, if there was anything.
        found: Option<String>,
        /// The position of the unexpected data inside the XML document.
        position: TextPosition,
    },

    /// A `<value>` contained a type tag that isn't part of XML-RPC.
    #[error("unknown value type <{tag}> at {position}")]
    UnknownType {
        tag: String,
        position: TextPosition,
    },

    /// Could not parse the given CDATA as XML-RPC value.
    ///
    /// For example, `<value><int>AAA</int></value>` describes an invalid value.
    #[error("invalid value for type '{for_type}' at {position}: {found}")]
    MalformedValue {
        /// The type for which an invalid value was supplied (eg. `int` or `dateTime.iso8601`).
        for_type: &'static str,
        /// The value we encountered, as a string.
        found: String,
        /// The position of the invalid value inside the XML document.
        position: TextPosition,
    },

    /// A `<fault>` did not carry an integer `faultCode` and a textual `faultString`.
    #[error("malformed <fault>: {found:?}")]
    MalformedFault {
        /// The value found inside the `<fault>` element.
        found: Value,
    },
}

fn found_suffix(found: &Option<String>) -> String {
    match *found {
        Some(ref found) => format!(", found {}", found),
        None => String::new(),
    }
}

impl From<io::Error> for DecodeError {
    fn from(e: io::Error) -> Self {
        DecodeError::MalformedXml(XmlError::from(e))
    }
}
