//! A blocking XML-RPC client in Rust.
//!
//! The `xmlrpc_client` crate implements the client side of the [XML-RPC spec][spec]. Requests can
//! be sent over HTTP(S) or over an [SCGI] socket, which is selected from the scheme of the address
//! handed to [`Client::new`]:
//!
//! ```no_run
//! use xmlrpc_client::{Client, Value};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new("http://127.0.0.1:8000", false)?;
//! let sum = client.call("add", &(2, 3))?;
//! assert_eq!(sum, Value::Int(5));
//!
//! let rtorrent = Client::new("scgi://127.0.0.1:5000/RPC2", false)?;
//! let version = rtorrent.call("system.client_version", &())?;
//! println!("{:?}", version.as_str());
//! # Ok(())
//! # }
//! ```
//!
//! A `<fault>` sent by the server is returned as [`Error::Fault`], so its code can be inspected
//! without parsing the error message.
//!
//! [spec]: http://xmlrpc.scripting.com/spec.html
//! [SCGI]: https://python.ca/scgi/protocol.txt

#![doc(html_root_url = "https://docs.rs/xmlrpc-client/0.1.0")]
#![warn(missing_debug_implementations)]

mod client;
mod endpoint;
mod error;
mod fault;
mod parser;
mod request;
mod ser;
mod transport;
mod utils;
mod value;

pub use client::{Client, ClientBuilder};
pub use endpoint::Endpoint;
pub use error::{ConfigError, DecodeError, EncodeError, Error, SerializeError};
pub use fault::Fault;
pub use parser::{parse_response, Response};
pub use request::Request;
pub use ser::to_value;
pub use transport::scgi::{self, ScgiTransport};
pub use transport::Transport;
pub use value::Value;

#[cfg(feature = "http")]
pub use transport::http;
