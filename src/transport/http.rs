//! Sends requests as HTTP POSTs using reqwest.
//!
//! This module will be disabled if the `http` feature is not enabled.
//!
//! [`HttpTransport`] looks roughly like this:
//!
//! ```notrust
//! // `body` is the encoded request
//!
//! build_headers(builder, body.len());
//!
//! // send `body` using `builder` and get response
//!
//! check_response(&response)?;
//! ```
//!
//! From this, you can build your own custom transports.

use crate::Transport;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use tracing::debug;
use url::Url;

use std::error::Error;
use std::io;

/// `User-Agent` sent by clients built with [`Client::new`](../../struct.Client.html#method.new).
pub const DEFAULT_USER_AGENT: &str = concat!("Rust xmlrpc-client/", env!("CARGO_PKG_VERSION"));

/// Appends all HTTP headers required by the XML-RPC specification to the `RequestBuilder`.
///
/// More specifically, the following headers are set:
///
/// ```notrust
/// Content-Type: text/xml
/// Content-Length: $body_len
/// ```
pub fn build_headers(builder: RequestBuilder, body_len: u64) -> RequestBuilder {
    // Set all required request headers
    // NB: The `Host` header is also required, but reqwest adds it automatically, since
    // HTTP/1.1 requires it.
    builder
        .header(CONTENT_TYPE, "text/xml")
        .header(CONTENT_LENGTH, body_len)
}

/// Checks that a reqwest `Response` has a status code indicating success and, if it declares a
/// `Content-Type`, that it is XML.
pub fn check_response(response: &Response) -> Result<(), Box<dyn Error + Send + Sync>> {
    // This is essentially an open-coded version of `Response::error_for_status` that does not
    // consume the response.
    if response.status().is_client_error() || response.status().is_server_error() {
        return Err(format!("server response indicates error: {}", response.status()).into());
    }

    // "The Content-Type is text/xml."
    // (we ignore this if the header is missing completely)
    if let Some(content) = response.headers().get(CONTENT_TYPE) {
        let content = content.to_str()?.parse::<mime::Mime>()?;
        match (content.type_(), content.subtype()) {
            (mime::TEXT, mime::XML) | (mime::APPLICATION, mime::XML) => {}
            (ty, sub) => {
                return Err(format!("expected Content-Type 'text/xml', got '{}/{}'", ty, sub).into())
            }
        }
    }

    Ok(())
}

/// Posts each request to a fixed URL.
///
/// The wrapped reqwest `Client` owns a connection pool, so a single `HttpTransport` can be shared
/// between threads and reuses connections across calls.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    url: Url,
    client: Client,
}

impl HttpTransport {
    /// Creates a transport that sends requests to `url` using `client`.
    pub fn new(url: Url, client: Client) -> Self {
        HttpTransport { url, client }
    }

    /// Returns the URL requests are posted to.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl Transport for HttpTransport {
    fn transmit(&self, request: &[u8]) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>> {
        let builder = build_headers(self.client.post(self.url.clone()), request.len() as u64);

        let mut response = builder.body(request.to_vec()).send()?;
        debug!(url = %self.url, status = %response.status(), "received HTTP response");

        if let Err(e) = check_response(&response) {
            // Read the rest of the body so the connection can go back into the pool.
            let _ = io::copy(&mut response, &mut io::sink());
            return Err(e);
        }

        Ok(response.bytes()?.to_vec())
    }
}
