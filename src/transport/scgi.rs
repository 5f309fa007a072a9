//! Sends requests over [SCGI], as spoken by e.g. rtorrent.
//!
//! Every call opens a new TCP connection, writes the request framed as an SCGI netstring header
//! followed by the body, and reads the response until the server closes the connection. The
//! response starts with CGI-style headers (`Status: 200 OK`), which are stripped.
//!
//! [SCGI]: https://python.ca/scgi/protocol.txt

use crate::Transport;

use thiserror::Error as ThisError;
use tracing::debug;

use std::error::Error;
use std::io::{self, ErrorKind, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

/// The response sent by an SCGI server could not be understood.
#[derive(Debug, ThisError)]
pub enum ScgiError {
    /// The `Status` header did not indicate success.
    #[error("server response indicates error: {0}")]
    Status(String),

    /// The header block is missing or not terminated by an empty line.
    #[error("malformed SCGI response header: {0:?}")]
    MalformedHeader(String),
}

/// Frames `body` as an SCGI request for `path`.
///
/// The header block is a netstring of NUL-separated names and values, `CONTENT_LENGTH` first as
/// the protocol requires.
pub fn encode_request(path: &str, body: &[u8]) -> Vec<u8> {
    let content_length = body.len().to_string();
    let headers: [(&str, &str); 5] = [
        ("CONTENT_LENGTH", content_length.as_str()),
        ("SCGI", "1"),
        ("REQUEST_METHOD", "POST"),
        ("REQUEST_URI", path),
        ("CONTENT_TYPE", "text/xml"),
    ];

    let mut header = Vec::new();
    for (name, value) in headers.iter() {
        header.extend_from_slice(name.as_bytes());
        header.push(0);
        header.extend_from_slice(value.as_bytes());
        header.push(0);
    }

    let mut request = Vec::with_capacity(header.len() + body.len() + 8);
    request.extend_from_slice(header.len().to_string().as_bytes());
    request.push(b':');
    request.extend_from_slice(&header);
    request.push(b',');
    request.extend_from_slice(body);
    request
}

/// Strips the CGI header block from a response and returns the body.
///
/// A response that starts with `<` is taken to be a bare XML document without headers.
pub fn split_response(response: &[u8]) -> Result<&[u8], ScgiError> {
    let start = response
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(response.len());
    if response.get(start) == Some(&b'<') {
        return Ok(&response[start..]);
    }

    let (header_len, separator_len) = match (find(response, b"\r\n\r\n"), find(response, b"\n\n")) {
        (Some(crlf), Some(lf)) if lf < crlf => (lf, 2),
        (Some(crlf), _) => (crlf, 4),
        (None, Some(lf)) => (lf, 2),
        (None, None) => {
            let head = String::from_utf8_lossy(&response[..response.len().min(64)]).into_owned();
            return Err(ScgiError::MalformedHeader(head));
        }
    };

    let header = String::from_utf8_lossy(&response[..header_len]);
    for line in header.lines() {
        let status = if let Some(status) = line.strip_prefix("HTTP/") {
            // "HTTP/1.1 200 OK"
            status.splitn(2, ' ').nth(1).unwrap_or("")
        } else {
            match line.split_once(':') {
                Some((name, value)) if name.trim().eq_ignore_ascii_case("status") => value.trim(),
                Some(_) => continue,
                None => return Err(ScgiError::MalformedHeader(line.to_string())),
            }
        };

        let code = status.split_whitespace().next().and_then(|code| code.parse::<u16>().ok());
        match code {
            Some(200..=299) => {}
            _ => return Err(ScgiError::Status(status.to_string())),
        }
    }

    Ok(&response[header_len + separator_len..])
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|window| window == needle)
}

/// Sends requests to an SCGI server, one connection per call.
#[derive(Debug, Clone)]
pub struct ScgiTransport {
    address: String,
    path: String,
    timeout: Option<Duration>,
}

impl ScgiTransport {
    /// Creates a transport that connects to `address` (`host:port`).
    pub fn new<A: Into<String>>(address: A) -> Self {
        ScgiTransport {
            address: address.into(),
            path: "/".to_string(),
            timeout: None,
        }
    }

    /// Sets the `REQUEST_URI` sent with each request. Defaults to `/`.
    pub fn with_path<P: Into<String>>(mut self, path: P) -> Self {
        self.path = path.into();
        self
    }

    /// Limits how long connecting, sending and each read may take.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns the `host:port` this transport connects to.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the `REQUEST_URI` sent with each request.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn connect(&self) -> io::Result<TcpStream> {
        let timeout = match self.timeout {
            None => return TcpStream::connect(self.address.as_str()),
            Some(timeout) => timeout,
        };

        let mut last_error = None;
        for addr in self.address.to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, timeout) {
                Ok(stream) => {
                    stream.set_read_timeout(Some(timeout))?;
                    stream.set_write_timeout(Some(timeout))?;
                    return Ok(stream);
                }
                Err(e) => last_error = Some(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            io::Error::new(ErrorKind::InvalidInput, "address did not resolve to anything")
        }))
    }
}

impl Transport for ScgiTransport {
    fn transmit(&self, request: &[u8]) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>> {
        let mut stream = self.connect()?;
        debug!(address = %self.address, "connected to SCGI server");

        stream.write_all(&encode_request(&self.path, request))?;
        stream.flush()?;

        let mut response = Vec::new();
        stream.read_to_end(&mut response)?;

        Ok(split_response(&response)?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_requests_as_netstrings() {
        let framed = encode_request("/RPC2", b"<xml/>");
        let expected = b"CONTENT_LENGTH\x006\x00SCGI\x001\x00REQUEST_METHOD\x00POST\x00\
REQUEST_URI\x00/RPC2\x00CONTENT_TYPE\x00text/xml\x00";
        let mut netstring = format!("{}:", expected.len()).into_bytes();
        netstring.extend_from_slice(expected);
        netstring.push(b',');
        netstring.extend_from_slice(b"<xml/>");

        assert_eq!(framed, netstring);
    }

    #[test]
    fn strips_headers() {
        let response = b"Status: 200 OK\r\nContent-Type: text/xml\r\nContent-Length: 6\r\n\r\n<xml/>";
        assert_eq!(split_response(response).unwrap(), b"<xml/>");

        let response = b"Content-Type: text/xml\n\n<xml/>";
        assert_eq!(split_response(response).unwrap(), b"<xml/>");

        let response = b"HTTP/1.1 200 OK\r\n\r\n<xml/>";
        assert_eq!(split_response(response).unwrap(), b"<xml/>");
    }

    #[test]
    fn accepts_bare_documents() {
        let response = b"\n<?xml version=\"1.0\"?><methodResponse/>";
        assert_eq!(split_response(response).unwrap(), &response[1..]);
    }

    #[test]
    fn rejects_error_status() {
        let response = b"Status: 500 Internal Server Error\r\n\r\noops";
        match split_response(response) {
            Err(ScgiError::Status(status)) => assert_eq!(status, "500 Internal Server Error"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn rejects_unterminated_headers() {
        assert!(matches!(
            split_response(b"Status: 200 OK\r\n"),
            Err(ScgiError::MalformedHeader(_))
        ));
        assert!(matches!(split_response(b""), Err(ScgiError::MalformedHeader(_))));
    }

    #[test]
    fn reports_connection_failures() {
        // Nothing listens on port 1 of the loopback interface.
        let transport = ScgiTransport::new("127.0.0.1:1").with_timeout(Duration::from_secs(1));
        assert!(transport.transmit(b"<xml/>").is_err());
    }
}
