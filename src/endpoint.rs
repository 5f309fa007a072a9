use crate::error::ConfigError;

use url::Url;

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Where a [`Client`](struct.Client.html) sends its requests, parsed from its address.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    /// Any address that is not `scgi://`, usually `http://` or `https://`. Requests are POSTed
    /// to the full URL.
    Http(Url),
    /// `scgi://host:port/path` addresses.
    Scgi {
        host: String,
        port: u16,
        /// Sent as the SCGI `REQUEST_URI`.
        path: String,
    },
}

impl Endpoint {
    /// Parses an address like `https://example.com/RPC2` or `scgi://localhost:5000`.
    ///
    /// # Errors
    ///
    /// Fails if `address` is not a URL, or if an `scgi` address lacks a host or port.
    pub fn parse(address: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(address).map_err(|source| ConfigError::InvalidAddress {
            address: address.to_string(),
            source,
        })?;

        match url.scheme() {
            "scgi" => match (url.host_str(), url.port()) {
                (Some(host), Some(port)) if !host.is_empty() => Ok(Endpoint::Scgi {
                    host: host.to_string(),
                    port,
                    path: if url.path().is_empty() { "/".to_string() } else { url.path().to_string() },
                }),
                _ => Err(ConfigError::IncompleteScgiAddress(address.to_string())),
            },
            _ => Ok(Endpoint::Http(url)),
        }
    }

    /// Returns the URL scheme this endpoint was parsed from.
    pub fn scheme(&self) -> &str {
        match *self {
            Endpoint::Http(ref url) => url.scheme(),
            Endpoint::Scgi { .. } => "scgi",
        }
    }
}

impl FromStr for Endpoint {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Endpoint::parse(s)
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            Endpoint::Http(ref url) => write!(f, "{}", url),
            Endpoint::Scgi { ref host, port, ref path } => write!(f, "scgi://{}:{}{}", host, port, path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scgi_addresses() {
        assert_eq!(
            Endpoint::parse("scgi://host:1234/").unwrap(),
            Endpoint::Scgi {
                host: "host".to_string(),
                port: 1234,
                path: "/".to_string(),
            }
        );

        let endpoint: Endpoint = "scgi://127.0.0.1:5000/RPC2".parse().unwrap();
        assert_eq!(endpoint.to_string(), "scgi://127.0.0.1:5000/RPC2");
        assert_eq!(endpoint.scheme(), "scgi");
    }

    #[test]
    fn keeps_http_urls_intact() {
        match Endpoint::parse("https://example/rpc").unwrap() {
            Endpoint::Http(url) => assert_eq!(url.as_str(), "https://example/rpc"),
            other => panic!("unexpected endpoint: {:?}", other),
        }
        assert_eq!(Endpoint::parse("http://[::1]:8000/").unwrap().scheme(), "http");
    }

    #[test]
    fn rejects_bad_addresses() {
        assert!(matches!(
            Endpoint::parse("not a url"),
            Err(ConfigError::InvalidAddress { .. })
        ));
        assert!(matches!(
            Endpoint::parse("scgi://host/"),
            Err(ConfigError::IncompleteScgiAddress(_))
        ));
    }
}
