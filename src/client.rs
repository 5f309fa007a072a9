use crate::error::{ConfigError, Error};
use crate::parser::parse_response;
use crate::transport::scgi::ScgiTransport;
use crate::{Endpoint, Request, Transport, Value};

use serde::Serialize;
use tracing::{debug, debug_span, trace, warn};

use std::fmt;
use std::time::Duration;

/// An XML-RPC client bound to one endpoint.
///
/// The transport is chosen once, when the client is built, from the scheme of the address:
/// `scgi://host:port` talks SCGI, any other address (usually `http://` or `https://`) is POSTed
/// to. Calls block until the response has been received and parsed.
///
/// A `Client` is `Send + Sync`; calls made from several threads share the same transport.
pub struct Client {
    endpoint: Endpoint,
    transport: Box<dyn Transport + Send + Sync>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl Client {
    /// Creates a client for `address`.
    ///
    /// Pass `true` for `insecure` to turn off TLS certificate verification.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if `address` can't be parsed, or names a scheme there is no
    /// transport for.
    pub fn new(address: &str, insecure: bool) -> Result<Self, ConfigError> {
        Client::builder(address).insecure(insecure).build()
    }

    /// Starts building a client for `address` with non-default settings.
    pub fn builder<S: Into<String>>(address: S) -> ClientBuilder {
        ClientBuilder::new(address.into())
    }

    /// Creates a client that sends requests through an already configured reqwest `Client`.
    ///
    /// This allows you to set up timeouts, proxies or default headers yourself. `scgi://` addresses
    /// are rejected.
    #[cfg(feature = "http")]
    pub fn with_http_client(address: &str, client: reqwest::blocking::Client) -> Result<Self, ConfigError> {
        match Endpoint::parse(address)? {
            Endpoint::Http(url) => Ok(Client {
                transport: Box::new(crate::http::HttpTransport::new(url.clone(), client)),
                endpoint: Endpoint::Http(url),
            }),
            endpoint => Err(ConfigError::UnsupportedScheme(endpoint.scheme().to_string())),
        }
    }

    /// Creates a client that sends requests through a custom [`Transport`].
    pub fn with_transport<T>(endpoint: Endpoint, transport: T) -> Self
    where
        T: Transport + Send + Sync + 'static,
    {
        Client {
            endpoint,
            transport: Box::new(transport),
        }
    }

    /// Returns the endpoint this client sends requests to.
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Calls the remote method `name`.
    ///
    /// `args` is any serializable value: a tuple, array, slice or `Vec` passes one parameter per
    /// element, `()` passes none, and anything else is passed as the only parameter. A single
    /// [`Value`] is always one parameter, so `&Value::Array(..)` sends one `<array>`, and a slice
    /// of `Value`s passes each element as its own parameter.
    ///
    /// Serde sees `Vec<u8>` and `&[u8]` as sequences of integers. To send a `<base64>`, pass a
    /// [`Value::Base64`] or a type that serializes as bytes, such as `serde_bytes::ByteBuf`.
    ///
    /// ```no_run
    /// # use xmlrpc_client::{Client, Value};
    /// # fn main() -> Result<(), xmlrpc_client::Error> {
    /// # let client = Client::new("http://127.0.0.1:8000", false).unwrap();
    /// let sum = client.call("add", &(2, 3))?;
    /// let pong = client.call("ping", &())?;
    /// let echoed = client.call("echo", &[Value::Nil, Value::from("x")])?;
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # Errors
    ///
    /// * [`Error::Encoding`] if an argument has no XML-RPC representation. Nothing is sent.
    /// * [`Error::Communication`] if the transport fails.
    /// * [`Error::Decoding`] if the response is not valid XML-RPC.
    /// * [`Error::Fault`] if the server responded with a `<fault>`.
    pub fn call<A: Serialize + ?Sized>(&self, name: &str, args: &A) -> Result<Value, Error> {
        let request = Request::with_args(name, args)?;
        self.execute(&request)
    }

    /// Sends a prepared [`Request`]. Fails in the same ways as [`Client::call`].
    pub fn execute(&self, request: &Request) -> Result<Value, Error> {
        let _span = debug_span!("xmlrpc_call", method = request.name()).entered();

        let body = request.to_bytes()?;
        debug!(endpoint = %self.endpoint, params = request.args().len(), "sending XML-RPC request");
        trace!(bytes = body.len(), "encoded request");

        let response = self.transport.transmit(&body).map_err(|e| {
            warn!(error = %e, "XML-RPC transport failed");
            Error::Communication(e)
        })?;
        trace!(bytes = response.len(), "received response");

        let response = parse_response(&mut response.as_slice()).map_err(|e| {
            warn!(error = %e, "malformed XML-RPC response");
            Error::Decoding(e)
        })?;

        match response {
            Ok(value) => {
                debug!(value_type = value.type_name(), "XML-RPC call succeeded");
                Ok(value)
            }
            Err(fault) => {
                warn!(code = fault.code(), message = fault.string(), "server returned a fault");
                Err(Error::Fault(fault))
            }
        }
    }
}

/// Configures and builds a [`Client`].
///
/// ```no_run
/// # use std::time::Duration;
/// # use xmlrpc_client::Client;
/// let client = Client::builder("https://self-signed.example/RPC2")
///     .insecure(true)
///     .timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
/// ```
#[derive(Clone, Debug)]
pub struct ClientBuilder {
    address: String,
    insecure: bool,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    fn new(address: String) -> Self {
        ClientBuilder {
            address,
            insecure: false,
            timeout: None,
            user_agent: None,
        }
    }

    /// Turns TLS certificate verification off (`true`) or on (`false`, the default).
    ///
    /// Only affects `https://` addresses.
    pub fn insecure(mut self, insecure: bool) -> Self {
        self.insecure = insecure;
        self
    }

    /// Limits how long each call may take. By default calls wait indefinitely.
    ///
    /// For SCGI, the limit applies to connecting and to each read and write separately.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the `User-Agent` header sent with HTTP requests.
    pub fn user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Parses the address and sets up the matching transport.
    pub fn build(self) -> Result<Client, ConfigError> {
        let endpoint = Endpoint::parse(&self.address)?;

        let transport: Box<dyn Transport + Send + Sync> = match endpoint {
            Endpoint::Scgi { ref host, port, ref path } => {
                let mut transport = ScgiTransport::new(format!("{}:{}", host, port)).with_path(path.as_str());
                if let Some(timeout) = self.timeout {
                    transport = transport.with_timeout(timeout);
                }
                Box::new(transport)
            }
            Endpoint::Http(ref url) => self.http_transport(url)?,
        };

        debug!(endpoint = %endpoint, "created XML-RPC client");
        Ok(Client { endpoint, transport })
    }

    #[cfg(feature = "http")]
    fn http_transport(&self, url: &url::Url) -> Result<Box<dyn Transport + Send + Sync>, ConfigError> {
        use crate::http::{HttpTransport, DEFAULT_USER_AGENT};

        let user_agent = self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);
        let mut builder = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(self.timeout);
        if self.insecure {
            builder = accept_invalid_certs(builder);
        }

        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(Box::new(e)))?;
        Ok(Box::new(HttpTransport::new(url.clone(), client)))
    }

    #[cfg(not(feature = "http"))]
    fn http_transport(&self, url: &url::Url) -> Result<Box<dyn Transport + Send + Sync>, ConfigError> {
        Err(ConfigError::UnsupportedScheme(url.scheme().to_string()))
    }
}

#[cfg(feature = "tls")]
fn accept_invalid_certs(builder: reqwest::blocking::ClientBuilder) -> reqwest::blocking::ClientBuilder {
    builder.danger_accept_invalid_certs(true)
}

#[cfg(all(feature = "http", not(feature = "tls")))]
fn accept_invalid_certs(builder: reqwest::blocking::ClientBuilder) -> reqwest::blocking::ClientBuilder {
    warn!("built without TLS support, ignoring request to skip certificate verification");
    builder
}
