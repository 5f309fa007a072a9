//! Request and response transport abstraction.

use std::error::Error;

pub mod scgi;

#[cfg(feature = "http")]
pub mod http;

/// Request and response transport abstraction.
///
/// The `Transport` trait provides a way to send an encoded XML-RPC request to a server and to
/// receive the corresponding response. A [`Client`] picks one based on the scheme of its address
/// ([`http::HttpTransport`] or [`scgi::ScgiTransport`]), but any implementor can be plugged in
/// with [`Client::with_transport`].
///
/// You can implement this trait for your own types if you want to customize how requests are sent.
/// You can modify HTTP headers or wrap requests in a completely different protocol.
///
/// [`Client`]: ../struct.Client.html
/// [`Client::with_transport`]: ../struct.Client.html#method.with_transport
pub trait Transport {
    /// Transmits an XML-RPC request and returns the server's response.
    ///
    /// `request` is a complete `<methodCall>` document. The returned bytes must be the complete
    /// `<methodResponse>` document; the client parses them once this method returns.
    ///
    /// # Errors
    ///
    /// If a transport error occurs, it should be returned as a boxed error - the library will then
    /// return an [`Error::Communication`] to the caller.
    ///
    /// [`Error::Communication`]: ../enum.Error.html#variant.Communication
    fn transmit(&self, request: &[u8]) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>>;
}

impl<'a, T: Transport + ?Sized> Transport for &'a T {
    fn transmit(&self, request: &[u8]) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>> {
        (**self).transmit(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn transmit(&self, request: &[u8]) -> Result<Vec<u8>, Box<dyn Error + Send + Sync>> {
        (**self).transmit(request)
    }
}
