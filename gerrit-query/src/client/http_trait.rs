use crate::config::Credential;
use crate::error::Result;

/// Status, status line and body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_line: String,
    pub body: String,
}

/// Minimal blocking HTTP client trait that can be implemented with any HTTP library.
///
/// This allows consumers to bring their own HTTP client implementation
/// (proxies, custom TLS roots, test doubles) instead of the bundled
/// [`UreqClient`](crate::UreqClient).
pub trait HttpClient: Send + Sync + Clone {
    /// Perform a GET request authenticated with HTTP Basic auth.
    ///
    /// The `Authorization` header must be sent preemptively, on the first
    /// request, not in answer to a challenge. Non-2xx statuses are returned
    /// as a normal [`HttpResponse`]; only transport failures are errors.
    ///
    /// # Arguments
    /// * `url` - The full URL to request, query string included
    /// * `credential` - Username and password for the `Authorization` header
    ///
    /// # Returns
    /// The status, status line and body, including non-2xx responses
    fn get(&self, url: &str, credential: &Credential) -> Result<HttpResponse>;
}
