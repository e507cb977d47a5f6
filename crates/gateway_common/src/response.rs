//! Raw response envelope returned by the injected transport.

use bytes::Bytes;

/// What the transport hands back for every completed call: the undecoded
/// body plus the HTTP status. Interpretation is entirely the connector's
/// job; a 4xx with a parseable error body is a decline, not a transport
/// failure.
#[derive(Clone, Debug)]
pub struct Response {
    /// Raw response body
    pub response: Bytes,
    /// HTTP status code
    pub status_code: u16,
}

impl Response {
    /// Builds a response from a body and status code.
    pub fn new(response: Bytes, status_code: u16) -> Self {
        Self {
            response,
            status_code,
        }
    }
}
