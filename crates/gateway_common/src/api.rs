//! The injected transport boundary.

use crate::{
    errors::{CustomResult, HttpClientError},
    request::Request,
    response::Response,
};

/// The HTTP transport the gateway is constructed over.
///
/// Implementations own connection handling, TLS, timeouts and any retry
/// policy; the gateway issues at most two sequential calls per operation and
/// never retries on its own. The call contract is synchronous and bounded:
/// one request in, one status-plus-body out, or a transport error.
///
/// A non-2xx status is *not* a transport error: the processor encodes
/// declines in such responses and the connector interprets them.
pub trait HttpClient: Send + Sync {
    /// Performs a single blocking HTTP exchange.
    fn send(&self, request: Request) -> CustomResult<Response, HttpClientError>;
}
