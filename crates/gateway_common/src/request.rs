//! Outbound request value types handed to the injected transport.

use masking::Maskable;
use serde::{Deserialize, Serialize};

/// Headers attached to an outbound request, values masked where secret.
pub type Headers = Vec<(String, Maskable<String>)>;

/// HTTP method of an outbound request.
///
/// The gateway only ever issues reads and writes; anything else would be a
/// new processor capability, not a new verb.
#[derive(
    Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    /// Read-only query
    Get,
    /// State-changing call
    Post,
}

/// Body of an outbound request.
///
/// The processor's card API is form-encoded throughout; the body is held
/// already encoded so nothing downstream can re-serialize secrets by
/// accident.
pub enum RequestContent {
    /// `application/x-www-form-urlencoded` body
    FormUrlEncoded(String),
}

impl std::fmt::Debug for RequestContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::FormUrlEncoded(_) => "FormUrlEncodedRequestBody",
        })
    }
}

/// A fully assembled outbound request.
#[derive(Debug)]
pub struct Request {
    /// Absolute URL of the call
    pub url: String,
    /// Headers, secret values masked
    pub headers: Headers,
    /// HTTP method
    pub method: Method,
    /// Optional body
    pub body: Option<RequestContent>,
}

impl Request {
    /// Creates a request with the given method and URL and no headers or
    /// body.
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            method,
            url: String::from(url),
            headers: Vec::new(),
            body: None,
        }
    }
}

/// Fluent builder over [`Request`].
#[derive(Debug)]
pub struct RequestBuilder {
    request: Request,
}

impl RequestBuilder {
    /// Starts a new builder with placeholder method and URL.
    pub fn new() -> Self {
        Self {
            request: Request::new(Method::Get, ""),
        }
    }

    /// Sets the target URL.
    pub fn url(mut self, url: &str) -> Self {
        self.request.url = url.into();
        self
    }

    /// Sets the HTTP method.
    pub fn method(mut self, method: Method) -> Self {
        self.request.method = method;
        self
    }

    /// Appends a single header.
    pub fn header(mut self, name: &str, value: Maskable<String>) -> Self {
        self.request.headers.push((name.into(), value));
        self
    }

    /// Appends a batch of headers.
    pub fn headers(mut self, headers: Headers) -> Self {
        self.request.headers.extend(headers);
        self
    }

    /// Attaches the body.
    pub fn set_body(mut self, body: RequestContent) -> Self {
        self.request.body = Some(body);
        self
    }

    /// Finishes the builder.
    pub fn build(self) -> Request {
        self.request
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
