//! Error taxonomy shared across the workspace.

/// The shorthand result type used by every fallible boundary in the
/// workspace, carrying an [`error_stack::Report`] on the error side.
pub type CustomResult<T, E> = error_stack::Result<T, E>;

/// Errors raised while assembling an outbound payload or interpreting the
/// processor's answer.
///
/// Validation variants surface synchronously, before any network call is
/// made, and are never retried. Everything the processor itself declines is
/// deliberately *not* represented here: declines and transport failures are
/// data, folded into the payment outcome by the caller.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConnectorError {
    /// The endpoint for an operation could not be derived from configuration
    #[error("Error while obtaining URL for the integration")]
    FailedToObtainIntegrationUrl,
    /// The outbound body failed to encode
    #[error("Failed to encode connector request")]
    RequestEncodingFailed,
    /// The processor response did not match any known shape
    #[error("Failed to deserialize connector response")]
    ResponseDeserializationFailed,
    /// A single required field was absent or empty
    #[error("Missing required field: {field_name}")]
    MissingRequiredField {
        /// Name of the absent field
        field_name: &'static str,
    },
    /// Several required fields were absent or empty
    #[error("Missing required fields: {field_names:?}")]
    MissingRequiredFields {
        /// Names of the absent fields
        field_names: Vec<&'static str>,
    },
    /// The configured credential profile does not fit the requested operation
    #[error("Failed to obtain authentication type")]
    FailedToObtainAuthType,
}

/// Transport-level failures reported by the injected HTTP client.
///
/// These never escape a `send` as an `Err`: the flows convert them into an
/// unsuccessful payment outcome so callers inspect one uniform shape.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum HttpClientError {
    /// The connection could not be established
    #[error("Failed to establish a connection to the processor")]
    ConnectionFailed,
    /// The transport gave up waiting for an answer
    #[error("Request timed out")]
    RequestTimedOut,
    /// Bytes arrived but could not be read into the expected shape
    #[error("Failed to decode the processor response")]
    ResponseDecodingFailed,
}

/// Failure of a single remote operation, split by who owns the problem.
///
/// Transport failures belong to the wire and become unsuccessful payment
/// outcomes; integration failures are defects in configuration or payload
/// assembly and propagate as errors.
#[derive(Debug)]
pub enum RemoteCallError {
    /// The wire failed; the caller folds this into an error outcome
    Transport(error_stack::Report<HttpClientError>),
    /// The integration itself misbehaved; propagated to the caller
    Integration(error_stack::Report<ConnectorError>),
}

/// Result alias for remote operations behind the transport.
pub type RemoteResult<T> = Result<T, RemoteCallError>;

impl From<error_stack::Report<HttpClientError>> for RemoteCallError {
    fn from(report: error_stack::Report<HttpClientError>) -> Self {
        Self::Transport(report)
    }
}

impl From<error_stack::Report<ConnectorError>> for RemoteCallError {
    fn from(report: error_stack::Report<ConnectorError>) -> Self {
        Self::Integration(report)
    }
}

/// Errors raised by the digest helpers in [`crate::crypto`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CryptoError {
    /// The message could not be brought into signable form
    #[error("Failed to encode the message for signing")]
    EncodingFailed,
    /// The digest computation itself failed
    #[error("Failed to calculate the signature digest")]
    SignatureCalculationFailed,
}
