//! Extension traits over foreign types.

use bytes::Bytes;
use error_stack::ResultExt;
use serde::de::DeserializeOwned;

use crate::errors::{ConnectorError, CustomResult};

/// Deserialization helper over raw response bytes.
pub trait BytesExt {
    /// Parses the bytes into `T`, reporting the expected type name on
    /// failure so mismatched processor shapes are diagnosable from logs.
    fn parse_struct<T>(&self, type_name: &'static str) -> CustomResult<T, ConnectorError>
    where
        T: DeserializeOwned;
}

impl BytesExt for Bytes {
    fn parse_struct<T>(&self, type_name: &'static str) -> CustomResult<T, ConnectorError>
    where
        T: DeserializeOwned,
    {
        serde_json::from_slice::<T>(self)
            .map_err(|err| {
                tracing::debug!(?err, %type_name, "failed to parse response body");
                err
            })
            .change_context(ConnectorError::ResponseDeserializationFailed)
            .attach_printable_lazy(|| format!("Unable to parse {type_name} from response"))
    }
}
