//! Widget request signing.
//!
//! The processor authenticates widget and listing calls with a signature
//! over the query parameters: parameters sorted by name, concatenated as
//! `key=value` pairs, the private key appended, and the whole string
//! digested. Version 2 uses MD5, version 3 SHA-256; both are emitted as
//! lowercase hex.

use error_stack::ResultExt;
use gateway_common::{
    crypto::{GenerateDigest, Md5, Sha256},
    errors::{ConnectorError, CustomResult},
};
use masking::{PeekInterface, Secret};

use crate::types::SignVersion;

pub(crate) fn calculate(
    params: &[(String, String)],
    private_key: &Secret<String>,
    version: SignVersion,
) -> CustomResult<String, ConnectorError> {
    let mut sorted: Vec<&(String, String)> = params.iter().collect();
    sorted.sort_by(|left, right| left.0.cmp(&right.0));

    let mut base = String::new();
    for (key, value) in sorted {
        base.push_str(key);
        base.push('=');
        base.push_str(value);
    }
    base.push_str(private_key.peek());

    let digest = match version {
        SignVersion::Two => Md5.generate_digest(base.as_bytes()),
        SignVersion::Three => Sha256.generate_digest(base.as_bytes()),
    }
    .change_context(ConnectorError::RequestEncodingFailed)?;

    Ok(hex::encode(digest))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn signature_is_insensitive_to_parameter_order() {
        let key = Secret::new("private".to_string());
        let forward = params(&[("key", "pub"), ("country_code", "US"), ("sign_version", "2")]);
        let backward = params(&[("sign_version", "2"), ("key", "pub"), ("country_code", "US")]);

        let first = calculate(&forward, &key, SignVersion::Two).unwrap();
        let second = calculate(&backward, &key, SignVersion::Two).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn signature_depends_on_the_private_key() {
        let query = params(&[("key", "pub"), ("country_code", "US")]);
        let first = calculate(&query, &Secret::new("one".to_string()), SignVersion::Two).unwrap();
        let second = calculate(&query, &Secret::new("two".to_string()), SignVersion::Two).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn version_two_is_md5_hex() {
        let query = params(&[("key", "pub")]);
        let sign = calculate(&query, &Secret::new("k".to_string()), SignVersion::Two).unwrap();
        assert_eq!(sign.len(), 32);
        assert!(sign.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn version_three_is_sha256_hex() {
        let query = params(&[("key", "pub")]);
        let sign = calculate(&query, &Secret::new("k".to_string()), SignVersion::Three).unwrap();
        assert_eq!(sign.len(), 64);
    }
}
