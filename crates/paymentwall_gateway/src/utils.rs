use error_stack::Report;
use gateway_common::errors::{ConnectorError, CustomResult};

pub(crate) fn missing_field_err(
    message: &'static str,
) -> Box<dyn Fn() -> Report<ConnectorError> + '_> {
    Box::new(move || {
        ConnectorError::MissingRequiredField {
            field_name: message,
        }
        .into()
    })
}

/// A field counts as set only when it is present and non-empty; the
/// processor rejects empty strings the same as absent fields.
pub(crate) fn is_set(value: Option<&String>) -> bool {
    value.is_some_and(|value| !value.is_empty())
}

/// Checks a batch of required fields at once so the caller learns about
/// every omission in a single error.
pub(crate) fn require_fields(checks: &[(&'static str, bool)]) -> CustomResult<(), ConnectorError> {
    let missing: Vec<&'static str> = checks
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();
    match missing.as_slice() {
        [] => Ok(()),
        [field_name] => Err(ConnectorError::MissingRequiredField {
            field_name,
        }
        .into()),
        _ => Err(ConnectorError::MissingRequiredFields {
            field_names: missing,
        }
        .into()),
    }
}
