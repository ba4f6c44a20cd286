use thiserror::Error;

/// Errors raised while building or generating calendar documents.
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("`{attribute}` is invalid: {reason}")]
    InvalidArgument { attribute: String, reason: String },

    #[error("`{attribute}` has invalid value `{value}`, must be one of the following: {allowed}")]
    InvalidEnum {
        attribute: String,
        value: String,
        allowed: String,
    },

    #[error("`{attribute}` has to be a valid date: {value}")]
    InvalidDate { attribute: String, value: String },

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),

    #[error("No value for `{field}` in {entity} given")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RfcError {
    pub(crate) fn invalid(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    pub(crate) const fn missing(entity: &'static str, field: &'static str) -> Self {
        Self::MissingField { entity, field }
    }
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
