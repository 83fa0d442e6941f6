//! Shared validation helpers for inbound HTTP adapters.
//!
//! Identifiers must be textual UUID version 4 values; anything else is
//! rejected here, before a port is called.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

const UUID_V4_PATTERN: &str =
    r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-4[0-9a-fA-F]{3}-[89abAB][0-9a-fA-F]{3}-[0-9a-fA-F]{12}$";

static UUID_V4_RE: OnceLock<Regex> = OnceLock::new();

fn uuid_v4_regex() -> &'static Regex {
    UUID_V4_RE.get_or_init(|| {
        Regex::new(UUID_V4_PATTERN)
            .unwrap_or_else(|error| panic!("UUID v4 regex failed to compile: {error}"))
    })
}

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidStatus,
    InvalidBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidStatus => "invalid_status",
            ErrorCode::InvalidBody => "invalid_body",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: &str) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("{name} must be a UUID v4"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn invalid_status_error(value: &str) -> Error {
    ValidationError::new(FieldName::new("status"), format!("unsupported order status: {value}"))
        .with_value(ErrorCode::InvalidStatus, value)
}

/// Map a body deserialisation failure to a 400.
pub(crate) fn invalid_body_error(error: &serde_json::Error) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({
        "code": ErrorCode::InvalidBody.as_str(),
    }))
}

/// Whether `value` is a textual UUID version 4.
pub(crate) fn is_uuid_v4(value: &str) -> bool {
    uuid_v4_regex().is_match(value)
}

pub(crate) fn parse_uuid_v4(value: &str, field: FieldName) -> Result<Uuid, Error> {
    if !is_uuid_v4(value) {
        return Err(invalid_uuid_error(field, value));
    }
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

/// Parse an optional reference; absent or blank means no reference.
pub(crate) fn parse_optional_uuid_v4(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<Uuid>, Error> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_uuid_v4(raw, field).map(Some),
    }
}
