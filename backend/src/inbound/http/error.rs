//! HTTP mapping for domain errors.
//!
//! The domain error stays transport-agnostic; this module picks the status
//! code and redacts internal failures before they reach clients. Resources
//! differ only in how a missing row is reported, which [`ResourceError`]
//! carries alongside the domain error.

use std::fmt;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::InvalidTransition | ErrorCode::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        let mut redacted = Error::internal("Internal server error");
        if let Some(id) = error.trace_id() {
            redacted = redacted.with_trace_id(id.to_owned());
        }
        redacted
    } else {
        error.clone()
    }
}

fn render(error: &Error, status: StatusCode) -> HttpResponse {
    let mut builder = HttpResponse::build(status);
    if let Some(id) = error.trace_id() {
        builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
    }
    builder.json(redact_if_internal(error))
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        render(self, self.status_code())
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// Domain error raised by a resource endpoint.
///
/// `NotFound` answers with the endpoint's own status; every other code uses
/// the shared mapping.
#[derive(Debug, Clone)]
pub struct ResourceError {
    error: Error,
    not_found: StatusCode,
}

impl ResourceError {
    /// Wrap `error` for an endpoint reporting missing rows as `not_found`.
    pub fn new(error: Error, not_found: StatusCode) -> Self {
        Self { error, not_found }
    }

    /// The wrapped domain error.
    pub fn error(&self) -> &Error {
        &self.error
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl ResponseError for ResourceError {
    fn status_code(&self) -> StatusCode {
        match self.error.code() {
            ErrorCode::NotFound => self.not_found,
            code => status_for(code),
        }
    }

    fn error_response(&self) -> HttpResponse {
        render(&self.error, self.status_code())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for status mapping and redaction.

    use super::*;
    use actix_web::body::to_bytes;
    use rstest::rstest;
    use serde_json::{json, Value};

    async fn body_of(response: HttpResponse) -> Value {
        let bytes = to_bytes(response.into_body())
            .await
            .expect("reading response body succeeds");
        serde_json::from_slice(&bytes).expect("error JSON")
    }

    #[rstest]
    #[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
    #[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
    #[case(Error::conflict("busy"), StatusCode::CONFLICT)]
    #[case(Error::invalid_transition("no"), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
    fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
        assert_eq!(ResponseError::status_code(&error), status);
    }

    #[rstest]
    #[case(StatusCode::BAD_REQUEST)]
    #[case(StatusCode::NOT_FOUND)]
    fn resource_errors_override_not_found_only(#[case] not_found: StatusCode) {
        let missing = ResourceError::new(Error::not_found("gone"), not_found);
        let busy = ResourceError::new(Error::conflict("busy"), not_found);

        assert_eq!(missing.status_code(), not_found);
        assert_eq!(busy.status_code(), StatusCode::CONFLICT);
    }

    #[actix_web::test]
    async fn internal_errors_are_redacted() {
        let error = Error::internal("connection string leaked")
            .with_trace_id("00000000-0000-0000-0000-000000000000")
            .with_details(json!({ "secret": "x" }));

        let response = error.error_response();
        assert_eq!(
            response
                .headers()
                .get(TRACE_ID_HEADER)
                .and_then(|value| value.to_str().ok()),
            Some("00000000-0000-0000-0000-000000000000")
        );
        let body = body_of(response).await;

        assert_eq!(body["message"], "Internal server error");
        assert!(body.get("details").is_none());
    }

    #[actix_web::test]
    async fn invalid_transitions_keep_message_and_details() {
        let error = Error::invalid_transition("invalid status transition from 'finished' to 'new'")
            .with_details(json!({ "from": "finished", "to": "new" }));

        let body = body_of(error.error_response()).await;

        assert_eq!(body["code"], "invalid_transition");
        assert_eq!(body["details"]["from"], "finished");
        assert!(body["message"].as_str().is_some_and(|m| m.contains("finished")));
    }
}
