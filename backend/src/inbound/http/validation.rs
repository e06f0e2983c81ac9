//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request bodies arrive as loosely typed DTOs. Handlers parse each field into
//! its domain type through a [`FieldErrors`] collector so one response can
//! report every failing field at once.

use std::str::FromStr;

use actix_web::{HttpRequest, error::JsonPayloadError, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::domain::{Error, FieldError, InvalidId, ParseEnumError};

/// Field error codes produced by the HTTP adapter itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldCode {
    Required,
    InvalidUuid,
    InvalidTimestamp,
    InvalidValue,
}

impl FieldCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidTimestamp => "invalid_timestamp",
            Self::InvalidValue => "invalid_value",
        }
    }
}

/// Collector for itemised field failures.
#[derive(Debug, Default)]
pub(crate) struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    fn push_code(&mut self, field: &str, code: FieldCode, message: impl Into<String>) {
        self.push(FieldError::new(field, code.as_str(), message));
    }

    /// Keep the value on success, record the failure otherwise.
    pub(crate) fn record<T, E>(
        &mut self,
        result: Result<T, E>,
        to_field: impl FnOnce(E) -> FieldError,
    ) -> Option<T> {
        result.map_err(|err| self.push(to_field(err))).ok()
    }

    /// A present, non-blank value or a `required` failure.
    pub(crate) fn require<'a>(&mut self, field: &str, value: Option<&'a str>) -> Option<&'a str> {
        match value {
            Some(raw) if !raw.trim().is_empty() => Some(raw),
            _ => {
                self.push_code(field, FieldCode::Required, format!("{field} is required"));
                None
            }
        }
    }

    pub(crate) fn parse_id<'a, T>(
        &mut self,
        field: &str,
        raw: &'a str,
        parse: impl FnOnce(&'a str) -> Result<T, InvalidId>,
    ) -> Option<T> {
        let parsed = parse(raw);
        if parsed.is_err() {
            self.push_code(
                field,
                FieldCode::InvalidUuid,
                format!("{field} must be a valid UUID"),
            );
        }
        parsed.ok()
    }

    pub(crate) fn parse_enum<T>(&mut self, field: &str, raw: &str) -> Option<T>
    where
        T: FromStr<Err = ParseEnumError>,
    {
        self.record(raw.parse::<T>(), |err| {
            FieldError::new(field, FieldCode::InvalidValue.as_str(), err.to_string())
        })
    }

    pub(crate) fn parse_timestamp(&mut self, field: &str, raw: &str) -> Option<DateTime<Utc>> {
        let parsed = DateTime::parse_from_rfc3339(raw).map(|ts| ts.with_timezone(&Utc));
        if parsed.is_err() {
            self.push_code(
                field,
                FieldCode::InvalidTimestamp,
                format!("{field} must be an RFC 3339 timestamp"),
            );
        }
        parsed.ok()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn into_error(self) -> Error {
        Error::validation(self.0)
    }

    /// `Ok` when nothing failed, otherwise one validation error for all.
    pub(crate) fn finish(self) -> Result<(), Error> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self.into_error())
        }
    }
}

/// Deserialise a field that distinguishes absent from `null`.
///
/// Pair with `#[serde(default)]`: an absent field stays `None`, an explicit
/// `null` becomes `Some(None)`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected JSON payload");
    let message = match &err {
        JsonPayloadError::ContentType => "request body must be application/json".to_owned(),
        JsonPayloadError::Deserialize(inner) => format!("malformed JSON body: {inner}"),
        other => format!("unreadable request body: {other}"),
    };
    Error::invalid_request(message).into()
}

fn path_error(err: actix_web::error::PathError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected path parameter");
    Error::invalid_request("path identifier must be a valid UUID").into()
}

fn query_error(err: actix_web::error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected query string");
    Error::invalid_request(format!("malformed query string: {err}")).into()
}

/// JSON extractor config rendering body failures as domain errors.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error)
}

/// Path extractor config rendering malformed identifiers as `400`.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error)
}

/// Query extractor config rendering malformed query strings as `400`.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskStatus, UserId};
    use rstest::rstest;

    #[rstest]
    fn collects_every_failure_in_order() {
        let mut errors = FieldErrors::new();
        assert!(errors.require("title", Some("   ")).is_none());
        assert!(errors.parse_enum::<TaskStatus>("status", "doing").is_none());
        assert!(errors.parse_id("assigneeId", "nope", UserId::new).is_none());
        assert!(errors.parse_timestamp("dueDate", "tomorrow").is_none());

        let err = errors.finish().expect_err("four failures");
        let codes: Vec<_> = err
            .field_errors()
            .into_iter()
            .map(|field| (field.field, field.code))
            .collect();
        assert_eq!(
            codes,
            [
                ("title".to_owned(), "required".to_owned()),
                ("status".to_owned(), "invalid_value".to_owned()),
                ("assigneeId".to_owned(), "invalid_uuid".to_owned()),
                ("dueDate".to_owned(), "invalid_timestamp".to_owned()),
            ]
        );
    }

    #[rstest]
    fn parses_offset_timestamps_to_utc() {
        let mut errors = FieldErrors::new();
        let parsed = errors
            .parse_timestamp("dueDate", "2026-03-01T10:00:00+02:00")
            .expect("valid timestamp");
        assert_eq!(parsed.to_rfc3339(), "2026-03-01T08:00:00+00:00");
        errors.finish().expect("no failures");
    }

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_some")]
        note: Option<Option<String>>,
    }

    #[rstest]
    #[case(r#"{}"#, None)]
    #[case(r#"{"note":null}"#, Some(None))]
    #[case(r#"{"note":"hi"}"#, Some(Some("hi".to_owned())))]
    fn distinguishes_absent_from_null(
        #[case] body: &str,
        #[case] expected: Option<Option<String>>,
    ) {
        let patch: Patch = serde_json::from_str(body).expect("valid JSON");
        assert_eq!(patch.note, expected);
    }
}
