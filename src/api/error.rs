// SPDX-License-Identifier: MPL-2.0
//! Error taxonomy for remote calls.
//!
//! The service reports failures in two body shapes: a single
//! `{"detail": "..."}` string, or a map of field name to a list of
//! human-readable messages. Both are distinguished from transport failures
//! (no response at all) so the UI can choose between surfacing the server's
//! own words and a generic localized fallback.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The request never produced a response (DNS, connect, TLS, ...).
    Transport(String),

    /// The service rejected the request with a single `detail` message,
    /// surfaced to the user verbatim.
    Detail(String),

    /// Field-keyed validation errors, in the order the service sent them.
    Fields(Vec<(String, Vec<String>)>),

    /// The access token is missing, expired, or revoked.
    Unauthorized,

    /// Any other non-success status with an unrecognized body.
    Status(u16),
}

impl ApiError {
    /// Classifies a non-success response from its status code and raw body.
    pub fn from_response(status: u16, body: &str) -> Self {
        if status == 401 {
            return ApiError::Unauthorized;
        }

        if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(body) {
            if let Some(serde_json::Value::String(detail)) = map.get("detail") {
                return ApiError::Detail(detail.clone());
            }

            let mut fields = Vec::new();
            for (key, value) in map {
                let messages = match value {
                    serde_json::Value::String(message) => vec![message],
                    serde_json::Value::Array(entries) => entries
                        .into_iter()
                        .filter_map(|entry| match entry {
                            serde_json::Value::String(message) => Some(message),
                            _ => None,
                        })
                        .collect(),
                    _ => continue,
                };
                if !messages.is_empty() {
                    fields.push((key, messages));
                }
            }
            if !fields.is_empty() {
                return ApiError::Fields(fields);
            }
        }

        ApiError::Status(status)
    }

    /// The first message of the first failing key, which is what the forms
    /// show inline. `None` for errors that carry no server-provided text.
    pub fn first_message(&self) -> Option<&str> {
        match self {
            ApiError::Detail(detail) => Some(detail),
            ApiError::Fields(fields) => fields
                .first()
                .and_then(|(_, messages)| messages.first())
                .map(String::as_str),
            _ => None,
        }
    }

    /// Messages for a specific field, if the service keyed any to it.
    pub fn field_messages(&self, field: &str) -> Option<&[String]> {
        match self {
            ApiError::Fields(fields) => fields
                .iter()
                .find(|(key, _)| key == field)
                .map(|(_, messages)| messages.as_slice()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Transport(message) => write!(f, "transport failure: {}", message),
            ApiError::Detail(detail) => write!(f, "{}", detail),
            ApiError::Fields(fields) => {
                let first = self.first_message().unwrap_or("validation failed");
                write!(f, "{} ({} field(s))", first, fields.len())
            }
            ApiError::Unauthorized => write!(f, "authentication required"),
            ApiError::Status(status) => write!(f, "unexpected status {}", status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_body_passes_through_verbatim() {
        let err = ApiError::from_response(400, r#"{"detail": "Invalid credentials"}"#);
        assert_eq!(err, ApiError::Detail("Invalid credentials".to_string()));
        assert_eq!(err.first_message(), Some("Invalid credentials"));
    }

    #[test]
    fn field_errors_preserve_service_order() {
        let body = r#"{"username": ["A user with that username already exists."],
                       "email": ["Enter a valid email address."]}"#;
        let err = ApiError::from_response(400, body);

        match &err {
            ApiError::Fields(fields) => {
                assert_eq!(fields[0].0, "username");
                assert_eq!(fields[1].0, "email");
            }
            other => panic!("expected Fields, got {:?}", other),
        }
        assert_eq!(
            err.first_message(),
            Some("A user with that username already exists.")
        );
    }

    #[test]
    fn single_string_field_value_is_accepted() {
        let err = ApiError::from_response(400, r#"{"email": "This field is required."}"#);
        assert_eq!(err.field_messages("email"), Some(&["This field is required.".to_string()][..]));
    }

    #[test]
    fn unauthorized_wins_over_body_shape() {
        let err = ApiError::from_response(401, r#"{"detail": "Token expired"}"#);
        assert!(err.is_unauthorized());
    }

    #[test]
    fn unparsable_body_falls_back_to_status() {
        let err = ApiError::from_response(502, "<html>Bad Gateway</html>");
        assert_eq!(err, ApiError::Status(502));
        assert_eq!(err.first_message(), None);
    }

    #[test]
    fn empty_object_falls_back_to_status() {
        let err = ApiError::from_response(400, "{}");
        assert_eq!(err, ApiError::Status(400));
    }

    #[test]
    fn field_messages_misses_unknown_field() {
        let err = ApiError::from_response(400, r#"{"username": ["taken"]}"#);
        assert_eq!(err.field_messages("email"), None);
    }
}
