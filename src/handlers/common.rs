use crate::errors::ServiceError;
use axum::{
    body::Bytes,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// 201 with a `Location` header pointing at the new resource
pub fn created_response<T: Serialize>(location: String, data: T) -> Response {
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(data),
    )
        .into_response()
}

/// Standard no content response
pub fn no_content_response() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

/// Rejects requests whose `Content-Type` is not exactly `application/json`.
pub fn check_content_type(headers: &HeaderMap, expected: &str) -> Result<(), ServiceError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok());

    match content_type {
        Some(value) if value == expected => Ok(()),
        Some(value) => {
            error!("Invalid Content-Type: {}", value);
            Err(ServiceError::UnsupportedMediaType(format!(
                "Content-Type must be {}",
                expected
            )))
        }
        None => {
            error!("No Content-Type specified.");
            Err(ServiceError::UnsupportedMediaType(format!(
                "Content-Type must be {}",
                expected
            )))
        }
    }
}

/// Decodes a request body. Empty or malformed bodies become `Value::Null`
/// so the record's own parse step reports them as bad data.
pub fn read_json_body(body: &Bytes) -> Value {
    if body.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(body).unwrap_or_else(|e| {
        debug!(error = %e, "Request body is not valid JSON");
        Value::Null
    })
}

/// Path ids that are not integers never name a stored record.
pub fn parse_id(raw: &str) -> Option<i32> {
    raw.parse().ok()
}

/// Absolute URL for `path` using the request's `Host`, or `path` alone without one.
pub fn location_url(headers: &HeaderMap, path: &str) -> String {
    match headers.get(header::HOST).and_then(|host| host.to_str().ok()) {
        Some(host) => format!("http://{}{}", host, path),
        None => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use serde_json::json;

    fn headers_with(name: header::HeaderName, value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn content_type_must_match_exactly() {
        let ok = headers_with(header::CONTENT_TYPE, "application/json");
        assert!(check_content_type(&ok, JSON_CONTENT_TYPE).is_ok());

        let with_charset = headers_with(header::CONTENT_TYPE, "application/json; charset=utf-8");
        assert!(matches!(
            check_content_type(&with_charset, JSON_CONTENT_TYPE),
            Err(ServiceError::UnsupportedMediaType(_))
        ));

        assert!(check_content_type(&HeaderMap::new(), JSON_CONTENT_TYPE).is_err());
    }

    #[test]
    fn malformed_body_reads_as_null() {
        assert_eq!(read_json_body(&Bytes::from_static(b"")), Value::Null);
        assert_eq!(read_json_body(&Bytes::from_static(b"{not json")), Value::Null);
        assert_eq!(
            read_json_body(&Bytes::from_static(br#"{"name":"x"}"#)),
            json!({"name": "x"})
        );
    }

    #[test]
    fn parse_id_rejects_non_integers() {
        assert_eq!(parse_id("17"), Some(17));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("1.5"), None);
        assert_eq!(parse_id("99999999999"), None);
    }

    #[test]
    fn location_uses_host_when_present() {
        let headers = headers_with(header::HOST, "localhost:8080");
        assert_eq!(
            location_url(&headers, "/wishlists/3"),
            "http://localhost:8080/wishlists/3"
        );
        assert_eq!(location_url(&HeaderMap::new(), "/wishlists/3"), "/wishlists/3");
    }
}
