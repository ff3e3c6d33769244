//! Payload rules for create and update. Every broken rule is reported, not just the first.

use apikit::{ApiError, ApiResponse, FieldViolation};
use axum::{
    body::{to_bytes, Body},
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use validator::ValidateEmail;

use crate::contract::model::NewUser;

pub const NAME_MIN_CHARS: usize = 3;
pub const NAME_MAX_CHARS: usize = 50;

/// Upper bound on a create/update body, independent of any outer body limit.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub mod messages {
    pub const NAME_REQUIRED_FIELD: &str = "Name field is required.";
    pub const NAME_NOT_STRING: &str = "Name must be a string.";
    pub const NAME_EMPTY: &str = "Name is required.";
    pub const NAME_TOO_SHORT: &str = "Name must be at least 3 characters long.";
    pub const NAME_TOO_LONG: &str = "Name must be at most 50 characters long.";
    pub const EMAIL_REQUIRED_FIELD: &str = "Email field is required.";
    pub const EMAIL_NOT_STRING: &str = "Email must be a string.";
    pub const EMAIL_INVALID: &str = "Please provide a valid email address.";
    pub const BODY_NOT_OBJECT: &str = "Request body must be a JSON object.";
}

/// Check a decoded body; on success return the trimmed payload.
pub fn validate_user_payload(body: &Value) -> Result<NewUser, Vec<FieldViolation>> {
    let Some(obj) = body.as_object() else {
        return Err(vec![FieldViolation::new("body", messages::BODY_NOT_OBJECT)]);
    };

    let mut violations = Vec::new();
    let name = check_name(obj, &mut violations);
    let email = check_email(obj, &mut violations);

    match (name, email) {
        (Some(name), Some(email)) if violations.is_empty() => Ok(NewUser { name, email }),
        _ => Err(violations),
    }
}

fn check_name(obj: &Map<String, Value>, out: &mut Vec<FieldViolation>) -> Option<String> {
    let message = match obj.get("name") {
        None | Some(Value::Null) => messages::NAME_REQUIRED_FIELD,
        Some(Value::String(raw)) => {
            let name = raw.trim();
            let len = name.chars().count();
            if name.is_empty() {
                messages::NAME_EMPTY
            } else if len < NAME_MIN_CHARS {
                messages::NAME_TOO_SHORT
            } else if len > NAME_MAX_CHARS {
                messages::NAME_TOO_LONG
            } else {
                return Some(name.to_owned());
            }
        }
        Some(_) => messages::NAME_NOT_STRING,
    };
    out.push(FieldViolation::new("name", message));
    None
}

fn check_email(obj: &Map<String, Value>, out: &mut Vec<FieldViolation>) -> Option<String> {
    let message = match obj.get("email") {
        None | Some(Value::Null) => messages::EMAIL_REQUIRED_FIELD,
        Some(Value::String(raw)) => {
            let email = raw.trim();
            if email.validate_email() {
                return Some(email.to_owned());
            }
            messages::EMAIL_INVALID
        }
        Some(_) => messages::EMAIL_NOT_STRING,
    };
    out.push(FieldViolation::new("email", message));
    None
}

/// Route middleware for POST and PUT: decode, validate, and hand the
/// `NewUser` to the handler through request extensions.
pub async fn validate_user_body(req: Request, next: Next) -> Result<Response, ApiError> {
    let declared = req
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared.is_some_and(|len| len > MAX_BODY_BYTES) {
        return Ok(
            ApiResponse::<()>::error(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
                .into_response(),
        );
    }

    let (mut parts, body) = req.into_parts();
    let bytes = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read request body: {e}")))?;

    // An absent body is an empty object: the field rules report what is missing.
    let value = if bytes.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Map::new())
    } else {
        serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::BadRequest(format!("Malformed JSON body: {e}")))?
    };

    let payload = validate_user_payload(&value).map_err(ApiError::Validation)?;
    parts.extensions.insert(payload);

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}
