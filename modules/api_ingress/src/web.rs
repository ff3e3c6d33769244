use apikit::ApiResponse;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Fallback for any path no module claimed.
pub async fn route_not_found() -> ApiResponse<()> {
    ApiResponse::not_found("Route not found")
}

/// Rewrites the bodies axum and the tower-http layers produce on their own
/// (unsupported method, timeout, body limit) into the error envelope.
/// Headers such as `Allow` are kept.
pub async fn envelope_bare_errors(res: Response) -> Response {
    let message = match res.status() {
        StatusCode::METHOD_NOT_ALLOWED => "Method not allowed",
        StatusCode::REQUEST_TIMEOUT => "Request timed out",
        StatusCode::PAYLOAD_TOO_LARGE => "Request body too large",
        _ => return res,
    };
    if is_json(&res) {
        return res;
    }

    let (parts, _) = res.into_parts();
    let mut enveloped = ApiResponse::<()>::error(parts.status, message).into_response();
    for (name, value) in &parts.headers {
        if name != header::CONTENT_TYPE && name != header::CONTENT_LENGTH {
            enveloped.headers_mut().append(name.clone(), value.clone());
        }
    }
    enveloped
}

fn is_json(res: &Response) -> bool {
    res.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}
