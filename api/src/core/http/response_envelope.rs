use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Error envelope. Success bodies are returned bare by each route.
#[derive(Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub error: ApiError,
}

#[derive(Serialize)]
pub struct ApiError {
    /// Stable, machine-readable error code (e.g. "INVALID_QUERY").
    pub code: &'static str,
    /// Human-friendly error message.
    pub message: String,
}

impl ApiResponse {
    /// Build an error envelope.
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ApiError {
                code,
                message: message.into(),
            },
        }
    }

    /// Convert to axum Response.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_envelope_shape() {
        let v = serde_json::to_value(ApiResponse::error("INVALID_QUERY", "query is empty")).unwrap();
        assert_eq!(v["success"], false);
        assert_eq!(v["error"]["code"], "INVALID_QUERY");
        assert_eq!(v["error"]["message"], "query is empty");
        assert!(v.get("data").is_none());
    }
}
