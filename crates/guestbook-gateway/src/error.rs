use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use guestbook_core::GuestbookError;

/// Per-request failure, rendered as `{"ok": false, "error": ...}`.
#[derive(Debug)]
pub struct ApiError(pub GuestbookError);

impl From<GuestbookError> for ApiError {
    fn from(e: GuestbookError) -> Self {
        Self(e)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self(GuestbookError::Json(e))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            GuestbookError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!("❌ Request failed ({status}): {}", self.0);
        (
            status,
            Json(serde_json::json!({"ok": false, "error": self.0.to_string()})),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let unavailable = ApiError(GuestbookError::Unavailable("refused".into()));
        assert_eq!(unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);

        let store = ApiError(GuestbookError::Store("WRONGTYPE".into()));
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_into_response_status() {
        let resp = ApiError(GuestbookError::Unavailable("refused".into())).into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(resp.headers()["content-type"], "application/json");
    }
}
