/* src/server/adapter/axum/src/error.rs */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use seam_overlay::OverlayError;

/// `OverlayError` as a Seam error envelope response.
#[derive(Debug)]
pub struct AxumError(pub OverlayError);

impl IntoResponse for AxumError {
  fn into_response(self) -> Response {
    let err = self.0;
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = serde_json::json!({
      "ok": false,
      "error": {
        "code": err.code(),
        "message": err.to_string(),
        "transient": false,
      }
    });
    (status, axum::Json(body)).into_response()
  }
}

impl From<OverlayError> for AxumError {
  fn from(err: OverlayError) -> Self {
    Self(err)
  }
}
