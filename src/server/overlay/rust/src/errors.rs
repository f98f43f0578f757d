/* src/server/overlay/rust/src/errors.rs */

use thiserror::Error;

/// Every way an overlay render can fail. Nothing is written to the
/// client when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverlayError {
  #[error("overlay descriptor has no backdrop url")]
  NoBackdropUrl,

  #[error("internal dispatch unavailable: {0}")]
  DispatchUnavailable(String),

  #[error("backdrop dispatch returned status {0}")]
  HttpError(u16),

  #[error("backdrop payload could not be parsed: {0}")]
  ParseFailed(String),

  #[error("composed payload could not be re-embedded: {0}")]
  InjectFailed(String),
}

impl OverlayError {
  pub fn code(&self) -> &'static str {
    match self {
      Self::NoBackdropUrl => "NO_BACKDROP_URL",
      Self::DispatchUnavailable(_) => "DISPATCH_UNAVAILABLE",
      Self::HttpError(_) => "HTTP_ERROR",
      Self::ParseFailed(_) => "PARSE_FAILED",
      Self::InjectFailed(_) => "INJECT_FAILED",
    }
  }

  /// Suggested status when the caller turns the error into a response.
  pub fn status(&self) -> u16 {
    match self {
      Self::HttpError(status) => *status,
      Self::DispatchUnavailable(_) | Self::ParseFailed(_) => 502,
      Self::NoBackdropUrl | Self::InjectFailed(_) => 500,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn codes_are_stable() {
    assert_eq!(OverlayError::NoBackdropUrl.code(), "NO_BACKDROP_URL");
    assert_eq!(OverlayError::DispatchUnavailable("x".into()).code(), "DISPATCH_UNAVAILABLE");
    assert_eq!(OverlayError::HttpError(404).code(), "HTTP_ERROR");
    assert_eq!(OverlayError::ParseFailed("x".into()).code(), "PARSE_FAILED");
    assert_eq!(OverlayError::InjectFailed("x".into()).code(), "INJECT_FAILED");
  }

  #[test]
  fn http_error_keeps_inner_status() {
    assert_eq!(OverlayError::HttpError(404).status(), 404);
    assert_eq!(OverlayError::HttpError(409).status(), 409);
  }

  #[test]
  fn default_statuses() {
    assert_eq!(OverlayError::NoBackdropUrl.status(), 500);
    assert_eq!(OverlayError::DispatchUnavailable("x".into()).status(), 502);
    assert_eq!(OverlayError::ParseFailed("x".into()).status(), 502);
    assert_eq!(OverlayError::InjectFailed("x".into()).status(), 500);
  }

  #[test]
  fn display_format() {
    assert_eq!(OverlayError::HttpError(403).to_string(), "backdrop dispatch returned status 403");
    assert_eq!(OverlayError::NoBackdropUrl.to_string(), "overlay descriptor has no backdrop url");
  }
}
