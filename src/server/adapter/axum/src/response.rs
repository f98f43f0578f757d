/* src/server/adapter/axum/src/response.rs */

use axum::body::Body;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use seam_overlay::FinalResponse;

/// Response extension holding the path the browser shows after a cold
/// overlay load. Outer middleware reads this instead of the request URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectivePath(pub String);

/// A composed overlay response, written out unchanged.
#[derive(Debug)]
pub struct OverlayResponse(pub FinalResponse);

impl IntoResponse for OverlayResponse {
  fn into_response(self) -> Response {
    let FinalResponse { status, headers, body, effective_path } = self.0;

    let mut response = Response::new(Body::from(body.into_string()));
    *response.status_mut() = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);

    for (name, value) in headers {
      match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
        (Ok(name), Ok(value)) => {
          response.headers_mut().append(name, value);
        }
        _ => tracing::warn!(header = %name, "dropping overlay header with invalid name or value"),
      }
    }

    if let Some(path) = effective_path {
      response.extensions_mut().insert(EffectivePath(path));
    }
    response
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use seam_overlay::ResponseBody;

  #[test]
  fn writes_status_headers_and_extension() {
    let res = OverlayResponse(FinalResponse {
      status: 200,
      headers: vec![("x-seam-overlay".into(), "true".into())],
      body: ResponseBody::Html("<html></html>".into()),
      effective_path: Some("/users".into()),
    })
    .into_response();

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers().get("x-seam-overlay").unwrap(), "true");
    assert_eq!(res.extensions().get::<EffectivePath>(), Some(&EffectivePath("/users".into())));
  }

  #[test]
  fn skips_unencodable_header() {
    let res = OverlayResponse(FinalResponse {
      status: 200,
      headers: vec![("x-ok".into(), "1".into()), ("x-bad".into(), "line\nbreak".into())],
      body: ResponseBody::Html(String::new()),
      effective_path: None,
    })
    .into_response();

    assert!(res.headers().get("x-bad").is_none());
    assert!(res.headers().get("x-ok").is_some());
    assert!(res.extensions().get::<EffectivePath>().is_none());
  }
}
