/* src/server/adapter/axum/src/client.rs */

use std::sync::{Arc, OnceLock};

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request};
use http_body_util::BodyExt;
use seam_overlay::{BoxFuture, DispatchRequest, DispatchResponse, OverlayError, PageClient};
use tower::ServiceExt;

use crate::connection::InternalDispatch;

/// [`PageClient`] that answers backdrop requests by running them through the
/// app's own router with `oneshot`. The router is bound after it is built,
/// since its handlers hold this client.
///
/// The bound router reaches this client again through its state, so the pair
/// forms an `Arc` cycle and is never freed. Bind one router per process.
#[derive(Clone, Default)]
pub struct RouterClient {
  router: Arc<OnceLock<Router>>,
}

impl RouterClient {
  pub fn new() -> Self {
    Self::default()
  }

  /// Returns false if a router was already bound; the first one stays.
  pub fn bind(&self, router: Router) -> bool {
    self.router.set(router).is_ok()
  }

  pub fn is_bound(&self) -> bool {
    self.router.get().is_some()
  }
}

impl PageClient for RouterClient {
  fn get(&self, request: DispatchRequest) -> BoxFuture<'_, Result<DispatchResponse, OverlayError>> {
    Box::pin(async move {
      let router = self.router.get().cloned().ok_or_else(|| {
        OverlayError::DispatchUnavailable("no router bound to the overlay client".to_string())
      })?;

      let response = match router.oneshot(build_request(&request)?).await {
        Ok(response) => response,
        Err(never) => match never {},
      };
      let status = response.status().as_u16();
      let bytes = response
        .into_body()
        .collect()
        .await
        .map_err(|e| OverlayError::DispatchUnavailable(format!("backdrop body: {e}")))?
        .to_bytes();

      // Bytes outside the payload attribute must reach the client unchanged.
      let body = String::from_utf8(bytes.to_vec()).map_err(|e| {
        OverlayError::ParseFailed(format!("backdrop body is not utf-8: {e}"))
      })?;

      Ok(DispatchResponse { status, body })
    })
  }
}

fn build_request(request: &DispatchRequest) -> Result<Request<Body>, OverlayError> {
  let mut builder = Request::builder().method(Method::GET).uri(request.path.as_str());
  for (name, value) in &request.headers {
    builder = builder.header(name.as_str(), value.as_str());
  }
  let mut http_request = builder.body(Body::empty()).map_err(|e| {
    OverlayError::DispatchUnavailable(format!("invalid backdrop request {}: {e}", request.path))
  })?;
  http_request.extensions_mut().insert(InternalDispatch);
  Ok(http_request)
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::routing::get;
  use seam_overlay::ResponseShape;

  fn request(path: &str) -> DispatchRequest {
    DispatchRequest {
      path: path.to_string(),
      headers: vec![("cookie".to_string(), "sid=1".to_string())],
      shape: ResponseShape::Markup,
    }
  }

  #[tokio::test]
  async fn unbound_client_is_unavailable() {
    let client = RouterClient::new();
    assert!(!client.is_bound());
    let err = client.get(request("/users")).await.unwrap_err();
    assert!(matches!(err, OverlayError::DispatchUnavailable(_)));
  }

  #[tokio::test]
  async fn dispatches_through_router() {
    let client = RouterClient::new();
    let router = Router::new().route(
      "/echo",
      get(|headers: axum::http::HeaderMap| async move {
        headers.get("cookie").and_then(|v| v.to_str().ok()).unwrap_or_default().to_string()
      }),
    );
    assert!(client.bind(router));

    let res = client.get(request("/echo")).await.unwrap();
    assert_eq!(res.status, 200);
    assert_eq!(res.body, "sid=1");
  }

  #[tokio::test]
  async fn unknown_route_reports_status() {
    let client = RouterClient::new();
    client.bind(Router::new());
    let res = client.get(request("/nowhere")).await.unwrap();
    assert_eq!(res.status, 404);
  }

  #[tokio::test]
  async fn non_utf8_body_is_parse_failure() {
    let client = RouterClient::new();
    let router = Router::new().route("/latin1", get(|| async { b"<title>caf\xe9</title>".to_vec() }));
    client.bind(router);
    let err = client.get(request("/latin1")).await.unwrap_err();
    assert!(matches!(err, OverlayError::ParseFailed(_)));
  }

  #[test]
  fn clones_share_the_binding() {
    let client = RouterClient::new();
    let other = client.clone();
    assert!(other.bind(Router::new()));
    assert!(client.is_bound());
  }

  #[test]
  fn second_bind_is_rejected() {
    let client = RouterClient::new();
    assert!(client.bind(Router::new()));
    assert!(!client.bind(Router::new()));
  }

  #[test]
  fn request_carries_internal_extension() {
    let req = build_request(&request("/users")).unwrap();
    assert!(req.extensions().get::<InternalDispatch>().is_some());
    assert_eq!(req.headers().get("cookie").unwrap(), "sid=1");
  }

  #[test]
  fn invalid_path_is_unavailable() {
    let err = build_request(&request("not a uri")).unwrap_err();
    assert!(matches!(err, OverlayError::DispatchUnavailable(_)));
  }
}
