/* src/server/adapter/axum/src/tests/mod.rs */


use axum::body::Body;
use axum::extract::Path;
use axum::http::{HeaderMap, Request};
use axum::middleware::{self, Next};
use axum::{Extension, Router};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use http_body_util::BodyExt;
use seam_overlay::{Connection, OverlayConfig, OverlayDescriptor, PagePayload};
use serde_json::json;
use tower::ServiceExt;

use crate::{AxumConnection, AxumError, Overlay, OverlayResponse, OverlayRouterExt, OverlayState, Page};

pub(super) const VERSION: &str = "v1";

async fn users_index(page: Page) -> Response {
  let payload =
    PagePayload::new("UsersIndex", page.url()).prop("users", json!([{"id": 1}, {"id": 2}]));
  page.render(payload)
}

async fn user_edit(overlay: Overlay, Path(id): Path<u32>) -> Result<Response, AxumError> {
  if overlay.is_internal_dispatch() {
    return Ok(axum::http::StatusCode::LOOP_DETECTED.into_response());
  }
  let descriptor = OverlayDescriptor::new("UserEdit")
    .prop("user", json!({"id": id}))
    .backdrop("/users")
    .config("size", "lg");
  Ok(overlay.render(descriptor).await?.into_response())
}

async fn orphan(overlay: Overlay) -> Result<OverlayResponse, AxumError> {
  overlay.render(OverlayDescriptor::new("Orphan").backdrop("/missing")).await
}

async fn no_backdrop(overlay: Overlay) -> Result<OverlayResponse, AxumError> {
  overlay.render(OverlayDescriptor::new("Lost")).await
}

async fn session(page: Page, headers: HeaderMap) -> Response {
  let cookie = headers.get("cookie").and_then(|v| v.to_str().ok()).unwrap_or_default().to_string();
  page.render(PagePayload::new("Session", page.url()).prop("cookie", cookie))
}

async fn session_overlay(overlay: Overlay) -> Result<OverlayResponse, AxumError> {
  overlay.render(OverlayDescriptor::new("SessionModal").backdrop("/session")).await
}

async fn self_overlay(overlay: Overlay) -> Result<OverlayResponse, AxumError> {
  overlay.render(OverlayDescriptor::new("Loop").backdrop("/loop")).await
}

#[derive(Debug, Clone)]
struct CurrentUser(&'static str);

async fn load_user(mut request: Request<Body>, next: Next) -> Response {
  request.extensions_mut().insert(CurrentUser("alice"));
  next.run(request).await
}

async fn whoami(page: Page, user: Option<Extension<CurrentUser>>) -> Response {
  let name = user.map_or("anonymous", |Extension(user)| user.0);
  page.render(PagePayload::new("Whoami", page.url()).prop("user", name))
}

async fn whoami_overlay(overlay: Overlay) -> Result<OverlayResponse, AxumError> {
  overlay.render(OverlayDescriptor::new("Account").backdrop("/whoami")).await
}

/// HTML backdrop whose title is Latin-1, not UTF-8.
async fn latin1() -> Vec<u8> {
  let mut body = b"<html><head><title>caf\xe9</title></head><body>".to_vec();
  body.extend_from_slice(
    br#"<div id="app" data-page="{&quot;component&quot;:&quot;Menu&quot;}"></div></body></html>"#,
  );
  body
}

async fn latin1_overlay(overlay: Overlay) -> Result<OverlayResponse, AxumError> {
  overlay.render(OverlayDescriptor::new("Dish").backdrop("/latin1")).await
}

async fn inspect(conn: AxumConnection) -> String {
  seam_overlay::is_internal_overlay_dispatch(&conn).to_string() + " " + conn.effective_path()
}

pub(super) fn routes() -> (Router, OverlayState) {
  let overlays = OverlayState::new(OverlayConfig::new().version(VERSION));
  let router = Router::new()
    .route("/users", get(users_index))
    .route("/users/{id}/edit", get(user_edit))
    .route("/orphan", get(orphan))
    .route("/no-backdrop", get(no_backdrop))
    .route("/session", get(session))
    .route("/session/modal", get(session_overlay))
    .route("/loop", get(self_overlay))
    .route("/inspect", get(inspect))
    .route("/whoami", get(whoami))
    .route("/whoami/modal", get(whoami_overlay))
    .route("/latin1", get(latin1))
    .route("/latin1/modal", get(latin1_overlay))
    .with_state(overlays.clone());
  (router, overlays)
}

/// Router bound to its own overlay client.
pub(super) fn app() -> Router {
  let (router, overlays) = routes();
  router.with_overlays(&overlays)
}

/// Router with request-context middleware applied before binding.
pub(super) fn layered_app() -> Router {
  let (router, overlays) = routes();
  router.layer(middleware::from_fn(load_user)).with_overlays(&overlays)
}

pub(super) fn get_request(path: &str, headers: &[(&str, &str)]) -> Request<Body> {
  let mut builder = Request::builder().uri(path);
  for (name, value) in headers {
    builder = builder.header(*name, *value);
  }
  builder.body(Body::empty()).unwrap()
}

pub(super) async fn send(router: Router, request: Request<Body>) -> Response {
  router.oneshot(request).await.unwrap()
}

pub(super) async fn body_string(response: Response) -> String {
  let bytes = response.into_body().collect().await.unwrap().to_bytes();
  String::from_utf8(bytes.to_vec()).unwrap()
}
