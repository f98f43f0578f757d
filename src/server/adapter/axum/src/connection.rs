/* src/server/adapter/axum/src/connection.rs */

use std::convert::Infallible;

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::HeaderMap;
use axum::http::request::Parts;
use seam_overlay::connection::path_of;
use seam_overlay::{Connection, mark_internal_dispatch};
use serde_json::{Map, Value};

/// Request extension set on backdrop requests replayed by [`crate::RouterClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternalDispatch;

/// [`Connection`] over the parts of an axum request.
#[derive(Debug, Clone)]
pub struct AxumConnection {
  headers: HeaderMap,
  url: String,
  effective_path: Option<String>,
  assigns: Map<String, Value>,
}

impl AxumConnection {
  pub fn from_parts(parts: &Parts) -> Self {
    // Nested routers strip their prefix from `parts.uri`; the client asked for the original.
    let uri = parts.extensions.get::<OriginalUri>().map_or(&parts.uri, |original| &original.0);
    let url = uri.path_and_query().map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string());

    let mut conn =
      Self { headers: parts.headers.clone(), url, effective_path: None, assigns: Map::new() };
    if parts.extensions.get::<InternalDispatch>().is_some() {
      mark_internal_dispatch(&mut conn);
    }
    conn
  }

  pub fn headers(&self) -> &HeaderMap {
    &self.headers
  }
}

impl Connection for AxumConnection {
  fn header(&self, name: &str) -> Option<&str> {
    self.headers.get(name).and_then(|v| v.to_str().ok())
  }

  fn request_url(&self) -> &str {
    &self.url
  }

  fn effective_path(&self) -> &str {
    match self.effective_path {
      Some(ref path) => path.as_str(),
      None => path_of(&self.url),
    }
  }

  fn set_effective_path(&mut self, path: &str) {
    self.effective_path = Some(path.to_string());
  }

  fn assign(&mut self, key: &str, value: Value) {
    self.assigns.insert(key.to_string(), value);
  }

  fn assigned(&self, key: &str) -> Option<&Value> {
    self.assigns.get(key)
  }
}

impl<S> FromRequestParts<S> for AxumConnection
where
  S: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    Ok(Self::from_parts(parts))
  }
}
