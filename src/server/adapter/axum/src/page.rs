/* src/server/adapter/axum/src/page.rs */

use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::http::{HeaderName, HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use seam_overlay::codec::encode_entities;
use seam_overlay::escape::header_safe_url;
use seam_overlay::{Connection, PagePayload, headers, is_in_app};
use serde_json::Value;

use crate::connection::AxumConnection;
use crate::extract::OverlayState;

/// Replaced with the root element when a page is rendered as HTML.
pub const APP_MARKER: &str = "<!--seam:app-->";

const DEFAULT_TEMPLATE: &str =
  r#"<!DOCTYPE html><html><head><meta charset="utf-8"></head><body><!--seam:app--></body></html>"#;

/// HTML document a page payload is embedded into on full loads.
#[derive(Debug, Clone)]
pub struct PageShell {
  template: String,
}

impl PageShell {
  pub fn new(template: impl Into<String>) -> Self {
    Self { template: template.into() }
  }

  pub fn render(&self, attr: &str, payload: &Value) -> String {
    let root = format!(r#"<div id="app" {attr}="{}"></div>"#, encode_entities(&payload.to_string()));
    if self.template.contains(APP_MARKER) {
      return self.template.replacen(APP_MARKER, &root, 1);
    }
    let mut html = self.template.clone();
    match html.rfind("</body>") {
      Some(pos) => html.insert_str(pos, &root),
      None => html.push_str(&root),
    }
    html
  }
}

impl Default for PageShell {
  fn default() -> Self {
    Self::new(DEFAULT_TEMPLATE)
  }
}

/// Extractor for ordinary page handlers. Answers with JSON for the client
/// router and with the HTML shell otherwise, which is what backdrop
/// dispatches expect in each shape.
pub struct Page {
  conn: AxumConnection,
  state: OverlayState,
}

impl Page {
  /// Path plus query of this request, for the payload's `url`.
  pub fn url(&self) -> &str {
    self.conn.request_url()
  }

  pub fn connection(&self) -> &AxumConnection {
    &self.conn
  }

  pub fn render(&self, mut payload: PagePayload) -> Response {
    let config = self.state.config();
    if payload.version.is_none() {
      payload.version = config.current_version().map(str::to_owned);
    }

    if !is_in_app(&self.conn) {
      let html = self.state.page_shell().render(config.payload_attr_name(), &payload.to_value());
      return Html(html).into_response();
    }

    let seen = self.conn.header(headers::VERSION);
    if let (Some(current), Some(seen)) = (config.current_version(), seen) {
      if current != seen {
        tracing::debug!(current, seen, url = self.url(), "stale client version");
        let location = header_safe_url(self.url());
        return (StatusCode::CONFLICT, [(headers::LOCATION, location)]).into_response();
      }
    }

    let mut response = axum::Json(payload.to_value()).into_response();
    let out = response.headers_mut();
    out.insert(HeaderName::from_static(headers::NAVIGATE), HeaderValue::from_static("true"));
    out.insert(header::VARY, HeaderValue::from_static(headers::NAVIGATE));
    response
  }
}

impl<S> FromRequestParts<S> for Page
where
  OverlayState: FromRef<S>,
  S: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    Ok(Self { conn: AxumConnection::from_parts(parts), state: OverlayState::from_ref(state) })
  }
}
