/* src/server/overlay/rust/src/finalize.rs */

use serde_json::Value;

use crate::connection::Connection;
use crate::descriptor::OverlayDescriptor;
use crate::escape::{ascii_escape_json, header_safe_url};
use crate::headers;

/// Connection-local flag set on requests the overlay pipeline replays in-process.
pub const INTERNAL_DISPATCH_ASSIGN: &str = "seam_overlay_internal_dispatch";

pub fn mark_internal_dispatch<C: Connection + ?Sized>(conn: &mut C) {
  conn.assign(INTERNAL_DISPATCH_ASSIGN, Value::Bool(true));
}

/// Whether this request is a backdrop fetch issued by an overlay render.
/// Overlay-aware middleware must not start another overlay render for it,
/// whatever other markers the request carries.
pub fn is_internal_overlay_dispatch<C: Connection + ?Sized>(conn: &C) -> bool {
  let flagged = conn.assigned(INTERNAL_DISPATCH_ASSIGN).and_then(Value::as_bool).unwrap_or(false);
  flagged || conn.header(headers::INTERNAL_DISPATCH).is_some_and(headers::is_truthy)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
  Json(Value),
  Html(String),
}

impl ResponseBody {
  pub fn content_type(&self) -> &'static str {
    match self {
      Self::Json(_) => "application/json",
      Self::Html(_) => "text/html; charset=utf-8",
    }
  }

  pub fn into_string(self) -> String {
    match self {
      Self::Json(value) => value.to_string(),
      Self::Html(html) => html,
    }
  }
}

/// A fully composed response. Adapters write it out as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalResponse {
  pub status: u16,
  pub headers: Vec<(String, String)>,
  pub body: ResponseBody,
  /// Path the client's address bar will show, when it differs from the request.
  pub effective_path: Option<String>,
}

impl FinalResponse {
  pub fn header(&self, name: &str) -> Option<&str> {
    self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
  }
}

pub fn finalize(
  body: ResponseBody,
  descriptor: &OverlayDescriptor,
  backdrop_url: &str,
  effective_path: Option<String>,
) -> FinalResponse {
  let mut out = vec![("content-type".to_string(), body.content_type().to_string())];

  if matches!(body, ResponseBody::Json(_)) {
    out.push((headers::NAVIGATE.to_string(), "true".to_string()));
    out.push(("vary".to_string(), headers::NAVIGATE.to_string()));
  }

  out.push((headers::OVERLAY.to_string(), "true".to_string()));
  out.push((headers::OVERLAY_BACKDROP.to_string(), header_safe_url(backdrop_url)));

  let config = descriptor.config_map();
  if !config.is_empty() {
    let json = Value::Object(config.clone()).to_string();
    out.push((headers::OVERLAY_CONFIG.to_string(), ascii_escape_json(&json)));
  }

  FinalResponse { status: 200, headers: out, body, effective_path }
}
