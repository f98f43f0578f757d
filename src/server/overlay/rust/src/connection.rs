/* src/server/overlay/rust/src/connection.rs */

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::headers;

/// The slice of an HTTP request/response cycle the overlay pipeline needs.
/// Adapters implement this over their framework's request type.
pub trait Connection {
  /// Case-insensitive request header lookup.
  fn header(&self, name: &str) -> Option<&str>;

  /// Path plus query string as the client requested it.
  fn request_url(&self) -> &str;

  /// Path downstream observers should treat as "this page".
  fn effective_path(&self) -> &str;

  fn set_effective_path(&mut self, path: &str);

  fn assign(&mut self, key: &str, value: Value);

  fn assigned(&self, key: &str) -> Option<&Value>;
}

/// True when the client router issued the request and already holds a page.
pub fn is_in_app<C: Connection + ?Sized>(conn: &C) -> bool {
  conn.header(headers::NAVIGATE).is_some_and(headers::is_truthy)
}

/// In-memory connection for tests and non-HTTP callers.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnection {
  url: String,
  headers: HashMap<String, String>,
  effective_path: Option<String>,
  assigns: Map<String, Value>,
}

impl MemoryConnection {
  pub fn new(url: impl Into<String>) -> Self {
    Self { url: url.into(), ..Self::default() }
  }

  pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
    self.headers.insert(name.to_ascii_lowercase(), value.into());
    self
  }
}

impl Connection for MemoryConnection {
  fn header(&self, name: &str) -> Option<&str> {
    self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
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

/// Strip the query string and fragment from a request URL.
pub fn path_of(url: &str) -> &str {
  let end = url.find(['?', '#']).unwrap_or(url.len());
  &url[..end]
}
