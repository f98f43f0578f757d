/* src/server/overlay/rust/src/config.rs */

/// Attribute on the root element that carries the page payload.
pub const DEFAULT_PAYLOAD_ATTR: &str = "data-page";

const DEFAULT_FORWARD_HEADERS: &[&str] = &["cookie", "authorization", "accept-language", "user-agent"];

/// Server-side overlay settings shared by every render.
#[derive(Debug, Clone)]
pub struct OverlayConfig {
  payload_attr: String,
  version: Option<String>,
  forward_headers: Vec<String>,
}

impl OverlayConfig {
  pub fn new() -> Self {
    Self {
      payload_attr: DEFAULT_PAYLOAD_ATTR.to_string(),
      version: None,
      forward_headers: DEFAULT_FORWARD_HEADERS.iter().map(|h| (*h).to_string()).collect(),
    }
  }

  pub fn payload_attr(mut self, attr: impl Into<String>) -> Self {
    self.payload_attr = attr.into();
    self
  }

  /// Current asset version. Sent on the backdrop dispatch when the inbound
  /// request carries none (cold loads).
  pub fn version(mut self, version: impl Into<String>) -> Self {
    self.version = Some(version.into());
    self
  }

  /// Add a request header copied onto the backdrop dispatch.
  pub fn forward_header(mut self, name: impl Into<String>) -> Self {
    let name = name.into().to_ascii_lowercase();
    if !self.forward_headers.contains(&name) {
      self.forward_headers.push(name);
    }
    self
  }

  pub fn payload_attr_name(&self) -> &str {
    &self.payload_attr
  }

  pub fn current_version(&self) -> Option<&str> {
    self.version.as_deref()
  }

  pub fn forwarded_headers(&self) -> &[String] {
    &self.forward_headers
  }
}

impl Default for OverlayConfig {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults() {
    let config = OverlayConfig::default();
    assert_eq!(config.payload_attr_name(), "data-page");
    assert_eq!(config.current_version(), None);
    assert!(config.forwarded_headers().iter().any(|h| h == "cookie"));
    assert!(config.forwarded_headers().iter().any(|h| h == "authorization"));
  }

  #[test]
  fn forward_header_lowercases_and_dedups() {
    let config = OverlayConfig::new().forward_header("X-Tenant").forward_header("x-tenant");
    let count = config.forwarded_headers().iter().filter(|h| *h == "x-tenant").count();
    assert_eq!(count, 1);
  }

  #[test]
  fn builder_overrides() {
    let config = OverlayConfig::new().payload_attr("data-seam").version("abc123");
    assert_eq!(config.payload_attr_name(), "data-seam");
    assert_eq!(config.current_version(), Some("abc123"));
  }
}
