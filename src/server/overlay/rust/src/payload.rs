/* src/server/overlay/rust/src/payload.rs */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::OverlayError;

/// The page object every page response carries, as JSON body or embedded in
/// the root element of the HTML shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PagePayload {
  pub component: String,
  #[serde(default)]
  pub props: Map<String, Value>,
  #[serde(default)]
  pub url: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub version: Option<String>,
  /// Top-level fields this crate does not interpret (history flags and the like).
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl PagePayload {
  pub fn new(component: impl Into<String>, url: impl Into<String>) -> Self {
    Self {
      component: component.into(),
      props: Map::new(),
      url: url.into(),
      version: None,
      extra: Map::new(),
    }
  }

  pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.props.insert(key.into(), value.into());
    self
  }

  pub fn with_version(mut self, version: Option<String>) -> Self {
    self.version = version;
    self
  }

  pub fn from_value(value: Value) -> Result<Self, OverlayError> {
    serde_json::from_value(value).map_err(|e| OverlayError::ParseFailed(e.to_string()))
  }

  pub fn from_json(text: &str) -> Result<Self, OverlayError> {
    serde_json::from_str(text).map_err(|e| OverlayError::ParseFailed(e.to_string()))
  }

  pub fn to_value(&self) -> Value {
    let mut obj = Map::new();
    obj.insert("component".into(), Value::String(self.component.clone()));
    obj.insert("props".into(), Value::Object(self.props.clone()));
    obj.insert("url".into(), Value::String(self.url.clone()));
    if let Some(ref version) = self.version {
      obj.insert("version".into(), Value::String(version.clone()));
    }
    for (k, v) in &self.extra {
      obj.entry(k.clone()).or_insert_with(|| v.clone());
    }
    Value::Object(obj)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn parses_minimal_payload() {
    let p = PagePayload::from_json(r#"{"component":"UsersIndex"}"#).unwrap();
    assert_eq!(p.component, "UsersIndex");
    assert!(p.props.is_empty());
    assert_eq!(p.url, "");
    assert_eq!(p.version, None);
  }

  #[test]
  fn missing_component_is_parse_failure() {
    let err = PagePayload::from_json(r#"{"props":{}}"#).unwrap_err();
    assert!(matches!(err, OverlayError::ParseFailed(_)));
  }

  #[test]
  fn non_json_is_parse_failure() {
    assert!(matches!(PagePayload::from_json("<html>"), Err(OverlayError::ParseFailed(_))));
  }

  #[test]
  fn unknown_fields_survive() {
    let value = json!({
      "component": "UsersIndex",
      "props": {},
      "url": "/users",
      "version": "v1",
      "clearHistory": true
    });
    let p = PagePayload::from_value(value.clone()).unwrap();
    assert_eq!(p.extra.get("clearHistory"), Some(&json!(true)));
    assert_eq!(p.to_value(), value);
  }

  #[test]
  fn to_value_omits_absent_version() {
    let p = PagePayload::new("UsersIndex", "/users").prop("users", json!([]));
    assert_eq!(p.to_value(), json!({"component": "UsersIndex", "props": {"users": []}, "url": "/users"}));
  }
}
