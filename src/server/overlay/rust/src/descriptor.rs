/* src/server/overlay/rust/src/descriptor.rs */

use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::OverlayError;

/// What to render on top of the backdrop. Built by the page handler, then
/// handed to the renderer by value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverlayDescriptor {
  component: String,
  props: Map<String, Value>,
  backdrop_url: Option<String>,
  config: Map<String, Value>,
}

impl OverlayDescriptor {
  pub fn new(component: impl Into<String>) -> Self {
    Self { component: component.into(), ..Self::default() }
  }

  pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.props.insert(key.into(), value.into());
    self
  }

  /// Merge a serializable struct or map into the props. Anything that does not
  /// serialize to a JSON object is rejected.
  pub fn props<T: Serialize + ?Sized>(mut self, props: &T) -> Result<Self, OverlayError> {
    match serde_json::to_value(props) {
      Ok(Value::Object(map)) => {
        self.props.extend(map);
        Ok(self)
      }
      Ok(other) => {
        Err(OverlayError::ParseFailed(format!("overlay props must be an object, got {other}")))
      }
      Err(e) => Err(OverlayError::ParseFailed(format!("overlay props: {e}"))),
    }
  }

  pub fn backdrop(mut self, url: impl Into<String>) -> Self {
    self.backdrop_url = Some(url.into());
    self
  }

  /// Client-side hint (size, position, close behaviour). Opaque to the server.
  pub fn config(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
    self.config.insert(key.into(), value.into());
    self
  }

  pub fn component(&self) -> &str {
    &self.component
  }

  pub fn prop_map(&self) -> &Map<String, Value> {
    &self.props
  }

  pub fn backdrop_url(&self) -> Option<&str> {
    self.backdrop_url.as_deref()
  }

  pub fn config_map(&self) -> &Map<String, Value> {
    &self.config
  }

  /// The `_overlay` prop: `{component, props, url, backdropUrl, config}`.
  pub fn overlay_data(&self, url: &str, backdrop_url: &str) -> Value {
    let mut data = Map::new();
    data.insert("component".into(), Value::String(self.component.clone()));
    data.insert("props".into(), Value::Object(self.props.clone()));
    data.insert("url".into(), Value::String(url.to_string()));
    data.insert("backdropUrl".into(), Value::String(backdrop_url.to_string()));
    data.insert("config".into(), Value::Object(self.config.clone()));
    Value::Object(data)
  }
}
