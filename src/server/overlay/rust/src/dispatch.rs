/* src/server/overlay/rust/src/dispatch.rs */

use std::future::Future;
use std::pin::Pin;

use crate::codec::{CodecError, MarkupCodec};
use crate::config::OverlayConfig;
use crate::connection::Connection;
use crate::errors::OverlayError;
use crate::headers;
use crate::payload::PagePayload;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Which representation of the backdrop to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
  /// JSON page payload, as the client router would receive it.
  Structured,
  /// Full HTML document with the payload embedded in the root element.
  Markup,
}

impl ResponseShape {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Structured => "structured",
      Self::Markup => "markup",
    }
  }
}

/// A GET replayed through the same process's page pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
  pub path: String,
  pub headers: Vec<(String, String)>,
  pub shape: ResponseShape,
}

impl DispatchRequest {
  pub fn header(&self, name: &str) -> Option<&str> {
    self.headers.iter().find(|(k, _)| k.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResponse {
  pub status: u16,
  pub body: String,
}

/// HTTP-shaped client that answers requests from the hosting app itself,
/// without a network hop. Adapters implement this over their router.
pub trait PageClient: Send + Sync {
  fn get(&self, request: DispatchRequest) -> BoxFuture<'_, Result<DispatchResponse, OverlayError>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchResult {
  Structured { payload: PagePayload },
  Markup { markup: String, payload: PagePayload },
}

impl DispatchResult {
  pub fn payload(&self) -> &PagePayload {
    match self {
      Self::Structured { payload } | Self::Markup { payload, .. } => payload,
    }
  }
}

/// Fetches the backdrop page through a [`PageClient`] and decodes whichever
/// representation came back.
pub struct InternalDispatcher<C> {
  client: C,
  config: OverlayConfig,
  codec: MarkupCodec,
}

impl<C: PageClient> InternalDispatcher<C> {
  pub fn new(client: C, config: OverlayConfig) -> Self {
    let codec = MarkupCodec::new(config.payload_attr_name());
    Self { client, config, codec }
  }

  pub fn config(&self) -> &OverlayConfig {
    &self.config
  }

  pub fn codec(&self) -> &MarkupCodec {
    &self.codec
  }

  /// Build the inner request: forwarded session headers, the client's
  /// protocol version and the internal-dispatch marker.
  pub fn request_for<K: Connection + ?Sized>(
    &self,
    conn: &K,
    path: &str,
    shape: ResponseShape,
  ) -> DispatchRequest {
    let mut forwarded: Vec<(String, String)> = self
      .config
      .forwarded_headers()
      .iter()
      .filter_map(|name| conn.header(name).map(|v| (name.clone(), v.to_string())))
      .collect();

    forwarded.push((headers::INTERNAL_DISPATCH.to_string(), "true".to_string()));

    let version = conn.header(headers::VERSION).or(self.config.current_version());
    if let Some(version) = version {
      forwarded.push((headers::VERSION.to_string(), version.to_string()));
    }

    match shape {
      ResponseShape::Structured => {
        forwarded.push((headers::NAVIGATE.to_string(), "true".to_string()));
        forwarded.push(("accept".to_string(), "application/json".to_string()));
      }
      ResponseShape::Markup => {
        forwarded.push(("accept".to_string(), "text/html".to_string()));
      }
    }

    DispatchRequest { path: path.to_string(), headers: forwarded, shape }
  }

  pub async fn fetch(&self, request: DispatchRequest) -> Result<DispatchResult, OverlayError> {
    let path = request.path.clone();
    let shape = request.shape;
    let result = self.client.get(request).await.and_then(|response| self.decode(shape, response));
    if let Err(ref err) = result {
      tracing::warn!(
        backdrop_url = %path,
        kind = err.code(),
        shape = shape.as_str(),
        "backdrop dispatch failed: {err}"
      );
    }
    result
  }

  fn decode(
    &self,
    shape: ResponseShape,
    response: DispatchResponse,
  ) -> Result<DispatchResult, OverlayError> {
    if !(200..300).contains(&response.status) {
      return Err(OverlayError::HttpError(response.status));
    }
    match shape {
      ResponseShape::Structured => {
        let payload = PagePayload::from_json(&response.body)?;
        Ok(DispatchResult::Structured { payload })
      }
      ResponseShape::Markup => {
        let value = self
          .codec
          .extract(&response.body)
          .map_err(|e: CodecError| OverlayError::ParseFailed(e.to_string()))?;
        let payload = PagePayload::from_value(value)?;
        Ok(DispatchResult::Markup { markup: response.body, payload })
      }
    }
  }
}
