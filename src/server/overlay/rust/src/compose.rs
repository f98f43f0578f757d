/* src/server/overlay/rust/src/compose.rs */

use crate::config::OverlayConfig;
use crate::connection::{Connection, is_in_app};
use crate::descriptor::OverlayDescriptor;
use crate::dispatch::{DispatchResult, InternalDispatcher, PageClient, ResponseShape};
use crate::errors::OverlayError;
use crate::finalize::{FinalResponse, ResponseBody, finalize, is_internal_overlay_dispatch};
use crate::payload::PagePayload;

/// Reserved backdrop prop the overlay data is nested under.
pub const OVERLAY_PROP: &str = "_overlay";

/// Nest the overlay under [`OVERLAY_PROP`]. Every other backdrop prop is kept
/// as-is; the component stays the backdrop's so the client keeps its page tree.
pub fn compose_payload(
  mut backdrop: PagePayload,
  descriptor: &OverlayDescriptor,
  overlay_url: &str,
  backdrop_url: &str,
) -> PagePayload {
  if backdrop.props.contains_key(OVERLAY_PROP) {
    tracing::debug!(backdrop_url, "backdrop already carries {OVERLAY_PROP}, replacing it");
  }
  backdrop.props.insert(OVERLAY_PROP.to_string(), descriptor.overlay_data(overlay_url, backdrop_url));
  backdrop
}

/// Entry point for page handlers that answer with an overlay.
pub struct OverlayRenderer<C> {
  dispatcher: InternalDispatcher<C>,
}

impl<C: PageClient> OverlayRenderer<C> {
  pub fn new(client: C, config: OverlayConfig) -> Self {
    Self { dispatcher: InternalDispatcher::new(client, config) }
  }

  pub fn config(&self) -> &OverlayConfig {
    self.dispatcher.config()
  }

  /// Fetch the backdrop, merge the overlay into its payload and build the
  /// response. In-app requests get JSON advertising the overlay's URL; cold
  /// loads get the backdrop's HTML, and the connection's effective path
  /// becomes the backdrop URL to match the address bar.
  ///
  /// On error nothing has been written and the connection is unchanged.
  pub async fn render<K: Connection + ?Sized>(
    &self,
    conn: &mut K,
    descriptor: OverlayDescriptor,
  ) -> Result<FinalResponse, OverlayError> {
    let Some(backdrop_url) = descriptor.backdrop_url().map(str::to_owned) else {
      let err = OverlayError::NoBackdropUrl;
      tracing::warn!(component = descriptor.component(), kind = err.code(), "{err}");
      return Err(err);
    };

    if is_internal_overlay_dispatch(&*conn) {
      let err = OverlayError::DispatchUnavailable(format!(
        "{} is itself an internal backdrop dispatch",
        conn.request_url()
      ));
      tracing::warn!(backdrop_url = %backdrop_url, kind = err.code(), "{err}");
      return Err(err);
    }

    let shape = if is_in_app(&*conn) { ResponseShape::Structured } else { ResponseShape::Markup };
    let overlay_url = conn.request_url().to_string();
    let request = self.dispatcher.request_for(&*conn, &backdrop_url, shape);

    let response = match self.dispatcher.fetch(request).await? {
      DispatchResult::Structured { payload } => {
        let mut composed = compose_payload(payload, &descriptor, &overlay_url, &backdrop_url);
        composed.url = overlay_url;
        finalize(ResponseBody::Json(composed.to_value()), &descriptor, &backdrop_url, None)
      }
      DispatchResult::Markup { markup, payload } => {
        let mut composed = compose_payload(payload, &descriptor, &overlay_url, &backdrop_url);
        composed.url = backdrop_url.clone();
        let html =
          self.dispatcher.codec().reembed(&markup, &composed.to_value()).map_err(|e| {
            let err = OverlayError::InjectFailed(e.to_string());
            tracing::warn!(backdrop_url = %backdrop_url, kind = err.code(), "{err}");
            err
          })?;
        conn.set_effective_path(&backdrop_url);
        finalize(ResponseBody::Html(html), &descriptor, &backdrop_url, Some(backdrop_url.clone()))
      }
    };

    tracing::debug!(
      backdrop_url = %backdrop_url,
      shape = shape.as_str(),
      component = descriptor.component(),
      "overlay composed"
    );
    Ok(response)
  }
}
