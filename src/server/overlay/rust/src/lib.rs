/* src/server/overlay/rust/src/lib.rs */

//! Overlay pages (modals, slideovers) composed on top of a backdrop page.
//!
//! A handler describes the overlay with an [`OverlayDescriptor`] and hands it
//! to [`OverlayRenderer::render`]. The renderer replays a GET for the backdrop
//! through the app's own pipeline, nests the overlay under the backdrop's
//! `_overlay` prop and answers in whichever shape the client expects: JSON for
//! in-app navigations, the backdrop's full HTML for cold loads.

pub mod codec;
pub mod compose;
pub mod config;
pub mod connection;
pub mod descriptor;
pub mod dispatch;
pub mod errors;
pub mod escape;
pub mod finalize;
pub mod headers;
pub mod payload;

// Re-exports for ergonomic use
pub use codec::{CodecError, MarkupCodec};
pub use compose::{OVERLAY_PROP, OverlayRenderer, compose_payload};
pub use config::OverlayConfig;
pub use connection::{Connection, MemoryConnection, is_in_app};
pub use descriptor::OverlayDescriptor;
pub use dispatch::{
  BoxFuture, DispatchRequest, DispatchResponse, DispatchResult, InternalDispatcher, PageClient,
  ResponseShape,
};
pub use errors::OverlayError;
pub use escape::ascii_escape_json;
pub use finalize::{
  FinalResponse, ResponseBody, is_internal_overlay_dispatch, mark_internal_dispatch,
};
pub use payload::PagePayload;
