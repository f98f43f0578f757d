/* src/server/adapter/axum/src/lib.rs */

mod client;
mod connection;
mod error;
mod extract;
mod page;
mod response;

use axum::Router;

/// Re-export seam-overlay core for convenience
pub use seam_overlay;

pub use client::RouterClient;
pub use connection::{AxumConnection, InternalDispatch};
pub use error::AxumError;
pub use extract::{Overlay, OverlayState};
pub use page::{APP_MARKER, Page, PageShell};
pub use response::{EffectivePath, OverlayResponse};

/// Extension trait that lets a finished router serve its own backdrop dispatches.
pub trait OverlayRouterExt {
  /// Bind this router as the backdrop dispatch target.
  ///
  /// Call it last, after every `.layer(..)`: backdrop requests go through the
  /// router exactly as it is at this point, so middleware added afterwards
  /// (auth, sessions) runs for the outer request only.
  fn with_overlays(self, overlays: &OverlayState) -> Router;
}

impl OverlayRouterExt for Router {
  fn with_overlays(self, overlays: &OverlayState) -> Router {
    if !overlays.bind(self.clone()) {
      tracing::warn!("overlay state already bound to a router, keeping the first one");
    }
    self
  }
}

#[cfg(test)]
mod tests;
