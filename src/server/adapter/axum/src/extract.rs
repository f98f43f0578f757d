/* src/server/adapter/axum/src/extract.rs */

use std::convert::Infallible;
use std::sync::Arc;

use axum::Router;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use seam_overlay::{OverlayConfig, OverlayDescriptor, OverlayRenderer, is_internal_overlay_dispatch};

use crate::client::RouterClient;
use crate::connection::AxumConnection;
use crate::error::AxumError;
use crate::page::PageShell;
use crate::response::OverlayResponse;

/// Shared overlay machinery. Put it in the router state (or make it
/// reachable through `FromRef`) and bind the finished router to it.
#[derive(Clone)]
pub struct OverlayState {
  renderer: Arc<OverlayRenderer<RouterClient>>,
  client: RouterClient,
  shell: Arc<PageShell>,
}

impl OverlayState {
  pub fn new(config: OverlayConfig) -> Self {
    let client = RouterClient::new();
    Self {
      renderer: Arc::new(OverlayRenderer::new(client.clone(), config)),
      client,
      shell: Arc::new(PageShell::default()),
    }
  }

  pub fn shell(mut self, shell: PageShell) -> Self {
    self.shell = Arc::new(shell);
    self
  }

  /// Point backdrop dispatches at `router`. Returns false if already bound.
  pub fn bind(&self, router: Router) -> bool {
    self.client.bind(router)
  }

  pub fn config(&self) -> &OverlayConfig {
    self.renderer.config()
  }

  pub fn page_shell(&self) -> &PageShell {
    &self.shell
  }
}

impl Default for OverlayState {
  fn default() -> Self {
    Self::new(OverlayConfig::default())
  }
}

/// Extractor for handlers that answer with an overlay.
pub struct Overlay {
  conn: AxumConnection,
  state: OverlayState,
}

impl Overlay {
  pub fn connection(&self) -> &AxumConnection {
    &self.conn
  }

  /// True on backdrop requests replayed by another overlay render.
  pub fn is_internal_dispatch(&self) -> bool {
    is_internal_overlay_dispatch(&self.conn)
  }

  pub async fn render(mut self, descriptor: OverlayDescriptor) -> Result<OverlayResponse, AxumError> {
    let response = self.state.renderer.render(&mut self.conn, descriptor).await?;
    Ok(OverlayResponse(response))
  }
}

impl<S> FromRequestParts<S> for Overlay
where
  OverlayState: FromRef<S>,
  S: Send + Sync,
{
  type Rejection = Infallible;

  async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
    Ok(Self { conn: AxumConnection::from_parts(parts), state: OverlayState::from_ref(state) })
  }
}
