/* demos/overlay-dashboard/src/main.rs */

mod users;

use std::env;

use axum::Router;
use axum::routing::get;
use seam_overlay::OverlayConfig;
use seam_overlay_axum::{OverlayRouterExt, OverlayState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

  let port = env::var("PORT").unwrap_or_else(|_| "3000".to_string());
  let addr = format!("0.0.0.0:{port}");

  let mut config = OverlayConfig::new().forward_header("x-tenant");
  if let Ok(version) = env::var("SEAM_VERSION") {
    config = config.version(version);
  }
  let overlays = OverlayState::new(config);

  let router = Router::new()
    .route("/users", get(users::index))
    .route("/users/{id}", get(users::show))
    .route("/users/{id}/edit", get(users::edit))
    .with_state(overlays.clone())
    .with_overlays(&overlays);

  let listener = tokio::net::TcpListener::bind(&addr).await?;
  let actual_port = listener.local_addr()?.port();
  tracing::info!(port = actual_port, "overlay dashboard listening");
  axum::serve(listener, router).await?;
  Ok(())
}
