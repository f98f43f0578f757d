/* demos/overlay-dashboard/src/users.rs */

use axum::extract::Path;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use seam_overlay::{OverlayDescriptor, OverlayError, PagePayload};
use seam_overlay_axum::{AxumError, Overlay, Page};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct User {
  id: u32,
  name: &'static str,
  email: &'static str,
}

static USERS: [User; 3] = [
  User { id: 1, name: "Ada", email: "ada@example.com" },
  User { id: 2, name: "Grace", email: "grace@example.com" },
  User { id: 3, name: "Linus", email: "linus@example.com" },
];

#[derive(Serialize)]
struct EditProps<'a> {
  user: &'a User,
}

fn find(id: u32) -> Option<&'static User> {
  USERS.iter().find(|u| u.id == id)
}

pub async fn index(page: Page) -> Result<Response, AxumError> {
  let users =
    serde_json::to_value(&USERS).map_err(|e| AxumError(OverlayError::ParseFailed(e.to_string())))?;
  Ok(page.render(PagePayload::new("UsersIndex", page.url()).prop("users", users)))
}

pub async fn show(page: Page, Path(id): Path<u32>) -> Result<Response, AxumError> {
  let Some(user) = find(id) else {
    return Ok(StatusCode::NOT_FOUND.into_response());
  };
  let user =
    serde_json::to_value(user).map_err(|e| AxumError(OverlayError::ParseFailed(e.to_string())))?;
  Ok(page.render(PagePayload::new("UserShow", page.url()).prop("user", user)))
}

/// Edit form shown as a modal over the list.
pub async fn edit(overlay: Overlay, Path(id): Path<u32>) -> Result<Response, AxumError> {
  let Some(user) = find(id) else {
    return Ok(StatusCode::NOT_FOUND.into_response());
  };
  // A backdrop dispatch landing here would try to open a second overlay.
  if overlay.is_internal_dispatch() {
    return Ok(StatusCode::NOT_FOUND.into_response());
  }

  let descriptor = OverlayDescriptor::new("UserEdit")
    .props(&EditProps { user })?
    .backdrop("/users")
    .config("size", "lg")
    .config("dismissible", true);
  Ok(overlay.render(descriptor).await?.into_response())
}
