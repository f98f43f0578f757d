/* src/server/overlay/rust/src/headers.rs */

//! Header names exchanged between the server and the client router.

/// Set by the client router on background page fetches.
pub const NAVIGATE: &str = "x-seam-navigate";
/// Asset version the client last saw.
pub const VERSION: &str = "x-seam-version";
/// Present only on requests replayed in-process for a backdrop.
pub const INTERNAL_DISPATCH: &str = "x-seam-overlay-dispatch";
/// Response flag: the body carries overlay data.
pub const OVERLAY: &str = "x-seam-overlay";
pub const OVERLAY_BACKDROP: &str = "x-seam-overlay-backdrop";
pub const OVERLAY_CONFIG: &str = "x-seam-overlay-config";
/// Hard-navigation target sent with a 409 when the client build is stale.
pub const LOCATION: &str = "x-seam-location";

/// Boolean-ish marker values: `true`, `1` or `yes`, case-insensitive.
pub fn is_truthy(value: &str) -> bool {
  let value = value.trim();
  ["true", "1", "yes"].iter().any(|t| value.eq_ignore_ascii_case(t))
}
