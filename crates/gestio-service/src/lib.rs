//! Service facade exposing the Gestio auth operations behind the
//! `{success, message, data}` response envelope.

pub mod auth;

pub use auth::AuthService;
// The one authorization decision function, for client mirrors that talk
// to this surface.
pub use gestio_auth::can_access;
