//! Firebase Authentication over the notification hub.
//!
//! The shared API and the native SDK executor share no type system; they
//! cooperate only through name-addressed notifications. This module owns the
//! common side of that protocol: correlating each request to its response,
//! resuming the awaiting caller exactly once, cleaning up observers on
//! cancellation, and mirroring the native auth-state broadcast into an
//! observable cell.

mod action;
mod api;
mod backend;
mod bridge;
pub mod constants;
mod error;
mod model;
mod state;

#[doc(inline)]
pub use action::AuthAction;

#[doc(inline)]
pub use api::FirebaseAuth;

#[doc(inline)]
pub use backend::AuthBackend;

#[doc(inline)]
pub use bridge::{AuthHub, BridgeBuilder, NotificationAuthBridge};

#[doc(inline)]
pub use error::{map_error_code, missing_parameter, network, unknown, AuthError, AuthResult};

#[doc(inline)]
pub use model::{encode_failure_response, encode_success_response, AuthUser};

#[doc(inline)]
pub use state::AuthStateCell;
