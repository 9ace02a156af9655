//! Channel names and provider identifiers shared with the native executor.

/// Requests from the shared API to the native executor.
pub const AUTH_REQUEST_CHANNEL: &str = "AuthRequest";
/// Correlated responses from the native executor.
pub const AUTH_RESPONSE_CHANNEL: &str = "AuthResponse";
/// Unkeyed broadcast of the current-user snapshot.
pub const AUTH_STATE_CHANNEL: &str = "AuthState";

pub const GOOGLE_SIGN_IN_REQUEST_CHANNEL: &str = "GoogleSignInRequest";
pub const GOOGLE_SIGN_IN_COMPLETED_CHANNEL: &str = "GoogleSignInCompleted";
pub const APPLE_SIGN_IN_REQUEST_CHANNEL: &str = "AppleSignInRequest";
pub const APPLE_SIGN_IN_COMPLETED_CHANNEL: &str = "AppleSignInCompleted";

pub const GOOGLE_PROVIDER_ID: &str = "google.com";
pub const APPLE_PROVIDER_ID: &str = "apple.com";
pub const FACEBOOK_PROVIDER_ID: &str = "facebook.com";
pub const EMAIL_PROVIDER_ID: &str = "password";
