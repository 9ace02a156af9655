use std::fmt;

pub type AuthResult<T> = Result<T, AuthError>;

/// Typed authentication failure handed to the caller.
///
/// The bridge never recovers from a failure locally: whatever error code the
/// native executor reports is mapped to the closest variant here (falling
/// back to [`AuthError::Unknown`]) and returned as a value. Nothing is raised
/// across the suspension boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    InvalidCredential,
    InvalidEmailOrPassword,
    EmailAlreadyInUse,
    WeakPassword,
    UserNotFound,
    WrongPassword,
    UserDisabled,
    TooManyRequests,
    EmailNotVerified,
    RequiresRecentLogin,
    ProviderAlreadyLinked,
    NoSuchProvider,
    InvalidEmail,
    MissingParameter(String),
    Network(String),
    Unknown(String),
}

impl AuthError {
    /// Stable machine-readable code for the failure kind.
    pub fn code_str(&self) -> &'static str {
        match self {
            AuthError::InvalidCredential => "auth/invalid-credential",
            AuthError::InvalidEmailOrPassword => "auth/invalid-email-or-password",
            AuthError::EmailAlreadyInUse => "auth/email-already-in-use",
            AuthError::WeakPassword => "auth/weak-password",
            AuthError::UserNotFound => "auth/user-not-found",
            AuthError::WrongPassword => "auth/wrong-password",
            AuthError::UserDisabled => "auth/user-disabled",
            AuthError::TooManyRequests => "auth/too-many-requests",
            AuthError::EmailNotVerified => "auth/email-not-verified",
            AuthError::RequiresRecentLogin => "auth/requires-recent-login",
            AuthError::ProviderAlreadyLinked => "auth/provider-already-linked",
            AuthError::NoSuchProvider => "auth/no-such-provider",
            AuthError::InvalidEmail => "auth/invalid-email",
            AuthError::MissingParameter(_) => "auth/missing-parameter",
            AuthError::Network(_) => "auth/network-request-failed",
            AuthError::Unknown(_) => "auth/unknown",
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredential => write!(f, "The supplied credential is invalid"),
            AuthError::InvalidEmailOrPassword => write!(f, "Invalid email or password"),
            AuthError::EmailAlreadyInUse => write!(f, "The email address is already in use"),
            AuthError::WeakPassword => write!(f, "The password is too weak"),
            AuthError::UserNotFound => write!(f, "No account matches the given identifier"),
            AuthError::WrongPassword => write!(f, "The password is incorrect"),
            AuthError::UserDisabled => write!(f, "The account has been disabled"),
            AuthError::TooManyRequests => write!(f, "Too many attempts; try again later"),
            AuthError::EmailNotVerified => write!(f, "The email address has not been verified"),
            AuthError::RequiresRecentLogin => {
                write!(f, "This operation requires a recent sign-in")
            }
            AuthError::ProviderAlreadyLinked => {
                write!(f, "The provider is already linked to the account")
            }
            AuthError::NoSuchProvider => write!(f, "The provider is not linked to the account"),
            AuthError::InvalidEmail => write!(f, "The email address is badly formatted"),
            AuthError::MissingParameter(name) => write!(f, "Missing parameter: {name}"),
            AuthError::Network(message) => write!(f, "Network error: {message}"),
            AuthError::Unknown(message) => write!(f, "Authentication error: {message}"),
        }
    }
}

impl std::error::Error for AuthError {}

pub fn missing_parameter(name: impl Into<String>) -> AuthError {
    AuthError::MissingParameter(name.into())
}

pub fn network(message: impl Into<String>) -> AuthError {
    AuthError::Network(message.into())
}

pub fn unknown(message: impl Into<String>) -> AuthError {
    AuthError::Unknown(message.into())
}

/// Maps a native executor error code to the closest taxonomy member.
///
/// Both the Android-style `ERROR_*` constants and the bare identity-toolkit
/// server codes are recognized; anything else falls back to
/// [`AuthError::Unknown`] carrying the original code and message.
pub fn map_error_code(code: &str, message: Option<&str>) -> AuthError {
    match code {
        "ERROR_INVALID_CREDENTIAL" | "INVALID_IDP_RESPONSE" => AuthError::InvalidCredential,
        "ERROR_INVALID_LOGIN_CREDENTIALS" | "INVALID_LOGIN_CREDENTIALS" => {
            AuthError::InvalidEmailOrPassword
        }
        "ERROR_EMAIL_ALREADY_IN_USE" | "EMAIL_EXISTS" => AuthError::EmailAlreadyInUse,
        "ERROR_WEAK_PASSWORD" | "WEAK_PASSWORD" => AuthError::WeakPassword,
        "ERROR_USER_NOT_FOUND" | "EMAIL_NOT_FOUND" => AuthError::UserNotFound,
        "ERROR_WRONG_PASSWORD" | "INVALID_PASSWORD" => AuthError::WrongPassword,
        "ERROR_USER_DISABLED" | "USER_DISABLED" => AuthError::UserDisabled,
        "ERROR_TOO_MANY_REQUESTS" | "TOO_MANY_ATTEMPTS_TRY_LATER" => AuthError::TooManyRequests,
        "ERROR_UNVERIFIED_EMAIL" | "UNVERIFIED_EMAIL" => AuthError::EmailNotVerified,
        "ERROR_REQUIRES_RECENT_LOGIN" | "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" => {
            AuthError::RequiresRecentLogin
        }
        "ERROR_PROVIDER_ALREADY_LINKED" | "FEDERATED_USER_ID_ALREADY_LINKED" => {
            AuthError::ProviderAlreadyLinked
        }
        "ERROR_NO_SUCH_PROVIDER" => AuthError::NoSuchProvider,
        "ERROR_INVALID_EMAIL" | "INVALID_EMAIL" => AuthError::InvalidEmail,
        "ERROR_NETWORK_REQUEST_FAILED" | "NETWORK_ERROR" => {
            AuthError::Network(message.unwrap_or("network request failed").to_string())
        }
        other => {
            let detail = message.unwrap_or("no message supplied");
            AuthError::Unknown(format!("{other}: {detail}"))
        }
    }
}
