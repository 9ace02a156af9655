use std::collections::BTreeMap;

use crate::auth::error::{missing_parameter, AuthResult};

/// The fixed set of operations the native executor understands.
///
/// Every request carries exactly one of these discriminators; no other
/// action name is meaningful on the request channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthAction {
    Anonymous,
    SignUpWithEmailAndPassword,
    SignInWithEmailAndPassword,
    Google,
    Apple,
    Facebook,
    SignOut,
    SendPasswordResetEmail,
    ConfirmPasswordReset,
    UpdatePassword,
    SendEmailVerification,
    ApplyActionCode,
    UpdateProfile,
    UpdateEmail,
    ReloadUser,
    DeleteAccount,
    LinkWithGoogle,
    LinkWithApple,
    LinkWithFacebook,
    LinkWithEmailAndPassword,
    UnlinkProvider,
    ReauthenticateWithEmail,
    ReauthenticateWithGoogle,
    ReauthenticateWithApple,
}

impl AuthAction {
    pub fn wire_name(self) -> &'static str {
        match self {
            AuthAction::Anonymous => "anonymous",
            AuthAction::SignUpWithEmailAndPassword => "signUpWithEmailAndPassword",
            AuthAction::SignInWithEmailAndPassword => "signInWithEmailAndPassword",
            AuthAction::Google => "google",
            AuthAction::Apple => "apple",
            AuthAction::Facebook => "facebook",
            AuthAction::SignOut => "signOut",
            AuthAction::SendPasswordResetEmail => "sendPasswordResetEmail",
            AuthAction::ConfirmPasswordReset => "confirmPasswordReset",
            AuthAction::UpdatePassword => "updatePassword",
            AuthAction::SendEmailVerification => "sendEmailVerification",
            AuthAction::ApplyActionCode => "applyActionCode",
            AuthAction::UpdateProfile => "updateProfile",
            AuthAction::UpdateEmail => "updateEmail",
            AuthAction::ReloadUser => "reloadUser",
            AuthAction::DeleteAccount => "deleteAccount",
            AuthAction::LinkWithGoogle => "linkWithGoogle",
            AuthAction::LinkWithApple => "linkWithApple",
            AuthAction::LinkWithFacebook => "linkWithFacebook",
            AuthAction::LinkWithEmailAndPassword => "linkWithEmailAndPassword",
            AuthAction::UnlinkProvider => "unlinkProvider",
            AuthAction::ReauthenticateWithEmail => "reauthenticateWithEmail",
            AuthAction::ReauthenticateWithGoogle => "reauthenticateWithGoogle",
            AuthAction::ReauthenticateWithApple => "reauthenticateWithApple",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        ALL_ACTIONS
            .iter()
            .copied()
            .find(|action| action.wire_name() == name)
    }

    /// Parameters that must be present (and non-empty) before a request for
    /// this action may be posted.
    pub fn required_params(self) -> &'static [&'static str] {
        match self {
            AuthAction::Anonymous
            | AuthAction::SignOut
            | AuthAction::SendEmailVerification
            | AuthAction::ReloadUser
            | AuthAction::DeleteAccount => &[],
            AuthAction::SignUpWithEmailAndPassword
            | AuthAction::SignInWithEmailAndPassword
            | AuthAction::LinkWithEmailAndPassword
            | AuthAction::ReauthenticateWithEmail => &["email", "password"],
            AuthAction::Google
            | AuthAction::Apple
            | AuthAction::LinkWithGoogle
            | AuthAction::LinkWithApple
            | AuthAction::ReauthenticateWithGoogle
            | AuthAction::ReauthenticateWithApple => &["idToken"],
            AuthAction::Facebook | AuthAction::LinkWithFacebook => &["accessToken"],
            AuthAction::SendPasswordResetEmail => &["email"],
            AuthAction::ConfirmPasswordReset => &["code", "newPassword"],
            AuthAction::UpdatePassword => &["newPassword"],
            AuthAction::ApplyActionCode => &["code"],
            // updateProfile is validated separately: at least one of its
            // optional fields must be present.
            AuthAction::UpdateProfile => &[],
            AuthAction::UpdateEmail => &["newEmail"],
            AuthAction::UnlinkProvider => &["providerId"],
        }
    }

    /// Short-circuits a call whose parameters cannot satisfy the action,
    /// before anything reaches the bus.
    pub(crate) fn validate_params(self, params: &BTreeMap<String, String>) -> AuthResult<()> {
        for name in self.required_params() {
            match params.get(*name) {
                Some(value) if !value.trim().is_empty() => {}
                _ => return Err(missing_parameter(*name)),
            }
        }

        if self == AuthAction::UpdateProfile {
            let has_field = ["displayName", "photoUrl"]
                .iter()
                .any(|name| params.get(*name).is_some_and(|value| !value.trim().is_empty()));
            if !has_field {
                return Err(missing_parameter("displayName or photoUrl"));
            }
        }

        Ok(())
    }
}

const ALL_ACTIONS: &[AuthAction] = &[
    AuthAction::Anonymous,
    AuthAction::SignUpWithEmailAndPassword,
    AuthAction::SignInWithEmailAndPassword,
    AuthAction::Google,
    AuthAction::Apple,
    AuthAction::Facebook,
    AuthAction::SignOut,
    AuthAction::SendPasswordResetEmail,
    AuthAction::ConfirmPasswordReset,
    AuthAction::UpdatePassword,
    AuthAction::SendEmailVerification,
    AuthAction::ApplyActionCode,
    AuthAction::UpdateProfile,
    AuthAction::UpdateEmail,
    AuthAction::ReloadUser,
    AuthAction::DeleteAccount,
    AuthAction::LinkWithGoogle,
    AuthAction::LinkWithApple,
    AuthAction::LinkWithFacebook,
    AuthAction::LinkWithEmailAndPassword,
    AuthAction::UnlinkProvider,
    AuthAction::ReauthenticateWithEmail,
    AuthAction::ReauthenticateWithGoogle,
    AuthAction::ReauthenticateWithApple,
];
