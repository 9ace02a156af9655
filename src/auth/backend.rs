use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::auth::action::AuthAction;
use crate::auth::bridge::NotificationAuthBridge;
use crate::auth::error::AuthResult;
use crate::auth::model::AuthUser;
use crate::auth::state::AuthStateCell;

/// The authentication surface every platform backend provides.
///
/// Operations that produce or refresh a user resolve to the resulting
/// snapshot (`None` when the executor reports no current user); operations
/// that only acknowledge resolve to `()`.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn sign_in_anonymously(&self) -> AuthResult<Option<AuthUser>>;
    async fn sign_up_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> AuthResult<Option<AuthUser>>;
    async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> AuthResult<Option<AuthUser>>;
    async fn sign_in_with_google_token(&self, id_token: &str) -> AuthResult<Option<AuthUser>>;
    async fn sign_in_with_apple_token(&self, id_token: &str) -> AuthResult<Option<AuthUser>>;
    async fn sign_in_with_facebook_token(
        &self,
        access_token: &str,
    ) -> AuthResult<Option<AuthUser>>;

    /// Runs the platform's Google sign-in UI flow end to end.
    async fn sign_in_with_google(&self) -> AuthResult<Option<AuthUser>>;
    /// Runs the platform's Apple sign-in UI flow end to end.
    async fn sign_in_with_apple(&self) -> AuthResult<Option<AuthUser>>;

    async fn sign_out(&self) -> AuthResult<()>;
    async fn send_password_reset_email(&self, email: &str) -> AuthResult<()>;
    async fn confirm_password_reset(&self, code: &str, new_password: &str) -> AuthResult<()>;
    async fn update_password(&self, new_password: &str) -> AuthResult<Option<AuthUser>>;
    async fn send_email_verification(&self) -> AuthResult<()>;
    async fn apply_action_code(&self, code: &str) -> AuthResult<()>;
    async fn update_profile(
        &self,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> AuthResult<Option<AuthUser>>;
    async fn update_email(&self, new_email: &str) -> AuthResult<Option<AuthUser>>;
    async fn reload_user(&self) -> AuthResult<Option<AuthUser>>;
    async fn delete_account(&self) -> AuthResult<()>;

    async fn link_with_google_token(&self, id_token: &str) -> AuthResult<Option<AuthUser>>;
    async fn link_with_apple_token(&self, id_token: &str) -> AuthResult<Option<AuthUser>>;
    async fn link_with_facebook_token(&self, access_token: &str) -> AuthResult<Option<AuthUser>>;
    async fn link_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> AuthResult<Option<AuthUser>>;
    async fn unlink_provider(&self, provider_id: &str) -> AuthResult<Option<AuthUser>>;

    async fn reauthenticate_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> AuthResult<Option<AuthUser>>;
    async fn reauthenticate_with_google_token(
        &self,
        id_token: &str,
    ) -> AuthResult<Option<AuthUser>>;
    async fn reauthenticate_with_apple_token(
        &self,
        id_token: &str,
    ) -> AuthResult<Option<AuthUser>>;

    fn auth_state(&self) -> Arc<AuthStateCell>;
    fn current_user(&self) -> Option<AuthUser>;
}

fn params<const N: usize>(pairs: [(&str, &str); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_owned(), value.to_owned()))
        .collect()
}

#[async_trait]
impl AuthBackend for NotificationAuthBridge {
    async fn sign_in_anonymously(&self) -> AuthResult<Option<AuthUser>> {
        self.perform(AuthAction::Anonymous, BTreeMap::new()).await
    }

    async fn sign_up_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> AuthResult<Option<AuthUser>> {
        self.perform(
            AuthAction::SignUpWithEmailAndPassword,
            params([("email", email), ("password", password)]),
        )
        .await
    }

    async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> AuthResult<Option<AuthUser>> {
        self.perform(
            AuthAction::SignInWithEmailAndPassword,
            params([("email", email), ("password", password)]),
        )
        .await
    }

    async fn sign_in_with_google_token(&self, id_token: &str) -> AuthResult<Option<AuthUser>> {
        self.perform(AuthAction::Google, params([("idToken", id_token)]))
            .await
    }

    async fn sign_in_with_apple_token(&self, id_token: &str) -> AuthResult<Option<AuthUser>> {
        self.perform(AuthAction::Apple, params([("idToken", id_token)]))
            .await
    }

    async fn sign_in_with_facebook_token(
        &self,
        access_token: &str,
    ) -> AuthResult<Option<AuthUser>> {
        self.perform(AuthAction::Facebook, params([("accessToken", access_token)]))
            .await
    }

    async fn sign_in_with_google(&self) -> AuthResult<Option<AuthUser>> {
        NotificationAuthBridge::sign_in_with_google(self).await
    }

    async fn sign_in_with_apple(&self) -> AuthResult<Option<AuthUser>> {
        NotificationAuthBridge::sign_in_with_apple(self).await
    }

    async fn sign_out(&self) -> AuthResult<()> {
        self.perform(AuthAction::SignOut, BTreeMap::new())
            .await
            .map(|_| ())
    }

    async fn send_password_reset_email(&self, email: &str) -> AuthResult<()> {
        self.perform(AuthAction::SendPasswordResetEmail, params([("email", email)]))
            .await
            .map(|_| ())
    }

    async fn confirm_password_reset(&self, code: &str, new_password: &str) -> AuthResult<()> {
        self.perform(
            AuthAction::ConfirmPasswordReset,
            params([("code", code), ("newPassword", new_password)]),
        )
        .await
        .map(|_| ())
    }

    async fn update_password(&self, new_password: &str) -> AuthResult<Option<AuthUser>> {
        self.perform(
            AuthAction::UpdatePassword,
            params([("newPassword", new_password)]),
        )
        .await
    }

    async fn send_email_verification(&self) -> AuthResult<()> {
        self.perform(AuthAction::SendEmailVerification, BTreeMap::new())
            .await
            .map(|_| ())
    }

    async fn apply_action_code(&self, code: &str) -> AuthResult<()> {
        self.perform(AuthAction::ApplyActionCode, params([("code", code)]))
            .await
            .map(|_| ())
    }

    async fn update_profile(
        &self,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> AuthResult<Option<AuthUser>> {
        let mut fields = BTreeMap::new();
        if let Some(value) = display_name {
            fields.insert("displayName".to_owned(), value.to_owned());
        }
        if let Some(value) = photo_url {
            fields.insert("photoUrl".to_owned(), value.to_owned());
        }
        self.perform(AuthAction::UpdateProfile, fields).await
    }

    async fn update_email(&self, new_email: &str) -> AuthResult<Option<AuthUser>> {
        self.perform(AuthAction::UpdateEmail, params([("newEmail", new_email)]))
            .await
    }

    async fn reload_user(&self) -> AuthResult<Option<AuthUser>> {
        self.perform(AuthAction::ReloadUser, BTreeMap::new()).await
    }

    async fn delete_account(&self) -> AuthResult<()> {
        self.perform(AuthAction::DeleteAccount, BTreeMap::new())
            .await
            .map(|_| ())
    }

    async fn link_with_google_token(&self, id_token: &str) -> AuthResult<Option<AuthUser>> {
        self.perform(AuthAction::LinkWithGoogle, params([("idToken", id_token)]))
            .await
    }

    async fn link_with_apple_token(&self, id_token: &str) -> AuthResult<Option<AuthUser>> {
        self.perform(AuthAction::LinkWithApple, params([("idToken", id_token)]))
            .await
    }

    async fn link_with_facebook_token(&self, access_token: &str) -> AuthResult<Option<AuthUser>> {
        self.perform(
            AuthAction::LinkWithFacebook,
            params([("accessToken", access_token)]),
        )
        .await
    }

    async fn link_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> AuthResult<Option<AuthUser>> {
        self.perform(
            AuthAction::LinkWithEmailAndPassword,
            params([("email", email), ("password", password)]),
        )
        .await
    }

    async fn unlink_provider(&self, provider_id: &str) -> AuthResult<Option<AuthUser>> {
        self.perform(
            AuthAction::UnlinkProvider,
            params([("providerId", provider_id)]),
        )
        .await
    }

    async fn reauthenticate_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> AuthResult<Option<AuthUser>> {
        self.perform(
            AuthAction::ReauthenticateWithEmail,
            params([("email", email), ("password", password)]),
        )
        .await
    }

    async fn reauthenticate_with_google_token(
        &self,
        id_token: &str,
    ) -> AuthResult<Option<AuthUser>> {
        self.perform(
            AuthAction::ReauthenticateWithGoogle,
            params([("idToken", id_token)]),
        )
        .await
    }

    async fn reauthenticate_with_apple_token(
        &self,
        id_token: &str,
    ) -> AuthResult<Option<AuthUser>> {
        self.perform(
            AuthAction::ReauthenticateWithApple,
            params([("idToken", id_token)]),
        )
        .await
    }

    fn auth_state(&self) -> Arc<AuthStateCell> {
        NotificationAuthBridge::auth_state(self)
    }

    fn current_user(&self) -> Option<AuthUser> {
        NotificationAuthBridge::current_user(self)
    }
}
