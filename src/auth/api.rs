use std::sync::Arc;

use crate::auth::backend::AuthBackend;
use crate::auth::error::{missing_parameter, AuthResult};
use crate::auth::model::AuthUser;
use crate::auth::state::AuthStateCell;

/// High-level authentication entry point.
///
/// Validates caller input before delegating to the platform backend, so
/// obviously-blank credentials never travel to the native layer.
#[derive(Clone)]
pub struct FirebaseAuth {
    backend: Arc<dyn AuthBackend>,
}

impl FirebaseAuth {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn AuthBackend> {
        &self.backend
    }

    pub fn auth_state(&self) -> Arc<AuthStateCell> {
        self.backend.auth_state()
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.backend.current_user()
    }

    pub async fn sign_in_anonymously(&self) -> AuthResult<Option<AuthUser>> {
        self.backend.sign_in_anonymously().await
    }

    pub async fn sign_up_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> AuthResult<Option<AuthUser>> {
        require_non_blank(email, "email")?;
        require_non_blank(password, "password")?;
        self.backend
            .sign_up_with_email_and_password(email, password)
            .await
    }

    pub async fn sign_in_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> AuthResult<Option<AuthUser>> {
        require_non_blank(email, "email")?;
        require_non_blank(password, "password")?;
        self.backend
            .sign_in_with_email_and_password(email, password)
            .await
    }

    pub async fn sign_in_with_google(&self) -> AuthResult<Option<AuthUser>> {
        self.backend.sign_in_with_google().await
    }

    pub async fn sign_in_with_apple(&self) -> AuthResult<Option<AuthUser>> {
        self.backend.sign_in_with_apple().await
    }

    pub async fn sign_in_with_google_token(&self, id_token: &str) -> AuthResult<Option<AuthUser>> {
        require_non_blank(id_token, "idToken")?;
        self.backend.sign_in_with_google_token(id_token).await
    }

    pub async fn sign_in_with_apple_token(&self, id_token: &str) -> AuthResult<Option<AuthUser>> {
        require_non_blank(id_token, "idToken")?;
        self.backend.sign_in_with_apple_token(id_token).await
    }

    pub async fn sign_in_with_facebook_token(
        &self,
        access_token: &str,
    ) -> AuthResult<Option<AuthUser>> {
        require_non_blank(access_token, "accessToken")?;
        self.backend.sign_in_with_facebook_token(access_token).await
    }

    pub async fn sign_out(&self) -> AuthResult<()> {
        self.backend.sign_out().await
    }

    pub async fn send_password_reset_email(&self, email: &str) -> AuthResult<()> {
        require_non_blank(email, "email")?;
        self.backend.send_password_reset_email(email).await
    }

    pub async fn confirm_password_reset(&self, code: &str, new_password: &str) -> AuthResult<()> {
        require_non_blank(code, "code")?;
        require_non_blank(new_password, "newPassword")?;
        self.backend.confirm_password_reset(code, new_password).await
    }

    pub async fn update_password(&self, new_password: &str) -> AuthResult<Option<AuthUser>> {
        require_non_blank(new_password, "newPassword")?;
        self.backend.update_password(new_password).await
    }

    pub async fn send_email_verification(&self) -> AuthResult<()> {
        self.backend.send_email_verification().await
    }

    pub async fn apply_action_code(&self, code: &str) -> AuthResult<()> {
        require_non_blank(code, "code")?;
        self.backend.apply_action_code(code).await
    }

    pub async fn update_profile(
        &self,
        display_name: Option<&str>,
        photo_url: Option<&str>,
    ) -> AuthResult<Option<AuthUser>> {
        self.backend.update_profile(display_name, photo_url).await
    }

    pub async fn update_email(&self, new_email: &str) -> AuthResult<Option<AuthUser>> {
        require_non_blank(new_email, "newEmail")?;
        self.backend.update_email(new_email).await
    }

    pub async fn reload_user(&self) -> AuthResult<Option<AuthUser>> {
        self.backend.reload_user().await
    }

    pub async fn delete_account(&self) -> AuthResult<()> {
        self.backend.delete_account().await
    }

    pub async fn link_with_email_and_password(
        &self,
        email: &str,
        password: &str,
    ) -> AuthResult<Option<AuthUser>> {
        require_non_blank(email, "email")?;
        require_non_blank(password, "password")?;
        self.backend
            .link_with_email_and_password(email, password)
            .await
    }

    pub async fn link_with_google_token(&self, id_token: &str) -> AuthResult<Option<AuthUser>> {
        require_non_blank(id_token, "idToken")?;
        self.backend.link_with_google_token(id_token).await
    }

    pub async fn link_with_apple_token(&self, id_token: &str) -> AuthResult<Option<AuthUser>> {
        require_non_blank(id_token, "idToken")?;
        self.backend.link_with_apple_token(id_token).await
    }

    pub async fn link_with_facebook_token(
        &self,
        access_token: &str,
    ) -> AuthResult<Option<AuthUser>> {
        require_non_blank(access_token, "accessToken")?;
        self.backend.link_with_facebook_token(access_token).await
    }

    pub async fn unlink_provider(&self, provider_id: &str) -> AuthResult<Option<AuthUser>> {
        require_non_blank(provider_id, "providerId")?;
        self.backend.unlink_provider(provider_id).await
    }

    pub async fn reauthenticate_with_email(
        &self,
        email: &str,
        password: &str,
    ) -> AuthResult<Option<AuthUser>> {
        require_non_blank(email, "email")?;
        require_non_blank(password, "password")?;
        self.backend.reauthenticate_with_email(email, password).await
    }

    pub async fn reauthenticate_with_google_token(
        &self,
        id_token: &str,
    ) -> AuthResult<Option<AuthUser>> {
        require_non_blank(id_token, "idToken")?;
        self.backend.reauthenticate_with_google_token(id_token).await
    }

    pub async fn reauthenticate_with_apple_token(
        &self,
        id_token: &str,
    ) -> AuthResult<Option<AuthUser>> {
        require_non_blank(id_token, "idToken")?;
        self.backend.reauthenticate_with_apple_token(id_token).await
    }
}

fn require_non_blank(value: &str, name: &str) -> AuthResult<()> {
    if value.trim().is_empty() {
        Err(missing_parameter(name))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::bridge::NotificationAuthBridge;
    use crate::auth::error::AuthError;
    use crate::bus::NotificationHub;

    #[tokio::test(flavor = "current_thread")]
    async fn blank_email_is_rejected_before_the_backend() {
        let hub = NotificationHub::new();
        let auth = FirebaseAuth::new(NotificationAuthBridge::new(hub));

        let result = auth.sign_in_with_email_and_password("  ", "secret1").await;
        assert_eq!(result, Err(AuthError::MissingParameter("email".to_string())));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn blank_provider_id_is_rejected() {
        let hub = NotificationHub::new();
        let auth = FirebaseAuth::new(NotificationAuthBridge::new(hub));

        let result = auth.unlink_provider("").await;
        assert_eq!(
            result,
            Err(AuthError::MissingParameter("providerId".to_string()))
        );
    }
}
