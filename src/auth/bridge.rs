use std::collections::BTreeMap;
use std::sync::{Arc, LazyLock, Mutex};
use std::time::Duration;

use futures::channel::oneshot;
use serde_json::{Map, Value};

use crate::auth::action::AuthAction;
use crate::auth::constants::{
    APPLE_SIGN_IN_COMPLETED_CHANNEL, APPLE_SIGN_IN_REQUEST_CHANNEL, AUTH_REQUEST_CHANNEL,
    AUTH_RESPONSE_CHANNEL, AUTH_STATE_CHANNEL, GOOGLE_SIGN_IN_COMPLETED_CHANNEL,
    GOOGLE_SIGN_IN_REQUEST_CHANNEL,
};
use crate::auth::error::{network, AuthError, AuthResult};
use crate::auth::model::{decode_response, decode_user_snapshot, encode_request, AuthUser};
use crate::auth::state::AuthStateCell;
use crate::bus::{NotificationHub, ObserverGuard};
use crate::logger::Logger;
use crate::util::next_request_id;

static LOGGER: LazyLock<Logger> = LazyLock::new(|| Logger::new("@firebase/auth-bridge"));

/// The notification hub carrying auth traffic. Payloads are untyped JSON
/// objects; the native executor on the other side shares no type system with
/// this crate.
pub type AuthHub = NotificationHub<Value>;

/// Bridges the shared authentication API to a native executor over the
/// notification hub.
///
/// Each [`perform`](NotificationAuthBridge::perform) call registers a
/// one-shot observer keyed to a fresh correlation identifier, posts the
/// request, and suspends until the matching response arrives or the call is
/// dropped. Concurrent calls multiplex freely over the same two channels and
/// may resolve in any order.
pub struct NotificationAuthBridge {
    hub: Arc<AuthHub>,
    auth_state: Arc<AuthStateCell>,
    response_timeout: Option<Duration>,
    _state_subscription: ObserverGuard<Value>,
}

impl NotificationAuthBridge {
    pub fn builder(hub: Arc<AuthHub>) -> BridgeBuilder {
        BridgeBuilder::new(hub)
    }

    pub fn new(hub: Arc<AuthHub>) -> Arc<Self> {
        Self::builder(hub).build()
    }

    fn with_options(hub: Arc<AuthHub>, response_timeout: Option<Duration>) -> Arc<Self> {
        let auth_state = AuthStateCell::new();

        // Lifetime subscription: every native auth-state broadcast lands in
        // the cell, malformed snapshots as "no user".
        let cell = auth_state.clone();
        let handle = hub.add_observer(AUTH_STATE_CHANNEL, move |payload: &Value| {
            cell.set(decode_user_snapshot(payload));
        });
        let state_subscription = ObserverGuard::new(hub.clone(), handle);

        Arc::new(Self {
            hub,
            auth_state,
            response_timeout,
            _state_subscription: state_subscription,
        })
    }

    /// The observable current-user cell maintained by this bridge.
    pub fn auth_state(&self) -> Arc<AuthStateCell> {
        self.auth_state.clone()
    }

    pub fn current_user(&self) -> Option<AuthUser> {
        self.auth_state.get()
    }

    pub fn hub(&self) -> Arc<AuthHub> {
        self.hub.clone()
    }

    /// Executes one operation against the native executor.
    ///
    /// Returns the resulting user snapshot, `Ok(None)` when the executor
    /// acknowledges with the signed-out sentinel, or the mapped failure.
    /// Dropping the returned future before it resolves deregisters the
    /// response observer; a response arriving afterwards is silently
    /// discarded.
    pub async fn perform(
        &self,
        action: AuthAction,
        params: BTreeMap<String, String>,
    ) -> AuthResult<Option<AuthUser>> {
        action.validate_params(&params)?;

        let request_id = next_request_id();

        // The observer must exist before the request is posted: an executor
        // answering synchronously from within the post would otherwise race
        // the registration and the response would be lost.
        let (receiver, _observer) = self.expect_response(&request_id);

        LOGGER.debug(format!(
            "posting {} request {request_id}",
            action.wire_name()
        ));
        self.hub
            .post(AUTH_REQUEST_CHANNEL, encode_request(&request_id, action, &params));

        let payload = self.await_response(receiver).await?;
        decode_response(&payload)
    }

    /// Runs the native Google sign-in UI flow, then signs in with the token
    /// it produced.
    pub async fn sign_in_with_google(&self) -> AuthResult<Option<AuthUser>> {
        let id_token = self
            .obtain_external_token(
                GOOGLE_SIGN_IN_REQUEST_CHANNEL,
                GOOGLE_SIGN_IN_COMPLETED_CHANNEL,
            )
            .await?;
        self.perform(
            AuthAction::Google,
            BTreeMap::from([("idToken".to_string(), id_token)]),
        )
        .await
    }

    /// Runs the native Apple sign-in UI flow, then signs in with the token
    /// it produced.
    pub async fn sign_in_with_apple(&self) -> AuthResult<Option<AuthUser>> {
        let id_token = self
            .obtain_external_token(
                APPLE_SIGN_IN_REQUEST_CHANNEL,
                APPLE_SIGN_IN_COMPLETED_CHANNEL,
            )
            .await?;
        self.perform(
            AuthAction::Apple,
            BTreeMap::from([("idToken".to_string(), id_token)]),
        )
        .await
    }

    /// Triggers an external UI flow and awaits its single completion event.
    ///
    /// No correlation identifier is needed: only one flow of a given type is
    /// outstanding at a time, so the first completion on the channel is the
    /// answer. Registration-before-post and drop-guard cleanup work exactly
    /// as for correlated requests. A completion without an `idToken` means
    /// the flow failed or was cancelled by the user.
    async fn obtain_external_token(
        &self,
        request_channel: &str,
        completed_channel: &str,
    ) -> AuthResult<String> {
        let (sender, receiver) = oneshot::channel::<Value>();
        let sender = Arc::new(Mutex::new(Some(sender)));

        let handle = self.hub.add_observer(completed_channel, move |payload: &Value| {
            if let Some(sender) = sender.lock().unwrap().take() {
                let _ = sender.send(payload.clone());
            }
        });
        let _observer = ObserverGuard::new(self.hub.clone(), handle);

        self.hub
            .post(request_channel, Value::Object(Map::new()));

        let payload = self.await_response(receiver).await?;
        payload
            .get("idToken")
            .and_then(Value::as_str)
            .filter(|token| !token.is_empty())
            .map(str::to_owned)
            .ok_or(AuthError::InvalidCredential)
    }

    /// Registers the one-shot response observer for `request_id`.
    ///
    /// The sender is taken before resuming, so a duplicate or re-delivered
    /// response is inert; the guard removes the observer when the call
    /// completes or is dropped, whichever comes first.
    fn expect_response(
        &self,
        request_id: &str,
    ) -> (oneshot::Receiver<Value>, ObserverGuard<Value>) {
        let (sender, receiver) = oneshot::channel::<Value>();
        let sender = Arc::new(Mutex::new(Some(sender)));
        let expected = request_id.to_owned();

        let handle = self.hub.add_observer(AUTH_RESPONSE_CHANNEL, move |payload: &Value| {
            let matches = payload
                .get("requestId")
                .and_then(Value::as_str)
                .is_some_and(|id| id == expected);
            if !matches {
                return;
            }
            if let Some(sender) = sender.lock().unwrap().take() {
                // The receiver may already be gone (caller cancelled);
                // resuming it then is a no-op.
                let _ = sender.send(payload.clone());
            }
        });

        (receiver, ObserverGuard::new(self.hub.clone(), handle))
    }

    async fn await_response(&self, receiver: oneshot::Receiver<Value>) -> AuthResult<Value> {
        match self.response_timeout {
            Some(limit) => match tokio::time::timeout(limit, receiver).await {
                Ok(Ok(payload)) => Ok(payload),
                Ok(Err(oneshot::Canceled)) => {
                    Err(network("response channel closed before a result arrived"))
                }
                Err(_) => {
                    LOGGER.warn(format!("request timed out after {limit:?}"));
                    Err(network(format!("no response within {limit:?}")))
                }
            },
            None => receiver
                .await
                .map_err(|_| network("response channel closed before a result arrived")),
        }
    }
}

pub struct BridgeBuilder {
    hub: Arc<AuthHub>,
    response_timeout: Option<Duration>,
}

impl BridgeBuilder {
    fn new(hub: Arc<AuthHub>) -> Self {
        Self {
            hub,
            response_timeout: None,
        }
    }

    /// Bounds how long a call may await its response. Without it, a call
    /// whose executor never answers stays suspended until dropped, matching
    /// the behavior of the native notification protocol.
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Arc<NotificationAuthBridge> {
        NotificationAuthBridge::with_options(self.hub, self.response_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::error::AuthError;

    #[tokio::test(flavor = "current_thread")]
    async fn invalid_params_never_reach_the_bus() {
        let hub: Arc<AuthHub> = NotificationHub::new();
        let bridge = NotificationAuthBridge::new(hub.clone());

        let posted = Arc::new(Mutex::new(0usize));
        let count = posted.clone();
        let _handle = hub.add_observer(AUTH_REQUEST_CHANNEL, move |_: &Value| {
            *count.lock().unwrap() += 1;
        });

        let result = bridge
            .perform(AuthAction::SignInWithEmailAndPassword, BTreeMap::new())
            .await;

        assert_eq!(
            result,
            Err(AuthError::MissingParameter("email".to_string()))
        );
        assert_eq!(*posted.lock().unwrap(), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn timeout_converts_to_network_failure_and_cleans_up() {
        let hub: Arc<AuthHub> = NotificationHub::new();
        let bridge = NotificationAuthBridge::builder(hub.clone())
            .with_response_timeout(Duration::from_millis(20))
            .build();

        let result = bridge.perform(AuthAction::Anonymous, BTreeMap::new()).await;

        assert!(matches!(result, Err(AuthError::Network(_))));
        assert_eq!(hub.observer_count(AUTH_RESPONSE_CHANNEL), 0);
    }
}
