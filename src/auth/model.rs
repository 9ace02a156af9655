use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::auth::action::AuthAction;
use crate::auth::error::{map_error_code, unknown, AuthResult};

/// Immutable snapshot of the authenticated principal.
///
/// Absence of a user is always represented as `None` at the API surface,
/// never as an `AuthUser` with an empty `uid`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub uid: String,
    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "photoUrl", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(rename = "isAnonymous", default)]
    pub is_anonymous: bool,
    #[serde(rename = "isEmailVerified", default)]
    pub is_email_verified: bool,
    #[serde(rename = "providerData", default)]
    pub provider_data: Vec<String>,
}

impl AuthUser {
    pub fn has_provider(&self, provider_id: &str) -> bool {
        self.provider_data.iter().any(|id| id == provider_id)
    }
}

/// Flattened user fields as they appear on the response and auth-state
/// channels. Every field is optional on the wire; an absent or empty `uid`
/// is the signed-out sentinel.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct UserSnapshot {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
    #[serde(rename = "photoUrl", default)]
    pub photo_url: Option<String>,
    #[serde(rename = "isAnonymous", default)]
    pub is_anonymous: Option<bool>,
    #[serde(rename = "isEmailVerified", default)]
    pub is_email_verified: Option<bool>,
    #[serde(rename = "providerData", default)]
    pub provider_data: Option<Vec<String>>,
}

impl UserSnapshot {
    pub(crate) fn into_user(self) -> Option<AuthUser> {
        let uid = self.uid.filter(|uid| !uid.is_empty())?;
        Some(AuthUser {
            uid,
            display_name: self.display_name.filter(|name| !name.is_empty()),
            email: self.email.filter(|email| !email.is_empty()),
            photo_url: self.photo_url.filter(|url| !url.is_empty()),
            is_anonymous: self.is_anonymous.unwrap_or(false),
            is_email_verified: self.is_email_verified.unwrap_or(false),
            provider_data: self.provider_data.unwrap_or_default(),
        })
    }
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct ResponsePayload {
    #[serde(rename = "requestId")]
    #[allow(dead_code)]
    pub request_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(flatten)]
    pub user: UserSnapshot,
    #[serde(rename = "errorCode", default)]
    pub error_code: Option<String>,
    #[serde(rename = "errorMessage", default)]
    pub error_message: Option<String>,
}

impl ResponsePayload {
    /// Turns the raw payload into the caller-facing result. Any status other
    /// than `success` is a failure.
    pub(crate) fn into_result(self) -> AuthResult<Option<AuthUser>> {
        match self.status.as_deref() {
            Some("success") => Ok(self.user.into_user()),
            _ => {
                let code = self.error_code.unwrap_or_default();
                Err(map_error_code(&code, self.error_message.as_deref()))
            }
        }
    }
}

/// Decodes a matched response payload, surfacing decode failures as
/// [`crate::auth::AuthError::Unknown`] with the raw serde message.
pub(crate) fn decode_response(payload: &Value) -> AuthResult<Option<AuthUser>> {
    let response: ResponsePayload = serde_json::from_value(payload.clone())
        .map_err(|err| unknown(format!("malformed auth response: {err}")))?;
    response.into_result()
}

/// Decodes an auth-state broadcast. Malformed snapshots decode to "no user";
/// there is no caller to report an error to.
pub(crate) fn decode_user_snapshot(payload: &Value) -> Option<AuthUser> {
    serde_json::from_value::<UserSnapshot>(payload.clone())
        .ok()
        .and_then(UserSnapshot::into_user)
}

/// Builds the flat request payload: `requestId`, `action`, and the
/// action-specific string parameters in one object.
pub(crate) fn encode_request(
    request_id: &str,
    action: AuthAction,
    params: &BTreeMap<String, String>,
) -> Value {
    let mut object = Map::new();
    object.insert(
        "requestId".to_owned(),
        Value::String(request_id.to_owned()),
    );
    object.insert(
        "action".to_owned(),
        Value::String(action.wire_name().to_owned()),
    );
    for (key, value) in params {
        object.insert(key.clone(), Value::String(value.clone()));
    }
    Value::Object(object)
}

/// Builds a success response payload for `request_id`. `None` encodes the
/// signed-out sentinel (empty `uid`), used to acknowledge operations that
/// leave no current user. This is the executor-side counterpart of
/// [`decode_response`].
pub fn encode_success_response(request_id: &str, user: Option<&AuthUser>) -> Value {
    let mut object = Map::new();
    object.insert(
        "requestId".to_owned(),
        Value::String(request_id.to_owned()),
    );
    object.insert("status".to_owned(), Value::String("success".to_owned()));
    match user {
        Some(user) => {
            if let Value::Object(fields) = serde_json::to_value(user).unwrap_or_default() {
                object.extend(fields);
            }
        }
        None => {
            object.insert("uid".to_owned(), Value::String(String::new()));
        }
    }
    Value::Object(object)
}

/// Builds a failure response payload for `request_id`.
pub fn encode_failure_response(request_id: &str, error_code: &str, error_message: &str) -> Value {
    let mut object = Map::new();
    object.insert(
        "requestId".to_owned(),
        Value::String(request_id.to_owned()),
    );
    object.insert("status".to_owned(), Value::String("failure".to_owned()));
    object.insert(
        "errorCode".to_owned(),
        Value::String(error_code.to_owned()),
    );
    object.insert(
        "errorMessage".to_owned(),
        Value::String(error_message.to_owned()),
    );
    Value::Object(object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::constants::{EMAIL_PROVIDER_ID, GOOGLE_PROVIDER_ID};
    use crate::auth::error::AuthError;
    use serde_json::json;

    fn sample_user() -> AuthUser {
        AuthUser {
            uid: "uid-1".to_string(),
            display_name: Some("Ada".to_string()),
            email: Some("ada@example.com".to_string()),
            photo_url: None,
            is_anonymous: false,
            is_email_verified: true,
            provider_data: vec![GOOGLE_PROVIDER_ID.to_string(), EMAIL_PROVIDER_ID.to_string()],
        }
    }

    #[test]
    fn user_round_trips_through_response_payload() {
        let user = sample_user();
        let payload = encode_success_response("req-1", Some(&user));
        let decoded = decode_response(&payload).unwrap();
        assert_eq!(decoded, Some(user));
    }

    #[test]
    fn empty_uid_decodes_to_no_user() {
        let payload = encode_success_response("req-2", None);
        assert_eq!(decode_response(&payload).unwrap(), None);
    }

    #[test]
    fn failure_payload_maps_error_code() {
        let payload = encode_failure_response("req-3", "ERROR_WRONG_PASSWORD", "nope");
        assert_eq!(decode_response(&payload), Err(AuthError::WrongPassword));
    }

    #[test]
    fn unexpected_status_is_treated_as_failure() {
        let payload = json!({
            "requestId": "req-4",
            "status": "maybe",
            "errorCode": "ERROR_USER_DISABLED"
        });
        assert_eq!(decode_response(&payload), Err(AuthError::UserDisabled));
    }

    #[test]
    fn non_object_payload_surfaces_decode_failure() {
        let result = decode_response(&json!("not an object"));
        assert!(matches!(
            result,
            Err(AuthError::Unknown(message)) if message.contains("malformed auth response")
        ));
    }

    #[test]
    fn state_snapshot_without_uid_is_no_user() {
        assert_eq!(decode_user_snapshot(&json!({"email": "a@b.com"})), None);
        assert_eq!(decode_user_snapshot(&json!({"uid": ""})), None);
        assert_eq!(decode_user_snapshot(&json!(42)), None);
    }

    #[test]
    fn request_payload_is_flat() {
        let params = BTreeMap::from([
            ("email".to_string(), "a@b.com".to_string()),
            ("password".to_string(), "secret1".to_string()),
        ]);
        let payload = encode_request("req-5", AuthAction::SignInWithEmailAndPassword, &params);
        assert_eq!(
            payload,
            json!({
                "requestId": "req-5",
                "action": "signInWithEmailAndPassword",
                "email": "a@b.com",
                "password": "secret1"
            })
        );
    }
}
