use std::sync::{Arc, Mutex};

use serde_json::{json, Value};

use firebase_auth_bridge::auth::constants::AUTH_STATE_CHANNEL;
use firebase_auth_bridge::auth::{AuthHub, NotificationAuthBridge};
use firebase_auth_bridge::bus::NotificationHub;

fn signed_in_payload(uid: &str) -> Value {
    json!({
        "uid": uid,
        "email": format!("{uid}@example.com"),
        "isAnonymous": false,
        "isEmailVerified": true,
        "providerData": ["google.com", "password"]
    })
}

#[tokio::test(flavor = "current_thread")]
async fn broadcast_updates_the_current_user() {
    let hub: Arc<AuthHub> = NotificationHub::new();
    let bridge = NotificationAuthBridge::new(hub.clone());

    assert_eq!(bridge.current_user(), None);

    hub.post(AUTH_STATE_CHANNEL, signed_in_payload("u1"));

    let current = bridge.current_user().expect("user is signed in");
    assert_eq!(current.uid, "u1");
    assert_eq!(current.email.as_deref(), Some("u1@example.com"));
    assert!(current.is_email_verified);
    assert!(current.has_provider("google.com"));
}

#[tokio::test(flavor = "current_thread")]
async fn late_observer_sees_the_latest_value_immediately() {
    let hub: Arc<AuthHub> = NotificationHub::new();
    let bridge = NotificationAuthBridge::new(hub.clone());

    hub.post(AUTH_STATE_CHANNEL, signed_in_payload("u1"));
    hub.post(AUTH_STATE_CHANNEL, signed_in_payload("u2"));

    let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _unsubscribe = bridge.auth_state().observe(move |value| {
        sink.lock().unwrap().push(value.map(|user| user.uid.clone()));
    });

    assert_eq!(seen.lock().unwrap().as_slice(), [Some("u2".to_string())]);
}

#[tokio::test(flavor = "current_thread")]
async fn sign_in_then_sign_out_is_observed_in_order() {
    let hub: Arc<AuthHub> = NotificationHub::new();
    let bridge = NotificationAuthBridge::new(hub.clone());

    let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _unsubscribe = bridge.auth_state().observe(move |value| {
        sink.lock().unwrap().push(value.map(|user| user.uid.clone()));
    });

    hub.post(AUTH_STATE_CHANNEL, signed_in_payload("u1"));
    hub.post(AUTH_STATE_CHANNEL, json!({}));

    assert_eq!(
        seen.lock().unwrap().as_slice(),
        [None, Some("u1".to_string()), None]
    );
    assert_eq!(bridge.current_user(), None);
}

#[tokio::test(flavor = "current_thread")]
async fn malformed_snapshot_reads_as_signed_out() {
    let hub: Arc<AuthHub> = NotificationHub::new();
    let bridge = NotificationAuthBridge::new(hub.clone());

    hub.post(AUTH_STATE_CHANNEL, signed_in_payload("u1"));
    hub.post(AUTH_STATE_CHANNEL, json!(["not", "an", "object"]));

    assert_eq!(bridge.current_user(), None);
}

#[tokio::test(flavor = "current_thread")]
async fn update_stream_replays_then_follows_broadcasts() {
    let hub: Arc<AuthHub> = NotificationHub::new();
    let bridge = NotificationAuthBridge::new(hub.clone());

    hub.post(AUTH_STATE_CHANNEL, signed_in_payload("u1"));

    let updates = bridge.auth_state().updates();
    hub.post(AUTH_STATE_CHANNEL, json!({}));

    assert_eq!(
        updates.recv().await.unwrap().map(|user| user.uid),
        Some("u1".to_string())
    );
    assert_eq!(updates.recv().await.unwrap(), None);
}
