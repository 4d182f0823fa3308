#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests: the OIDC authenticator wired to the static plugin.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use authn_oidc::domain::ChannelAuditLog;
use authn_oidc::{AuthnOidc, Collaborators};
use authn_oidc_sdk::{AuditEvent, AuthenticationRequest, AuthnOidcClient, AuthnOidcError, ErrorKind};
use secrecy::ExposeSecret;
use serde_json::{Value, json};
use static_oidc_plugin::StaticOidcPlugin;
use tokio::sync::mpsc::UnboundedReceiver;

fn plugin_config() -> Value {
    json!({
        "accounts": ["my-acct"],
        "allowed_origins": ["127.0.0.1"],
        "enabled_authenticators": ["authn-oidc/my-service"],
        "role_grants": [{
            "account": "my-acct",
            "webservice": "authn-oidc/my-service",
            "members": ["alice"]
        }],
        "variables": {
            "my-acct:variable:conjur/authn-oidc/my-service/provider-uri": "https://idp.example.com",
            "my-acct:variable:conjur/authn-oidc/my-service/id-token-user-property": "preferred_username"
        },
        "tokens": [
            { "token": "alice-token", "claims": { "preferred_username": "alice" } },
            { "token": "anonymous-token", "claims": { "email": "x@example.com" } }
        ],
        "token_ttl_secs": 120
    })
}

fn setup(config: &Value) -> (Arc<dyn AuthnOidcClient>, UnboundedReceiver<AuditEvent>) {
    let provider = StaticOidcPlugin::new().init(Some(config)).unwrap();
    let (audit, rx) = ChannelAuditLog::channel();
    let client = AuthnOidc::new()
        .init(None, Collaborators::from_provider(&provider, Arc::new(audit)))
        .unwrap();
    (client, rx)
}

fn request(body: &str) -> AuthenticationRequest {
    AuthenticationRequest::builder()
        .authenticator_name("authn-oidc")
        .service_id("my-service")
        .account("my-acct")
        .client_ip(IpAddr::V4(Ipv4Addr::LOCALHOST))
        .body(body.to_owned())
        .build()
}

#[tokio::test]
async fn known_id_token_is_exchanged_for_access_token() {
    let (client, mut rx) = setup(&plugin_config());

    let token = client.authenticate(&request("id_token=alice-token")).await.unwrap();

    let doc: Value = serde_json::from_str(token.secret().expose_secret()).unwrap();
    assert_eq!(doc["sub"], "alice");
    assert_eq!(doc["account"], "my-acct");

    let event = rx.recv().await.unwrap();
    assert!(event.success);
    assert_eq!(event.username.as_deref(), Some("alice"));
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn unknown_id_token_fails_verification() {
    let (client, mut rx) = setup(&plugin_config());

    let err = client
        .authenticate(&request("id_token=forged"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Verification);
    let event = rx.recv().await.unwrap();
    assert_eq!(
        event.failure.map(|f| f.kind),
        Some(ErrorKind::Verification)
    );
}

#[tokio::test]
async fn token_without_username_claim_is_rejected() {
    let (client, _rx) = setup(&plugin_config());

    let err = client
        .authenticate(&request("id_token=anonymous-token"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        AuthnOidcError::IdTokenFieldNotFoundOrEmpty { ref field } if field == "preferred_username"
    ));
}

#[tokio::test]
async fn foreign_origin_is_rejected() {
    let (client, _rx) = setup(&plugin_config());
    let request = AuthenticationRequest::builder()
        .authenticator_name("authn-oidc")
        .service_id("my-service")
        .account("my-acct")
        .client_ip(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 7)))
        .body("id_token=alice-token")
        .build();

    let err = client.authenticate(&request).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidOrigin);
}

#[tokio::test]
async fn disabled_authenticator_is_rejected() {
    let mut config = plugin_config();
    config["enabled_authenticators"] = json!([]);
    let (client, _rx) = setup(&config);

    let err = client
        .authenticate(&request("id_token=alice-token"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ServiceNotWhitelisted);
}

#[tokio::test]
async fn unknown_account_is_rejected() {
    let (client, _rx) = setup(&plugin_config());
    let request = AuthenticationRequest::builder()
        .authenticator_name("authn-oidc")
        .service_id("my-service")
        .account("nobody")
        .client_ip(IpAddr::V4(Ipv4Addr::LOCALHOST))
        .body("id_token=alice-token")
        .build();

    let err = client.authenticate(&request).await.unwrap_err();

    assert!(matches!(
        err,
        AuthnOidcError::AccountNotFound { ref account } if account == "nobody"
    ));
}

#[tokio::test]
async fn unsigned_json_mode_reads_claims_from_token() {
    let mut config = plugin_config();
    config["verifier_mode"] = json!("unsigned_json");
    let (client, _rx) = setup(&config);

    let token = client
        .authenticate(&request(
            "id_token=%7B%22preferred_username%22%3A%22alice%22%7D",
        ))
        .await
        .unwrap();

    let doc: Value = serde_json::from_str(token.secret().expose_secret()).unwrap();
    assert_eq!(doc["sub"], "alice");
}

#[tokio::test]
async fn unsigned_json_mode_never_echoes_a_malformed_token() {
    let mut config = plugin_config();
    config["verifier_mode"] = json!("unsigned_json");
    let (client, mut rx) = setup(&config);

    let err = client
        .authenticate(&request("id_token=%22carol-secret-jwt%22"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Verification);
    assert!(!err.to_string().contains("carol-secret-jwt"));

    let event = rx.recv().await.unwrap();
    let rendered = serde_json::to_string(&event).unwrap();
    assert!(!rendered.contains("carol-secret-jwt"));
    assert_eq!(
        event.failure.map(|f| f.message).as_deref(),
        Some("id token verification failed")
    );
}
