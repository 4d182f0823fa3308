//! Domain models for the `AuthN` OIDC module.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

use bytes::Bytes;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// Inbound authentication attempt.
///
/// Built once per call by the request-handling layer and read-only afterwards.
/// `Debug` redacts credentials and reports the body by length only.
#[derive(Clone)]
pub struct AuthenticationRequest {
    authenticator_name: String,
    service_id: String,
    account: String,
    username: Option<String>,
    credentials: SecretString,
    client_ip: IpAddr,
    body: Bytes,
}

impl AuthenticationRequest {
    #[must_use]
    pub fn builder() -> AuthenticationRequestBuilder {
        AuthenticationRequestBuilder::default()
    }

    /// Authenticator type name, e.g. `authn-oidc`.
    #[must_use]
    pub fn authenticator_name(&self) -> &str {
        &self.authenticator_name
    }

    #[must_use]
    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    #[must_use]
    pub fn account(&self) -> &str {
        &self.account
    }

    /// Username known before authentication, if the route carried one.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    #[must_use]
    pub fn credentials(&self) -> &SecretString {
        &self.credentials
    }

    #[must_use]
    pub fn client_ip(&self) -> IpAddr {
        self.client_ip
    }

    /// Raw request body (URL-encoded form data).
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The webservice this request targets.
    #[must_use]
    pub fn webservice(&self) -> Webservice {
        Webservice {
            account: self.account.clone(),
            authenticator_name: self.authenticator_name.clone(),
            service_id: self.service_id.clone(),
        }
    }
}

impl fmt::Debug for AuthenticationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationRequest")
            .field("authenticator_name", &self.authenticator_name)
            .field("service_id", &self.service_id)
            .field("account", &self.account)
            .field("username", &self.username)
            .field("credentials", &self.credentials)
            .field("client_ip", &self.client_ip)
            .field("body_len", &self.body.len())
            .finish_non_exhaustive()
    }
}

#[derive(Default)]
pub struct AuthenticationRequestBuilder {
    authenticator_name: String,
    service_id: String,
    account: String,
    username: Option<String>,
    credentials: Option<SecretString>,
    client_ip: Option<IpAddr>,
    body: Bytes,
}

impl AuthenticationRequestBuilder {
    #[must_use]
    pub fn authenticator_name(mut self, name: impl Into<String>) -> Self {
        self.authenticator_name = name.into();
        self
    }

    #[must_use]
    pub fn service_id(mut self, service_id: impl Into<String>) -> Self {
        self.service_id = service_id.into();
        self
    }

    #[must_use]
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = account.into();
        self
    }

    #[must_use]
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    #[must_use]
    pub fn credentials(mut self, credentials: impl Into<SecretString>) -> Self {
        self.credentials = Some(credentials.into());
        self
    }

    #[must_use]
    pub fn client_ip(mut self, client_ip: IpAddr) -> Self {
        self.client_ip = Some(client_ip);
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Build the request. A missing client address becomes `0.0.0.0`.
    #[must_use]
    pub fn build(self) -> AuthenticationRequest {
        AuthenticationRequest {
            authenticator_name: self.authenticator_name,
            service_id: self.service_id,
            account: self.account,
            username: self.username,
            credentials: self
                .credentials
                .unwrap_or_else(|| SecretString::from(String::new())),
            client_ip: self
                .client_ip
                .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            body: self.body,
        }
    }
}

/// Authenticator instance scoped to an account and service identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Webservice {
    pub account: String,
    pub authenticator_name: String,
    pub service_id: String,
}

impl Webservice {
    /// `<authenticator_name>/<service_id>`, e.g. `authn-oidc/my-service`.
    #[must_use]
    pub fn authenticator_path(&self) -> String {
        format!("{}/{}", self.authenticator_name, self.service_id)
    }

    /// Fully qualified webservice resource id, e.g.
    /// `my-acct:webservice:conjur/authn-oidc/my-service`.
    #[must_use]
    pub fn resource_id(&self, namespace: &str) -> String {
        format!(
            "{}:webservice:{namespace}/{}",
            self.account,
            self.authenticator_path()
        )
    }

    /// Fully qualified id of a variable scoped to this webservice, e.g.
    /// `my-acct:variable:conjur/authn-oidc/my-service/id-token-user-property`.
    #[must_use]
    pub fn variable_id(&self, namespace: &str, name: &str) -> String {
        format!(
            "{}:variable:{namespace}/{}/{name}",
            self.account,
            self.authenticator_path()
        )
    }
}

impl fmt::Display for Webservice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.authenticator_name, self.service_id)
    }
}

/// Claims of a decoded id token.
///
/// Untrusted input: lookups of unknown names yield `None`. `Debug` lists the
/// claim names only.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecodedClaims(serde_json::Map<String, serde_json::Value>);

impl DecodedClaims {
    #[must_use]
    pub fn new(claims: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(claims)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&serde_json::Value> {
        self.0.get(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for DecodedClaims {
    fn from(claims: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(claims)
    }
}

impl<K: Into<String>> FromIterator<(K, serde_json::Value)> for DecodedClaims {
    fn from_iter<T: IntoIterator<Item = (K, serde_json::Value)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl fmt::Debug for DecodedClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

/// Identity resolved from the id token, ready for token issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub account: String,
    pub service_id: String,
    pub username: String,
    pub client_ip: IpAddr,
}

/// Short-lived access token issued on success.
///
/// Opaque to the authenticator; forwarded to the caller unchanged.
#[derive(Debug, Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    pub fn new(token: impl Into<SecretString>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn secret(&self) -> &SecretString {
        &self.0
    }
}

/// Failure detail carried by an audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFailure {
    pub kind: ErrorKind,
    pub message: String,
}

/// Outcome of one authentication attempt.
///
/// Exactly one event is recorded per [`AuthenticationRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub authenticator_name: String,
    pub service_id: String,
    pub account: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub client_ip: IpAddr,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<AuditFailure>,
}

impl AuditEvent {
    #[must_use]
    pub fn succeeded(request: &AuthenticationRequest, username: Option<String>) -> Self {
        Self::from_request(request, username, None)
    }

    #[must_use]
    pub fn failed(
        request: &AuthenticationRequest,
        username: Option<String>,
        kind: ErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self::from_request(
            request,
            username,
            Some(AuditFailure {
                kind,
                message: message.into(),
            }),
        )
    }

    fn from_request(
        request: &AuthenticationRequest,
        username: Option<String>,
        failure: Option<AuditFailure>,
    ) -> Self {
        Self {
            authenticator_name: request.authenticator_name().to_owned(),
            service_id: request.service_id().to_owned(),
            account: request.account().to_owned(),
            username,
            client_ip: request.client_ip(),
            success: failure.is_none(),
            failure,
        }
    }
}
