//! Collaborator traits for the `AuthN` OIDC authenticator.
//!
//! Each trait is one capability. The authenticator receives an implementation
//! of every trait at construction time and calls them in a fixed order; none of
//! them is looked up from global state.
//!
//! Implementations must be safe for concurrent use from simultaneous
//! authentication attempts.

use std::net::IpAddr;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::{CheckFailure, ResourceLookupError, TokenIssuanceError, VerificationError};
use crate::models::{AccessToken, AuditEvent, DecodedClaims, ResolvedIdentity, Webservice};

/// Checks that an account exists.
#[async_trait]
pub trait AccountValidator: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`CheckFailure`] if the account does not exist.
    async fn validate_account_exists(&self, account: &str) -> Result<(), CheckFailure>;
}

/// Checks the request origin against the account policy.
#[async_trait]
pub trait OriginValidator: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`CheckFailure`] if `client_ip` may not authenticate to `account`.
    async fn validate_origin(&self, account: &str, client_ip: IpAddr) -> Result<(), CheckFailure>;
}

/// Checks that the calling role may use a webservice.
#[async_trait]
pub trait RoleAccessValidator: Send + Sync {
    /// `username` is the identity known before authentication, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckFailure`] if the role lacks access to `webservice`.
    async fn validate_role_can_access(
        &self,
        webservice: &Webservice,
        username: Option<&str>,
    ) -> Result<(), CheckFailure>;
}

/// Checks that a webservice is enabled for its account.
#[async_trait]
pub trait WebserviceWhitelist: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`CheckFailure`] if `webservice` is not enabled.
    async fn validate_webservice_is_whitelisted(
        &self,
        webservice: &Webservice,
    ) -> Result<(), CheckFailure>;
}

/// Reads per-account variables from the resource store.
#[async_trait]
pub trait ResourceLookup: Send + Sync {
    /// Fetch the value of a variable by its fully qualified id.
    ///
    /// Returns `Ok(None)` if the variable does not exist or has no value.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceLookupError`] if the store itself fails.
    async fn fetch_variable(
        &self,
        variable_id: &str,
    ) -> Result<Option<SecretString>, ResourceLookupError>;
}

/// Decodes and verifies a raw id token.
#[async_trait]
pub trait IdTokenVerifier: Send + Sync {
    /// # Errors
    ///
    /// Returns [`VerificationError`] if the token is malformed, expired, has an
    /// invalid signature, or the provider cannot be reached.
    async fn verify_and_decode(
        &self,
        id_token: &SecretString,
        provider_uri: &str,
    ) -> Result<DecodedClaims, VerificationError>;
}

/// Mints access tokens for resolved identities.
#[async_trait]
pub trait TokenFactory: Send + Sync {
    /// # Errors
    ///
    /// Returns [`TokenIssuanceError`] if the token could not be minted.
    async fn issue(&self, identity: &ResolvedIdentity) -> Result<AccessToken, TokenIssuanceError>;
}

/// Records authentication outcomes.
///
/// Fire-and-forget: sink failures stay inside the implementation.
#[async_trait]
pub trait AuditLog: Send + Sync {
    async fn log(&self, event: AuditEvent);
}
