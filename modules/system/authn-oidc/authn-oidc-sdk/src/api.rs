//! Public API trait for the `AuthN` OIDC module.
//!
//! This trait defines the interface that the request-handling layer uses to
//! authenticate a caller presenting an OIDC id token.

use async_trait::async_trait;

use crate::error::AuthnOidcError;
use crate::models::{AccessToken, AuthenticationRequest};

/// Public API trait for the `AuthN` OIDC authenticator.
///
/// ```ignore
/// let token = authn.authenticate(&request).await?;
/// ```
///
/// # Audit
///
/// Every call records exactly one audit event, whether it succeeds or fails.
#[async_trait]
pub trait AuthnOidcClient: Send + Sync {
    /// Authenticate the request and issue an access token.
    ///
    /// # Errors
    ///
    /// - `AccountNotFound`, `InvalidOrigin`, `RoleNotAuthorized`,
    ///   `ServiceNotWhitelisted` when a policy check rejects the request
    /// - `MissingRequestParam` if `id_token` is absent or empty in the body
    /// - `VariableNotFound` if a required per-webservice variable is missing
    /// - `Verification` if the id token fails verification
    /// - `IdTokenFieldNotFoundOrEmpty` if the configured claim is absent or empty
    /// - `TokenIssuance` if the access token could not be minted
    /// - `Internal` for unexpected errors
    async fn authenticate(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<AccessToken, AuthnOidcError>;
}
