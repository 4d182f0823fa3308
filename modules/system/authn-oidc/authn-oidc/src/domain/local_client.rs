//! Local (in-process) client for the `AuthN` OIDC module.

use std::sync::Arc;

use async_trait::async_trait;
use authn_oidc_sdk::{AccessToken, AuthenticationRequest, AuthnOidcClient, AuthnOidcError};

use super::{DomainError, Service};

/// Local client wrapping the service.
///
/// Returned by the module during `init()`.
pub struct AuthnOidcLocalClient {
    svc: Arc<Service>,
}

impl AuthnOidcLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> AuthnOidcError {
    tracing::error!(operation = op, error_kind = %e.kind(), error = %e, "authn_oidc call failed");
    e.into()
}

#[async_trait]
impl AuthnOidcClient for AuthnOidcLocalClient {
    async fn authenticate(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<AccessToken, AuthnOidcError> {
        self.svc
            .authenticate(request)
            .await
            .map_err(|e| log_and_convert("authenticate", e))
    }
}
