//! Policy checks run before any token handling.

use std::sync::Arc;

use authn_oidc_sdk::{
    AccountValidator, AuthenticationRequest, OriginValidator, RoleAccessValidator,
    WebserviceWhitelist,
};

use super::error::DomainError;

/// Ordered set of independent policy checks.
///
/// Runs account existence, origin, role access, then webservice whitelist and
/// stops at the first rejection. Each rejection becomes its own check's error
/// kind regardless of what the collaborator reported.
pub struct ValidationChain {
    account_exists: Arc<dyn AccountValidator>,
    origin: Arc<dyn OriginValidator>,
    role_access: Arc<dyn RoleAccessValidator>,
    webservice_whitelist: Arc<dyn WebserviceWhitelist>,
}

impl ValidationChain {
    #[must_use]
    pub fn new(
        account_exists: Arc<dyn AccountValidator>,
        origin: Arc<dyn OriginValidator>,
        role_access: Arc<dyn RoleAccessValidator>,
        webservice_whitelist: Arc<dyn WebserviceWhitelist>,
    ) -> Self {
        Self {
            account_exists,
            origin,
            role_access,
            webservice_whitelist,
        }
    }

    /// Run every check against `request`.
    ///
    /// # Errors
    ///
    /// The first failing check's error: `AccountNotFound`, `InvalidOrigin`,
    /// `RoleNotAuthorized`, or `ServiceNotWhitelisted`.
    pub async fn validate(&self, request: &AuthenticationRequest) -> Result<(), DomainError> {
        let account = request.account();
        let webservice = request.webservice();

        self.account_exists
            .validate_account_exists(account)
            .await
            .map_err(|e| DomainError::AccountNotFound {
                account: account.to_owned(),
                reason: e.reason,
            })?;

        self.origin
            .validate_origin(account, request.client_ip())
            .await
            .map_err(|e| DomainError::InvalidOrigin {
                client_ip: request.client_ip(),
                reason: e.reason,
            })?;

        self.role_access
            .validate_role_can_access(&webservice, request.username())
            .await
            .map_err(|e| DomainError::RoleNotAuthorized {
                webservice: webservice.to_string(),
                reason: e.reason,
            })?;

        self.webservice_whitelist
            .validate_webservice_is_whitelisted(&webservice)
            .await
            .map_err(|e| DomainError::ServiceNotWhitelisted {
                webservice: webservice.to_string(),
                reason: e.reason,
            })?;

        Ok(())
    }
}
