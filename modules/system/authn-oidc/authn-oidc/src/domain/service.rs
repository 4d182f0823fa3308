//! Domain service for the `AuthN` OIDC module.

use std::sync::Arc;

use authn_oidc_sdk::{
    AccessToken, AccountValidator, AuditEvent, AuditLog, AuthenticationRequest, IdTokenVerifier,
    OriginValidator, ResolvedIdentity, ResourceLookup, RoleAccessValidator, TokenFactory,
    Webservice, WebserviceWhitelist,
};
use secrecy::ExposeSecret;

use super::claims::ClaimsResolver;
use super::credentials::CredentialExtractor;
use super::error::DomainError;
use super::validation::ValidationChain;
use crate::config::AuthnOidcConfig;

/// External collaborators injected into the authenticator.
#[derive(Clone)]
pub struct Collaborators {
    pub account_validator: Arc<dyn AccountValidator>,
    pub origin_validator: Arc<dyn OriginValidator>,
    pub role_access_validator: Arc<dyn RoleAccessValidator>,
    pub webservice_whitelist: Arc<dyn WebserviceWhitelist>,
    pub resource_lookup: Arc<dyn ResourceLookup>,
    pub token_verifier: Arc<dyn IdTokenVerifier>,
    pub token_factory: Arc<dyn TokenFactory>,
    pub audit_log: Arc<dyn AuditLog>,
}

impl Collaborators {
    /// Wire every collaborator except the audit sink from one provider.
    #[must_use]
    pub fn from_provider<P>(provider: &Arc<P>, audit_log: Arc<dyn AuditLog>) -> Self
    where
        P: AccountValidator
            + OriginValidator
            + RoleAccessValidator
            + WebserviceWhitelist
            + ResourceLookup
            + IdTokenVerifier
            + TokenFactory
            + 'static,
    {
        Self {
            account_validator: provider.clone(),
            origin_validator: provider.clone(),
            role_access_validator: provider.clone(),
            webservice_whitelist: provider.clone(),
            resource_lookup: provider.clone(),
            token_verifier: provider.clone(),
            token_factory: provider.clone(),
            audit_log,
        }
    }
}

/// OIDC authenticator.
///
/// Stateless across calls: everything it holds is configuration or a
/// collaborator handle.
pub struct Service {
    config: AuthnOidcConfig,
    validation: ValidationChain,
    extractor: CredentialExtractor,
    claims: ClaimsResolver,
    resource_lookup: Arc<dyn ResourceLookup>,
    token_verifier: Arc<dyn IdTokenVerifier>,
    token_factory: Arc<dyn TokenFactory>,
    audit_log: Arc<dyn AuditLog>,
}

impl Service {
    #[must_use]
    pub fn new(config: AuthnOidcConfig, deps: Collaborators) -> Self {
        Self {
            config,
            validation: ValidationChain::new(
                deps.account_validator,
                deps.origin_validator,
                deps.role_access_validator,
                deps.webservice_whitelist,
            ),
            extractor: CredentialExtractor,
            claims: ClaimsResolver,
            resource_lookup: deps.resource_lookup,
            token_verifier: deps.token_verifier,
            token_factory: deps.token_factory,
            audit_log: deps.audit_log,
        }
    }

    /// Authenticate a request and issue an access token.
    ///
    /// Records exactly one audit event before returning, on every path.
    ///
    /// # Errors
    ///
    /// The error of the first failing step; no step is retried.
    #[tracing::instrument(
        skip_all,
        fields(
            account = %request.account(),
            webservice = %request.webservice(),
            client_ip = %request.client_ip(),
        )
    )]
    pub async fn authenticate(
        &self,
        request: &AuthenticationRequest,
    ) -> Result<AccessToken, DomainError> {
        let mut username = request.username().map(ToOwned::to_owned);

        let outcome = self.run(request, &mut username).await;

        let event = match &outcome {
            Ok(_) => AuditEvent::succeeded(request, username),
            Err(e) => AuditEvent::failed(request, username, e.kind(), e.audit_message()),
        };
        self.audit_log.log(event).await;

        outcome
    }

    async fn run(
        &self,
        request: &AuthenticationRequest,
        username: &mut Option<String>,
    ) -> Result<AccessToken, DomainError> {
        self.validation.validate(request).await?;

        let id_token = self.extractor.extract(request.body())?;

        let webservice = request.webservice();
        let provider_uri = self
            .required_variable(&webservice, &self.config.provider_uri_variable)
            .await?;
        let claims = self
            .token_verifier
            .verify_and_decode(&id_token, &provider_uri)
            .await?;
        tracing::debug!(claim_count = claims.len(), "Id token verified");

        let user_property = self
            .required_variable(&webservice, &self.config.id_token_user_property_variable)
            .await?;
        let resolved = self.claims.resolve(&claims, &user_property)?;
        *username = Some(resolved.clone());

        let identity = ResolvedIdentity {
            account: request.account().to_owned(),
            service_id: request.service_id().to_owned(),
            username: resolved,
            client_ip: request.client_ip(),
        };
        let token = self.token_factory.issue(&identity).await?;

        tracing::info!(username = %identity.username, "Access token issued");
        Ok(token)
    }

    /// Fetch a webservice-scoped variable that must be present and non-empty.
    async fn required_variable(
        &self,
        webservice: &Webservice,
        name: &str,
    ) -> Result<String, DomainError> {
        let variable_id = webservice.variable_id(&self.config.variable_namespace, name);

        self.resource_lookup
            .fetch_variable(&variable_id)
            .await?
            .map(|value| value.expose_secret().to_owned())
            .filter(|value| !value.is_empty())
            .ok_or(DomainError::VariableNotFound {
                variable: variable_id,
            })
    }
}
