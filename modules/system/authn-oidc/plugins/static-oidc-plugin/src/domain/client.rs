//! Collaborator trait implementations for the static OIDC plugin.
//!
//! Each trait delegates to the domain service and turns a negative answer
//! into a `CheckFailure` with a short reason.

use std::net::IpAddr;

use async_trait::async_trait;
use authn_oidc_sdk::{
    AccessToken, AccountValidator, CheckFailure, DecodedClaims, IdTokenVerifier,
    OriginValidator, ResolvedIdentity, ResourceLookup, ResourceLookupError, RoleAccessValidator,
    TokenFactory, TokenIssuanceError, VerificationError, Webservice, WebserviceWhitelist,
};
use secrecy::{ExposeSecret, SecretString};

use super::service::Service;

fn require(ok: bool, reason: &str) -> Result<(), CheckFailure> {
    if ok {
        Ok(())
    } else {
        Err(CheckFailure::new(reason))
    }
}

#[async_trait]
impl AccountValidator for Service {
    async fn validate_account_exists(&self, account: &str) -> Result<(), CheckFailure> {
        require(self.account_exists(account), "account is not configured")
    }
}

#[async_trait]
impl OriginValidator for Service {
    async fn validate_origin(&self, _account: &str, client_ip: IpAddr) -> Result<(), CheckFailure> {
        require(
            self.origin_allowed(client_ip),
            "client address is not in allowed origins",
        )
    }
}

#[async_trait]
impl RoleAccessValidator for Service {
    async fn validate_role_can_access(
        &self,
        webservice: &Webservice,
        username: Option<&str>,
    ) -> Result<(), CheckFailure> {
        require(
            self.role_can_access(webservice, username),
            "no role grant for this webservice",
        )
    }
}

#[async_trait]
impl WebserviceWhitelist for Service {
    async fn validate_webservice_is_whitelisted(
        &self,
        webservice: &Webservice,
    ) -> Result<(), CheckFailure> {
        require(
            self.is_whitelisted(webservice),
            "authenticator is not enabled",
        )
    }
}

#[async_trait]
impl ResourceLookup for Service {
    async fn fetch_variable(
        &self,
        variable_id: &str,
    ) -> Result<Option<SecretString>, ResourceLookupError> {
        Ok(self.variable(variable_id))
    }
}

#[async_trait]
impl IdTokenVerifier for Service {
    async fn verify_and_decode(
        &self,
        id_token: &SecretString,
        provider_uri: &str,
    ) -> Result<DecodedClaims, VerificationError> {
        tracing::debug!(provider_uri, "Decoding id token with static verifier");
        self.decode(id_token.expose_secret())
    }
}

#[async_trait]
impl TokenFactory for Service {
    async fn issue(&self, identity: &ResolvedIdentity) -> Result<AccessToken, TokenIssuanceError> {
        Service::issue(self, identity)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::config::StaticOidcPluginConfig;

    fn webservice() -> Webservice {
        Webservice {
            account: "my-acct".to_owned(),
            authenticator_name: "authn-oidc".to_owned(),
            service_id: "my-service".to_owned(),
        }
    }

    #[tokio::test]
    async fn default_config_rejects_every_check() {
        let service = Service::from_config(&StaticOidcPluginConfig::default());

        let account: &dyn AccountValidator = &service;
        let role: &dyn RoleAccessValidator = &service;
        let whitelist: &dyn WebserviceWhitelist = &service;

        assert!(account.validate_account_exists("my-acct").await.is_err());
        assert!(
            role.validate_role_can_access(&webservice(), None)
                .await
                .is_err()
        );
        let failure = whitelist
            .validate_webservice_is_whitelisted(&webservice())
            .await
            .unwrap_err();
        assert_eq!(failure.reason, "authenticator is not enabled");
    }

    #[tokio::test]
    async fn origin_trait_passes_with_open_list() {
        let service = Service::from_config(&StaticOidcPluginConfig::default());
        let origin: &dyn OriginValidator = &service;

        assert!(
            origin
                .validate_origin("my-acct", IpAddr::V4(Ipv4Addr::LOCALHOST))
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn lookup_trait_returns_none_for_unknown_variable() {
        let service = Service::from_config(&StaticOidcPluginConfig::default());
        let lookup: &dyn ResourceLookup = &service;

        assert!(lookup.fetch_variable("a:variable:x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn verifier_trait_rejects_unknown_token() {
        let service = Service::from_config(&StaticOidcPluginConfig::default());
        let verifier: &dyn IdTokenVerifier = &service;

        let result = verifier
            .verify_and_decode(&SecretString::from("nope".to_owned()), "https://idp")
            .await;

        assert!(matches!(result, Err(VerificationError::InvalidSignature)));
    }
}
