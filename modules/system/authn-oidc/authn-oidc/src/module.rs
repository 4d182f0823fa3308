//! `AuthN` OIDC module.

use std::sync::{Arc, OnceLock};

use authn_oidc_sdk::AuthnOidcClient;
use tracing::info;

use crate::config::AuthnOidcConfig;
use crate::domain::{AuthnOidcLocalClient, Collaborators, Service};

/// `AuthN` OIDC module.
///
/// This module:
/// 1. Reads its configuration (all fields optional)
/// 2. Wires the injected collaborators into the authenticator service
/// 3. Hands back the local client for the request-handling layer
///
/// Initialization happens once; a second `init` is rejected.
#[derive(Default)]
pub struct AuthnOidc {
    service: OnceLock<Arc<Service>>,
}

impl AuthnOidc {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize the module from raw JSON configuration.
    ///
    /// A missing configuration section falls back to the defaults.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration or when the module is already initialized.
    #[tracing::instrument(skip_all, fields(namespace))]
    pub fn init(
        &self,
        raw_config: Option<&serde_json::Value>,
        deps: Collaborators,
    ) -> anyhow::Result<Arc<dyn AuthnOidcClient>> {
        let cfg: AuthnOidcConfig = match raw_config {
            Some(value) => serde_json::from_value(value.clone())?,
            None => AuthnOidcConfig::default(),
        };
        tracing::Span::current().record("namespace", cfg.variable_namespace.as_str());
        info!(
            namespace = %cfg.variable_namespace,
            provider_uri_variable = %cfg.provider_uri_variable,
            user_property_variable = %cfg.id_token_user_property_variable,
            "Initializing authn_oidc"
        );

        let svc = Arc::new(Service::new(cfg, deps));

        self.service
            .set(svc.clone())
            .map_err(|_| anyhow::anyhow!("Service already initialized"))?;

        let api: Arc<dyn AuthnOidcClient> = Arc::new(AuthnOidcLocalClient::new(svc));
        Ok(api)
    }

    /// The initialized service, if `init` has run.
    #[must_use]
    pub fn service(&self) -> Option<Arc<Service>> {
        self.service.get().cloned()
    }
}
