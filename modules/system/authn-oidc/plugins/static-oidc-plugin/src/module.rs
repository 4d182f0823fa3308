//! Static OIDC plugin module.

use std::sync::{Arc, OnceLock};

use tracing::info;

use crate::config::{StaticOidcPluginConfig, VerifierMode};
use crate::domain::Service;

/// Static OIDC plugin module.
///
/// Provides every authenticator collaborator except the audit sink from
/// configuration. Wire the returned service with
/// `Collaborators::from_provider`.
#[derive(Default)]
pub struct StaticOidcPlugin {
    service: OnceLock<Arc<Service>>,
}

impl StaticOidcPlugin {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize the plugin from raw JSON configuration.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration or when the plugin is already initialized.
    pub fn init(&self, raw_config: Option<&serde_json::Value>) -> anyhow::Result<Arc<Service>> {
        info!("Initializing static_oidc_plugin");

        let cfg: StaticOidcPluginConfig = match raw_config {
            Some(value) => serde_json::from_value(value.clone())?,
            None => StaticOidcPluginConfig::default(),
        };
        if cfg.verifier_mode == VerifierMode::UnsignedJson {
            tracing::warn!(
                "Static OIDC plugin is running in `unsigned_json` mode: \
                 id tokens are decoded without any signature check. \
                 Do NOT use this mode in production."
            );
        }

        info!(
            account_count = cfg.accounts.len(),
            authenticator_count = cfg.enabled_authenticators.len(),
            grant_count = cfg.role_grants.len(),
            variable_count = cfg.variables.len(),
            verifier_mode = ?cfg.verifier_mode,
            token_count = cfg.tokens.len(),
            token_ttl_secs = cfg.token_ttl_secs,
            "Loaded plugin configuration"
        );

        let service = Arc::new(Service::from_config(&cfg));
        self.service
            .set(service.clone())
            .map_err(|_| anyhow::anyhow!("Service already initialized"))?;

        info!("Static OIDC plugin initialized");
        Ok(service)
    }
}
