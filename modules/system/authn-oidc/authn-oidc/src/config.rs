//! Configuration for the `AuthN` OIDC module.

use serde::Deserialize;

/// Configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthnOidcConfig {
    /// Policy namespace that webservice and variable ids live under.
    pub variable_namespace: String,

    /// Variable holding the identity provider URI handed to the verifier.
    pub provider_uri_variable: String,

    /// Variable holding the claim name used as the username.
    pub id_token_user_property_variable: String,
}

impl Default for AuthnOidcConfig {
    fn default() -> Self {
        Self {
            variable_namespace: "conjur".to_owned(),
            provider_uri_variable: "provider-uri".to_owned(),
            id_token_user_property_variable: "id-token-user-property".to_owned(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: AuthnOidcConfig =
            serde_json::from_value(json!({ "variable_namespace": "policy" })).unwrap();

        assert_eq!(cfg.variable_namespace, "policy");
        assert_eq!(cfg.provider_uri_variable, "provider-uri");
        assert_eq!(cfg.id_token_user_property_variable, "id-token-user-property");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result = serde_json::from_value::<AuthnOidcConfig>(json!({ "vendor": "x" }));
        assert!(result.is_err());
    }
}
