//! Configuration for the static OIDC plugin.

use std::collections::HashMap;
use std::net::IpAddr;

use serde::Deserialize;

/// Plugin configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticOidcPluginConfig {
    /// Accounts that exist.
    pub accounts: Vec<String>,

    /// Client addresses allowed to authenticate. Empty allows any origin.
    pub allowed_origins: Vec<IpAddr>,

    /// Enabled authenticators, as `authn-oidc/<service_id>`.
    pub enabled_authenticators: Vec<String>,

    /// Which roles may authenticate through which webservice.
    pub role_grants: Vec<RoleGrant>,

    /// Variable values keyed by fully qualified variable id.
    pub variables: HashMap<String, String>,

    /// How raw id tokens are turned into claims.
    pub verifier_mode: VerifierMode,

    /// Known id tokens for `static_tokens` mode.
    pub tokens: Vec<TokenMapping>,

    /// Lifetime of issued access tokens, in seconds.
    pub token_ttl_secs: u64,
}

impl Default for StaticOidcPluginConfig {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            allowed_origins: Vec::new(),
            enabled_authenticators: Vec::new(),
            role_grants: Vec::new(),
            variables: HashMap::new(),
            verifier_mode: VerifierMode::StaticTokens,
            tokens: Vec::new(),
            token_ttl_secs: 480,
        }
    }
}

/// Id token verification mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum VerifierMode {
    /// Only tokens listed in `tokens` verify, yielding their configured claims.
    #[default]
    StaticTokens,
    /// Decode the raw token as a JSON object of claims. No verification at all.
    UnsignedJson,
}

/// Grants the `authenticate` privilege on one webservice.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoleGrant {
    pub account: String,

    /// Authenticator path, e.g. `authn-oidc/my-service`.
    pub webservice: String,

    /// Usernames holding the grant; `*` matches anyone.
    pub members: Vec<String>,
}

/// Maps a raw id token to the claims it decodes to.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenMapping {
    pub token: String,
    pub claims: serde_json::Map<String, serde_json::Value>,
}
