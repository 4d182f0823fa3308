//! Service implementation for the static OIDC plugin.

use std::collections::{HashMap, HashSet};
use std::net::IpAddr;

use authn_oidc_sdk::{
    AccessToken, DecodedClaims, ResolvedIdentity, TokenIssuanceError, VerificationError,
    Webservice,
};
use chrono::{TimeDelta, Utc};
use secrecy::SecretString;
use serde_json::json;
use uuid::Uuid;

use crate::config::{StaticOidcPluginConfig, VerifierMode};

/// Member entry that matches every username.
const ANY_MEMBER: &str = "*";

const NOT_A_CLAIMS_OBJECT: &str = "id token is not a JSON claims object";

/// Static OIDC collaborator service.
///
/// Answers every policy, lookup, verification and issuance question from
/// configuration held in memory.
pub struct Service {
    accounts: HashSet<String>,
    allowed_origins: HashSet<IpAddr>,
    enabled_authenticators: HashSet<String>,
    /// (account, authenticator path) -> members
    grants: HashMap<(String, String), Vec<String>>,
    variables: HashMap<String, String>,
    verifier_mode: VerifierMode,
    token_map: HashMap<String, DecodedClaims>,
    token_ttl_secs: i64,
}

impl Service {
    /// Create a service from plugin configuration.
    #[must_use]
    pub fn from_config(cfg: &StaticOidcPluginConfig) -> Self {
        let mut grants: HashMap<(String, String), Vec<String>> = HashMap::new();
        for grant in &cfg.role_grants {
            grants
                .entry((grant.account.clone(), grant.webservice.clone()))
                .or_default()
                .extend(grant.members.iter().cloned());
        }

        let token_map = cfg
            .tokens
            .iter()
            .map(|m| (m.token.clone(), DecodedClaims::new(m.claims.clone())))
            .collect();

        Self {
            accounts: cfg.accounts.iter().cloned().collect(),
            allowed_origins: cfg.allowed_origins.iter().copied().collect(),
            enabled_authenticators: cfg.enabled_authenticators.iter().cloned().collect(),
            grants,
            variables: cfg.variables.clone(),
            verifier_mode: cfg.verifier_mode,
            token_map,
            token_ttl_secs: i64::try_from(cfg.token_ttl_secs).unwrap_or(i64::MAX),
        }
    }

    #[must_use]
    pub fn account_exists(&self, account: &str) -> bool {
        self.accounts.contains(account)
    }

    /// An empty allow-list admits every origin.
    #[must_use]
    pub fn origin_allowed(&self, client_ip: IpAddr) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.contains(&client_ip)
    }

    /// Without a known username, any grant on the webservice is enough.
    #[must_use]
    pub fn role_can_access(&self, webservice: &Webservice, username: Option<&str>) -> bool {
        let key = (webservice.account.clone(), webservice.authenticator_path());
        let Some(members) = self.grants.get(&key) else {
            return false;
        };

        match username {
            None => true,
            Some(name) => members.iter().any(|m| m == ANY_MEMBER || m == name),
        }
    }

    #[must_use]
    pub fn is_whitelisted(&self, webservice: &Webservice) -> bool {
        self.enabled_authenticators
            .contains(&webservice.authenticator_path())
    }

    #[must_use]
    pub fn variable(&self, variable_id: &str) -> Option<SecretString> {
        self.variables
            .get(variable_id)
            .map(|value| SecretString::from(value.clone()))
    }

    /// Turn a raw id token into claims according to the verifier mode.
    ///
    /// # Errors
    ///
    /// `InvalidSignature` for an unknown static token, `Malformed` when an
    /// unsigned token is not a JSON object.
    pub fn decode(&self, raw_token: &str) -> Result<DecodedClaims, VerificationError> {
        match self.verifier_mode {
            VerifierMode::StaticTokens => self
                .token_map
                .get(raw_token)
                .cloned()
                .ok_or(VerificationError::InvalidSignature),
            VerifierMode::UnsignedJson => serde_json::from_str(raw_token).map_err(|e| {
                // serde_json errors quote the offending input; keep only the position.
                tracing::debug!(
                    line = e.line(),
                    column = e.column(),
                    "Unsigned id token is not a JSON claims object"
                );
                VerificationError::Malformed(NOT_A_CLAIMS_OBJECT.to_owned())
            }),
        }
    }

    /// Issue a JSON access token for the resolved identity.
    ///
    /// # Errors
    ///
    /// `Internal` when the expiry cannot be represented or encoding fails.
    pub fn issue(&self, identity: &ResolvedIdentity) -> Result<AccessToken, TokenIssuanceError> {
        let issued_at = Utc::now();
        let expires_at = TimeDelta::try_seconds(self.token_ttl_secs)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .ok_or_else(|| TokenIssuanceError::Internal("token lifetime out of range".to_owned()))?;

        let token = json!({
            "jti": Uuid::new_v4(),
            "account": identity.account,
            "sub": identity.username,
            "iat": issued_at.timestamp(),
            "exp": expires_at.timestamp(),
        });
        let encoded = serde_json::to_string(&token)
            .map_err(|e| TokenIssuanceError::Internal(e.to_string()))?;

        Ok(AccessToken::new(encoded))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use secrecy::ExposeSecret;
    use serde_json::Value;

    use super::*;
    use crate::config::{RoleGrant, TokenMapping};

    fn webservice() -> Webservice {
        Webservice {
            account: "my-acct".to_owned(),
            authenticator_name: "authn-oidc".to_owned(),
            service_id: "my-service".to_owned(),
        }
    }

    fn grant(members: &[&str]) -> RoleGrant {
        RoleGrant {
            account: "my-acct".to_owned(),
            webservice: "authn-oidc/my-service".to_owned(),
            members: members.iter().map(|m| (*m).to_owned()).collect(),
        }
    }

    #[test]
    fn accounts_and_whitelist_are_exact() {
        let service = Service::from_config(&StaticOidcPluginConfig {
            accounts: vec!["my-acct".to_owned()],
            enabled_authenticators: vec!["authn-oidc/my-service".to_owned()],
            ..StaticOidcPluginConfig::default()
        });

        assert!(service.account_exists("my-acct"));
        assert!(!service.account_exists("other"));
        assert!(service.is_whitelisted(&webservice()));

        let other = Webservice {
            service_id: "other".to_owned(),
            ..webservice()
        };
        assert!(!service.is_whitelisted(&other));
    }

    #[test]
    fn empty_origin_list_allows_any() {
        let service = Service::from_config(&StaticOidcPluginConfig::default());

        assert!(service.origin_allowed(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1))));
    }

    #[test]
    fn origin_list_matches_exact_addresses() {
        let service = Service::from_config(&StaticOidcPluginConfig {
            allowed_origins: vec![IpAddr::V6(Ipv6Addr::LOCALHOST)],
            ..StaticOidcPluginConfig::default()
        });

        assert!(service.origin_allowed(IpAddr::V6(Ipv6Addr::LOCALHOST)));
        assert!(!service.origin_allowed(IpAddr::V4(Ipv4Addr::LOCALHOST)));
    }

    #[test]
    fn role_access_requires_a_grant() {
        let service = Service::from_config(&StaticOidcPluginConfig::default());

        assert!(!service.role_can_access(&webservice(), None));
        assert!(!service.role_can_access(&webservice(), Some("alice")));
    }

    #[test]
    fn role_access_checks_known_username() {
        let service = Service::from_config(&StaticOidcPluginConfig {
            role_grants: vec![grant(&["alice"])],
            ..StaticOidcPluginConfig::default()
        });

        assert!(service.role_can_access(&webservice(), None));
        assert!(service.role_can_access(&webservice(), Some("alice")));
        assert!(!service.role_can_access(&webservice(), Some("bob")));
    }

    #[test]
    fn wildcard_member_matches_anyone() {
        let service = Service::from_config(&StaticOidcPluginConfig {
            role_grants: vec![grant(&["*"])],
            ..StaticOidcPluginConfig::default()
        });

        assert!(service.role_can_access(&webservice(), Some("bob")));
    }

    #[test]
    fn static_tokens_map_to_configured_claims() {
        let mut claims = serde_json::Map::new();
        claims.insert("preferred_username".to_owned(), json!("alice"));
        let service = Service::from_config(&StaticOidcPluginConfig {
            tokens: vec![TokenMapping {
                token: "known".to_owned(),
                claims,
            }],
            ..StaticOidcPluginConfig::default()
        });

        let decoded = service.decode("known").unwrap();
        assert_eq!(decoded.get("preferred_username"), Some(&json!("alice")));

        assert!(matches!(
            service.decode("unknown"),
            Err(VerificationError::InvalidSignature)
        ));
    }

    #[test]
    fn unsigned_json_decodes_claims_object() {
        let service = Service::from_config(&StaticOidcPluginConfig {
            verifier_mode: VerifierMode::UnsignedJson,
            ..StaticOidcPluginConfig::default()
        });

        let decoded = service.decode(r#"{"sub": "alice"}"#).unwrap();
        assert_eq!(decoded.get("sub"), Some(&json!("alice")));

        assert!(matches!(
            service.decode("not-json"),
            Err(VerificationError::Malformed(_))
        ));
        assert!(matches!(
            service.decode("[1, 2]"),
            Err(VerificationError::Malformed(_))
        ));
    }

    #[test]
    fn malformed_unsigned_token_is_not_echoed() {
        let service = Service::from_config(&StaticOidcPluginConfig {
            verifier_mode: VerifierMode::UnsignedJson,
            ..StaticOidcPluginConfig::default()
        });

        for raw in [r#""carol-secret-jwt""#, "carol-secret-jwt", r#"{"sub": carol-secret-jwt}"#] {
            let err = service.decode(raw).unwrap_err();

            assert!(!err.to_string().contains("carol-secret-jwt"), "token {raw:?}");
            assert_eq!(
                err.to_string(),
                "id token is malformed: id token is not a JSON claims object"
            );
        }
    }

    #[test]
    fn issued_token_carries_identity_and_lifetime() {
        let service = Service::from_config(&StaticOidcPluginConfig {
            token_ttl_secs: 60,
            ..StaticOidcPluginConfig::default()
        });
        let identity = ResolvedIdentity {
            account: "my-acct".to_owned(),
            service_id: "my-service".to_owned(),
            username: "alice".to_owned(),
            client_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        let token = service.issue(&identity).unwrap();
        let doc: Value = serde_json::from_str(token.secret().expose_secret()).unwrap();

        assert_eq!(doc["account"], "my-acct");
        assert_eq!(doc["sub"], "alice");
        assert_eq!(
            doc["exp"].as_i64().unwrap() - doc["iat"].as_i64().unwrap(),
            60
        );
        assert!(Uuid::parse_str(doc["jti"].as_str().unwrap()).is_ok());

        let again = service.issue(&identity).unwrap();
        assert_ne!(
            again.secret().expose_secret(),
            token.secret().expose_secret()
        );
    }

    #[test]
    fn oversized_lifetime_fails_issuance() {
        let service = Service::from_config(&StaticOidcPluginConfig {
            token_ttl_secs: u64::MAX,
            ..StaticOidcPluginConfig::default()
        });
        let identity = ResolvedIdentity {
            account: "a".to_owned(),
            service_id: "s".to_owned(),
            username: "u".to_owned(),
            client_ip: IpAddr::V4(Ipv4Addr::LOCALHOST),
        };

        assert!(matches!(
            service.issue(&identity),
            Err(TokenIssuanceError::Internal(_))
        ));
    }
}
