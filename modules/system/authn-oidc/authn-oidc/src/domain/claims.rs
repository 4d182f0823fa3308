//! Username resolution from decoded id token claims.

use authn_oidc_sdk::DecodedClaims;
use serde_json::Value;

use super::error::DomainError;

/// Resolves the username from a configured claim.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimsResolver;

impl ClaimsResolver {
    /// Look up `field` in `claims` and return it as the username.
    ///
    /// String claims are used as-is, `null` counts as empty, and any other
    /// JSON value is taken in its JSON text form.
    ///
    /// # Errors
    ///
    /// `IdTokenFieldNotFoundOrEmpty` if the claim is absent or empty. The two
    /// cases are not distinguished.
    pub fn resolve(self, claims: &DecodedClaims, field: &str) -> Result<String, DomainError> {
        claims
            .get(field)
            .map(claim_as_string)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| DomainError::IdTokenFieldNotFoundOrEmpty {
                field: field.to_owned(),
            })
    }
}

fn claim_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
