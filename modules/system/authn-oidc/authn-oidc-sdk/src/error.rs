//! Error types for the `AuthN` OIDC module.

use std::fmt;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of a failed authentication attempt.
///
/// Closed set; every [`AuthnOidcError`] maps to exactly one kind, so upstream
/// layers can pick a response without inspecting error internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    AccountNotFound,
    InvalidOrigin,
    RoleNotAuthorized,
    ServiceNotWhitelisted,
    MissingRequestParam,
    VariableNotFound,
    IdTokenFieldNotFoundOrEmpty,
    Verification,
    TokenIssuance,
    Internal,
}

impl ErrorKind {
    /// Stable snake-case name, used in audit records and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AccountNotFound => "account_not_found",
            Self::InvalidOrigin => "invalid_origin",
            Self::RoleNotAuthorized => "role_not_authorized",
            Self::ServiceNotWhitelisted => "service_not_whitelisted",
            Self::MissingRequestParam => "missing_request_param",
            Self::VariableNotFound => "variable_not_found",
            Self::IdTokenFieldNotFoundOrEmpty => "id_token_field_not_found_or_empty",
            Self::Verification => "verification",
            Self::TokenIssuance => "token_issuance",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur when using the `AuthN` OIDC API.
///
/// Messages name the failing account, webservice, field, or variable only.
/// Raw token contents and claim values never appear here.
#[derive(Debug, Error)]
pub enum AuthnOidcError {
    /// The referenced account does not exist.
    #[error("account '{account}' not found")]
    AccountNotFound { account: String },

    /// The request origin violates the account policy.
    #[error("origin '{client_ip}' is not allowed")]
    InvalidOrigin { client_ip: IpAddr },

    /// The caller's role may not use this webservice.
    #[error("role is not authorized to access webservice '{webservice}'")]
    RoleNotAuthorized { webservice: String },

    /// The webservice is not enabled for this account.
    #[error("webservice '{webservice}' is not whitelisted")]
    ServiceNotWhitelisted { webservice: String },

    /// A required request body field is absent or empty.
    #[error("field '{param}' is missing or empty in request body")]
    MissingRequestParam { param: String },

    /// A required per-account variable is missing or has no value.
    #[error("variable '{variable}' is missing or has no value")]
    VariableNotFound { variable: String },

    /// The configured claim is absent or empty in the decoded id token.
    #[error("field '{field}' not found or empty in id token")]
    IdTokenFieldNotFoundOrEmpty { field: String },

    /// The id token failed verification; propagated as returned by the verifier.
    #[error(transparent)]
    Verification(#[from] VerificationError),

    /// Access token issuance failed after the identity was resolved.
    #[error(transparent)]
    TokenIssuance(#[from] TokenIssuanceError),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AuthnOidcError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::AccountNotFound { .. } => ErrorKind::AccountNotFound,
            Self::InvalidOrigin { .. } => ErrorKind::InvalidOrigin,
            Self::RoleNotAuthorized { .. } => ErrorKind::RoleNotAuthorized,
            Self::ServiceNotWhitelisted { .. } => ErrorKind::ServiceNotWhitelisted,
            Self::MissingRequestParam { .. } => ErrorKind::MissingRequestParam,
            Self::VariableNotFound { .. } => ErrorKind::VariableNotFound,
            Self::IdTokenFieldNotFoundOrEmpty { .. } => ErrorKind::IdTokenFieldNotFoundOrEmpty,
            Self::Verification(_) => ErrorKind::Verification,
            Self::TokenIssuance(_) => ErrorKind::TokenIssuance,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Rejection returned by a policy check collaborator.
///
/// Carries the collaborator's reason only; the orchestrator decides which
/// error kind the rejection becomes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct CheckFailure {
    pub reason: String,
}

impl CheckFailure {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Failure of the resource store itself (not a missing variable).
#[derive(Debug, Error)]
pub enum ResourceLookupError {
    #[error("resource store unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Errors returned by an [`IdTokenVerifier`](crate::IdTokenVerifier).
#[derive(Debug, Error)]
pub enum VerificationError {
    /// The token could not be decoded.
    #[error("id token is malformed: {0}")]
    Malformed(String),

    #[error("id token has expired")]
    Expired,

    #[error("id token signature is invalid")]
    InvalidSignature,

    /// Issuer, audience, or another registered claim was rejected.
    #[error("id token claims are invalid: {0}")]
    InvalidClaims(String),

    /// The identity provider (or its keys) could not be reached.
    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),
}

/// Errors returned by a [`TokenFactory`](crate::TokenFactory).
#[derive(Debug, Error)]
pub enum TokenIssuanceError {
    #[error("signing key unavailable: {0}")]
    SigningKeyUnavailable(String),

    #[error("token issuance failed: {0}")]
    Internal(String),
}
