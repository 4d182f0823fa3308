//! Domain errors for the `AuthN` OIDC module.

use std::net::IpAddr;

use authn_oidc_sdk::{
    AuthnOidcError, ErrorKind, ResourceLookupError, TokenIssuanceError, VerificationError,
};

/// Internal domain errors.
///
/// Policy rejections keep the collaborator's reason for logs and audit; the
/// public [`AuthnOidcError`] drops it.
#[derive(thiserror::Error, Debug)]
pub enum DomainError {
    #[error("account '{account}' not found: {reason}")]
    AccountNotFound { account: String, reason: String },

    #[error("origin '{client_ip}' is not allowed: {reason}")]
    InvalidOrigin { client_ip: IpAddr, reason: String },

    #[error("role is not authorized to access webservice '{webservice}': {reason}")]
    RoleNotAuthorized { webservice: String, reason: String },

    #[error("webservice '{webservice}' is not whitelisted: {reason}")]
    ServiceNotWhitelisted { webservice: String, reason: String },

    #[error("field '{param}' is missing or empty in request body")]
    MissingRequestParam { param: String },

    #[error("variable '{variable}' is missing or has no value")]
    VariableNotFound { variable: String },

    #[error("field '{field}' not found or empty in id token")]
    IdTokenFieldNotFoundOrEmpty { field: String },

    #[error(transparent)]
    Verification(#[from] VerificationError),

    #[error(transparent)]
    TokenIssuance(#[from] TokenIssuanceError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
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

    /// Message recorded in the audit trail.
    ///
    /// Verifier and token factory errors are opaque and may quote their
    /// input, so they are reduced to a fixed text per kind.
    #[must_use]
    pub fn audit_message(&self) -> String {
        match self {
            Self::Verification(_) => "id token verification failed".to_owned(),
            Self::TokenIssuance(_) => "access token issuance failed".to_owned(),
            other => other.to_string(),
        }
    }
}

impl From<ResourceLookupError> for DomainError {
    fn from(e: ResourceLookupError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<DomainError> for AuthnOidcError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::AccountNotFound { account, .. } => Self::AccountNotFound { account },
            DomainError::InvalidOrigin { client_ip, .. } => Self::InvalidOrigin { client_ip },
            DomainError::RoleNotAuthorized { webservice, .. } => {
                Self::RoleNotAuthorized { webservice }
            }
            DomainError::ServiceNotWhitelisted { webservice, .. } => {
                Self::ServiceNotWhitelisted { webservice }
            }
            DomainError::MissingRequestParam { param } => Self::MissingRequestParam { param },
            DomainError::VariableNotFound { variable } => Self::VariableNotFound { variable },
            DomainError::IdTokenFieldNotFoundOrEmpty { field } => {
                Self::IdTokenFieldNotFoundOrEmpty { field }
            }
            DomainError::Verification(e) => Self::Verification(e),
            DomainError::TokenIssuance(e) => Self::TokenIssuance(e),
            DomainError::Internal(msg) => Self::Internal(msg),
        }
    }
}
