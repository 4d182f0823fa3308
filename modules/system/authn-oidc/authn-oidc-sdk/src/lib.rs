//! `AuthN` OIDC SDK
//!
//! This crate provides the public API for the `authn_oidc` module:
//!
//! - [`AuthnOidcClient`] - Public API trait for consumers
//! - Collaborator traits ([`AccountValidator`], [`OriginValidator`],
//!   [`RoleAccessValidator`], [`WebserviceWhitelist`], [`ResourceLookup`],
//!   [`IdTokenVerifier`], [`TokenFactory`], [`AuditLog`]) for implementations
//! - [`AuthenticationRequest`], [`AccessToken`], [`AuditEvent`] - Models
//! - [`AuthnOidcError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use authn_oidc_sdk::{AuthenticationRequest, AuthnOidcClient};
//!
//! let request = AuthenticationRequest::builder()
//!     .authenticator_name("authn-oidc")
//!     .service_id("my-service")
//!     .account("my-acct")
//!     .client_ip(peer_addr.ip())
//!     .body(body_bytes)
//!     .build();
//!
//! let token = authn.authenticate(&request).await?;
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod error;
pub mod models;
pub mod plugin_api;

// Re-export main types at crate root
pub use api::AuthnOidcClient;
pub use error::{
    AuthnOidcError, CheckFailure, ErrorKind, ResourceLookupError, TokenIssuanceError,
    VerificationError,
};
pub use models::{
    AccessToken, AuditEvent, AuditFailure, AuthenticationRequest, AuthenticationRequestBuilder,
    DecodedClaims, ResolvedIdentity, Webservice,
};
pub use plugin_api::{
    AccountValidator, AuditLog, IdTokenVerifier, OriginValidator, ResourceLookup,
    RoleAccessValidator, TokenFactory, WebserviceWhitelist,
};
