//! `AuthN` OIDC Module
//!
//! Authenticates callers presenting an OpenID Connect id token: runs the
//! account, origin, role-access and webservice checks, extracts and verifies
//! the id token, resolves the username from the configured claim, and issues
//! an access token. Every attempt is audited exactly once.
//!
//! Provides the `AuthnOidcClient` trait implementation for consumption by the
//! request-handling layer.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod module;

pub use domain::{Collaborators, TracingAuditLog};
pub use module::AuthnOidc;
