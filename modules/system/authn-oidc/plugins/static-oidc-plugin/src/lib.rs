#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static OIDC Plugin
//!
//! In-memory implementations of the OIDC authenticator collaborators, driven
//! entirely by configuration. Meant for development and end-to-end tests.
//!
//! ## Verifier modes
//!
//! - **`static_tokens`** (default): only id tokens listed under `tokens` verify,
//!   each yielding its configured claims.
//!
//! - **`unsigned_json`**: the raw id token is read as a JSON object of claims
//!   with no signature check at all.
//!
//! ## Configuration
//!
//! ```yaml
//! modules:
//!   static_oidc_plugin:
//!     config:
//!       accounts: ["my-acct"]
//!       allowed_origins: []
//!       enabled_authenticators: ["authn-oidc/my-service"]
//!       role_grants:
//!         - account: "my-acct"
//!           webservice: "authn-oidc/my-service"
//!           members: ["*"]
//!       variables:
//!         "my-acct:variable:conjur/authn-oidc/my-service/provider-uri": "https://idp.example.com"
//!         "my-acct:variable:conjur/authn-oidc/my-service/id-token-user-property": "preferred_username"
//!       verifier_mode: static_tokens
//!       tokens:
//!         - token: "dev-id-token"
//!           claims: { preferred_username: "alice" }
//!       token_ttl_secs: 480
//! ```

pub mod config;
pub mod domain;
pub mod module;

pub use module::StaticOidcPlugin;
