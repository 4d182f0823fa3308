//! Domain layer for the `AuthN` OIDC module.

pub mod audit;
pub mod claims;
pub mod credentials;
pub mod error;
pub mod local_client;
pub mod service;
pub mod validation;


pub use audit::{ChannelAuditLog, TracingAuditLog};
pub use claims::ClaimsResolver;
pub use credentials::CredentialExtractor;
pub use error::DomainError;
pub use local_client::AuthnOidcLocalClient;
pub use service::{Collaborators, Service};
pub use validation::ValidationChain;
