//! Domain layer for the static OIDC plugin.

pub mod client;
pub mod service;

pub use service::Service;
