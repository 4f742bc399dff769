//! # Token Issuer Library
//!
//! Provides functionality for issuing OAuth2 access tokens over HTTP:
//! resolving client credentials from a managed secret store (with an
//! explicit environment-variable fallback) and exchanging them for a
//! client-credentials grant token.
//!
//! Modules:
//! - `config` — service configuration and loader
//! - `secrets` — managed identity, vault client, credential resolver
//! - `exchange` — OAuth2 client-credentials token exchange
//! - `server` — HTTP trigger endpoint and response formatting

pub mod config;
pub mod error;
pub mod exchange;
pub mod resilience;
pub mod secrets;
pub mod server;
pub mod tests;
pub mod utils;


pub use crate::config::issuer::ServiceConfig;
pub use crate::error::IssuerError;
