pub mod issuer;
pub mod loader;
pub mod settings;
