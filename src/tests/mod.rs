pub mod common;

mod vault_store;
