//! Backend API key storage.
//!
//! Keys live in the OS keychain via keyring; `WHEELHOUSE_API_KEY` in the
//! environment takes precedence.

pub mod credentials;

pub use credentials::{CredentialStore, API_KEY_ENV};
