//! Hosted records backend.
//!
//! `BackendClient` reads a mariner's goal, sea service, certificates and
//! settings, plus the shared ship catalog. Everything it returns is handed
//! to the pure evaluation functions unchanged.

pub mod client;
pub mod error;

pub use client::BackendClient;
pub use error::ApiError;
