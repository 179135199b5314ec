//! Shared library for the travel-agency back-office API.
//!
//! This library provides the wire types exchanged with the agency backend
//! (clients, travel dossiers, quotes/invoices, users, permissions) and an
//! HTTP client for it. Types are always available, while HTTP client code
//! is gated behind the `client` feature.
//!
//! ## Use of `#[non_exhaustive]`
//!
//! Records returned by the backend are `#[non_exhaustive]`: their fields are
//! `pub` for reading, but they must be constructed through deserialization or
//! their builders. Writes go through the `*Draft` types instead, which carry
//! the validation the backend expects before a record is submitted.
//!
//! ## Tolerant decoding
//!
//! The backend is not consistent about how it shapes responses: identifiers
//! and amounts sometimes arrive as strings, booleans as `0`/`1`, dates with or
//! without a time component, and collections either bare or wrapped in a
//! `data` envelope. Decoding in this crate accepts all of these; see
//! [`v1::envelope`] for the envelope rules.

mod token;
pub mod v1;

#[cfg(feature = "client")]
pub mod ext;

pub use token::Token;

/// The latest agency API client version.
#[cfg(feature = "client")]
pub type Agency = v1::Client;

/// Agency v1 client.
#[cfg(feature = "client")]
pub type AgencyV1 = v1::Client;
