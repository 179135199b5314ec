//! Library for `backoffice`.
//!
//! This library is not intended to be used directly and is unsupported in
//! that configuration. It's only a library to enable sharing code in the
//! `backoffice` binary with its integration tests.

pub mod config;
pub mod listing;
pub mod notify;
pub mod progress;
pub mod session;
pub mod summary;
pub mod table;
pub mod view;
