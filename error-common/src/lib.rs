//! Common error handling utilities for BlobSync
//!
//! This module provides the error types shared across the storage backends
//! and the HTTP layer. It ensures consistent error classification so the API
//! can map failures to status codes without inspecting backend internals.
//!
//! # Error Categories
//!
//! - **AlreadyExists**: a write without `overwrite` hit an existing entry
//! - **NotFound**: read or delete of an absent entry
//! - **Backend**: I/O failure against local disk or the object store

pub mod types;

pub use types::*;
