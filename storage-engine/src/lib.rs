//! Polymorphic file storage for BlobSync
//!
//! A single [`StorageAdapter`] trait with three backends:
//!
//! - [`LocalStorage`] — files under a base directory
//! - [`S3Storage`] — an S3-compatible object store
//! - [`MemoryStorage`] — an internally synchronized test double
//!
//! The backend is selected once in the composition root (object-store
//! credentials present or not); nothing else branches on backend identity.
//! Local and S3 provide no path-level locking — concurrent writers to the
//! same path race and the last writer to complete wins. Only the in-memory
//! backend serializes access, behind one reader/writer lock over its whole
//! keyspace.

pub mod adapter;
pub mod backends;

pub use adapter::StorageAdapter;
pub use backends::local::LocalStorage;
pub use backends::memory::MemoryStorage;
pub use backends::s3::S3Storage;

pub use error_common::{StorageError, StorageResult};
