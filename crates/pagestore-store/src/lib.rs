//! Path-addressed hierarchical document store.
//!
//! Documents are JSON texts stored one per file below a data root. A
//! document's key is its slash-delimited path relative to that root, e.g.
//! `pages/home.json`.
//!
//! # Components
//!
//! - [`DocumentKey`] -- validated key; resolves to a path that cannot escape
//!   the data root
//! - [`walk::list_files`] -- recursive enumeration of every regular file
//! - [`DocumentStore`] -- snapshot (`load_all`) and `upsert` operations
//!
//! # Storage Backends
//!
//! - [`FsDocumentStore`] -- one file per document under a root directory
//! - [`InMemoryDocumentStore`] -- `BTreeMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. An absent data root is an empty store, not an error.
//! 2. Parent directories are created on demand before a document is written.
//! 3. Writes replace a document's content in full.
//! 4. Snapshots are all-or-nothing.
//! 5. Concurrent writes to one key are last-writer-wins; the filesystem is
//!    the only coordination point.
//! 6. All I/O errors are propagated, never silently ignored.

pub mod document;
pub mod error;
pub mod fs;
pub mod key;
pub mod memory;
pub mod traits;
pub mod walk;

// Re-export primary types at crate root for ergonomic imports.
pub use document::{Document, UpsertRequest};
pub use error::{StoreError, StoreResult};
pub use fs::FsDocumentStore;
pub use key::{resolve_within, DocumentKey};
pub use memory::InMemoryDocumentStore;
pub use traits::DocumentStore;
