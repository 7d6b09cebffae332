//! In-memory simulation of a hierarchical file system: a tree of named
//! directories and files reachable by slash-delimited paths, with CRUD,
//! copy/move/rename, recursive search, aggregate statistics and whole-tree
//! persistence to a single serialized blob.
//!
//! The engine ([`FileSystem`]) is single-threaded and synchronous; callers
//! exposing it to multiple threads must serialize mutating calls themselves.

pub mod error;
pub mod fs;
pub mod node;
pub mod path;
pub mod state;
pub mod telemetry;

pub use error::FsError;
pub use fs::{FileSystem, SearchHit, Stats};
pub use node::{Directory, EntryKind, File, FileMetadata, Listing};
pub use state::STATE_SCHEMA;
pub use telemetry::OpLog;
