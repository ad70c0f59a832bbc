//! High-level operations
//!
//! - InstallOperation: resolve, fetch and import requested components
//!
//! The operation coordinates with:
//! - Resolver: dependency walk per requested component (from resolver module)
//! - Fetcher: artifact clones into the specifications root (from fetcher module)
//! - Importer: declarative files into the target store (from importer module)

pub mod install;

pub use install::{InstallOperation, InstallOptions, InstallReport};
