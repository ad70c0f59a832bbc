//! Configuration file handling for kbcm
//!
//! `kbcm.yaml` holds where artifacts are cloned to, where the knowledge base
//! snapshot lives and which hosts artifacts are fetched from. Every field is
//! optional; environment variables override the file.

mod manager;

pub use manager::ManagerConfig;
