//! Command implementations for kbcm CLI

pub mod install;
