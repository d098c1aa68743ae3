//! Shared utilities

pub mod archive;
pub mod download;
pub mod fs;
pub mod process;

pub use process::ProcessBuilder;
