//! Envpack - offline Python environment packaging
//!
//! This crate provides the build pipeline that assembles a self-contained,
//! network-independent embeddable Python runtime for the AI Playground
//! desktop application: resource fetching, environment assembly, layered
//! dependency installation, and 7-Zip archiving.

pub mod config;
pub mod ops;
pub mod util;

pub use config::{BuildPaths, Platform, ResourceSet, PLATFORM_ENV};
