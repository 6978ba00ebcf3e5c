//! HTTP client for the external user directory

mod client;

pub use client::{DirectoryConfig, HttpDirectoryClient};
