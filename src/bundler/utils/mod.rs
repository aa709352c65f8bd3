//! Shared helpers for file, network and process plumbing.

pub mod fs;
pub mod http;
pub mod process;
