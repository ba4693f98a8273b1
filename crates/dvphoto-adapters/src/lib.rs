//! dvphoto adapters - External adapters for dvphoto.
//!
//! This crate provides adapters for:
//! - Filesystem photo source

pub mod fs;

pub use fs::{mime_for_path, FsPhotoSource};
