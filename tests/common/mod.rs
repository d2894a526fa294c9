//! Helpers shared by the integration tests

#![allow(dead_code)]

#[path = "../../src/test/builder.rs"]
mod builder;

use std::path::PathBuf;

pub use builder::ModuleBuilder;
use tempfile::TempDir;

pub const I4: &[u8] = &[0x08];
pub const I8: &[u8] = &[0x0A];
pub const BOOLEAN: &[u8] = &[0x02];
pub const STRING: &[u8] = &[0x0E];

/// Write the image of `builder` into a fresh temporary directory
///
/// The directory is removed when the returned guard is dropped.
pub fn write_module(builder: ModuleBuilder, file_name: &str) -> (TempDir, PathBuf) {
    write_bytes(&builder.build(), file_name)
}

pub fn write_bytes(data: &[u8], file_name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(file_name);
    std::fs::write(&path, data).unwrap();
    (dir, path)
}
