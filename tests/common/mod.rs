#![allow(dead_code)]

pub mod mocks;

pub use mocks::MockConsole;

use std::{
    env::temp_dir,
    fs,
    path::{Path, PathBuf},
};

use rand::distr::{Alphanumeric, SampleString};

/// Unique path in the system temp directory.
pub fn temp_path(extension: &str) -> PathBuf {
    let file_name = Alphanumeric.sample_string(&mut rand::rng(), 16);
    temp_dir().join(format!("{}.{}", file_name, extension))
}

/// Writes `content` to a fresh temp CSV file and returns its path.
pub fn write_csv(content: &[u8]) -> PathBuf {
    let path = temp_path("csv");
    fs::write(&path, content).expect("Failed to write CSV file");
    path
}

pub fn cleanup(paths: &[&Path]) {
    for path in paths {
        fs::remove_file(path).ok();
    }
}
