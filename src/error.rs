use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
/// Batch error
pub enum BatchError {
    #[error("ItemWriter from: {0}")]
    ItemWriter(String),

    #[error("ItemReader from: {0}")]
    ItemReader(String),

    #[error("ItemProcessor from: {0}")]
    ItemProcessor(String),

    /// The input file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Bytes that cannot be decoded with the selected encoding.
    #[error("Encoding error at line {line}: {message}")]
    Encoding { line: u64, message: String },

    /// A required column is absent from the header or from a row.
    /// `line` is 1 for the header row.
    #[error("Missing column '{column}' at line {line}")]
    MissingColumn { column: String, line: u64 },

    /// The level column is not a valid integer literal.
    #[error("Invalid level '{value}' at line {line}: expected an integer")]
    InvalidLevel { line: u64, value: String },

    #[error("Unable to write file {}: {message}", path.display())]
    FileWrite { path: PathBuf, message: String },

    #[error("Error in step: {0}")]
    Step(String),
}
