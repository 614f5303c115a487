use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Not a .docx file: {0}")]
    NotDocx(PathBuf),

    #[error("Invalid or corrupted .docx container: {0}")]
    InvalidContainer(PathBuf),

    #[error("Malformed document XML: {0}")]
    MalformedXml(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
