//! Error types for building and loading recommendation snapshots.
//!
//! Queries never fail: an unresolvable product simply yields no
//! recommendations. Only construction and I/O surface a [`RecError`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot encode error: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("snapshot decode error: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u8),

    /// Two catalog rows share the same product id.
    #[error("duplicate product id in catalog: {0}")]
    DuplicateProduct(String),

    #[error("similarity matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("non-finite similarity score at ({row}, {col})")]
    NonFiniteScore { row: usize, col: usize },

    /// A matrix does not cover its index space exactly.
    #[error("{what}: matrix dimension {matrix} does not match index length {index}")]
    DimensionMismatch {
        what: &'static str,
        matrix: usize,
        index: usize,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, RecError>;
