// src/error.rs

//! Crate-wide error type
//!
//! A conversion attempt fails with exactly one of four error classes:
//! grammar-level parse errors, translation-level semantic errors,
//! XML writer faults, or plain I/O errors. All four are fatal for the
//! current call; the rewriter rolls back and the original file stays
//! byte-for-byte unchanged.

use thiserror::Error;

use crate::legacy::ParseError;
use crate::mapper::SemanticError;
use crate::xml::SerializationFault;

/// Error surfaced to the caller of a conversion
#[derive(Debug, Error)]
pub enum Error {
    /// The legacy file is not grammatically well-formed
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The legacy tree cannot be translated to the modern format
    #[error("semantic error: {0}")]
    Semantic(#[from] SemanticError),

    /// The XML writer could not emit the modern tree
    #[error("serialization fault: {0}")]
    Serialize(#[from] SerializationFault),

    /// Read/write/rename failure at any stage
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
