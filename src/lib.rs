// src/lib.rs

//! Soundwell legacy project converter
//!
//! Rewrites a Soundwell 1.0 project file into the modern XML project
//! format, in place. The conversion either fully succeeds or leaves
//! the original file byte-for-byte unchanged: parse and translation
//! run against the original read-only, the modern document is written
//! to a temporary file in the same directory, and only a fully synced
//! temporary is ever swapped into place.
//!
//! # Architecture
//!
//! - Parse-first: the whole legacy tree is built and validated before
//!   any byte is written anywhere
//! - `legacy`: tokenizer and parser for the 1.0 line grammar
//! - `mapper`: legacy tree to modern tree translation, driven by one
//!   auditable tag catalog
//! - `blockfile`: resolution of references to external audio blocks
//! - `xml`: modern document tree and XML serializer
//! - `rewrite`: the transactional in-place rewriter

pub mod blockfile;
mod error;
pub mod legacy;
pub mod mapper;
pub mod rewrite;
pub mod xml;

pub use blockfile::{BlockResolver, DirectoryBlockStore};
pub use error::{Error, Result};
pub use legacy::{LegacyNode, ParseError};
pub use mapper::{MappedDocument, SemanticError};
pub use rewrite::{ConversionReport, ConvertOptions, ConvertPhase, convert_project_file};
pub use xml::{ModernNode, SerializationFault};
