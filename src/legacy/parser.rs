// src/legacy/parser.rs

//! Parser for the 1.0 grammar
//!
//! Builds the [`LegacyNode`] tree from the token stream. Nesting depth
//! is unbounded in the format, so the tree is built with an explicit
//! open-node stack rather than recursion. The parser enforces three
//! things and nothing more: lines tokenize, nodes balance, and the
//! root declares the one legacy version this converter targets.

use tracing::debug;

use super::LegacyNode;
use super::lexer::{Lexer, TokenKind};

/// The version identifier Soundwell 1.0 wrote into its project files.
pub const LEGACY_VERSION: &str = "0.95";

/// Tag of the mandatory root node.
const ROOT_TAG: &str = "project";

/// Grammar-level failure. The input file is never modified.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    /// Stream ended with a node still open (truncated file).
    #[error("unexpected end of input: {context}")]
    UnexpectedEof { context: String },

    /// A line that is not a tag, attribute, or close marker.
    #[error("line {line}: {token:?} is not a legacy tag, attribute, or close marker")]
    UnknownTag { token: String, line: usize },

    /// An attribute line in an illegal position or shape.
    #[error("line {line}: malformed attribute: {reason}")]
    MalformedAttribute { reason: String, line: usize },

    /// A close marker that does not name the innermost open node.
    #[error("line {line}: close marker 'end {found}' does not match the innermost open node ({expected})")]
    UnmatchedClose {
        expected: String,
        found: String,
        line: usize,
    },

    /// Content after the root node was closed.
    #[error("line {line}: content after the project node is closed")]
    TrailingContent { line: usize },

    /// The file does not declare the supported legacy version.
    #[error("unrecognized legacy project ({found}); only version {LEGACY_VERSION} is supported")]
    VersionMismatch { found: String },
}

/// Parse a complete legacy project file into its node tree.
///
/// Grammatical validation only: every tag/attribute survives as raw
/// text for the mapper to interpret. The version gate runs as soon as
/// the root node's attribute region ends, so a wrong-version file
/// fails before its body is examined.
pub fn parse_document(input: &str) -> Result<LegacyNode, ParseError> {
    // A file starting with markup is a project that was already
    // converted; refuse at the version gate rather than tripping over
    // the first '<' as an unknown tag.
    if input.trim_start().starts_with('<') {
        return Err(ParseError::VersionMismatch {
            found: "an XML document (already in the modern format)".to_string(),
        });
    }

    let mut lexer = Lexer::new(input);
    let mut stack: Vec<LegacyNode> = Vec::new();
    let mut root: Option<LegacyNode> = None;
    let mut version_checked = false;

    while let Some(token) = lexer.next_token()? {
        if root.is_some() {
            return Err(ParseError::TrailingContent { line: token.line });
        }

        match token.kind {
            TokenKind::Tag(tag) => {
                if stack.is_empty() {
                    if tag != ROOT_TAG {
                        return Err(ParseError::VersionMismatch {
                            found: format!("root node '{tag}'"),
                        });
                    }
                } else if !version_checked {
                    // First child of the root: its attribute region is
                    // complete, gate now.
                    check_version(&stack[0])?;
                    version_checked = true;
                }
                stack.push(LegacyNode::new(tag, token.line));
            }

            TokenKind::Attribute { name, value } => {
                let Some(node) = stack.last_mut() else {
                    return Err(ParseError::MalformedAttribute {
                        reason: format!("attribute '{name}' outside of any node"),
                        line: token.line,
                    });
                };
                if !node.children.is_empty() {
                    return Err(ParseError::MalformedAttribute {
                        reason: format!("attribute '{name}' after child nodes of '{}'", node.tag),
                        line: token.line,
                    });
                }
                node.attributes.push((name.to_string(), value.to_string()));
            }

            TokenKind::Close(tag) => {
                let Some(node) = stack.pop() else {
                    return Err(ParseError::UnmatchedClose {
                        expected: "no node is open".to_string(),
                        found: tag.to_string(),
                        line: token.line,
                    });
                };
                if node.tag != tag {
                    return Err(ParseError::UnmatchedClose {
                        expected: format!("'{}'", node.tag),
                        found: tag.to_string(),
                        line: token.line,
                    });
                }
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => {
                        if !version_checked {
                            check_version(&node)?;
                            version_checked = true;
                        }
                        root = Some(node);
                    }
                }
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::UnexpectedEof {
            context: format!("node '{}' opened at line {} is never closed", open.tag, open.line),
        });
    }

    let root = root.ok_or_else(|| ParseError::UnexpectedEof {
        context: "no project node found".to_string(),
    })?;

    debug!(
        attributes = root.attributes.len(),
        children = root.children.len(),
        "parsed legacy project"
    );
    Ok(root)
}

fn check_version(root: &LegacyNode) -> Result<(), ParseError> {
    match root.attr("version") {
        Some(LEGACY_VERSION) => Ok(()),
        Some(other) => Err(ParseError::VersionMismatch {
            found: format!("version {other:?}"),
        }),
        None => Err(ParseError::VersionMismatch {
            found: "a project node without a version attribute".to_string(),
        }),
    }
}
