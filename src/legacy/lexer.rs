// src/legacy/lexer.rs

//! Line tokenizer for the 1.0 grammar
//!
//! Classifies each input line as a tag line, an attribute line
//! (`name<TAB>value`), or a close marker (`end <tag>`). Blank lines
//! are skipped; CRLF endings are normalized. The lexer knows nothing
//! about nesting — balancing close markers is the parser's job.

use super::parser::ParseError;

/// Classified input line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind<'a> {
    /// Opens a node.
    Tag(&'a str),
    /// `name<TAB>value` pair for the innermost open node.
    Attribute { name: &'a str, value: &'a str },
    /// `end <tag>` close marker.
    Close(&'a str),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind<'a>,
    /// 1-based source line.
    pub line: usize,
}

/// Tag names are lowercase identifiers; `end` is reserved for close
/// markers.
fn is_tag_ident(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        && s != "end"
}

/// Attribute names kept the 1.0 writer's mixed case (`projName`,
/// `numPoints`).
fn is_attr_ident(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

pub(crate) struct Lexer<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lines: input.lines().enumerate(),
        }
    }

    /// Next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        for (index, raw) in self.lines.by_ref() {
            let line = index + 1;
            let text = raw.strip_suffix('\r').unwrap_or(raw);
            if text.trim().is_empty() {
                continue;
            }

            if let Some((name, value)) = text.split_once('\t') {
                if !is_attr_ident(name) {
                    return Err(ParseError::MalformedAttribute {
                        reason: format!("{:?} is not a valid attribute name", name),
                        line,
                    });
                }
                return Ok(Some(Token {
                    kind: TokenKind::Attribute { name, value },
                    line,
                }));
            }

            if let Some(tag) = text.strip_prefix("end ") {
                if !is_tag_ident(tag) {
                    return Err(ParseError::UnknownTag {
                        token: text.to_string(),
                        line,
                    });
                }
                return Ok(Some(Token {
                    kind: TokenKind::Close(tag),
                    line,
                }));
            }

            if is_tag_ident(text) {
                return Ok(Some(Token {
                    kind: TokenKind::Tag(text),
                    line,
                }));
            }

            return Err(ParseError::UnknownTag {
                token: text.to_string(),
                line,
            });
        }

        Ok(None)
    }
}
