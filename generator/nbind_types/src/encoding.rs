//! Parser for the native type-encoding strings the scanner emits.
//!
//! The grammar is the inverse of `NType`'s `Display`:
//!
//! ```text
//! type      := qualifier* ( prim | 'v' | '@' | '#' | ':' | '^' type
//!              | '{' composite '}' | '(' composite ')' | '[' digits type ']' )
//! composite := name ( '=' member* )?
//! member    := ( '"' name '"' )? type
//! ```
//!
//! Qualifiers (`r`, `n`, `N`, `o`, `O`, `R`, `V`) carry no shape and are skipped.
//! A composite named `?` is anonymous.

use std::str::FromStr;

use thiserror::Error;

use crate::descriptor::{Composite, Member, NType, Primitive};
use crate::stack::ensure_sufficient_stack;

/// Failure to parse a type encoding.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("invalid type encoding at byte {offset}: {kind}")]
pub struct DescriptorParseError {
    pub offset: usize,
    pub kind: ParseErrorKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unexpected character `{0}`")]
    UnexpectedChar(char),
    #[error("array length is missing or out of range")]
    BadArrayLength,
    #[error("trailing input after a complete type")]
    TrailingInput,
}

impl FromStr for NType {
    type Err = DescriptorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = EncodingParser::new(s);
        let ty = parser.parse_type()?;
        if parser.pos < parser.src.len() {
            return Err(parser.error(ParseErrorKind::TrailingInput));
        }
        Ok(ty)
    }
}

/// Parse a single encoded type, rejecting trailing input.
pub fn parse_encoding(s: &str) -> Result<NType, DescriptorParseError> {
    s.parse()
}

struct EncodingParser<'a> {
    src: &'a str,
    pos: usize,
}

const QUALIFIERS: &[char] = &['r', 'n', 'N', 'o', 'O', 'R', 'V'];

impl<'a> EncodingParser<'a> {
    fn new(src: &'a str) -> Self {
        EncodingParser { src, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn error(&self, kind: ParseErrorKind) -> DescriptorParseError {
        DescriptorParseError {
            offset: self.pos,
            kind,
        }
    }

    fn expect(&mut self, want: char) -> Result<(), DescriptorParseError> {
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(ParseErrorKind::UnexpectedChar(c))),
            None => Err(self.error(ParseErrorKind::UnexpectedEnd)),
        }
    }

    fn parse_type(&mut self) -> Result<NType, DescriptorParseError> {
        ensure_sufficient_stack(|| {
            while self.peek().is_some_and(|c| QUALIFIERS.contains(&c)) {
                self.bump();
            }
            let Some(c) = self.peek() else {
                return Err(self.error(ParseErrorKind::UnexpectedEnd));
            };
            if let Some(p) = Primitive::from_encoding(c) {
                self.bump();
                return Ok(NType::Primitive(p));
            }
            match c {
                'v' => {
                    self.bump();
                    Ok(NType::Void)
                }
                '@' => {
                    self.bump();
                    Ok(NType::Object)
                }
                '#' => {
                    self.bump();
                    Ok(NType::Class)
                }
                ':' => {
                    self.bump();
                    Ok(NType::Selector)
                }
                '^' => {
                    self.bump();
                    Ok(NType::pointer(self.parse_type()?))
                }
                '{' => {
                    self.bump();
                    let composite = self.parse_composite('}')?;
                    Ok(NType::Struct(composite))
                }
                '(' => {
                    self.bump();
                    let composite = self.parse_composite(')')?;
                    Ok(NType::Union(composite))
                }
                '[' => {
                    self.bump();
                    let len = self.parse_length()?;
                    let element = self.parse_type()?;
                    self.expect(']')?;
                    Ok(NType::array(len, element))
                }
                other => Err(self.error(ParseErrorKind::UnexpectedChar(other))),
            }
        })
    }

    fn parse_length(&mut self) -> Result<u32, DescriptorParseError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
        }
        self.src[start..self.pos]
            .parse()
            .map_err(|_| DescriptorParseError {
                offset: start,
                kind: ParseErrorKind::BadArrayLength,
            })
    }

    fn parse_composite(&mut self, close: char) -> Result<Composite, DescriptorParseError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c != '=' && c != close) {
            self.bump();
        }
        let name = match &self.src[start..self.pos] {
            "" | "?" => None,
            name => Some(name.to_owned()),
        };

        let mut members = Vec::new();
        match self.bump() {
            Some(c) if c == close => return Ok(Composite { name, members }),
            Some(_) => {}
            None => return Err(self.error(ParseErrorKind::UnexpectedEnd)),
        }

        loop {
            match self.peek() {
                None => return Err(self.error(ParseErrorKind::UnexpectedEnd)),
                Some(c) if c == close => {
                    self.bump();
                    return Ok(Composite { name, members });
                }
                Some('"') => {
                    self.bump();
                    let name_start = self.pos;
                    while self.peek().is_some_and(|c| c != '"') {
                        self.bump();
                    }
                    let member_name = self.src[name_start..self.pos].to_owned();
                    self.expect('"')?;
                    members.push(Member::named(member_name, self.parse_type()?));
                }
                Some(_) => members.push(Member::anonymous(self.parse_type()?)),
            }
        }
    }
}
