//! Tokenizer for unit specification text.
//!
//! Token types:
//! - **Text**: a double quoted string, escapes already resolved
//! - **Word**: a run of ASCII letters, digits, `_` and `-`; the parser decides
//!   whether it is an integer, a boolean, a type name segment or a reference
//! - punctuation: `(` `)` `[` `]` `{` `}` `,` `:` `.`

use std::fmt;

use crate::error::SyntaxError;
use crate::name::is_name_char;

/// A classified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A text literal with its escapes resolved
    Text(String),
    /// An identifier, integer or boolean
    Word(String),
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `.`
    Dot,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Text(text) => write!(f, "text {text:?}"),
            Token::Word(word) => write!(f, "'{word}'"),
            Token::OpenParen => write!(f, "'('"),
            Token::CloseParen => write!(f, "')'"),
            Token::OpenBracket => write!(f, "'['"),
            Token::CloseBracket => write!(f, "']'"),
            Token::OpenBrace => write!(f, "'{{'"),
            Token::CloseBrace => write!(f, "'}}'"),
            Token::Comma => write!(f, "','"),
            Token::Colon => write!(f, "':'"),
            Token::Dot => write!(f, "'.'"),
        }
    }
}

/// A token together with the byte offset it starts at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    /// The token
    pub token: Token,
    /// Byte offset of the token's first character
    pub offset: usize,
}

/// Split `input` into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some((offset, ch)) = chars.next() {
        let token = match ch {
            c if c.is_whitespace() => continue,
            '#' => {
                // Comment runs to the end of the line
                while chars.next_if(|&(_, c)| c != '\n').is_some() {}
                continue;
            }
            '(' => Token::OpenParen,
            ')' => Token::CloseParen,
            '[' => Token::OpenBracket,
            ']' => Token::CloseBracket,
            '{' => Token::OpenBrace,
            '}' => Token::CloseBrace,
            ',' => Token::Comma,
            ':' => Token::Colon,
            '.' => Token::Dot,
            '"' => {
                let mut text = String::new();
                loop {
                    match chars.next() {
                        None => return Err(SyntaxError::UnterminatedText { offset }),
                        Some((_, '"')) => break,
                        Some((escape_at, '\\')) => match chars.next() {
                            Some((_, '"')) => text.push('"'),
                            Some((_, '\\')) => text.push('\\'),
                            Some((_, 'n')) => text.push('\n'),
                            Some((_, 't')) => text.push('\t'),
                            Some((_, found)) => {
                                return Err(SyntaxError::InvalidEscape {
                                    found,
                                    offset: escape_at,
                                });
                            }
                            None => return Err(SyntaxError::UnterminatedText { offset }),
                        },
                        Some((_, c)) => text.push(c),
                    }
                }
                Token::Text(text)
            }
            c if is_name_char(c) => {
                let mut word = String::from(c);
                while let Some((_, c)) = chars.next_if(|&(_, c)| is_name_char(c)) {
                    word.push(c);
                }
                Token::Word(word)
            }
            found => return Err(SyntaxError::UnexpectedCharacter { found, offset }),
        };
        tokens.push(Spanned { token, offset });
    }

    Ok(tokens)
}
