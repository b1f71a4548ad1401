//! Character-stream lexer. Hand-rolled in the read/peek style rather than a
//! derive-macro lexer, since the grammar needs one-character lookahead
//! decisions (`=` vs `==`, `-` vs `->`, `/` vs `//`) that are easiest to
//! express directly.

use tracing::debug;

use crate::error::{Error, QasmSyntaxError};
use crate::token::Token;

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        debug!(chars = source.chars().count(), "starting lexing");
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn read(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.read();
                }
                Some('/') if self.peek_at(1) == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.read();
                    }
                }
                _ => break,
            }
        }
    }

    /// Produce the next token. Returns `Token::EndOfFile` once and only once
    /// at the end of input; callers that keep calling past that point will
    /// keep receiving `EndOfFile`. A lone `=` (not followed by a second `=`)
    /// fails immediately rather than producing a token the parser would have
    /// to puzzle over.
    pub fn next_token(&mut self) -> Result<Token, Error> {
        self.skip_whitespace_and_comments();

        let c = match self.read() {
            Some(c) => c,
            None => return Ok(Token::EndOfFile),
        };

        let token = match c {
            ';' => Token::Semicolon,
            ',' => Token::Comma,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LSParen,
            ']' => Token::RSParen,
            '{' => Token::LCParen,
            '}' => Token::RCParen,
            '+' => Token::Plus,
            '*' => Token::Times,
            '^' => Token::Power,
            '-' => {
                if self.peek() == Some('>') {
                    self.read();
                    Token::Arrow
                } else {
                    Token::Minus
                }
            }
            '/' => {
                // `//` comments are consumed by skip_whitespace_and_comments;
                // a lone `/` here is division.
                Token::Divide
            }
            '=' => {
                if self.peek() == Some('=') {
                    self.read();
                    Token::Equals
                } else {
                    return Err(QasmSyntaxError::MissingEqualSign.into());
                }
            }
            '"' => {
                let mut s = String::new();
                loop {
                    match self.read() {
                        Some('"') | None => break,
                        Some(c) => s.push(c),
                    }
                }
                Token::Filename(s)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut s = String::new();
                s.push(c);
                while let Some(c) = self.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        s.push(c);
                        self.read();
                    } else {
                        break;
                    }
                }
                Token::keyword_or_id(s)
            }
            c if c.is_ascii_digit() => {
                let mut s = String::new();
                s.push(c);
                let mut is_real = false;
                while let Some(c) = self.peek() {
                    if c.is_ascii_digit() {
                        s.push(c);
                        self.read();
                    } else if c == '.' && !is_real {
                        is_real = true;
                        s.push(c);
                        self.read();
                    } else {
                        break;
                    }
                }
                if is_real {
                    Token::Real(s.parse().unwrap_or(0.0))
                } else {
                    Token::Integer(s.parse().unwrap_or(0))
                }
            }
            other => Token::Illegal(other),
        };
        Ok(token)
    }
}

impl Iterator for Lexer {
    type Item = Result<Token, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(Token::EndOfFile) => None,
            Ok(t) => Some(Ok(t)),
            Err(e) => Some(Err(e)),
        }
    }
}
