//! Tokenizer for formula text

use super::error::GrammarError;
use std::fmt;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    True,
    False,
    Atom(&'a str),
    Not,
    And,
    Or,
    Implies,
    Iff,
    LParen,
    RParen,
}

/// A token together with the byte offset it starts at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spanned<'a> {
    pub token: Token<'a>,
    pub offset: usize,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::True => write!(f, "T"),
            Token::False => write!(f, "F"),
            Token::Atom(name) => write!(f, "{}", name),
            Token::Not => write!(f, "~"),
            Token::And => write!(f, "&"),
            Token::Or => write!(f, "|"),
            Token::Implies => write!(f, "->"),
            Token::Iff => write!(f, "<->"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

pub struct Lexer<'a> {
    text: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            chars: text.char_indices().peekable(),
        }
    }

    /// Tokenize the whole input, stopping at the first error
    pub fn tokenize(text: &'a str) -> Result<Vec<Spanned<'a>>, GrammarError> {
        Lexer::new(text).collect()
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
            } else {
                break;
            }
        }
    }

    fn expect_char(&mut self, wanted: char) -> bool {
        match self.chars.peek() {
            Some(&(_, c)) if c == wanted => {
                self.chars.next();
                true
            }
            _ => false,
        }
    }

    fn atom(&mut self, start: usize) -> Token<'a> {
        let mut end = start + 1;
        while let Some(&(idx, c)) = self.chars.peek() {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
                self.chars.next();
                end = idx + c.len_utf8();
            } else {
                break;
            }
        }
        Token::Atom(&self.text[start..end])
    }

    fn next_token(&mut self) -> Option<Result<Spanned<'a>, GrammarError>> {
        self.skip_whitespace();
        let (offset, c) = self.chars.next()?;

        let token = match c {
            '(' => Token::LParen,
            ')' => Token::RParen,
            '~' => Token::Not,
            '&' => Token::And,
            '|' => Token::Or,
            'T' => Token::True,
            'F' => Token::False,
            '-' => {
                if !self.expect_char('>') {
                    return Some(Err(GrammarError::DanglingHyphen { offset }));
                }
                Token::Implies
            }
            '<' => {
                if !(self.expect_char('-') && self.expect_char('>')) {
                    return Some(Err(GrammarError::IncompleteEquivalence { offset }));
                }
                Token::Iff
            }
            'a'..='z' => self.atom(offset),
            c if c.is_uppercase() => {
                return Some(Err(GrammarError::UppercaseLetter { ch: c, offset }));
            }
            c => return Some(Err(GrammarError::UnexpectedChar { ch: c, offset })),
        };

        Some(Ok(Spanned { token, offset }))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Spanned<'a>, GrammarError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}
