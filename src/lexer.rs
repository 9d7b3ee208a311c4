use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Identifier(String),
    Number(String),
    /// A quoted literal, including its quote marks and escapes.
    Quoted(String),
    Wildcard,
    Comma,
    And,
    Or,
    LeftParen,
    RightParen,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unrecognized input at offset {position}: {remaining:?}")]
pub struct LexError {
    pub position: usize,
    pub remaining: String,
}

type Constructor = fn(&str) -> Token;

// Tried in order; the first pattern matching at the current offset wins.
static PATTERNS: Lazy<Vec<(Regex, Constructor)>> = Lazy::new(|| {
    let table: [(&str, Constructor); 9] = [
        (r"^[A-Za-z][A-Za-z0-9]*", |s| Token::Identifier(s.to_owned())),
        (r"^[0-9]+", |s| Token::Number(s.to_owned())),
        (r"^[*_]", |_| Token::Wildcard),
        (r#"^"(?:[^"\\]|\\.)*""#, |s| Token::Quoted(s.to_owned())),
        (r"^,", |_| Token::Comma),
        (r"^&&", |_| Token::And),
        (r"^\|\|", |_| Token::Or),
        (r"^\(", |_| Token::LeftParen),
        (r"^\)", |_| Token::RightParen),
    ];
    table
        .into_iter()
        .map(|(pattern, constructor)| {
            let regex = Regex::new(pattern).expect("token patterns are valid");
            (regex, constructor)
        })
        .collect()
});

pub fn lex(text: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut rest = text.trim_start();
    while !rest.is_empty() {
        let matched = PATTERNS.iter().find_map(|(regex, constructor)| {
            regex
                .find(rest)
                .map(|m| (constructor(m.as_str()), m.end()))
        });
        let Some((token, len)) = matched else {
            return Err(LexError {
                position: text.len() - rest.len(),
                remaining: rest.to_owned(),
            });
        };
        tokens.push(token);
        rest = rest[len..].trim_start();
    }
    tracing::debug!(count = tokens.len(), "lexed query");
    Ok(tokens)
}

/// Resolves the backslash escapes of a quoted literal and drops the quotes.
pub fn unquote(quoted: &str) -> String {
    let interior = quoted
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(quoted);
    let mut out = String::with_capacity(interior.len());
    let mut chars = interior.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    out
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(s) | Token::Number(s) | Token::Quoted(s) => f.write_str(s),
            Token::Wildcard => f.write_str("*"),
            Token::Comma => f.write_str(","),
            Token::And => f.write_str("&&"),
            Token::Or => f.write_str("||"),
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
        }
    }
}
