//! Domain relational calculus grammar.
//!
//! ```text
//! query       → (disjunction)? EOF
//! disjunction → conjunction ("||" conjunction)*
//! conjunction → predicate ("&&" predicate)*
//! predicate   → identifier "(" identifier ("," identifier)* ")"
//! identifier  → IDENT | NUMBER | QUOTED | "*"
//! ```

use thiserror::Error;

use crate::ast::{Argument, Conjunction, Literal, Predicate, Query};
use crate::combinator::{eof, literal, pair, sep_by, Parser};
use crate::cursor::{Cursor, TokenStream};
use crate::lexer::{unquote, Token};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unexpected {} at token {position}", describe(.found))]
pub struct ParseError {
    pub position: usize,
    pub found: Option<String>,
}

fn describe(found: &Option<String>) -> String {
    match found {
        Some(token) => format!("`{}`", token),
        None => "end of input".to_owned(),
    }
}

fn argument_of(token: &Token) -> Option<Argument> {
    let argument = match token {
        Token::Identifier(name) => Argument::Variable(name.clone()),
        Token::Number(digits) => Argument::Literal(Literal::Number(digits.clone())),
        Token::Quoted(quoted) => Argument::Literal(Literal::String(unquote(quoted))),
        Token::Wildcard => Argument::Wildcard,
        _ => return None,
    };
    Some(argument)
}

/// Anything usable as a predicate name or argument.
pub fn identifier<S: TokenStream<Item = Token>>(stream: &mut S) -> Option<Argument> {
    let argument = argument_of(stream.peek()?)?;
    stream.pop();
    Some(argument)
}

pub fn predicate<S: TokenStream<Item = Token>>(stream: &mut S) -> Option<Predicate> {
    let head = pair(identifier::<S>, literal::<S>(Token::LeftParen));
    let args = pair(
        sep_by(literal::<S>(Token::Comma), identifier::<S>),
        literal::<S>(Token::RightParen),
    );
    let ((name, _), (args, _)) = pair(head, args).parse(stream)?;
    Some(Predicate {
        name: name.to_string(),
        args,
    })
}

pub fn conjunction<S: TokenStream<Item = Token>>(stream: &mut S) -> Option<Conjunction> {
    sep_by(literal::<S>(Token::And), predicate::<S>)
        .parse(stream)
        .map(Conjunction)
}

pub fn disjunction<S: TokenStream<Item = Token>>(stream: &mut S) -> Option<Query> {
    sep_by(literal::<S>(Token::Or), conjunction::<S>)
        .parse(stream)
        .map(Query)
}

/// A whole query: every token must be consumed. No tokens at all is the
/// query with no conjunctions.
pub fn query<S: TokenStream<Item = Token>>(stream: &mut S) -> Option<Query> {
    if eof(stream).is_some() {
        return Some(Query::default());
    }
    let (query, ()) = pair(disjunction::<S>, eof::<S>).parse(stream)?;
    Some(query)
}

pub fn parse(tokens: &[Token]) -> Result<Query, ParseError> {
    let mut cursor = Cursor::new(tokens);
    let parsed = query(&mut cursor);
    parsed.ok_or_else(|| {
        let position = cursor.furthest();
        ParseError {
            position,
            found: cursor.token_at(position).map(ToString::to_string),
        }
    })
}
