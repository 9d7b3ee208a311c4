use thiserror::Error;

use crate::facts::FactError;
use crate::grammar::ParseError;
use crate::lexer::LexError;
use crate::schema::SchemaError;
use crate::store::StoreError;
use crate::translator::TranslateError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to lex query: {0}")]
    Lex(#[from] LexError),
    #[error("failed to parse query: {0}")]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Translate(#[from] TranslateError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("failed to read facts: {0}")]
    Facts(#[from] FactError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
