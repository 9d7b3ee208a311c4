pub mod ast;
pub mod combinator;
pub mod cursor;
pub mod error;
pub mod facts;
pub mod format;
pub mod grammar;
pub mod lexer;
pub mod schema;
pub mod sql;
pub mod store;
pub mod translator;

#[cfg(test)]
mod tests;

pub use error::{Error, Result};
pub use facts::Facts;
pub use schema::Schema;
pub use sql::UnionQuery;
pub use store::Store;

use ast::{Query, VariableName};

pub fn parse_query(text: &str) -> Result<Query> {
    let tokens = lexer::lex(text)?;
    let query = grammar::parse(&tokens)?;
    tracing::debug!(%query, "parsed query");
    Ok(query)
}

/// Splits a list of output variables on commas and whitespace.
pub fn parse_wants(text: &str) -> Vec<VariableName> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Lexes, parses and translates `text` against `schema`.
pub fn compile(schema: &Schema, wants: &[VariableName], text: &str) -> Result<UnionQuery> {
    let query = parse_query(text)?;
    Ok(translator::translate(schema, wants, &query)?)
}
