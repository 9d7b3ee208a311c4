//! Line-oriented fact files.
//!
//! Each line is `relation value...`. Values are separated by whitespace; a
//! backslash escapes the next character and double quotes group a value
//! containing whitespace. Empty lines and lines whose first word starts with
//! `#` or `!` are skipped. The first row seen for a relation fixes its arity,
//! and its columns are named `a`, `b`, `c`, and so on.

use std::io::BufRead;
use std::str::FromStr;

use thiserror::Error;

use crate::ast::{ColumnName, RelationName};
use crate::schema::{Schema, SchemaError};

pub const MAX_COLUMNS: usize = 26;

#[derive(Debug, Error)]
pub enum FactError {
    #[error("line {line}: unexpected end of line: {text}")]
    UnterminatedLine { line: usize, text: String },
    #[error("line {line}: value(s) missing for `{relation}`")]
    MissingValues { line: usize, relation: RelationName },
    #[error("line {line}: too many columns for `{relation}` ({found}, at most {max})")]
    TooManyColumns {
        line: usize,
        relation: RelationName,
        found: usize,
        max: usize,
    },
    #[error("line {line}: `{relation}` has {expected} columns, but this row has {found}")]
    SchemaArity {
        line: usize,
        relation: RelationName,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("failed to read facts")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fact {
    pub relation: RelationName,
    pub values: Vec<String>,
}

#[derive(Clone, Debug, Default)]
pub struct Facts {
    pub schema: Schema,
    pub facts: Vec<Fact>,
}

impl Facts {
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, FactError> {
        let mut facts = Facts::default();
        for (i, line) in reader.lines().enumerate() {
            facts.add_line(i + 1, &line?)?;
        }
        tracing::debug!(
            relations = facts.schema.len(),
            rows = facts.facts.len(),
            "loaded facts"
        );
        Ok(facts)
    }

    fn add_line(&mut self, line: usize, text: &str) -> Result<(), FactError> {
        let mut words = split_line(text)
            .ok_or_else(|| FactError::UnterminatedLine {
                line,
                text: text.to_owned(),
            })?
            .into_iter();
        let Some(relation) = words.next() else {
            return Ok(());
        };
        if relation.starts_with('#') || relation.starts_with('!') {
            return Ok(());
        }
        let values: Vec<String> = words.collect();

        if values.is_empty() {
            return Err(FactError::MissingValues { line, relation });
        }
        if values.len() > MAX_COLUMNS {
            return Err(FactError::TooManyColumns {
                line,
                found: values.len(),
                max: MAX_COLUMNS,
                relation,
            });
        }
        match self.schema.arity(&relation) {
            None => self
                .schema
                .define(relation.clone(), default_columns(values.len()))?,
            Some(expected) if expected != values.len() => {
                return Err(FactError::SchemaArity {
                    line,
                    expected,
                    found: values.len(),
                    relation,
                });
            }
            Some(_) => {}
        }
        self.facts.push(Fact { relation, values });
        Ok(())
    }
}

impl FromStr for Facts {
    type Err = FactError;

    fn from_str(text: &str) -> Result<Self, FactError> {
        Self::from_reader(text.as_bytes())
    }
}

fn default_columns(arity: usize) -> Vec<ColumnName> {
    ('a'..='z').take(arity).map(String::from).collect()
}

/// Splits a fact line into words, or `None` if it ends inside quotes or
/// after a dangling backslash.
pub fn split_line(line: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut word = String::new();
    // Set once a word has started, so `""` still yields an empty value.
    let mut in_word = false;
    let mut escaped = false;
    let mut quoted = false;
    for c in line.chars() {
        if escaped {
            word.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
            in_word = true;
        } else if c == '"' {
            quoted = !quoted;
            in_word = true;
        } else if quoted || !c.is_whitespace() {
            word.push(c);
            in_word = true;
        } else if in_word {
            words.push(std::mem::take(&mut word));
            in_word = false;
        }
    }
    if quoted || escaped {
        return None;
    }
    if in_word {
        words.push(word);
    }
    Some(words)
}
