use std::fmt;

use itertools::Itertools;

pub type Identifier = String;
pub type RelationName = Identifier;
pub type ColumnName = Identifier;
pub type VariableName = Identifier;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Literal {
    /// Text of a double-quoted constant, escapes already resolved.
    String(String),
    /// A bare digit sequence, kept exactly as written.
    Number(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Argument {
    Variable(VariableName),
    Wildcard,
    Literal(Literal),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Predicate {
    pub name: RelationName,
    pub args: Vec<Argument>,
}

/// Predicates joined by `&&`. Order only matters for alias numbering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Conjunction(pub Vec<Predicate>);

/// Conjunctions joined by `||`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query(pub Vec<Conjunction>);

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => {
                write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
            }
            Literal::Number(digits) => f.write_str(digits),
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Variable(name) => f.write_str(name),
            Argument::Wildcard => f.write_str("*"),
            Argument::Literal(literal) => literal.fmt(f),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.args.iter().join(", "))
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(" && "))
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(" || "))
    }
}
