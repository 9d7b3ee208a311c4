//! The generated query: a union of `SELECT DISTINCT` joins, rendered for
//! SQLite.

use itertools::Itertools;

use crate::ast::{ColumnName, Literal, RelationName, VariableName};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnRef {
    pub alias: String,
    pub column: ColumnName,
}

impl ColumnRef {
    pub fn to_sql(&self) -> String {
        format!("{}.{}", quote_identifier(&self.alias), quote_identifier(&self.column))
    }
}

/// A relation in a `FROM` list under a name unique to its select.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    pub relation: RelationName,
    pub alias: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputColumn {
    pub column: ColumnRef,
    pub name: VariableName,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Condition {
    pub lhs: ColumnRef,
    pub rhs: Value,
}

impl Condition {
    pub fn to_sql(&self) -> String {
        format!("{} = {}", self.lhs.to_sql(), self.rhs.to_sql())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Column(ColumnRef),
    Literal(Literal),
}

impl Value {
    pub fn to_sql(&self) -> String {
        match self {
            Value::Column(column) => column.to_sql(),
            Value::Literal(Literal::String(s)) => format!("'{}'", s.replace('\'', "''")),
            // Columns hold text, so digits compare as the string written.
            Value::Literal(Literal::Number(digits)) => format!("'{}'", digits),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Select {
    pub projection: Vec<OutputColumn>,
    pub sources: Vec<Source>,
    pub selection: Vec<Condition>,
}

impl Select {
    pub fn to_sql(&self) -> String {
        let mut s = String::new();
        s.push_str("SELECT DISTINCT ");
        s.push_str(
            &self
                .projection
                .iter()
                .map(|output| {
                    format!("{} AS {}", output.column.to_sql(), quote_identifier(&output.name))
                })
                .join(", "),
        );

        s.push_str("\nFROM ");
        s.push_str(
            &self
                .sources
                .iter()
                .map(|source| {
                    format!(
                        "{} AS {}",
                        quote_identifier(&source.relation),
                        quote_identifier(&source.alias)
                    )
                })
                .join(", "),
        );

        if !self.selection.is_empty() {
            s.push_str("\nWHERE ");
            s.push_str(&self.selection.iter().map(Condition::to_sql).join("\n  AND "));
        }

        s
    }
}

/// Selects combined with `UNION`, ordered ascending on every output column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionQuery {
    pub output: Vec<VariableName>,
    pub selects: Vec<Select>,
}

impl UnionQuery {
    pub fn is_empty(&self) -> bool {
        self.selects.is_empty()
    }

    /// `None` for a union of no selects, which has no SQL form; its result
    /// is the empty set.
    pub fn to_sql(&self) -> Option<String> {
        if self.selects.is_empty() {
            return None;
        }
        let mut s = self.selects.iter().map(Select::to_sql).join("\nUNION\n");
        // Ordinals rather than names, since a name may be requested twice.
        s.push_str("\nORDER BY ");
        s.push_str(&(1..=self.output.len()).map(|i| format!("{} ASC", i)).join(", "));
        Some(s)
    }
}

pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn col(alias: &str, column: &str) -> ColumnRef {
        ColumnRef {
            alias: alias.to_owned(),
            column: column.to_owned(),
        }
    }

    fn select_one(relation: &str, name: &str) -> Select {
        let alias = format!("{}_0", relation);
        Select {
            projection: vec![OutputColumn {
                column: col(&alias, "a"),
                name: name.to_owned(),
            }],
            sources: vec![Source {
                relation: relation.to_owned(),
                alias,
            }],
            selection: vec![],
        }
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            Value::Literal(Literal::String("it's".to_owned())).to_sql(),
            "'it''s'"
        );
        assert_eq!(
            Value::Literal(Literal::Number("007".to_owned())).to_sql(),
            "'007'"
        );
        assert_eq!(quote_identifier("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_select_with_conditions() {
        let mut select = select_one("r", "X");
        select.sources.push(Source {
            relation: "s".to_owned(),
            alias: "s_1".to_owned(),
        });
        select.selection = vec![
            Condition {
                lhs: col("r_0", "b"),
                rhs: Value::Literal(Literal::String("x".to_owned())),
            },
            Condition {
                lhs: col("r_0", "a"),
                rhs: Value::Column(col("s_1", "a")),
            },
        ];
        assert_eq!(
            select.to_sql(),
            "SELECT DISTINCT \"r_0\".\"a\" AS \"X\"\n\
             FROM \"r\" AS \"r_0\", \"s\" AS \"s_1\"\n\
             WHERE \"r_0\".\"b\" = 'x'\n  \
             AND \"r_0\".\"a\" = \"s_1\".\"a\""
        );
    }

    #[test]
    fn test_union() {
        let union = UnionQuery {
            output: vec!["X".to_owned()],
            selects: vec![select_one("a", "X"), select_one("b", "X")],
        };
        assert_eq!(
            union.to_sql().unwrap(),
            "SELECT DISTINCT \"a_0\".\"a\" AS \"X\"\n\
             FROM \"a\" AS \"a_0\"\n\
             UNION\n\
             SELECT DISTINCT \"b_0\".\"a\" AS \"X\"\n\
             FROM \"b\" AS \"b_0\"\n\
             ORDER BY 1 ASC"
        );
    }

    #[test]
    fn test_empty_union() {
        let union = UnionQuery {
            output: vec!["X".to_owned()],
            selects: vec![],
        };
        assert!(union.is_empty());
        assert_eq!(union.to_sql(), None);
    }
}
