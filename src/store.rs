use itertools::Itertools;
use rusqlite::{params_from_iter, types::ValueRef, Connection};
use thiserror::Error;

use crate::facts::{Fact, Facts};
use crate::schema::Schema;
use crate::sql::{quote_identifier, UnionQuery};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error")]
    Sqlite(#[from] rusqlite::Error),
    #[error("column {column} of the result holds a blob")]
    Blob { column: usize },
}

pub type Row = Vec<String>;

/// An in-memory SQLite database holding one table per relation, every
/// column `VARCHAR NOT NULL`.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Creates the tables of `facts.schema` and inserts every fact in one
    /// transaction.
    pub fn load(facts: &Facts) -> Result<Self, StoreError> {
        let mut store = Self::open_in_memory()?;
        let tx = store.conn.transaction()?;
        create_tables(&tx, &facts.schema)?;
        for fact in &facts.facts {
            insert(&tx, fact)?;
        }
        tx.commit()?;
        Ok(store)
    }

    pub fn create_tables(&self, schema: &Schema) -> Result<(), StoreError> {
        create_tables(&self.conn, schema)
    }

    pub fn insert(&self, fact: &Fact) -> Result<(), StoreError> {
        insert(&self.conn, fact)
    }

    /// Runs `query`, returning every value as text. A union of no selects
    /// yields no rows without touching the database.
    pub fn execute(&self, query: &UnionQuery) -> Result<Vec<Row>, StoreError> {
        let Some(sql) = query.to_sql() else {
            return Ok(vec![]);
        };
        tracing::debug!(%sql, "executing");

        let mut stmt = self.conn.prepare(&sql)?;
        let column_count = stmt.column_count();
        let mut rows = stmt.query([])?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            let row = (0..column_count)
                .map(|i| -> Result<String, StoreError> {
                    Ok(match row.get_ref(i)? {
                        ValueRef::Null => String::new(),
                        ValueRef::Integer(x) => x.to_string(),
                        ValueRef::Real(x) => x.to_string(),
                        ValueRef::Text(s) => String::from_utf8_lossy(s).into_owned(),
                        ValueRef::Blob(_) => return Err(StoreError::Blob { column: i }),
                    })
                })
                .collect::<Result<Row, _>>()?;
            result.push(row);
        }
        tracing::debug!(rows = result.len(), "query returned");
        Ok(result)
    }

    #[cfg(test)]
    fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn create_tables(conn: &Connection, schema: &Schema) -> Result<(), StoreError> {
    for (relation, columns) in schema.relations() {
        let sql = format!(
            "CREATE TABLE {} ({});",
            quote_identifier(relation),
            columns
                .iter()
                .map(|column| format!("{} VARCHAR NOT NULL", quote_identifier(column)))
                .join(", ")
        );
        tracing::debug!(%sql, "creating table");
        conn.execute(&sql, [])?;
    }
    Ok(())
}

fn insert(conn: &Connection, fact: &Fact) -> Result<(), StoreError> {
    let sql = format!(
        "INSERT INTO {} VALUES ({})",
        quote_identifier(&fact.relation),
        std::iter::repeat("?").take(fact.values.len()).join(", ")
    );
    conn.prepare_cached(&sql)?
        .execute(params_from_iter(fact.values.iter()))?;
    Ok(())
}
