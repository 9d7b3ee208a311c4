use std::collections::{hash_map, HashMap};

use thiserror::Error;

use crate::ast::{Argument, ColumnName, Conjunction, Predicate, Query, VariableName};
use crate::schema::Schema;
use crate::sql::{ColumnRef, Condition, OutputColumn, Select, Source, UnionQuery, Value};

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TranslateError {
    #[error("unknown relation `{relation}` in conjunction `{conjunction}`")]
    UnknownRelation {
        relation: String,
        conjunction: String,
    },
    #[error(
        "wrong number of arguments in `{predicate}`: expected {expected}, found {found}, \
         in conjunction `{conjunction}`"
    )]
    ArityMismatch {
        predicate: String,
        expected: usize,
        found: usize,
        conjunction: String,
    },
    #[error("variable `{variable}` is not bound in conjunction `{conjunction}`")]
    UnboundVariable {
        variable: VariableName,
        conjunction: String,
    },
    #[error("no output variables requested")]
    NoOutputVariables,
}

/// Compiles `query` into a union with one select per conjunction, each
/// projecting `wants` in order.
///
/// Any failing conjunction fails the whole query.
pub fn translate(
    schema: &Schema,
    wants: &[VariableName],
    query: &Query,
) -> Result<UnionQuery, TranslateError> {
    if wants.is_empty() {
        return Err(TranslateError::NoOutputVariables);
    }
    let selects = query
        .0
        .iter()
        .map(|conjunction| translate_conjunction(schema, wants, conjunction))
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(selects = selects.len(), "translated query");
    Ok(UnionQuery {
        output: wants.to_vec(),
        selects,
    })
}

fn translate_conjunction(
    schema: &Schema,
    wants: &[VariableName],
    conjunction: &Conjunction,
) -> Result<Select, TranslateError> {
    let columns = conjunction
        .0
        .iter()
        .map(|predicate| check_predicate(schema, conjunction, predicate))
        .collect::<Result<Vec<_>, _>>()?;

    let mut builder = SelectBuilder::default();
    for (index, (predicate, columns)) in conjunction.0.iter().zip(columns).enumerate() {
        builder.add_predicate(index, predicate, columns);
    }
    builder.finish(wants, conjunction)
}

/// Looks up the columns `predicate` binds, checking its argument count.
fn check_predicate<'s>(
    schema: &'s Schema,
    conjunction: &Conjunction,
    predicate: &Predicate,
) -> Result<&'s [ColumnName], TranslateError> {
    let columns = schema
        .columns(&predicate.name)
        .ok_or_else(|| TranslateError::UnknownRelation {
            relation: predicate.name.clone(),
            conjunction: conjunction.to_string(),
        })?;
    if predicate.args.len() != columns.len() {
        return Err(TranslateError::ArityMismatch {
            predicate: predicate.to_string(),
            expected: columns.len(),
            found: predicate.args.len(),
            conjunction: conjunction.to_string(),
        });
    }
    Ok(columns)
}

/// Every coordinate at which one variable occurs, in occurrence order.
#[derive(Clone, Debug)]
struct EquivalenceClass<'a> {
    variable: &'a str,
    coordinates: Vec<ColumnRef>,
}

#[derive(Clone, Debug, Default)]
struct SelectBuilder<'a> {
    sources: Vec<Source>,
    constants: Vec<Condition>,
    classes: Vec<EquivalenceClass<'a>>,
    class_index: HashMap<&'a str, usize>,
}

impl<'a> SelectBuilder<'a> {
    fn add_predicate(&mut self, index: usize, predicate: &'a Predicate, columns: &[ColumnName]) {
        // Relation names are alphanumeric, so the underscore keeps aliases
        // distinct even when a name ends in digits.
        let alias = format!("{}_{}", predicate.name, index);

        for (argument, column) in predicate.args.iter().zip(columns) {
            let coordinate = ColumnRef {
                alias: alias.clone(),
                column: column.clone(),
            };
            match argument {
                Argument::Wildcard => {}

                Argument::Literal(literal) => self.constants.push(Condition {
                    lhs: coordinate,
                    rhs: Value::Literal(literal.clone()),
                }),

                Argument::Variable(variable) => match self.class_index.entry(variable.as_str()) {
                    hash_map::Entry::Occupied(occupied) => {
                        self.classes[*occupied.get()].coordinates.push(coordinate);
                    }
                    hash_map::Entry::Vacant(vacant) => {
                        vacant.insert(self.classes.len());
                        self.classes.push(EquivalenceClass {
                            variable: variable.as_str(),
                            coordinates: vec![coordinate],
                        });
                    }
                },
            }
        }

        self.sources.push(Source {
            relation: predicate.name.clone(),
            alias,
        });
    }

    fn finish(
        self,
        wants: &[VariableName],
        conjunction: &Conjunction,
    ) -> Result<Select, TranslateError> {
        let projection = wants
            .iter()
            .map(|want| -> Result<OutputColumn, TranslateError> {
                let class = self
                    .class_index
                    .get(want.as_str())
                    .map(|&i| &self.classes[i])
                    .ok_or_else(|| TranslateError::UnboundVariable {
                        variable: want.clone(),
                        conjunction: conjunction.to_string(),
                    })?;
                Ok(OutputColumn {
                    column: class.coordinates[0].clone(),
                    name: want.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        // Equality is transitive, so chaining neighbours constrains the
        // whole class.
        let joins = self.classes.iter().flat_map(|class| {
            tracing::trace!(
                variable = class.variable,
                occurrences = class.coordinates.len(),
                "equivalence class"
            );
            class.coordinates.windows(2).map(|pair| Condition {
                lhs: pair[0].clone(),
                rhs: Value::Column(pair[1].clone()),
            })
        });
        let selection = self.constants.iter().cloned().chain(joins).collect();

        Ok(Select {
            projection,
            sources: self.sources,
            selection,
        })
    }
}
