//! Cardinality-validated joins and concatenation of tables.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IngestionError, MdverseError, Result};
use crate::input::DataTable;
use crate::schema::ColumnType;

/// Join strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinHow {
    /// Keep only left rows with a match.
    Inner,
    /// Keep every left row; unmatched ones get null right columns.
    Left,
}

/// Declared relationship between the two sides of a join.
///
/// The "one" side of a relationship must not contain duplicate keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl Cardinality {
    fn left_unique(&self) -> bool {
        matches!(self, Cardinality::OneToOne | Cardinality::OneToMany)
    }

    fn right_unique(&self) -> bool {
        matches!(self, Cardinality::OneToOne | Cardinality::ManyToOne)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Cardinality::OneToOne => "one_to_one",
            Cardinality::OneToMany => "one_to_many",
            Cardinality::ManyToOne => "many_to_one",
            Cardinality::ManyToMany => "many_to_many",
        };
        f.write_str(name)
    }
}

fn key_indices(table: &DataTable, keys: &[&str]) -> Result<Vec<usize>> {
    keys.iter()
        .map(|k| {
            table
                .column_index(k)
                .ok_or_else(|| MdverseError::MissingColumn {
                    table: table.name.clone(),
                    column: k.to_string(),
                })
        })
        .collect()
}

fn row_key<'a>(row: &'a [String], indices: &[usize]) -> Vec<&'a str> {
    indices
        .iter()
        .map(|&i| row.get(i).map(|s| s.trim()).unwrap_or(""))
        .collect()
}

fn index_rows<'a>(table: &'a DataTable, indices: &[usize]) -> HashMap<Vec<&'a str>, Vec<usize>> {
    let mut index: HashMap<Vec<&str>, Vec<usize>> = HashMap::new();
    for (row_idx, row) in table.rows.iter().enumerate() {
        index.entry(row_key(row, indices)).or_default().push(row_idx);
    }
    index
}

/// First duplicated key in table order, if any.
fn first_duplicate(
    table: &DataTable,
    index: &HashMap<Vec<&str>, Vec<usize>>,
    indices: &[usize],
) -> Option<String> {
    table.rows.iter().find_map(|row| {
        let key = row_key(row, indices);
        match index.get(&key) {
            Some(rows) if rows.len() > 1 => Some(key.join(", ")),
            _ => None,
        }
    })
}

/// Join two tables on a composite key, validating the declared cardinality.
///
/// Output columns are the left columns followed by the right non-key columns.
/// Non-key names present on both sides get `_x` (left) and `_y` (right)
/// suffixes. Output rows follow left row order; several right matches for one
/// left row appear in right row order.
pub fn join(
    left: &DataTable,
    right: &DataTable,
    keys: &[&str],
    how: JoinHow,
    validate: Cardinality,
) -> Result<DataTable> {
    let left_keys = key_indices(left, keys)?;
    let right_keys = key_indices(right, keys)?;

    let left_index = index_rows(left, &left_keys);
    let right_index = index_rows(right, &right_keys);

    let violation = |side: &str, key: String| IngestionError::CardinalityViolation {
        left: left.name.clone(),
        right: right.name.clone(),
        validate: validate.to_string(),
        side: side.to_string(),
        key,
    };
    if validate.left_unique() {
        if let Some(key) = first_duplicate(left, &left_index, &left_keys) {
            return Err(violation("left", key).into());
        }
    }
    if validate.right_unique() {
        if let Some(key) = first_duplicate(right, &right_index, &right_keys) {
            return Err(violation("right", key).into());
        }
    }

    let right_columns: Vec<usize> = (0..right.column_count())
        .filter(|i| !right_keys.contains(i))
        .collect();

    let mut headers: Vec<String> = Vec::with_capacity(left.column_count() + right_columns.len());
    for (i, name) in left.headers.iter().enumerate() {
        let collides = !left_keys.contains(&i)
            && right_columns.iter().any(|&r| &right.headers[r] == name);
        headers.push(if collides { format!("{}_x", name) } else { name.clone() });
    }
    for &r in &right_columns {
        let name = &right.headers[r];
        let collides = left
            .headers
            .iter()
            .enumerate()
            .any(|(i, h)| h == name && !left_keys.contains(&i));
        headers.push(if collides { format!("{}_y", name) } else { name.clone() });
    }

    let mut column_types: Vec<ColumnType> = left.column_types.clone();
    column_types.resize(left.column_count(), ColumnType::Unknown);
    column_types.extend(right_columns.iter().map(|&r| right.column_type(r)));

    let mut rows = Vec::with_capacity(left.row_count());
    for row in &left.rows {
        let key = row_key(row, &left_keys);
        match right_index.get(&key) {
            Some(matches) => {
                for &m in matches {
                    let mut combined = row.clone();
                    let right_row = &right.rows[m];
                    combined.extend(
                        right_columns
                            .iter()
                            .map(|&r| right_row.get(r).cloned().unwrap_or_default()),
                    );
                    rows.push(combined);
                }
            }
            None if how == JoinHow::Left => {
                let mut combined = row.clone();
                combined.extend(std::iter::repeat_n(String::new(), right_columns.len()));
                rows.push(combined);
            }
            None => {}
        }
    }

    Ok(DataTable::with_types(left.name.clone(), headers, column_types, rows))
}

/// Stack tables vertically, keeping table order then row order.
///
/// Headers are unioned in first-seen order; missing cells are null. Rows are
/// never deduplicated.
pub fn concat(name: impl Into<String>, tables: &[DataTable]) -> DataTable {
    let mut headers: Vec<String> = Vec::new();
    let mut column_types: Vec<ColumnType> = Vec::new();

    for table in tables {
        for (i, header) in table.headers.iter().enumerate() {
            let ty = table.column_type(i);
            match headers.iter().position(|h| h == header) {
                Some(pos) => column_types[pos] = column_types[pos].unify(ty),
                None => {
                    headers.push(header.clone());
                    column_types.push(ty);
                }
            }
        }
    }

    let mut rows = Vec::with_capacity(tables.iter().map(|t| t.row_count()).sum());
    for table in tables {
        let mapping: Vec<Option<usize>> = headers
            .iter()
            .map(|h| table.column_index(h))
            .collect();
        for row in &table.rows {
            rows.push(
                mapping
                    .iter()
                    .map(|m| m.and_then(|i| row.get(i).cloned()).unwrap_or_default())
                    .collect(),
            );
        }
    }

    DataTable::with_types(name, headers, column_types, rows)
}
