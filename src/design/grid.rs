use crate::error::{invalid, WagerError, WagerResult};
use serde::Serialize;
use std::str::FromStr;

/// Ordered mapping from factor name to its permissible levels.
///
/// Declaration order matters: the first factor varies slowest when the set is
/// expanded into a [`FactorTable`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactorSet {
    factors: Vec<(String, Vec<String>)>,
}

impl FactorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a factor. Names must be unique; this is checked by [`expand_grid`].
    pub fn factor<I, S>(mut self, name: &str, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.factors.push((
            name.to_string(),
            levels.into_iter().map(|l| l.to_string()).collect(),
        ));
        self
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

/// Ordered table of factor-level assignments, one `Vec<String>` per row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactorTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl FactorTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }

    /// Reads a cell and parses it into a typed value.
    pub fn parse<T: FromStr>(&self, row: usize, column: &str) -> WagerResult<T> {
        let raw = self.get(row, column).ok_or_else(|| {
            WagerError::InvalidInput(format!("no cell at row {} column '{}'", row, column))
        })?;
        raw.parse().map_err(|_| {
            WagerError::InvalidInput(format!(
                "level '{}' in column '{}' is not a valid value",
                raw, column
            ))
        })
    }
}

/// Cartesian product of every factor's levels, first factor varying slowest.
pub fn expand_grid(factors: &FactorSet) -> WagerResult<FactorTable> {
    if factors.is_empty() {
        return invalid("factor set is empty");
    }

    let mut columns: Vec<String> = Vec::with_capacity(factors.len());
    for (name, levels) in &factors.factors {
        if levels.is_empty() {
            return invalid(format!("factor '{}' has no levels", name));
        }
        if columns.contains(name) {
            return invalid(format!("factor '{}' declared twice", name));
        }
        columns.push(name.clone());
    }

    let total: usize = factors.factors.iter().map(|(_, l)| l.len()).product();
    let mut rows = Vec::with_capacity(total);

    // Odometer over level indices; the last factor ticks fastest.
    let mut idx = vec![0usize; factors.len()];
    for _ in 0..total {
        rows.push(
            factors
                .factors
                .iter()
                .zip(&idx)
                .map(|((_, levels), &i)| levels[i].clone())
                .collect(),
        );

        for pos in (0..idx.len()).rev() {
            idx[pos] += 1;
            if idx[pos] < factors.factors[pos].1.len() {
                break;
            }
            idx[pos] = 0;
        }
    }

    Ok(FactorTable { columns, rows })
}

/// Concatenates `copies` full passes over `table`.
pub fn replicate(table: &FactorTable, copies: usize) -> WagerResult<FactorTable> {
    if copies == 0 {
        return invalid("replication count must be at least 1");
    }
    let Some(target) = table.len().checked_mul(copies) else {
        return invalid(format!(
            "{} copies of a {}-row table overflow the row count",
            copies,
            table.len()
        ));
    };
    replicate_to(table, target)
}

/// Fills exactly `target_rows` rows with whole passes over `table`, followed by
/// a leading slice of one more pass for any remainder.
pub fn replicate_to(table: &FactorTable, target_rows: usize) -> WagerResult<FactorTable> {
    if table.is_empty() {
        return invalid("cannot replicate an empty table");
    }
    if target_rows == 0 {
        return invalid("replication target must be at least 1 row");
    }

    let rows = table
        .rows
        .iter()
        .cycle()
        .take(target_rows)
        .cloned()
        .collect();

    Ok(FactorTable {
        columns: table.columns.clone(),
        rows,
    })
}

/// Replicates by the fraction `numer / denom`. The product with the table size
/// must be a whole number of rows.
pub fn replicate_by(table: &FactorTable, numer: usize, denom: usize) -> WagerResult<FactorTable> {
    if denom == 0 {
        return invalid("replication denominator is zero");
    }
    let Some(scaled) = table.len().checked_mul(numer) else {
        return invalid(format!(
            "{} rows x {}/{} overflows the row count",
            table.len(),
            numer,
            denom
        ));
    };
    if scaled % denom != 0 {
        return invalid(format!(
            "{} rows x {}/{} is not a whole number of rows",
            table.len(),
            numer,
            denom
        ));
    }
    replicate_to(table, scaled / denom)
}
