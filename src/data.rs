use crate::error::{PlotError, Result};
use serde_json::Value;

/// Tabular dataset: named columns over rows of string cells.
///
/// Builders never mutate a dataset. Derived columns are added to a copy with
/// [`Dataset::with_column`].
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Build a dataset from `(name, values)` column pairs.
    ///
    /// Shorter columns are padded with empty (missing) cells.
    pub fn from_columns<S: ToString>(columns: Vec<(&str, Vec<S>)>) -> Self {
        let headers: Vec<String> = columns.iter().map(|(name, _)| name.to_string()).collect();
        let n_rows = columns.iter().map(|(_, v)| v.len()).max().unwrap_or(0);

        let rows = (0..n_rows)
            .map(|i| {
                columns
                    .iter()
                    .map(|(_, values)| values.get(i).map(|v| v.to_string()).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    /// Create a dataset from a JSON array of objects
    pub fn from_json(value: &Value) -> Result<Self> {
        let array = value
            .as_array()
            .ok_or_else(|| PlotError::Data("Input data must be a JSON array of objects".to_string()))?;

        if array.is_empty() {
            return Err(PlotError::EmptyDataset);
        }

        let first_obj = array[0]
            .as_object()
            .ok_or_else(|| PlotError::Data("Items in array must be objects".to_string()))?;

        let headers: Vec<String> = first_obj.keys().cloned().collect();

        let mut rows = Vec::with_capacity(array.len());
        for item in array {
            let obj = item
                .as_object()
                .ok_or_else(|| PlotError::Data("Items in array must be objects".to_string()))?;

            let mut row = Vec::with_capacity(headers.len());
            for header in &headers {
                let cell = match obj.get(header) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    Some(Value::Bool(b)) => b.to_string(),
                    Some(Value::Null) | None => String::new(),
                    _ => {
                        return Err(PlotError::Data(format!(
                            "Unsupported value type for field '{}'",
                            header
                        )))
                    }
                };
                row.push(cell);
            }
            rows.push(row);
        }

        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by exact name
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| PlotError::MissingColumn {
                column: name.to_string(),
                available: self.headers.clone(),
            })
    }

    /// Fail with [`PlotError::MissingColumn`] on the first absent column
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        for name in names {
            self.column_index(name)?;
        }
        Ok(())
    }

    /// Fail with [`PlotError::EmptyDataset`] when there are no rows
    pub fn require_rows(&self) -> Result<()> {
        if self.rows.is_empty() {
            return Err(PlotError::EmptyDataset);
        }
        Ok(())
    }

    /// Raw string cells of a column
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| cell(row, idx)).collect())
    }

    /// Numeric cells of a column, one entry per row; missing cells are `None`
    pub fn numeric_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row_idx, row)| {
                parse_numeric(cell(row, idx)).map_err(|value| PlotError::NonNumeric {
                    column: name.to_string(),
                    row: row_idx + 1,
                    value,
                })
            })
            .collect()
    }

    /// Non-missing numeric values of a column.
    ///
    /// Fails with [`PlotError::NoNumericValues`] when every cell is missing.
    pub fn numeric_values(&self, name: &str) -> Result<Vec<f64>> {
        let values: Vec<f64> = self.numeric_column(name)?.into_iter().flatten().collect();
        if values.is_empty() {
            return Err(PlotError::NoNumericValues {
                column: name.to_string(),
            });
        }
        Ok(values)
    }

    /// Names of the columns whose non-missing cells all parse as numbers
    pub fn numeric_columns(&self) -> Vec<String> {
        self.headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| {
                let mut seen = false;
                for row in &self.rows {
                    match parse_numeric(cell(row, *idx)) {
                        Ok(Some(_)) => seen = true,
                        Ok(None) => {}
                        Err(_) => return false,
                    }
                }
                seen
            })
            .map(|(_, name)| name.clone())
            .collect()
    }

    /// Copy of the dataset with a derived column appended (or replaced)
    pub fn with_column(&self, name: &str, values: Vec<String>) -> Result<Self> {
        if values.len() != self.rows.len() {
            return Err(PlotError::Data(format!(
                "Derived column '{}' has {} values for {} rows",
                name,
                values.len(),
                self.rows.len()
            )));
        }

        let mut copy = self.clone();
        match copy.headers.iter().position(|h| h == name) {
            Some(idx) => {
                for (row, value) in copy.rows.iter_mut().zip(values) {
                    if row.len() <= idx {
                        row.resize(idx + 1, String::new());
                    }
                    row[idx] = value;
                }
            }
            None => {
                let width = copy.headers.len();
                copy.headers.push(name.to_string());
                for (row, value) in copy.rows.iter_mut().zip(values) {
                    row.resize(width, String::new());
                    row.push(value);
                }
            }
        }
        Ok(copy)
    }

    /// Rows whose index is in `indices`, in that order
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        Self {
            headers: self.headers.clone(),
            rows: indices.iter().filter_map(|&i| self.rows.get(i).cloned()).collect(),
        }
    }
}

fn cell(row: &[String], idx: usize) -> &str {
    row.get(idx).map(String::as_str).unwrap_or("")
}

/// Parse a cell as a number. Empty and NaN cells are missing values.
fn parse_numeric(raw: &str) -> std::result::Result<Option<f64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    trimmed.parse::<f64>().map(Some).map_err(|_| raw.to_string())
}
