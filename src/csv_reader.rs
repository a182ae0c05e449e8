// CSV input for datasets

use crate::data::Dataset;
use crate::error::{PlotError, Result};
use std::io::{self, Read};

/// Read a headed CSV stream into a dataset
pub fn read_csv<R: Read>(reader: R) -> Result<Dataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() {
        return Err(PlotError::Data("CSV input has no header row".to_string()));
    }

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(|field| field.to_string()).collect());
    }

    Ok(Dataset::new(headers, rows))
}

/// Read CSV data from stdin
pub fn read_csv_from_stdin() -> Result<Dataset> {
    read_csv(io::stdin().lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_basic() {
        let input = "Promotion,Sales_K\n1,33.73\n2, 35.67\n";
        let data = read_csv(input.as_bytes()).unwrap();
        assert_eq!(data.headers, vec!["Promotion", "Sales_K"]);
        assert_eq!(data.rows, vec![vec!["1", "33.73"], vec!["2", "35.67"]]);
    }

    #[test]
    fn test_read_csv_headers_only() {
        let data = read_csv("x,y\n".as_bytes()).unwrap();
        assert!(data.is_empty());
        assert!(matches!(data.require_rows().unwrap_err(), PlotError::EmptyDataset));
    }

    #[test]
    fn test_read_csv_ragged_rows() {
        let result = read_csv("a,b\n1,2\n3\n".as_bytes());
        assert!(matches!(result.unwrap_err(), PlotError::Data(_)));
    }
}
