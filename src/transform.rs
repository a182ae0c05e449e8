use crate::data::Dataset;
use crate::error::Result;
use std::collections::BTreeMap;

/// Values of one category, with missing values dropped
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup {
    pub key: String,
    pub values: Vec<f64>,
}

/// Subset of the dataset belonging to one facet
#[derive(Debug, Clone)]
pub struct DataPartition {
    pub title: String,
    pub data: Dataset,
}

/// Coerce a grouping column to its string labels.
///
/// Codes such as `1, 2, 3` are compared and sorted as strings from here on.
pub fn category_labels(data: &Dataset, column: &str) -> Result<Vec<String>> {
    Ok(data
        .column(column)?
        .into_iter()
        .map(|cell| cell.trim().to_string())
        .collect())
}

/// Distinct non-empty labels, sorted lexicographically
pub fn observed_categories(labels: &[String]) -> Vec<String> {
    let mut levels: Vec<String> = labels.iter().filter(|l| !l.is_empty()).cloned().collect();
    levels.sort();
    levels.dedup();
    levels
}

/// Group a numeric column by a categorical one, groups sorted by key.
///
/// Rows with an empty category or a missing value are skipped; a category
/// with no remaining values yields no group.
pub fn group_values(data: &Dataset, group_col: &str, value_col: &str) -> Result<Vec<CategoryGroup>> {
    let labels = category_labels(data, group_col)?;
    let values = data.numeric_column(value_col)?;
    Ok(group_parsed(&labels, &values))
}

/// [`group_values`] over a label column and an already parsed value column
pub fn group_parsed(labels: &[String], values: &[Option<f64>]) -> Vec<CategoryGroup> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (label, value) in labels.iter().zip(values) {
        if label.is_empty() {
            continue;
        }
        if let Some(v) = value {
            groups.entry(label.as_str()).or_default().push(*v);
        }
    }

    groups
        .into_iter()
        .map(|(key, values)| CategoryGroup {
            key: key.to_string(),
            values,
        })
        .collect()
}

/// Split the dataset by the distinct values of a column, sorted by value
pub fn partition_data(data: &Dataset, facet_col: &str) -> Result<Vec<DataPartition>> {
    let keys = category_labels(data, facet_col)?;
    let order = observed_categories(&keys);
    let keys: Vec<Option<String>> = keys
        .into_iter()
        .map(|k| if k.is_empty() { None } else { Some(k) })
        .collect();
    Ok(partition_by(data, &keys, &order))
}

/// Split the dataset by precomputed row keys in a fixed order.
///
/// Every key in `order` gets a partition, empty or not. Rows keyed `None`
/// or with a key outside `order` are dropped.
pub fn partition_by(data: &Dataset, row_keys: &[Option<String>], order: &[String]) -> Vec<DataPartition> {
    order
        .iter()
        .map(|title| {
            let indices: Vec<usize> = row_keys
                .iter()
                .enumerate()
                .filter(|(_, key)| key.as_deref() == Some(title.as_str()))
                .map(|(i, _)| i)
                .collect();
            DataPartition {
                title: title.clone(),
                data: data.select_rows(&indices),
            }
        })
        .collect()
}
