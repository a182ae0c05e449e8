//! Error types for dataset access, chart building and rendering

/// Error type for every chart routine
#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    /// A referenced column is absent from the dataset
    #[error("Column '{column}' not found (available: {})", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    /// The dataset has no rows
    #[error("Dataset must contain at least one data row")]
    EmptyDataset,

    /// A category value is outside a fixed palette domain
    #[error("Unknown category '{value}' in column '{column}' (expected one of: {})", domain.join(", "))]
    UnknownCategory {
        column: String,
        value: String,
        domain: Vec<String>,
    },

    /// A cell in a numeric column could not be parsed
    #[error("Failed to parse '{value}' as number in column '{column}' at row {row}")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },

    /// Every value of a numeric column is missing
    #[error("Column '{column}' has no numeric values")]
    NoNumericValues { column: String },

    /// A store age falls outside every age bucket
    #[error("Store age {value} is outside the bucket range (0, {max}]")]
    AgeOutOfRange { value: f64, max: f64 },

    /// Malformed tabular input
    #[error("Data error: {0}")]
    Data(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Failure inside the plotting backend
    #[error("Render error: {0}")]
    Render(String),

    /// Failure writing to the display surface
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlotError {
    pub(crate) fn render(what: &str, err: impl std::fmt::Display) -> Self {
        PlotError::Render(format!("{}: {}", what, err))
    }
}

impl From<csv::Error> for PlotError {
    fn from(err: csv::Error) -> Self {
        PlotError::Data(err.to_string())
    }
}

impl From<serde_json::Error> for PlotError {
    fn from(err: serde_json::Error) -> Self {
        PlotError::Data(err.to_string())
    }
}

/// Result type for chart operations
pub type Result<T> = std::result::Result<T, PlotError>;
