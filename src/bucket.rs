// Store-age bucketing

use crate::error::{PlotError, Result};
use std::fmt;

/// Upper edge of the "Young" bin (inclusive)
pub const YOUNG_MAX_AGE: f64 = 5.0;
/// Upper edge of the "Mid" bin (inclusive)
pub const MID_MAX_AGE: f64 = 10.0;

/// Ordinal store-age category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AgeBucket {
    Young,
    Mid,
    Old,
}

impl AgeBucket {
    /// Facet order
    pub const ALL: [AgeBucket; 3] = [AgeBucket::Young, AgeBucket::Mid, AgeBucket::Old];

    pub fn label(&self) -> &'static str {
        match self {
            AgeBucket::Young => "Young (≤5)",
            AgeBucket::Mid => "Mid (6–10)",
            AgeBucket::Old => "Old (>10)",
        }
    }

    /// Bin an age against `[0,5]`, `(5,10]`, `(10,max]`, closed on the right.
    ///
    /// Ages at or below zero, above `max`, or not finite belong to no bin.
    pub fn classify(age: f64, max: f64) -> Result<AgeBucket> {
        if !age.is_finite() || age <= 0.0 || age > max {
            return Err(PlotError::AgeOutOfRange { value: age, max });
        }
        if age <= YOUNG_MAX_AGE {
            Ok(AgeBucket::Young)
        } else if age <= MID_MAX_AGE {
            Ok(AgeBucket::Mid)
        } else {
            Ok(AgeBucket::Old)
        }
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bucket a column of ages using its observed maximum as the last edge.
///
/// Missing ages stay `None`. When the maximum is at most 10 the edges
/// `[0, 5, 10, max]` stop increasing; rather than rejecting the dataset,
/// no age lands in `Old` and that bucket stays empty.
pub fn bucket_ages(ages: &[Option<f64>]) -> Result<Vec<Option<AgeBucket>>> {
    let max = ages
        .iter()
        .flatten()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);

    if max == f64::NEG_INFINITY {
        return Err(PlotError::EmptyDataset);
    }

    ages.iter()
        .map(|age| age.map(|a| AgeBucket::classify(a, max)).transpose())
        .collect()
}
