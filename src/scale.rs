use crate::ir::Scale;

impl Scale {
    /// Categorical scale with category `i` at coordinate `i`
    pub fn categorical(categories: Vec<String>) -> Self {
        let n = categories.len().max(1) as f64;
        Scale {
            domain: (-0.5, n - 0.5),
            is_categorical: true,
            categories,
        }
    }

    /// Continuous scale over `[min, max]` with 5% padding
    pub fn continuous(min: f64, max: f64) -> Self {
        let (min, max) = pad_range(min, max);
        Scale {
            domain: (min, max),
            is_categorical: false,
            categories: Vec::new(),
        }
    }

    /// Continuous scale spanning every `(min, max)` extent
    pub fn shared<I>(extents: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let merged = merge_ranges(extents);
        Scale::continuous(merged.min, merged.max)
    }

    /// Category label drawn at coordinate `value`, if it sits on a category
    pub fn category_at(&self, value: f64) -> Option<&str> {
        if !self.is_categorical {
            return None;
        }
        let idx = value.round();
        if (value - idx).abs() > 1e-6 || idx < 0.0 {
            return None;
        }
        self.categories.get(idx as usize).map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
struct MinMax {
    min: f64,
    max: f64,
}

fn merge_ranges<I>(iter: I) -> MinMax
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut global = MinMax {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    for (lo, hi) in iter {
        if lo.is_finite() && lo < global.min {
            global.min = lo;
        }
        if hi.is_finite() && hi > global.max {
            global.max = hi;
        }
    }

    // Handle empty case
    if global.min == f64::INFINITY || global.max == f64::NEG_INFINITY {
        global.min = 0.0;
        global.max = 1.0;
    }

    global
}

fn pad_range(min: f64, max: f64) -> (f64, f64) {
    if min == max {
        (min - 1.0, max + 1.0)
    } else {
        let padding = (max - min) * 0.05;
        (min - padding, max + padding)
    }
}
