// Summary statistics behind the chart families

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

/// Whisker reach in multiples of the interquartile range
const WHISKER_IQR: f64 = 1.5;
/// KDE support extends this many bandwidths past the data on each side
const KDE_CUT: f64 = 2.0;
/// Resolution of density curve
const KDE_GRID_POINTS: usize = 128;

/// Linear-interpolated percentile of already sorted data
pub fn percentile(sorted_data: &[f64], p: f64) -> f64 {
    let n = sorted_data.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted_data[0];
    }

    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;

    if lower_idx == upper_idx {
        sorted_data[lower_idx]
    } else {
        let weight = rank - lower_idx as f64;
        sorted_data[lower_idx] * (1.0 - weight) + sorted_data[upper_idx] * weight
    }
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1)
fn std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
}

// =============================================================================
// Box summary
// =============================================================================

/// Five-number summary with whiskers and outliers
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// `None` for an empty sample
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let ys = sorted(values);

        let q1 = percentile(&ys, 0.25);
        let median = percentile(&ys, 0.50);
        let q3 = percentile(&ys, 0.75);
        let iqr = q3 - q1;

        let lower_fence = q1 - WHISKER_IQR * iqr;
        let upper_fence = q3 + WHISKER_IQR * iqr;

        // Whiskers: range of data within fences
        let lower_whisker = ys.iter().cloned().find(|&v| v >= lower_fence).unwrap_or(q1);
        let upper_whisker = ys.iter().rev().cloned().find(|&v| v <= upper_fence).unwrap_or(q3);

        let outliers = ys
            .iter()
            .cloned()
            .filter(|&v| v < lower_fence || v > upper_fence)
            .collect();

        Some(BoxSummary {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
            outliers,
        })
    }

    /// Smallest and largest drawn value, outliers included
    pub fn extent(&self) -> (f64, f64) {
        let lo = self.outliers.iter().cloned().fold(self.lower_whisker, f64::min);
        let hi = self.outliers.iter().cloned().fold(self.upper_whisker, f64::max);
        (lo, hi)
    }
}

// =============================================================================
// Violin (kernel density)
// =============================================================================

/// Scott's rule bandwidth: std * n^(-1/5)
fn scott_bandwidth(data: &[f64]) -> f64 {
    let n = data.len() as f64;
    let sd = std_dev(data);
    if sd <= 0.0 {
        return 1.0;
    }
    sd * n.powf(-0.2)
}

/// Gaussian kernel function
fn gaussian_kernel(u: f64) -> f64 {
    const SQRT_2PI: f64 = 2.5066282746310002;
    (-0.5 * u * u).exp() / SQRT_2PI
}

/// Density curve plus quartiles for one group
#[derive(Debug, Clone, PartialEq)]
pub struct ViolinSummary {
    /// Y coordinates of the density curve
    pub grid: Vec<f64>,
    /// Density at each grid point, scaled so the peak is 1
    pub density: Vec<f64>,
    pub quartiles: [f64; 3],
    pub bandwidth: f64,
}

impl ViolinSummary {
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let ys = sorted(values);
        let bandwidth = scott_bandwidth(&ys);
        let quartiles = [
            percentile(&ys, 0.25),
            percentile(&ys, 0.50),
            percentile(&ys, 0.75),
        ];

        let min_y = ys[0];
        let max_y = ys[ys.len() - 1];
        let start = min_y - KDE_CUT * bandwidth;
        let end = max_y + KDE_CUT * bandwidth;
        let step = (end - start) / (KDE_GRID_POINTS - 1) as f64;
        let n = ys.len() as f64;

        let mut grid = Vec::with_capacity(KDE_GRID_POINTS);
        let mut density = Vec::with_capacity(KDE_GRID_POINTS);
        for i in 0..KDE_GRID_POINTS {
            let y = start + i as f64 * step;
            let d = ys
                .iter()
                .map(|&xi| gaussian_kernel((y - xi) / bandwidth))
                .sum::<f64>()
                / (n * bandwidth);
            grid.push(y);
            density.push(d);
        }

        let peak = density.iter().fold(0.0f64, |a, &b| a.max(b));
        if peak > 0.0 {
            for d in &mut density {
                *d /= peak;
            }
        }

        Some(ViolinSummary {
            grid,
            density,
            quartiles,
            bandwidth,
        })
    }

    pub fn extent(&self) -> (f64, f64) {
        (self.grid[0], self.grid[self.grid.len() - 1])
    }
}

// =============================================================================
// Mean with confidence interval
// =============================================================================

/// Confidence interval estimator for point charts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CiMethod {
    /// Percentile bootstrap of the mean
    #[default]
    Bootstrap,
    /// Normal approximation: mean ± z * s / sqrt(n)
    Normal,
}

/// Parameters for [`MeanEstimate::compute`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CiSettings {
    pub level: f64,
    pub method: CiMethod,
    pub n_boot: usize,
    pub seed: Option<u64>,
}

/// Group mean with its confidence interval
#[derive(Debug, Clone, PartialEq)]
pub struct MeanEstimate {
    pub mean: f64,
    pub ci_low: f64,
    pub ci_high: f64,
    pub n: usize,
}

impl MeanEstimate {
    pub fn compute(values: &[f64], settings: &CiSettings) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let m = mean(values);
        let n = values.len();

        if n == 1 {
            tracing::warn!(
                value = m,
                "group has a single observation; confidence interval is degenerate"
            );
            return Some(MeanEstimate { mean: m, ci_low: m, ci_high: m, n });
        }

        let (ci_low, ci_high) = match settings.method {
            CiMethod::Bootstrap => bootstrap_ci(values, settings),
            CiMethod::Normal => {
                let z = normal_quantile(0.5 + settings.level / 2.0);
                let half = z * std_dev(values) / (n as f64).sqrt();
                (m - half, m + half)
            }
        };

        Some(MeanEstimate { mean: m, ci_low, ci_high, n })
    }
}

fn bootstrap_ci(values: &[f64], settings: &CiSettings) -> (f64, f64) {
    let mut rng = match settings.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_os_rng(),
    };

    let n = values.len();
    let n_boot = settings.n_boot.max(1);
    let mut boot_means: Vec<f64> = (0..n_boot)
        .map(|_| {
            let total: f64 = (0..n).map(|_| values[rng.random_range(0..n)]).sum();
            total / n as f64
        })
        .collect();
    boot_means.sort_by(|a, b| a.total_cmp(b));

    let tail = (1.0 - settings.level) / 2.0;
    (percentile(&boot_means, tail), percentile(&boot_means, 1.0 - tail))
}

/// Inverse standard normal CDF (Acklam's rational approximation)
pub fn normal_quantile(p: f64) -> f64 {
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];
    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];
    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];
    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];
    const P_LOW: f64 = 0.02425;

    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= 1.0 - P_LOW {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

// =============================================================================
// Correlation
// =============================================================================

/// Pearson correlation over pairwise-complete observations.
///
/// NaN when fewer than two pairs remain or either side is constant.
pub fn pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Square correlation matrix; `matrix[i][j]` correlates column i with column j
pub fn correlation_matrix(columns: &[Vec<Option<f64>>]) -> Vec<Vec<f64>> {
    let n = columns.len();
    let mut matrix = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in 0..=i {
            let r = if i == j {
                if pearson(&columns[i], &columns[i]).is_nan() { f64::NAN } else { 1.0 }
            } else {
                pearson(&columns[i], &columns[j])
            };
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    matrix
}

/// Upper-triangle mask including the diagonal: cell (i, j) is hidden when j >= i
pub fn lower_triangle_mask(n: usize) -> Vec<Vec<bool>> {
    (0..n).map(|i| (0..n).map(|j| j >= i).collect()).collect()
}
