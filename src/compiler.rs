use crate::graph::{LineStyle, PointStyle, PolygonStyle, RectStyle, TextStyle};
use crate::ir::DrawCommand;
use crate::palette::Colormap;
use crate::stats::{BoxSummary, MeanEstimate, ViolinSummary};
use plotters::style::RGBColor;

/// Line color for whiskers, medians and outliers
const LINE_GRAY: RGBColor = RGBColor(63, 63, 63);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Categories along x, values along y
    Vertical,
    /// Values along x
    Horizontal,
}

// =============================================================================
// Boxplot Geometry Helpers
// =============================================================================

/// Computed geometry for a single boxplot, expressed as primitive shapes
struct BoxplotGeometry {
    lower_whisker: Vec<(f64, f64)>,
    upper_whisker: Vec<(f64, f64)>,
    min_cap: Vec<(f64, f64)>,
    max_cap: Vec<(f64, f64)>,
    box_tl: (f64, f64),
    box_br: (f64, f64),
    median_line: Vec<(f64, f64)>,
    outlier_points: Vec<(f64, f64)>,
}

/// Calculates boxplot primitive geometry for a single boxplot
fn compute_boxplot_geometry(
    x: f64,
    width: f64,
    summary: &BoxSummary,
    orientation: Orientation,
) -> BoxplotGeometry {
    let half_width = width / 2.0;
    let cap_half = width * 0.2;
    let BoxSummary {
        lower_whisker: min,
        q1,
        median,
        q3,
        upper_whisker: max,
        ..
    } = *summary;

    match orientation {
        Orientation::Vertical => BoxplotGeometry {
            lower_whisker: vec![(x, min), (x, q1)],
            upper_whisker: vec![(x, q3), (x, max)],
            min_cap: vec![(x - cap_half, min), (x + cap_half, min)],
            max_cap: vec![(x - cap_half, max), (x + cap_half, max)],
            box_tl: (x - half_width, q3),
            box_br: (x + half_width, q1),
            median_line: vec![(x - half_width, median), (x + half_width, median)],
            outlier_points: summary.outliers.iter().map(|&v| (x, v)).collect(),
        },
        Orientation::Horizontal => BoxplotGeometry {
            lower_whisker: vec![(min, x), (q1, x)],
            upper_whisker: vec![(q3, x), (max, x)],
            min_cap: vec![(min, x - cap_half), (min, x + cap_half)],
            max_cap: vec![(max, x - cap_half), (max, x + cap_half)],
            box_tl: (q1, x + half_width),
            box_br: (q3, x - half_width),
            median_line: vec![(median, x - half_width), (median, x + half_width)],
            outlier_points: summary.outliers.iter().map(|&v| (v, x)).collect(),
        },
    }
}

/// Styles for whiskers, box fill, median line and outliers
fn boxplot_component_styles(color: RGBColor) -> (LineStyle, RectStyle, LineStyle, PointStyle) {
    let whisker_style = LineStyle {
        color: LINE_GRAY,
        width: 2,
        alpha: 1.0,
    };

    let box_style = RectStyle {
        fill: color,
        alpha: 1.0,
        border: Some((LINE_GRAY, 2)),
    };

    let median_style = LineStyle {
        color: LINE_GRAY,
        width: 2,
        alpha: 1.0,
    };

    let outlier_style = PointStyle {
        color: LINE_GRAY,
        size: 4,
        alpha: 0.9,
    };

    (whisker_style, box_style, median_style, outlier_style)
}

/// Draw commands for one box at category coordinate `x`
pub fn boxplot_commands(
    x: f64,
    width: f64,
    summary: &BoxSummary,
    color: RGBColor,
    orientation: Orientation,
) -> Vec<DrawCommand> {
    let geom = compute_boxplot_geometry(x, width, summary, orientation);
    let (whisker_style, box_style, median_style, outlier_style) = boxplot_component_styles(color);

    // Emit primitive commands in z-order
    let mut commands = vec![
        DrawCommand::DrawLine {
            points: geom.lower_whisker,
            style: whisker_style.clone(),
        },
        DrawCommand::DrawLine {
            points: geom.upper_whisker,
            style: whisker_style.clone(),
        },
        DrawCommand::DrawLine {
            points: geom.min_cap,
            style: whisker_style.clone(),
        },
        DrawCommand::DrawLine {
            points: geom.max_cap,
            style: whisker_style,
        },
        DrawCommand::DrawRect {
            tl: geom.box_tl,
            br: geom.box_br,
            style: box_style,
        },
        DrawCommand::DrawLine {
            points: geom.median_line,
            style: median_style,
        },
    ];

    if !geom.outlier_points.is_empty() {
        commands.push(DrawCommand::DrawPoint {
            points: geom.outlier_points,
            style: outlier_style,
        });
    }

    commands
}

// =============================================================================
// Violin
// =============================================================================

/// Half-width of the violin at `y`, by linear interpolation over the KDE grid
fn violin_half_width(summary: &ViolinSummary, y: f64, half_width: f64) -> f64 {
    let grid = &summary.grid;
    if grid.is_empty() || y < grid[0] || y > grid[grid.len() - 1] {
        return 0.0;
    }
    let idx = grid.partition_point(|&g| g < y).min(grid.len() - 1);
    if idx == 0 {
        return summary.density[0] * half_width;
    }
    let (g0, g1) = (grid[idx - 1], grid[idx]);
    let (d0, d1) = (summary.density[idx - 1], summary.density[idx]);
    let w = if g1 > g0 { (y - g0) / (g1 - g0) } else { 0.0 };
    (d0 + (d1 - d0) * w) * half_width
}

/// Mirrored density outline plus quartile lines at category coordinate `x`
pub fn violin_commands(x: f64, width: f64, summary: &ViolinSummary, color: RGBColor) -> Vec<DrawCommand> {
    let half_width = width / 2.0;

    let mut outline: Vec<(f64, f64)> = summary
        .grid
        .iter()
        .zip(summary.density.iter())
        .map(|(&y, &d)| (x + d * half_width, y))
        .collect();
    let left: Vec<(f64, f64)> = summary
        .grid
        .iter()
        .zip(summary.density.iter())
        .rev()
        .map(|(&y, &d)| (x - d * half_width, y))
        .collect();
    outline.extend(left);

    let mut border = outline.clone();
    if let Some(&first) = outline.first() {
        border.push(first);
    }

    let mut commands = vec![
        DrawCommand::DrawPolygon {
            points: outline,
            style: PolygonStyle { fill: color, alpha: 1.0 },
        },
        DrawCommand::DrawLine {
            points: border,
            style: LineStyle {
                color: LINE_GRAY,
                width: 1,
                alpha: 1.0,
            },
        },
    ];

    for (i, &q) in summary.quartiles.iter().enumerate() {
        let w = violin_half_width(summary, q, half_width);
        commands.push(DrawCommand::DrawLine {
            points: vec![(x - w, q), (x + w, q)],
            style: LineStyle {
                color: LINE_GRAY,
                // median drawn heavier than the outer quartiles
                width: if i == 1 { 2 } else { 1 },
                alpha: 1.0,
            },
        });
    }

    commands
}

// =============================================================================
// Point estimate with error bar
// =============================================================================

/// Mean marker with a capped confidence-interval bar; no connecting line
pub fn point_estimate_commands(x: f64, estimate: &MeanEstimate, color: RGBColor, capsize: f64) -> Vec<DrawCommand> {
    let bar_style = LineStyle {
        color,
        width: 2,
        alpha: 1.0,
    };
    let cap_half = capsize / 2.0;

    vec![
        DrawCommand::DrawLine {
            points: vec![(x, estimate.ci_low), (x, estimate.ci_high)],
            style: bar_style.clone(),
        },
        DrawCommand::DrawLine {
            points: vec![(x - cap_half, estimate.ci_low), (x + cap_half, estimate.ci_low)],
            style: bar_style.clone(),
        },
        DrawCommand::DrawLine {
            points: vec![(x - cap_half, estimate.ci_high), (x + cap_half, estimate.ci_high)],
            style: bar_style,
        },
        DrawCommand::DrawPoint {
            points: vec![(x, estimate.mean)],
            style: PointStyle {
                color,
                size: 6,
                alpha: 1.0,
            },
        },
    ]
}

/// Horizontal offsets spreading `n` groups evenly over `total` width, centered on 0
pub fn dodge_offsets(n: usize, total: f64) -> Vec<f64> {
    if n <= 1 {
        return vec![0.0; n];
    }
    let step = total / (n - 1) as f64;
    (0..n)
        .map(|i| (i as f64 - (n as f64 - 1.0) / 2.0) * step)
        .collect()
}

// =============================================================================
// Heatmap
// =============================================================================

/// Min and max over visible, finite cells
pub fn visible_range(matrix: &[Vec<f64>], mask: &[Vec<bool>]) -> Option<(f64, f64)> {
    let mut range: Option<(f64, f64)> = None;
    for (row, hidden_row) in matrix.iter().zip(mask.iter()) {
        for (&v, &hidden) in row.iter().zip(hidden_row.iter()) {
            if hidden || !v.is_finite() {
                continue;
            }
            range = Some(match range {
                Some((lo, hi)) => (lo.min(v), hi.max(v)),
                None => (v, v),
            });
        }
    }
    range
}

/// Annotated cells for every visible entry.
///
/// Row `i` is drawn at y = `n - 1 - i` so the first row sits at the top.
pub fn heatmap_commands(
    matrix: &[Vec<f64>],
    mask: &[Vec<bool>],
    colormap: &Colormap,
    range: (f64, f64),
) -> Vec<DrawCommand> {
    let n = matrix.len();
    let (vmin, vmax) = range;
    let mut commands = Vec::new();

    for (i, row) in matrix.iter().enumerate() {
        for (j, &value) in row.iter().enumerate() {
            if mask[i][j] || !value.is_finite() {
                continue;
            }
            let t = if vmax > vmin { (value - vmin) / (vmax - vmin) } else { 0.0 };
            let x = j as f64;
            let y = (n - 1 - i) as f64;

            commands.push(DrawCommand::DrawRect {
                tl: (x - 0.5, y + 0.5),
                br: (x + 0.5, y - 0.5),
                style: RectStyle {
                    fill: colormap.at(t),
                    alpha: 1.0,
                    border: Some((RGBColor(255, 255, 255), 1)),
                },
            });
            commands.push(DrawCommand::DrawText {
                position: (x, y),
                text: format!("{:.2}", value),
                style: TextStyle {
                    size: 14.0,
                    color: RGBColor(0, 0, 0),
                },
            });
        }
    }

    commands
}
