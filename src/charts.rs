//! Chart builders: dataset in, scene description out.
//!
//! Every builder validates its columns and rows before computing anything,
//! and leaves the caller's dataset untouched.

use crate::bucket::{bucket_ages, AgeBucket};
use crate::compiler::{
    boxplot_commands, dodge_offsets, heatmap_commands, point_estimate_commands, violin_commands,
    visible_range, Orientation,
};
use crate::data::Dataset;
use crate::error::{PlotError, Result};
use crate::graph::KEY_AREA_WIDTH;
use crate::ir::{Colorbar, DrawCommand, FacetLayout, Figure, PanelScene, Scale};
use crate::palette::{PaletteMapping, PROMOTION_DOMAIN};
use crate::stats::{
    correlation_matrix as pearson_matrix, lower_triangle_mask, BoxSummary, MeanEstimate,
    ViolinSummary,
};
use crate::transform::{
    category_labels, group_parsed, group_values, observed_categories, partition_by, partition_data,
    CategoryGroup, DataPartition,
};
use crate::{PlotConfig, PROMOTION_COLUMN};

const PROMOTION_LABEL: &str = "Promotion Type";
const SALES_LABEL: &str = "Weekly Sales (in Thousands)";
/// Derived column holding the age bucket label
pub const AGE_GROUP_COLUMN: &str = "AgeGroup";

const BOX_WIDTH: f64 = 0.6;
const VIOLIN_WIDTH: f64 = 0.8;
const CAPSIZE: f64 = 0.1;
/// Total dodge width per hue level in the overall point chart
const DODGE_PER_GROUP: f64 = 0.025;

/// Facet panel size in inches
const FACET_SIZE: (f64, f64) = (6.0, 5.0);

/// Missing columns first, then empty input, then an all-missing value column.
///
/// Returns `value_column` parsed once, one entry per row.
fn validate(data: &Dataset, columns: &[&str], value_column: &str) -> Result<Vec<Option<f64>>> {
    data.require_columns(columns)?;
    data.require_rows()?;
    let values = data.numeric_column(value_column)?;
    if values.iter().all(Option::is_none) {
        return Err(PlotError::NoNumericValues {
            column: value_column.to_string(),
        });
    }
    Ok(values)
}

/// Promotion labels observed in the data, plus sales grouped by promotion
struct PromotionGroups {
    observed: Vec<String>,
    groups: Vec<CategoryGroup>,
}

/// `sales` is the row-aligned sales column returned by [`validate`]
fn promotion_groups(data: &Dataset, sales: &[Option<f64>]) -> Result<PromotionGroups> {
    let labels = category_labels(data, PROMOTION_COLUMN)?;
    let observed = observed_categories(&labels);
    let groups = group_parsed(&labels, sales);
    tracing::debug!(
        categories = observed.len(),
        groups = groups.len(),
        rows = data.len(),
        "grouped sales by promotion"
    );
    Ok(PromotionGroups { observed, groups })
}

fn fixed_palette(config: &PlotConfig, observed: &[String]) -> Result<PaletteMapping> {
    PaletteMapping::fixed(&config.colormap()?, PROMOTION_COLUMN, &PROMOTION_DOMAIN, observed)
}

/// `(x, group)` for each observed category that has values
fn positioned<'a>(
    observed: &'a [String],
    groups: &'a [CategoryGroup],
) -> impl Iterator<Item = (usize, &'a CategoryGroup)> + 'a {
    observed
        .iter()
        .enumerate()
        .filter_map(move |(i, cat)| groups.iter().find(|g| &g.key == cat).map(|g| (i, g)))
}

fn promotion_panel(
    observed: &[String],
    y_label: &str,
    y_scale: Scale,
    config: &PlotConfig,
    commands: Vec<DrawCommand>,
) -> PanelScene {
    PanelScene {
        row: 0,
        col: 0,
        title: None,
        x_label: Some(PROMOTION_LABEL.to_string()),
        y_label: Some(y_label.to_string()),
        x_scale: Scale::categorical(observed.to_vec()),
        y_scale,
        grid: config.grid,
        commands,
    }
}

/// Single horizontal box over the sales column
pub fn sales_distribution(data: &Dataset, sales_col: &str, config: &PlotConfig) -> Result<Figure> {
    let values: Vec<f64> = validate(data, &[sales_col], sales_col)?.into_iter().flatten().collect();
    let summary = BoxSummary::compute(&values).ok_or_else(|| PlotError::NoNumericValues {
        column: sales_col.to_string(),
    })?;

    // one-color palette: the middle of the scale
    let color = config.colormap()?.at(0.5);
    let (lo, hi) = summary.extent();
    tracing::debug!(
        values = values.len(),
        outliers = summary.outliers.len(),
        "sales distribution"
    );

    let panel = PanelScene {
        row: 0,
        col: 0,
        title: None,
        x_label: Some("Sales (k$)".to_string()),
        y_label: None,
        x_scale: Scale::continuous(lo, hi),
        y_scale: Scale::categorical(Vec::new()),
        grid: config.grid,
        commands: boxplot_commands(0.0, BOX_WIDTH, &summary, color, Orientation::Horizontal),
    };

    Ok(Figure {
        width: config.pixels(8.0),
        height: config.pixels(5.0),
        title: Some("Boxplot of Weekly Sales (in Thousands)".to_string()),
        layout: FacetLayout::single(),
        panels: vec![panel],
        legend: None,
        colorbar: None,
    })
}

/// One box per promotion, colored from the sorted observed labels
pub fn sales_by_category(data: &Dataset, sales_col: &str, config: &PlotConfig) -> Result<Figure> {
    let sales = validate(data, &[PROMOTION_COLUMN, sales_col], sales_col)?;
    let PromotionGroups { observed, groups } = promotion_groups(data, &sales)?;
    let palette = PaletteMapping::dynamic(&config.colormap()?, &observed);

    let mut commands = Vec::new();
    let mut extents = Vec::new();
    for (x, group) in positioned(&observed, &groups) {
        if let (Some(summary), Some(color)) = (BoxSummary::compute(&group.values), palette.color_of(&group.key)) {
            extents.push(summary.extent());
            commands.extend(boxplot_commands(x as f64, BOX_WIDTH, &summary, color, Orientation::Vertical));
        }
    }

    let panel = promotion_panel(&observed, SALES_LABEL, Scale::shared(extents), config, commands);
    Ok(Figure {
        width: config.pixels(12.0),
        height: config.pixels(6.0),
        title: Some("Sales Distribution by Promotion Type".to_string()),
        layout: FacetLayout::single(),
        panels: vec![panel],
        legend: Some(palette.legend(PROMOTION_LABEL)),
        colorbar: None,
    })
}

/// Lower-triangle Pearson heatmap over every numeric column
pub fn correlation_matrix(data: &Dataset, config: &PlotConfig) -> Result<Figure> {
    data.require_rows()?;
    let names = data.numeric_columns();
    if names.is_empty() {
        return Err(PlotError::Data("Dataset has no numeric columns to correlate".to_string()));
    }

    let columns = names
        .iter()
        .map(|name| data.numeric_column(name))
        .collect::<Result<Vec<_>>>()?;
    let matrix = pearson_matrix(&columns);
    let mask = lower_triangle_mask(names.len());
    let colormap = config.heatmap_colormap()?;
    let (min, max) = visible_range(&matrix, &mask).unwrap_or((-1.0, 1.0));
    tracing::debug!(columns = names.len(), min, max, "correlation matrix");

    // first row at the top
    let rows_top_down: Vec<String> = names.iter().rev().cloned().collect();
    let panel = PanelScene {
        row: 0,
        col: 0,
        title: None,
        x_label: None,
        y_label: None,
        x_scale: Scale::categorical(names.clone()),
        y_scale: Scale::categorical(rows_top_down),
        grid: false,
        commands: heatmap_commands(&matrix, &mask, &colormap, (min, max)),
    };

    Ok(Figure {
        width: config.pixels(10.0),
        height: config.pixels(6.0),
        title: Some("Correlation Matrix (Lower Triangle)".to_string()),
        layout: FacetLayout::single(),
        panels: vec![panel],
        legend: None,
        colorbar: Some(Colorbar { colormap, min, max }),
    })
}

/// Kernel density violin per promotion with quartile lines
pub fn sales_violin(data: &Dataset, sales_col: &str, config: &PlotConfig) -> Result<Figure> {
    let sales = validate(data, &[PROMOTION_COLUMN, sales_col], sales_col)?;
    let PromotionGroups { observed, groups } = promotion_groups(data, &sales)?;
    let palette = fixed_palette(config, &observed)?;

    let mut commands = Vec::new();
    let mut extents = Vec::new();
    for (x, group) in positioned(&observed, &groups) {
        if let (Some(summary), Some(color)) = (ViolinSummary::compute(&group.values), palette.color_of(&group.key)) {
            extents.push(summary.extent());
            commands.extend(violin_commands(x as f64, VIOLIN_WIDTH, &summary, color));
        }
    }

    let panel = promotion_panel(&observed, SALES_LABEL, Scale::shared(extents), config, commands);
    Ok(Figure {
        width: config.pixels(12.0),
        height: config.pixels(6.0),
        title: Some("Sales Distribution by Promotion Type (Violin Plot)".to_string()),
        layout: FacetLayout::single(),
        panels: vec![panel],
        legend: Some(palette.legend(PROMOTION_LABEL)),
        colorbar: None,
    })
}

/// Mean markers with CI bars per observed promotion, shifted by `offsets[x]`
fn point_commands(
    observed: &[String],
    groups: &[CategoryGroup],
    palette: &PaletteMapping,
    config: &PlotConfig,
    offsets: &[f64],
) -> (Vec<DrawCommand>, Vec<(f64, f64)>) {
    let settings = config.ci_settings();
    let mut commands = Vec::new();
    let mut extents = Vec::new();

    for (x, group) in positioned(observed, groups) {
        let (Some(estimate), Some(color)) = (MeanEstimate::compute(&group.values, &settings), palette.color_of(&group.key)) else {
            continue;
        };
        let offset = offsets.get(x).copied().unwrap_or(0.0);
        extents.push((estimate.ci_low, estimate.ci_high));
        commands.extend(point_estimate_commands(x as f64 + offset, &estimate, color, CAPSIZE));
    }

    (commands, extents)
}

fn percent_label(level: f64) -> String {
    let pct = level * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("{:.0}%", pct)
    } else {
        format!("{:.1}%", pct)
    }
}

/// Single-panel mean and confidence interval per promotion
pub fn sales_central_tendency(data: &Dataset, sales_col: &str, config: &PlotConfig) -> Result<Figure> {
    let sales = validate(data, &[PROMOTION_COLUMN, sales_col], sales_col)?;
    let PromotionGroups { observed, groups } = promotion_groups(data, &sales)?;
    let palette = fixed_palette(config, &observed)?;

    let (commands, extents) = point_commands(&observed, &groups, &palette, config, &[]);
    let panel = promotion_panel(
        &observed,
        "Average Weekly Sales (in Thousands)",
        Scale::shared(extents),
        config,
        commands,
    );

    Ok(Figure {
        width: config.pixels(10.0),
        height: config.pixels(6.0),
        title: Some(format!(
            "Mean Weekly Sales with {} Confidence Intervals",
            percent_label(config.ci_level)
        )),
        layout: FacetLayout::single(),
        panels: vec![panel],
        legend: Some(palette.legend(PROMOTION_LABEL)),
        colorbar: None,
    })
}

/// One point panel per partition, sharing x categories and the y range
fn faceted_point_figure(
    partitions: &[DataPartition],
    title_prefix: &str,
    sales_col: &str,
    observed: &[String],
    palette: &PaletteMapping,
    config: &PlotConfig,
) -> Result<Figure> {
    let mut panels = Vec::with_capacity(partitions.len());
    let mut all_extents = Vec::new();

    for (col, partition) in partitions.iter().enumerate() {
        let groups = if partition.data.is_empty() {
            Vec::new()
        } else {
            group_values(&partition.data, PROMOTION_COLUMN, sales_col)?
        };
        let (commands, extents) = point_commands(observed, &groups, palette, config, &[]);
        tracing::debug!(
            facet = %partition.title,
            rows = partition.data.len(),
            groups = groups.len(),
            "facet panel"
        );
        all_extents.extend(extents);

        panels.push(PanelScene {
            row: 0,
            col,
            title: Some(format!("{}: {}", title_prefix, partition.title)),
            x_label: Some(PROMOTION_LABEL.to_string()),
            y_label: if col == 0 { Some(SALES_LABEL.to_string()) } else { None },
            x_scale: Scale::categorical(observed.to_vec()),
            y_scale: Scale::continuous(0.0, 1.0),
            grid: config.grid,
            commands,
        });
    }

    let y_scale = Scale::shared(all_extents);
    for panel in &mut panels {
        panel.y_scale = y_scale.clone();
    }

    let n = panels.len();
    Ok(Figure {
        width: config.pixels(FACET_SIZE.0) * n.max(1) as u32 + KEY_AREA_WIDTH,
        height: config.pixels(FACET_SIZE.1),
        title: None,
        layout: FacetLayout::row(n),
        panels,
        legend: Some(palette.legend(PROMOTION_LABEL)),
        colorbar: None,
    })
}

/// Overall dodged point chart, then one panel per facet value.
///
/// Both figures are built before either is returned.
pub fn sales_overall_and_faceted(
    data: &Dataset,
    sales_col: &str,
    facet_col: &str,
    config: &PlotConfig,
) -> Result<(Figure, Figure)> {
    let sales = validate(data, &[PROMOTION_COLUMN, sales_col, facet_col], sales_col)?;
    let PromotionGroups { observed, groups } = promotion_groups(data, &sales)?;
    let palette = fixed_palette(config, &observed)?;

    let offsets = dodge_offsets(observed.len(), DODGE_PER_GROUP * observed.len() as f64);
    let (commands, extents) = point_commands(&observed, &groups, &palette, config, &offsets);
    let overall = Figure {
        width: config.pixels(14.0),
        height: config.pixels(6.0),
        title: Some("Overall: Mean Weekly Sales by Promotion Type".to_string()),
        layout: FacetLayout::single(),
        panels: vec![promotion_panel(&observed, SALES_LABEL, Scale::shared(extents), config, commands)],
        legend: Some(palette.legend(PROMOTION_LABEL)),
        colorbar: None,
    };

    let partitions = partition_data(data, facet_col)?;
    tracing::debug!(facet_column = facet_col, facets = partitions.len(), "partitioned by facet");
    let faceted = faceted_point_figure(&partitions, "Market Size", sales_col, &observed, &palette, config)?;

    Ok((overall, faceted))
}

/// Point panels for the Young, Mid and Old store-age buckets, in that order
pub fn sales_by_age_group(
    data: &Dataset,
    sales_col: &str,
    age_col: &str,
    config: &PlotConfig,
) -> Result<Figure> {
    let sales = validate(data, &[PROMOTION_COLUMN, sales_col, age_col], sales_col)?;
    let buckets = bucket_ages(&data.numeric_column(age_col)?)?;

    let labels: Vec<String> = buckets
        .iter()
        .map(|b| b.map(|b| b.label().to_string()).unwrap_or_default())
        .collect();
    let derived = data.with_column(AGE_GROUP_COLUMN, labels)?;

    let PromotionGroups { observed, .. } = promotion_groups(&derived, &sales)?;
    let palette = fixed_palette(config, &observed)?;

    let keys: Vec<Option<String>> = buckets
        .iter()
        .map(|b| b.map(|b| b.label().to_string()))
        .collect();
    let order: Vec<String> = AgeBucket::ALL.iter().map(|b| b.label().to_string()).collect();
    let partitions = partition_by(&derived, &keys, &order);
    tracing::debug!(
        young = partitions[0].data.len(),
        mid = partitions[1].data.len(),
        old = partitions[2].data.len(),
        "bucketed store ages"
    );

    faceted_point_figure(&partitions, "Store Age", sales_col, &observed, &palette, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DEFAULT_SALES_COLUMN;

    fn scenario_a() -> Dataset {
        Dataset::from_columns(vec![
            ("Sales_K", vec!["10", "12", "11", "50"]),
            ("Promotion", vec!["1", "1", "2", "3"]),
        ])
    }

    fn seeded_config() -> PlotConfig {
        PlotConfig {
            seed: Some(42),
            n_boot: 200,
            ..PlotConfig::default()
        }
    }

    fn store_data() -> Dataset {
        Dataset::from_columns(vec![
            ("MarketSize", vec!["Small", "Large", "Medium", "Small", "Large", "Medium"]),
            ("StoreAge", vec!["3", "7", "12", "4", "9", "20"]),
            ("Promotion", vec!["1", "2", "3", "2", "1", "3"]),
            ("Sales_K", vec!["30.5", "45.1", "52.0", "33.3", "47.9", "55.2"]),
        ])
    }

    fn points(figure: &Figure) -> Vec<(f64, f64)> {
        figure
            .commands()
            .filter_map(|c| match c {
                DrawCommand::DrawPoint { points, .. } => Some(points.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    #[test]
    fn test_sales_distribution_scenario_a() {
        let figure = sales_distribution(&scenario_a(), DEFAULT_SALES_COLUMN, &PlotConfig::default()).unwrap();
        assert_eq!((figure.width, figure.height), (800, 500));
        assert_eq!(figure.title.as_deref(), Some("Boxplot of Weekly Sales (in Thousands)"));

        let rects: Vec<_> = figure
            .commands()
            .filter(|c| matches!(c, DrawCommand::DrawRect { .. }))
            .collect();
        assert_eq!(rects.len(), 1);

        // horizontal: outlier sits on the x axis past the whisker
        assert_eq!(points(&figure), vec![(50.0, 0.0)]);
        // the only vertical line spanning the full box height
        let median = figure.commands().find_map(|c| match c {
            DrawCommand::DrawLine { points, .. }
                if points[0].0 == points[1].0 && (points[1].1 - points[0].1 - BOX_WIDTH).abs() < 1e-9 =>
            {
                Some(points[0].0)
            }
            _ => None,
        });
        let median = median.unwrap();
        assert!(median > 11.0 && median < 12.0);
    }

    #[test]
    fn test_sales_by_category_missing_promotion() {
        let data = Dataset::from_columns(vec![("Sales_K", vec!["1", "2"])]);
        let err = sales_by_category(&data, "Sales_K", &PlotConfig::default()).unwrap_err();
        assert!(matches!(err, PlotError::MissingColumn { ref column, .. } if column == "Promotion"));
    }

    #[test]
    fn test_sales_by_category_dynamic_palette() {
        let data = Dataset::from_columns(vec![
            ("Sales_K", vec!["1", "2", "3", "4", "5"]),
            ("Promotion", vec!["b", "a", "d", "c", "a"]),
        ]);
        let figure = sales_by_category(&data, "Sales_K", &PlotConfig::default()).unwrap();
        let legend = figure.legend.as_ref().unwrap();
        let labels: Vec<&str> = legend.entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "b", "c", "d"]);
        assert_eq!(figure.panels[0].x_scale.categories, vec!["a", "b", "c", "d"]);
        let boxes = figure
            .commands()
            .filter(|c| matches!(c, DrawCommand::DrawRect { .. }))
            .count();
        assert_eq!(boxes, 4);
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let data = Dataset::new(vec!["Sales_K".to_string(), "Promotion".to_string()], vec![]);
        let config = PlotConfig::default();
        assert!(matches!(sales_by_category(&data, "Sales_K", &config), Err(PlotError::EmptyDataset)));
        assert!(matches!(correlation_matrix(&data, &config), Err(PlotError::EmptyDataset)));
    }

    #[test]
    fn test_all_missing_sales_rejected() {
        let data = Dataset::from_columns(vec![
            ("Sales_K", vec!["", "nan"]),
            ("Promotion", vec!["1", "2"]),
        ]);
        assert!(matches!(
            sales_violin(&data, "Sales_K", &PlotConfig::default()),
            Err(PlotError::NoNumericValues { .. })
        ));
    }

    #[test]
    fn test_validate_returns_row_aligned_values() {
        let data = Dataset::from_columns(vec![
            ("Sales_K", vec!["10", "", "12.5"]),
            ("Promotion", vec!["1", "2", "3"]),
        ]);
        let sales = validate(&data, &["Promotion", "Sales_K"], "Sales_K").unwrap();
        assert_eq!(sales, vec![Some(10.0), None, Some(12.5)]);

        let groups = promotion_groups(&data, &sales).unwrap().groups;
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["1", "3"]);
    }

    #[test]
    fn test_correlation_matrix_visible_cells() {
        let data = Dataset::from_columns(vec![
            ("A", vec!["1", "2", "3", "4"]),
            ("Label", vec!["w", "x", "y", "z"]),
            ("B", vec!["2", "4", "5", "9"]),
            ("C", vec!["9", "7", "4", "1"]),
        ]);
        let figure = correlation_matrix(&data, &PlotConfig::default()).unwrap();
        assert_eq!((figure.width, figure.height), (1000, 600));
        let cells = figure
            .commands()
            .filter(|c| matches!(c, DrawCommand::DrawRect { .. }))
            .count();
        assert_eq!(cells, 3);
        assert_eq!(figure.panels[0].x_scale.categories, vec!["A", "B", "C"]);
        assert_eq!(figure.panels[0].y_scale.categories, vec!["C", "B", "A"]);
        let colorbar = figure.colorbar.unwrap();
        assert!(colorbar.min < 0.0 && colorbar.max > 0.0);
    }

    #[test]
    fn test_correlation_matrix_requires_numeric_column() {
        let data = Dataset::from_columns(vec![("Label", vec!["a", "b"])]);
        assert!(matches!(
            correlation_matrix(&data, &PlotConfig::default()),
            Err(PlotError::Data(_))
        ));
    }

    #[test]
    fn test_fixed_palette_rejects_unknown_promotion() {
        let data = Dataset::from_columns(vec![
            ("Sales_K", vec!["1", "2"]),
            ("Promotion", vec!["1", "4"]),
        ]);
        let err = sales_central_tendency(&data, "Sales_K", &seeded_config()).unwrap_err();
        assert!(matches!(err, PlotError::UnknownCategory { ref value, .. } if value == "4"));
    }

    #[test]
    fn test_fixed_palette_legend_lists_full_domain() {
        let data = Dataset::from_columns(vec![
            ("Sales_K", vec!["1", "2", "3"]),
            ("Promotion", vec!["2", "2", "2"]),
        ]);
        let figure = sales_violin(&data, "Sales_K", &PlotConfig::default()).unwrap();
        assert_eq!(figure.legend.unwrap().entries.len(), 3);
        assert_eq!(figure.panels[0].x_scale.categories, vec!["2"]);
    }

    #[test]
    fn test_central_tendency_single_observation_group() {
        let figure = sales_central_tendency(&scenario_a(), "Sales_K", &seeded_config()).unwrap();
        assert_eq!(
            figure.title.as_deref(),
            Some("Mean Weekly Sales with 95% Confidence Intervals")
        );
        // group "2" has one value: zero-width interval at its mean
        let bar = figure.commands().find_map(|c| match c {
            DrawCommand::DrawLine { points, .. } if points[0].0 == 1.0 && points[1].0 == 1.0 => Some(points.clone()),
            _ => None,
        });
        assert_eq!(bar.unwrap(), vec![(1.0, 11.0), (1.0, 11.0)]);
        assert!(points(&figure).contains(&(0.0, 11.0)));
    }

    #[test]
    fn test_overall_and_faceted_figures() {
        let (overall, faceted) =
            sales_overall_and_faceted(&store_data(), "Sales_K", "MarketSize", &seeded_config()).unwrap();
        assert_eq!(overall.width, 1400);
        assert_eq!(faceted.panels.len(), 3);
        assert_eq!(
            faceted.panel_titles(),
            vec!["Market Size: Large", "Market Size: Medium", "Market Size: Small"]
        );
        let y = &faceted.panels[0].y_scale;
        assert!(faceted.panels.iter().all(|p| &p.y_scale == y));

        // dodge moves the outer groups off their category centers
        let xs: Vec<f64> = points(&overall).iter().map(|p| p.0).collect();
        assert_eq!(xs.len(), 3);
        assert!(xs[0] < 0.0 && xs[1] == 1.0 && xs[2] > 2.0);
    }

    #[test]
    fn test_overall_and_faceted_missing_facet_column() {
        let err = sales_overall_and_faceted(&scenario_a(), "Sales_K", "MarketSize", &seeded_config()).unwrap_err();
        assert!(matches!(err, PlotError::MissingColumn { ref column, .. } if column == "MarketSize"));
    }

    #[test]
    fn test_age_group_panels_in_bucket_order() {
        let data = store_data();
        let figure = sales_by_age_group(&data, "Sales_K", "StoreAge", &seeded_config()).unwrap();
        assert_eq!(
            figure.panel_titles(),
            vec!["Store Age: Young (≤5)", "Store Age: Mid (6–10)", "Store Age: Old (>10)"]
        );
        // caller's dataset is not modified
        assert!(!data.headers.contains(&AGE_GROUP_COLUMN.to_string()));
    }

    #[test]
    fn test_age_group_empty_old_bucket_still_shown() {
        let data = Dataset::from_columns(vec![
            ("StoreAge", vec!["2", "8", ""]),
            ("Promotion", vec!["1", "2", "3"]),
            ("Sales_K", vec!["10", "20", "30"]),
        ]);
        let figure = sales_by_age_group(&data, "Sales_K", "StoreAge", &seeded_config()).unwrap();
        assert_eq!(figure.panels.len(), 3);
        assert!(figure.panels[2].commands.is_empty());
        assert!(!figure.panels[0].commands.is_empty());
    }

    #[test]
    fn test_age_group_rejects_non_positive_age() {
        let data = Dataset::from_columns(vec![
            ("StoreAge", vec!["0", "8"]),
            ("Promotion", vec!["1", "2"]),
            ("Sales_K", vec!["10", "20"]),
        ]);
        assert!(matches!(
            sales_by_age_group(&data, "Sales_K", "StoreAge", &seeded_config()),
            Err(PlotError::AgeOutOfRange { .. })
        ));
    }

    #[test]
    fn test_percent_label() {
        assert_eq!(percent_label(0.95), "95%");
        assert_eq!(percent_label(0.975), "97.5%");
    }
}
