use promoplot::{csv_reader, EdaPlotter, MemoryDisplay, PlotConfig, PlotError};
use std::fs;
use std::io::Write;
use std::process::{Command, Stdio};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Helper function to run promoplot with arguments and CSV input
fn run_promoplot(args: &[&str], csv_content: &str) -> Result<Vec<u8>, String> {
    let mut child = Command::new(env!("CARGO_BIN_EXE_promoplot"))
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    // Write CSV to stdin
    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(csv_content.as_bytes())
            .map_err(|e| format!("Failed to write to stdin: {}", e))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == PNG_SIGNATURE
}

fn count_pngs(bytes: &[u8]) -> usize {
    bytes.windows(8).filter(|w| *w == PNG_SIGNATURE).count()
}

fn fixture() -> String {
    fs::read_to_string("test/weekly_sales.csv").expect("Failed to read test CSV")
}

fn seeded_plotter() -> EdaPlotter<MemoryDisplay> {
    let config = PlotConfig {
        seed: Some(2024),
        n_boot: 200,
        ..PlotConfig::default()
    };
    EdaPlotter::new(config, MemoryDisplay::new())
}

#[test]
fn test_library_all_routines_show_figures() {
    let data = csv_reader::read_csv(fixture().as_bytes()).unwrap();
    let mut plotter = seeded_plotter();

    plotter.plot_sales_distribution(&data, "Sales_K").unwrap();
    plotter.plot_sales_by_category(&data, "Sales_K").unwrap();
    plotter.plot_correlation_matrix(&data).unwrap();
    plotter.plot_sales_violin(&data, "Sales_K").unwrap();
    plotter.plot_sales_central_tendency(&data, "Sales_K").unwrap();
    plotter
        .plot_sales_overall_and_faceted(&data, "Sales_K", "MarketSize")
        .unwrap();
    plotter
        .plot_sales_by_age_group(&data, "Sales_K", "StoreAge")
        .unwrap();

    let shown = plotter.into_display().shown;
    assert_eq!(shown.len(), 8);
    assert!(shown.iter().all(|f| is_valid_png(&f.png)));
    assert_eq!(
        shown[2].title.as_deref(),
        Some("Correlation Matrix (Lower Triangle)")
    );
}

#[test]
fn test_library_missing_column_shows_nothing() {
    let data = csv_reader::read_csv("Sales_K\n10\n12\n".as_bytes()).unwrap();
    let mut plotter = seeded_plotter();
    let err = plotter.plot_sales_violin(&data, "Sales_K").unwrap_err();
    assert!(matches!(err, PlotError::MissingColumn { .. }));
    let err = plotter
        .plot_sales_overall_and_faceted(&data, "Sales_K", "MarketSize")
        .unwrap_err();
    assert!(matches!(err, PlotError::MissingColumn { .. }));
    assert!(plotter.into_display().shown.is_empty());
}

#[test]
fn test_library_does_not_modify_dataset() {
    let data = csv_reader::read_csv(fixture().as_bytes()).unwrap();
    let before = data.clone();
    let mut plotter = seeded_plotter();
    plotter
        .plot_sales_by_age_group(&data, "Sales_K", "StoreAge")
        .unwrap();
    assert_eq!(data, before);
}

#[test]
fn test_end_to_end_distribution() {
    let result = run_promoplot(&["distribution"], &fixture());
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let png_bytes = result.unwrap();
    assert!(is_valid_png(&png_bytes), "Output is not a valid PNG");
    assert_eq!(count_pngs(&png_bytes), 1);
}

#[test]
fn test_end_to_end_correlation() {
    let result = run_promoplot(&["correlation"], &fixture());
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_faceted_writes_two_pngs() {
    let result = run_promoplot(&["faceted", "--facet", "MarketSize"], &fixture());
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert_eq!(count_pngs(&result.unwrap()), 2);
}

#[test]
fn test_end_to_end_age_groups() {
    let result = run_promoplot(&["age-groups", "--age", "StoreAge"], &fixture());
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
}

#[test]
fn test_end_to_end_column_not_found() {
    let result = run_promoplot(&["by-category", "--sales", "Revenue"], &fixture());
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Revenue"));
}

#[test]
fn test_end_to_end_empty_csv() {
    let result = run_promoplot(&["violin"], "Promotion,Sales_K\n");
    assert!(result.is_err());
}

#[test]
fn test_end_to_end_non_numeric_data() {
    let csv = "Promotion,Sales_K\n1,10\n2,abc\n";
    let result = run_promoplot(&["central-tendency"], csv);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("abc"));
}

#[test]
fn test_end_to_end_unknown_promotion() {
    let csv = "Promotion,Sales_K\n1,10\n4,12\n";
    let result = run_promoplot(&["violin"], csv);
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("Unknown category"));
}

#[test]
fn test_end_to_end_config_file() {
    let dir = std::env::temp_dir().join(format!("promoplot-config-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.json");
    fs::write(&path, r#"{"palette": "viridis", "ci_method": "normal", "dpi": 50}"#).unwrap();

    let result = run_promoplot(
        &["central-tendency", "--config", path.to_str().unwrap()],
        &fixture(),
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    assert!(is_valid_png(&result.unwrap()));
    fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_end_to_end_invalid_config() {
    let dir = std::env::temp_dir().join(format!("promoplot-bad-config-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.json");
    fs::write(&path, r#"{"palette": "rainbow"}"#).unwrap();

    let result = run_promoplot(&["distribution", "--config", path.to_str().unwrap()], &fixture());
    assert!(result.is_err());
    assert!(result.unwrap_err().contains("rainbow"));
    fs::remove_dir_all(&dir).ok();
}
