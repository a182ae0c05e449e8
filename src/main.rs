use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use promoplot::{
    csv_reader, EdaPlotter, PlotConfig, PngWriter, DEFAULT_AGE_COLUMN, DEFAULT_FACET_COLUMN,
    DEFAULT_SALES_COLUMN,
};
use std::io;
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "promoplot")]
#[command(about = "Render weekly-sales EDA charts from CSV on stdin as PNG on stdout", long_about = None)]
struct Args {
    /// JSON file with styling and estimator settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log progress to stderr (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    chart: Chart,
}

#[derive(Subcommand, Debug)]
enum Chart {
    /// Boxplot of the sales column
    Distribution {
        #[arg(long, default_value = DEFAULT_SALES_COLUMN)]
        sales: String,
    },
    /// One boxplot per promotion type
    ByCategory {
        #[arg(long, default_value = DEFAULT_SALES_COLUMN)]
        sales: String,
    },
    /// Lower-triangle correlation heatmap of numeric columns
    Correlation,
    /// Violin plot per promotion type
    Violin {
        #[arg(long, default_value = DEFAULT_SALES_COLUMN)]
        sales: String,
    },
    /// Mean sales with confidence intervals per promotion type
    CentralTendency {
        #[arg(long, default_value = DEFAULT_SALES_COLUMN)]
        sales: String,
    },
    /// Overall point chart followed by one panel per facet value
    Faceted {
        #[arg(long, default_value = DEFAULT_SALES_COLUMN)]
        sales: String,
        #[arg(long, default_value = DEFAULT_FACET_COLUMN)]
        facet: String,
    },
    /// Point charts faceted by store age bucket
    AgeGroups {
        #[arg(long, default_value = DEFAULT_SALES_COLUMN)]
        sales: String,
        #[arg(long, default_value = DEFAULT_AGE_COLUMN)]
        age: String,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<PlotConfig> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            PlotConfig::from_json(&text)
                .with_context(|| format!("Invalid config file {}", path.display()))
        }
        None => Ok(PlotConfig::default()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config = load_config(args.config.as_ref())?;

    // Read CSV from stdin
    let data = csv_reader::read_csv_from_stdin().context("Failed to read CSV from stdin")?;
    tracing::info!(rows = data.len(), columns = data.headers.len(), "loaded dataset");

    let stdout = io::stdout();
    let mut plotter = EdaPlotter::new(config, PngWriter::new(stdout.lock()));

    match &args.chart {
        Chart::Distribution { sales } => plotter.plot_sales_distribution(&data, sales),
        Chart::ByCategory { sales } => plotter.plot_sales_by_category(&data, sales),
        Chart::Correlation => plotter.plot_correlation_matrix(&data),
        Chart::Violin { sales } => plotter.plot_sales_violin(&data, sales),
        Chart::CentralTendency { sales } => plotter.plot_sales_central_tendency(&data, sales),
        Chart::Faceted { sales, facet } => plotter.plot_sales_overall_and_faceted(&data, sales, facet),
        Chart::AgeGroups { sales, age } => plotter.plot_sales_by_age_group(&data, sales, age),
    }
    .context("Failed to render chart")?;

    Ok(())
}
