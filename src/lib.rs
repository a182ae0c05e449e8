// Library exports for promoplot

pub mod bucket;
pub mod csv_reader;
pub mod data;
pub mod error;
pub mod graph;
pub mod palette;
pub mod stats;

// Scene pipeline
pub mod charts;
pub mod compiler;
pub mod display;
pub mod ir;
pub mod plots;
pub mod scale;
pub mod transform;

pub use data::Dataset;
pub use display::{DisplaySurface, MemoryDisplay, PngWriter};
pub use error::{PlotError, Result};
pub use plots::EdaPlotter;

use serde::Deserialize;
use stats::{CiMethod, CiSettings};

pub const DEFAULT_SALES_COLUMN: &str = "Sales_K";
pub const DEFAULT_FACET_COLUMN: &str = "MarketSize";
pub const DEFAULT_AGE_COLUMN: &str = "StoreAge";
/// Grouping column shared by every promotion chart
pub const PROMOTION_COLUMN: &str = "Promotion";
/// Highest accepted rendering resolution
pub const MAX_DPI: u32 = 600;

/// Styling and estimator settings passed explicitly to every chart
#[derive(Debug, Clone, Deserialize)]
pub struct PlotConfig {
    /// Built-in colormap for category palettes
    #[serde(default = "default_palette")]
    pub palette: String,
    /// Hex stops of the correlation heatmap ramp
    #[serde(default = "default_heatmap_colors")]
    pub heatmap_colors: Vec<String>,
    #[serde(default = "default_dpi")]
    pub dpi: u32,
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_grid")]
    pub grid: bool,
    #[serde(default = "default_ci_level")]
    pub ci_level: f64,
    #[serde(default)]
    pub ci_method: CiMethod,
    #[serde(default = "default_n_boot")]
    pub n_boot: usize,
    /// Bootstrap seed; unseeded runs draw from OS entropy
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_palette() -> String { "magma".to_string() }
fn default_heatmap_colors() -> Vec<String> {
    vec!["#fbe9d8".to_string(), "#e0827c".to_string(), "#7e1e9c".to_string()]
}
fn default_dpi() -> u32 { 100 }
fn default_font_family() -> String { "sans-serif".to_string() }
fn default_grid() -> bool { true }
fn default_ci_level() -> f64 { 0.95 }
fn default_n_boot() -> usize { 1000 }

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            palette: default_palette(),
            heatmap_colors: default_heatmap_colors(),
            dpi: default_dpi(),
            font_family: default_font_family(),
            grid: default_grid(),
            ci_level: default_ci_level(),
            ci_method: CiMethod::default(),
            n_boot: default_n_boot(),
            seed: None,
        }
    }
}

impl PlotConfig {
    /// Parse and validate a JSON config; absent fields take their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        let config: PlotConfig =
            serde_json::from_str(text).map_err(|e| PlotError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.ci_level > 0.0 && self.ci_level < 1.0) {
            return Err(PlotError::Config(format!(
                "ci_level must lie strictly between 0 and 1, got {}",
                self.ci_level
            )));
        }
        if self.dpi == 0 || self.dpi > MAX_DPI {
            return Err(PlotError::Config(format!(
                "dpi must lie between 1 and {}, got {}",
                MAX_DPI, self.dpi
            )));
        }
        if self.ci_method == CiMethod::Bootstrap && self.n_boot == 0 {
            return Err(PlotError::Config("n_boot must be positive".to_string()));
        }
        self.colormap()?;
        self.heatmap_colormap()?;
        Ok(())
    }

    pub fn colormap(&self) -> Result<palette::Colormap> {
        palette::Colormap::by_name(&self.palette)
    }

    pub fn heatmap_colormap(&self) -> Result<palette::Colormap> {
        palette::Colormap::from_hex_list(&self.heatmap_colors)
    }

    pub fn ci_settings(&self) -> CiSettings {
        CiSettings {
            level: self.ci_level,
            method: self.ci_method,
            n_boot: self.n_boot,
            seed: self.seed,
        }
    }

    /// Pixel length of `inches` at the configured resolution
    pub fn pixels(&self, inches: f64) -> u32 {
        (inches * self.dpi as f64).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = PlotConfig::from_json("{}").unwrap();
        assert_eq!(config.palette, "magma");
        assert_eq!(config.dpi, 100);
        assert_eq!(config.n_boot, 1000);
        assert_eq!(config.ci_method, CiMethod::Bootstrap);
        assert_eq!(config.seed, None);
        assert!(config.grid);
        assert_eq!(config.pixels(8.0), 800);
    }

    #[test]
    fn test_config_overrides() {
        let config = PlotConfig::from_json(
            r#"{"palette": "viridis", "ci_method": "normal", "ci_level": 0.9, "seed": 7}"#,
        )
        .unwrap();
        assert_eq!(config.palette, "viridis");
        assert_eq!(config.ci_method, CiMethod::Normal);
        assert_eq!(config.ci_settings().level, 0.9);
        assert_eq!(config.ci_settings().seed, Some(7));
    }

    #[test]
    fn test_config_rejects_invalid_values() {
        assert!(matches!(
            PlotConfig::from_json(r#"{"palette": "rainbow"}"#),
            Err(PlotError::Config(_))
        ));
        assert!(matches!(
            PlotConfig::from_json(r#"{"ci_level": 1.5}"#),
            Err(PlotError::Config(_))
        ));
        assert!(matches!(
            PlotConfig::from_json(r##"{"heatmap_colors": ["#zzz"]}"##),
            Err(PlotError::Config(_))
        ));
        assert!(matches!(
            PlotConfig::from_json(r#"{"dpi": 6000}"#),
            Err(PlotError::Config(_))
        ));
        assert!(matches!(
            PlotConfig::from_json(r#"{"dpi": 0}"#),
            Err(PlotError::Config(_))
        ));
        assert!(PlotConfig::from_json(r#"{"dpi": 600}"#).is_ok());
        assert!(matches!(
            PlotConfig::from_json("not json"),
            Err(PlotError::Config(_))
        ));
    }
}
