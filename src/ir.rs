use crate::graph::{LineStyle, PointStyle, PolygonStyle, RectStyle, TextStyle};
use crate::palette::Colormap;
use plotters::style::RGBColor;

// =============================================================================
// Scene description produced by the chart builders
// =============================================================================

/// A complete chart: one or more panels plus figure-level decorations.
/// The backend just executes these blindly.
#[derive(Debug, Clone)]
pub struct Figure {
    pub width: u32,
    pub height: u32,
    pub title: Option<String>,
    pub layout: FacetLayout,
    pub panels: Vec<PanelScene>,
    pub legend: Option<Legend>,
    pub colorbar: Option<Colorbar>,
}

impl Figure {
    /// Every draw command across all panels
    pub fn commands(&self) -> impl Iterator<Item = &DrawCommand> {
        self.panels.iter().flat_map(|p| p.commands.iter())
    }

    pub fn panel_titles(&self) -> Vec<&str> {
        self.panels.iter().filter_map(|p| p.title.as_deref()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetLayout {
    pub nrow: usize,
    pub ncol: usize,
}

impl FacetLayout {
    pub fn single() -> Self {
        FacetLayout { nrow: 1, ncol: 1 }
    }

    /// All panels side by side
    pub fn row(n_panels: usize) -> Self {
        FacetLayout {
            nrow: 1,
            ncol: n_panels.max(1),
        }
    }
}

/// One plotting panel (one facet)
#[derive(Debug, Clone)]
pub struct PanelScene {
    pub row: usize,
    pub col: usize,
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub x_scale: Scale,
    pub y_scale: Scale,
    pub grid: bool,
    pub commands: Vec<DrawCommand>,
}

/// Axis domain. Categorical axes place category `i` at coordinate `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Scale {
    pub domain: (f64, f64),
    pub is_categorical: bool,
    pub categories: Vec<String>,
}

/// Primitive drawing commands in data coordinates
#[derive(Debug, Clone)]
pub enum DrawCommand {
    DrawLine {
        points: Vec<(f64, f64)>,
        style: LineStyle,
    },
    DrawPoint {
        points: Vec<(f64, f64)>,
        style: PointStyle,
    },
    DrawRect {
        // Top-Left, Bottom-Right
        tl: (f64, f64),
        br: (f64, f64),
        style: RectStyle,
    },
    DrawPolygon {
        points: Vec<(f64, f64)>,
        style: PolygonStyle,
    },
    DrawText {
        position: (f64, f64),
        text: String,
        style: TextStyle,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    pub title: String,
    pub entries: Vec<LegendEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    pub color: RGBColor,
}

/// Continuous color key for heatmaps
#[derive(Debug, Clone, PartialEq)]
pub struct Colorbar {
    pub colormap: Colormap,
    pub min: f64,
    pub max: f64,
}
