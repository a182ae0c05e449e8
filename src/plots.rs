use crate::charts;
use crate::data::Dataset;
use crate::display::DisplaySurface;
use crate::error::Result;
use crate::graph::render_figure;
use crate::ir::Figure;
use crate::PlotConfig;

/// Chart routines bound to a configuration and a display surface.
///
/// Calls take `&mut self` and run one after another; a failed call shows nothing.
pub struct EdaPlotter<D: DisplaySurface> {
    config: PlotConfig,
    display: D,
}

impl<D: DisplaySurface> EdaPlotter<D> {
    pub fn new(config: PlotConfig, display: D) -> Self {
        Self { config, display }
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn into_display(self) -> D {
        self.display
    }

    fn show(&mut self, figure: &Figure) -> Result<()> {
        let rendered = render_figure(figure, &self.config.font_family)?;
        self.display.show(rendered)
    }

    pub fn plot_sales_distribution(&mut self, data: &Dataset, sales_col: &str) -> Result<()> {
        let figure = charts::sales_distribution(data, sales_col, &self.config)?;
        self.show(&figure)
    }

    pub fn plot_sales_by_category(&mut self, data: &Dataset, sales_col: &str) -> Result<()> {
        let figure = charts::sales_by_category(data, sales_col, &self.config)?;
        self.show(&figure)
    }

    pub fn plot_correlation_matrix(&mut self, data: &Dataset) -> Result<()> {
        let figure = charts::correlation_matrix(data, &self.config)?;
        self.show(&figure)
    }

    pub fn plot_sales_violin(&mut self, data: &Dataset, sales_col: &str) -> Result<()> {
        let figure = charts::sales_violin(data, sales_col, &self.config)?;
        self.show(&figure)
    }

    pub fn plot_sales_central_tendency(&mut self, data: &Dataset, sales_col: &str) -> Result<()> {
        let figure = charts::sales_central_tendency(data, sales_col, &self.config)?;
        self.show(&figure)
    }

    /// Shows the overall figure, then the faceted one; both render before either is shown
    pub fn plot_sales_overall_and_faceted(
        &mut self,
        data: &Dataset,
        sales_col: &str,
        facet_col: &str,
    ) -> Result<()> {
        let (overall, faceted) = charts::sales_overall_and_faceted(data, sales_col, facet_col, &self.config)?;
        let font = &self.config.font_family;
        let overall = render_figure(&overall, font)?;
        let faceted = render_figure(&faceted, font)?;
        self.display.show(overall)?;
        self.display.show(faceted)
    }

    pub fn plot_sales_by_age_group(&mut self, data: &Dataset, sales_col: &str, age_col: &str) -> Result<()> {
        let figure = charts::sales_by_age_group(data, sales_col, age_col, &self.config)?;
        self.show(&figure)
    }
}
