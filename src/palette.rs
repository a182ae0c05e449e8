// Colormaps and category palettes

use crate::error::{PlotError, Result};
use crate::ir::{Legend, LegendEntry};
use plotters::style::RGBColor;

/// Promotion codes known to the fixed-palette charts
pub const PROMOTION_DOMAIN: [&str; 3] = ["1", "2", "3"];

const MAGMA_STOPS: [&str; 11] = [
    "#000004", "#140e36", "#3b0f70", "#641a80", "#8c2981", "#b73779", "#de4968", "#f7705c",
    "#fe9f6d", "#fecf92", "#fcfdbf",
];

const VIRIDIS_STOPS: [&str; 11] = [
    "#440154", "#482475", "#414487", "#355f8d", "#2a788e", "#21918c", "#22a884", "#44bf70",
    "#7ad151", "#bddf26", "#fde725",
];

/// Sequential color scale interpolated linearly between evenly spaced stops
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    stops: Vec<RGBColor>,
}

impl Colormap {
    /// Build a colormap from hex strings (`#RRGGBB` or `#RGB`)
    pub fn from_hex_list<S: AsRef<str>>(colors: &[S]) -> Result<Self> {
        if colors.is_empty() {
            return Err(PlotError::Config("Colormap needs at least one color".to_string()));
        }
        let stops = colors
            .iter()
            .map(|c| {
                parse_hex_color(c.as_ref())
                    .ok_or_else(|| PlotError::Config(format!("Invalid hex color '{}'", c.as_ref())))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Colormap { stops })
    }

    pub fn magma() -> Self {
        Colormap {
            stops: MAGMA_STOPS.iter().filter_map(|c| parse_hex_color(c)).collect(),
        }
    }

    pub fn viridis() -> Self {
        Colormap {
            stops: VIRIDIS_STOPS.iter().filter_map(|c| parse_hex_color(c)).collect(),
        }
    }

    /// Look up a built-in colormap by name
    pub fn by_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "magma" => Ok(Self::magma()),
            "viridis" => Ok(Self::viridis()),
            other => Err(PlotError::Config(format!("Unknown colormap '{}'", other))),
        }
    }

    /// Color at position `t` in `[0, 1]` (clamped)
    pub fn at(&self, t: f64) -> RGBColor {
        if self.stops.len() == 1 || t.is_nan() {
            return self.stops[0];
        }
        let t = t.clamp(0.0, 1.0);
        let pos = t * (self.stops.len() - 1) as f64;
        let lower = pos.floor() as usize;
        let upper = (lower + 1).min(self.stops.len() - 1);
        let weight = pos - lower as f64;
        lerp(self.stops[lower], self.stops[upper], weight)
    }

    /// `n` colors taken from the interior of the scale.
    ///
    /// Sample `i` sits at `(i + 1) / (n + 1)`, so the result depends only on `n`.
    pub fn sample(&self, n: usize) -> Vec<RGBColor> {
        (0..n)
            .map(|i| self.at((i + 1) as f64 / (n + 1) as f64))
            .collect()
    }
}

fn lerp(a: RGBColor, b: RGBColor, w: f64) -> RGBColor {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * w).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Parse hex color (#RRGGBB or #RGB)
pub fn parse_hex_color(hex: &str) -> Option<RGBColor> {
    let hex = hex.trim().strip_prefix('#')?;
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(RGBColor(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(RGBColor(r, g, b))
        }
        _ => None,
    }
}

/// Category → color assignment for one chart call.
///
/// Entries are ordered; the same order drives the plot body and the legend.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteMapping {
    entries: Vec<(String, RGBColor)>,
}

impl PaletteMapping {
    /// Colors for the distinct observed labels, sorted lexicographically
    pub fn dynamic<S: AsRef<str>>(colormap: &Colormap, observed: &[S]) -> Self {
        let mut levels: Vec<String> = observed.iter().map(|s| s.as_ref().to_string()).collect();
        levels.sort();
        levels.dedup();

        let colors = colormap.sample(levels.len());
        PaletteMapping {
            entries: levels.into_iter().zip(colors).collect(),
        }
    }

    /// Colors for a domain known up front, in domain order.
    ///
    /// Any observed label outside the domain is an [`PlotError::UnknownCategory`].
    pub fn fixed<S: AsRef<str>>(
        colormap: &Colormap,
        column: &str,
        domain: &[&str],
        observed: &[S],
    ) -> Result<Self> {
        if let Some(unknown) = observed.iter().find(|v| !domain.contains(&v.as_ref())) {
            return Err(PlotError::UnknownCategory {
                column: column.to_string(),
                value: unknown.as_ref().to_string(),
                domain: domain.iter().map(|d| d.to_string()).collect(),
            });
        }

        let colors = colormap.sample(domain.len());
        Ok(PaletteMapping {
            entries: domain.iter().map(|d| d.to_string()).zip(colors).collect(),
        })
    }

    pub fn color_of(&self, label: &str) -> Option<RGBColor> {
        self.entries.iter().find(|(l, _)| l == label).map(|(_, c)| *c)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(l, _)| l.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One legend swatch per category
    pub fn legend(&self, title: &str) -> Legend {
        Legend {
            title: title.to_string(),
            entries: self
                .entries
                .iter()
                .map(|(label, color)| LegendEntry {
                    label: label.clone(),
                    color: *color,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FF0000"), Some(RGBColor(255, 0, 0)));
        assert_eq!(parse_hex_color("#F00"), Some(RGBColor(255, 0, 0)));
        assert_eq!(parse_hex_color("#fbe9d8"), Some(RGBColor(251, 233, 216)));
        assert_eq!(parse_hex_color("FF0000"), None);
        assert_eq!(parse_hex_color("#GG0000"), None);
    }

    #[test]
    fn test_colormap_endpoints() {
        let cmap = Colormap::magma();
        assert_eq!(cmap.at(0.0), RGBColor(0, 0, 4));
        assert_eq!(cmap.at(1.0), RGBColor(252, 253, 191));
        assert_eq!(cmap.at(-3.0), cmap.at(0.0));
        assert_eq!(cmap.at(7.0), cmap.at(1.0));
    }

    #[test]
    fn test_colormap_interpolates_between_stops() {
        let cmap = Colormap::from_hex_list(&["#000000", "#FFFFFF"]).unwrap();
        assert_eq!(cmap.at(0.5), RGBColor(128, 128, 128));
    }

    #[test]
    fn test_colormap_by_name() {
        assert_eq!(Colormap::by_name("Magma").unwrap(), Colormap::magma());
        assert!(Colormap::by_name("rainbow").is_err());
    }

    #[test]
    fn test_sample_single_color_is_midpoint() {
        let cmap = Colormap::magma();
        assert_eq!(cmap.sample(1), vec![cmap.at(0.5)]);
    }

    #[test]
    fn test_sample_depends_only_on_size() {
        let cmap = Colormap::magma();
        let three = cmap.sample(3);
        assert_eq!(three, vec![cmap.at(0.25), cmap.at(0.5), cmap.at(0.75)]);
        assert_ne!(cmap.sample(4)[0], three[0]);
    }

    #[test]
    fn test_dynamic_mapping_is_bijective() {
        let cmap = Colormap::magma();
        let observed: Vec<String> = (0..12).rev().map(|i| format!("level{:02}", i)).collect();
        let mut with_repeats = observed.clone();
        with_repeats.extend(observed.iter().cloned());

        let mapping = PaletteMapping::dynamic(&cmap, &with_repeats);
        assert_eq!(mapping.len(), 12);

        let distinct: HashSet<(u8, u8, u8)> = mapping
            .labels()
            .iter()
            .map(|l| {
                let c = mapping.color_of(l).unwrap();
                (c.0, c.1, c.2)
            })
            .collect();
        assert_eq!(distinct.len(), 12);
    }

    #[test]
    fn test_dynamic_mapping_sorts_as_strings() {
        let cmap = Colormap::magma();
        let mapping = PaletteMapping::dynamic(&cmap, &["3", "10", "1", "2"]);
        assert_eq!(mapping.labels(), vec!["1", "10", "2", "3"]);
    }

    #[test]
    fn test_fixed_mapping_order_is_stable() {
        let cmap = Colormap::magma();
        let expected = cmap.sample(3);
        for observed in [vec!["3", "1", "2"], vec!["2", "2", "1", "3"], vec!["1"]] {
            let mapping = PaletteMapping::fixed(&cmap, "Promotion", &PROMOTION_DOMAIN, &observed).unwrap();
            assert_eq!(mapping.color_of("1"), Some(expected[0]));
            assert_eq!(mapping.color_of("2"), Some(expected[1]));
            assert_eq!(mapping.color_of("3"), Some(expected[2]));
        }
    }

    #[test]
    fn test_fixed_mapping_rejects_unknown_category() {
        let cmap = Colormap::magma();
        let err = PaletteMapping::fixed(&cmap, "Promotion", &PROMOTION_DOMAIN, &["1", "4"]).unwrap_err();
        assert!(matches!(err, PlotError::UnknownCategory { ref value, .. } if value == "4"));
    }

    #[test]
    fn test_legend_has_one_swatch_per_category() {
        let cmap = Colormap::magma();
        let mapping = PaletteMapping::dynamic(&cmap, &["b", "a"]);
        let legend = mapping.legend("Promotion Type");
        assert_eq!(legend.title, "Promotion Type");
        assert_eq!(legend.entries.len(), 2);
        assert_eq!(legend.entries[0].label, "a");
        assert_eq!(legend.entries[0].color, mapping.color_of("a").unwrap());
    }
}
