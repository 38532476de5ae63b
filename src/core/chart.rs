//! Horizontal bar chart rendering.
//!
//! Charts are composed as SVG and rasterized to PNG with `resvg`. The SVG scene is
//! a pure function of the input entries, so identical inputs always produce the
//! same bars, labels and counts.

use crate::{
    core::{aggregation::CountByItem, document::escape_text},
    errors::{Error, Result},
};
use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Canvas width in pixels.
pub const CHART_WIDTH: u32 = 1000;
/// Minimum canvas height in pixels.
pub const MIN_CHART_HEIGHT: u32 = 600;
/// Height added per entry once the minimum is exceeded.
pub const ROW_HEIGHT: u32 = 50;
/// Text shown when there is nothing to plot.
pub const NO_DATA_MESSAGE: &str = "No data available for chart";

const MARGIN_LEFT: f64 = 220.0;
const MARGIN_RIGHT: f64 = 80.0;
const MARGIN_TOP: f64 = 70.0;
const MARGIN_BOTTOM: f64 = 80.0;
const FONT_FAMILY: &str = "DejaVu Sans, Arial, sans-serif";

// Viridis colour map, sampled at five evenly spaced stops.
const VIRIDIS: [(f64, f64, f64); 5] = [
    (68.0, 1.0, 84.0),
    (59.0, 82.0, 139.0),
    (33.0, 145.0, 140.0),
    (94.0, 201.0, 98.0),
    (253.0, 231.0, 37.0),
];

/// Fixed texts of one chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarChart {
    /// Title drawn above the plot
    pub title: &'static str,
    /// Label under the value axis
    pub x_label: &'static str,
    /// Label beside the category axis
    pub y_label: &'static str,
}

/// The hardware distribution chart.
pub const HARDWARE_TYPE_CHART: BarChart = BarChart {
    title: "Hardware Distribution by Type",
    x_label: "Count",
    y_label: "Hardware Type",
};

/// Canvas height for `entries` bars.
#[must_use]
pub fn chart_height(entries: usize) -> u32 {
    let rows = u32::try_from(entries).unwrap_or(u32::MAX);
    MIN_CHART_HEIGHT.max(rows.saturating_mul(ROW_HEIGHT))
}

/// Builds the SVG scene for `entries`.
///
/// Empty input produces a placeholder with only [`NO_DATA_MESSAGE`]; no axes,
/// ticks or title are drawn.
#[must_use]
pub fn chart_svg(chart: &BarChart, entries: &[CountByItem]) -> String {
    if entries.is_empty() {
        return placeholder_svg();
    }

    let width = f64::from(CHART_WIDTH);
    let height = f64::from(chart_height(entries.len()));
    let plot_width = width - MARGIN_LEFT - MARGIN_RIGHT;
    let plot_height = height - MARGIN_TOP - MARGIN_BOTTOM;
    let plot_bottom = MARGIN_TOP + plot_height;

    let max_count = entries.iter().map(|e| e.count).max().unwrap_or(0).max(1);
    let step = tick_step(max_count);
    let axis_max = max_count.div_ceil(step) * step;
    let scale = plot_width / as_f64(axis_max);
    let band = plot_height / as_f64(entries.len());
    let bar_height = band * 0.7;

    let mut svg = svg_open(CHART_WIDTH, chart_height(entries.len()));

    // Title
    let _ = write!(
        svg,
        r#"<text x="{:.1}" y="40" text-anchor="middle" font-size="24" font-weight="bold">{}</text>"#,
        width / 2.0,
        escape_text(chart.title)
    );

    // Value-axis grid and ticks
    let mut tick = 0;
    while tick <= axis_max {
        let x = MARGIN_LEFT + as_f64(tick) * scale;
        let _ = write!(
            svg,
            r##"<line x1="{x:.1}" y1="{MARGIN_TOP:.1}" x2="{x:.1}" y2="{plot_bottom:.1}" stroke="#dddddd" stroke-width="1"/><text x="{x:.1}" y="{:.1}" text-anchor="middle" font-size="12">{tick}</text>"##,
            plot_bottom + 18.0
        );
        tick += step;
    }

    // Bars, labels and value annotations
    for (index, entry) in entries.iter().enumerate() {
        let y = MARGIN_TOP + band * as_f64(index) + (band - bar_height) / 2.0;
        let center = y + bar_height / 2.0;
        let bar_width = as_f64(entry.count) * scale;
        let (r, g, b) = palette(index, entries.len());
        let _ = write!(
            svg,
            r#"<rect x="{MARGIN_LEFT:.1}" y="{y:.1}" width="{bar_width:.1}" height="{bar_height:.1}" fill="rgb({r},{g},{b})"/>"#
        );
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{center:.1}" dy="0.35em" text-anchor="end" font-size="13">{}</text>"#,
            MARGIN_LEFT - 8.0,
            escape_text(entry.item.as_str())
        );
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{center:.1}" dy="0.35em" font-size="13" font-weight="bold" fill="blue">{}</text>"#,
            MARGIN_LEFT + bar_width + 6.0,
            entry.count
        );
    }

    // Axes
    let _ = write!(
        svg,
        r#"<line x1="{MARGIN_LEFT:.1}" y1="{MARGIN_TOP:.1}" x2="{MARGIN_LEFT:.1}" y2="{plot_bottom:.1}" stroke="black" stroke-width="1"/><line x1="{MARGIN_LEFT:.1}" y1="{plot_bottom:.1}" x2="{:.1}" y2="{plot_bottom:.1}" stroke="black" stroke-width="1"/>"#,
        MARGIN_LEFT + plot_width
    );
    let _ = write!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="16">{}</text>"#,
        MARGIN_LEFT + plot_width / 2.0,
        height - 25.0,
        escape_text(chart.x_label)
    );
    let y_label_center = MARGIN_TOP + plot_height / 2.0;
    let _ = write!(
        svg,
        r#"<text x="24" y="{y_label_center:.1}" text-anchor="middle" font-size="16" transform="rotate(-90 24 {y_label_center:.1})">{}</text>"#,
        escape_text(chart.y_label)
    );

    svg.push_str("</svg>");
    svg
}

fn placeholder_svg() -> String {
    let mut svg = svg_open(CHART_WIDTH, MIN_CHART_HEIGHT);
    let _ = write!(
        svg,
        r#"<text x="{}" y="{}" dy="0.35em" text-anchor="middle" font-size="24">{NO_DATA_MESSAGE}</text></svg>"#,
        CHART_WIDTH / 2,
        MIN_CHART_HEIGHT / 2
    );
    svg
}

fn svg_open(width: u32, height: u32) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="{FONT_FAMILY}"><rect width="{width}" height="{height}" fill="white"/>"#
    )
}

/// Tick spacing of 1, 2 or 5 times a power of ten, giving at most ten ticks.
fn tick_step(max: usize) -> usize {
    let mut magnitude = 1;
    loop {
        for factor in [1, 2, 5] {
            let step = factor * magnitude;
            if max.div_ceil(step) <= 10 {
                return step;
            }
        }
        magnitude *= 10;
    }
}

fn palette(index: usize, count: usize) -> (u8, u8, u8) {
    let t = if count <= 1 {
        0.0
    } else {
        as_f64(index) / as_f64(count - 1)
    };
    let position = t * as_f64(VIRIDIS.len() - 1);
    // Cast safety: position is in [0, 4].
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let lower = (position.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = position - as_f64(lower);
    let (a, b) = (VIRIDIS[lower], VIRIDIS[lower + 1]);
    (
        channel(a.0, b.0, frac),
        channel(a.1, b.1, frac),
        channel(a.2, b.2, frac),
    )
}

// Cast safety: interpolating between two u8 values stays in [0, 255].
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel(from: f64, to: f64, frac: f64) -> u8 {
    (from + (to - from) * frac).round().clamp(0.0, 255.0) as u8
}

#[allow(clippy::cast_precision_loss)]
fn as_f64(value: usize) -> f64 {
    value as f64
}

/// Rasterizes chart scenes to PNG.
///
/// Cloning is cheap; the font database is shared.
#[derive(Clone)]
pub struct ChartRenderer {
    fontdb: Arc<fontdb::Database>,
}

impl std::fmt::Debug for ChartRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartRenderer")
            .field("font_faces", &self.fontdb.len())
            .finish()
    }
}

impl ChartRenderer {
    /// Creates a renderer with the system fonts plus any fonts in `font_dir`.
    #[must_use]
    pub fn new(font_dir: Option<&Path>) -> Self {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_system_fonts();
        if let Some(dir) = font_dir {
            fontdb.load_fonts_dir(dir);
        }

        let has_sans = fontdb
            .query(&fontdb::Query {
                families: &[fontdb::Family::SansSerif],
                ..fontdb::Query::default()
            })
            .is_some();
        if !has_sans {
            let fallback = fontdb
                .faces()
                .next()
                .and_then(|face| face.families.first())
                .map(|(family, _)| family.clone());
            match fallback {
                Some(family) => {
                    debug!("Using {family} as the sans-serif fallback font");
                    fontdb.set_sans_serif_family(family);
                }
                None => warn!("No fonts available; chart text will not be rasterized"),
            }
        }

        info!(font_faces = fontdb.len(), "Chart renderer ready");
        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Renders `entries` as a horizontal bar chart and returns PNG bytes.
    pub fn render_bar_chart(&self, chart: &BarChart, entries: &[CountByItem]) -> Result<Vec<u8>> {
        let svg = chart_svg(chart, entries);
        self.rasterize(&svg)
    }

    fn rasterize(&self, svg: &str) -> Result<Vec<u8>> {
        let options = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..usvg::Options::default()
        };
        let tree = usvg::Tree::from_str(svg, &options)?;
        let size = tree.size();

        // Cast safety: chart dimensions are small positive integers.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let (width, height) = (size.width().ceil() as u32, size.height().ceil() as u32);
        let mut pixmap = tiny_skia::Pixmap::new(width, height)
            .ok_or_else(|| Error::render(format!("cannot allocate {width}x{height} pixmap")))?;
        pixmap.fill(tiny_skia::Color::WHITE);

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        pixmap.encode_png().map_err(|e| Error::Png(e.to_string()))
    }
}
