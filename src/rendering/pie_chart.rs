//! Pie chart geometry and its SVG rendering.
//!
//! [`PieChart`] is computed from a [`Breakdown`] and carries everything a
//! renderer needs: title, slice order, colors and angles. Angles are in
//! degrees, counterclockwise from the positive x axis; the first slice
//! starts at 12 o'clock.

use dominant_colors::{Breakdown, ClusterId, ExclusionSet, Rgb};
use serde::Serialize;
use std::sync::Arc;

use super::svg_to_png::SvgRasterizer;
use crate::error::RenderError;
use crate::models::ChartConfig;
use crate::services::template_service::{TemplateService, CHART_TEMPLATE};

/// Where the first slice begins (12 o'clock).
pub const START_ANGLE: f64 = 90.0;

/// Slices below this share get no percentage label.
const MIN_LABELLED_FRACTION: f64 = 0.02;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSlice {
    pub id: ClusterId,
    /// HEX code of the slice color
    pub label: String,
    pub color: Rgb,
    /// Full-precision share in percent
    pub percentage: f64,
    /// One-decimal share as listed next to the chart
    pub display_percentage: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl ChartSlice {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    pub fn mid_angle(&self) -> f64 {
        (self.start_angle + self.end_angle) / 2.0
    }

    pub fn percent_text(&self) -> String {
        format!("{:.1}%", self.display_percentage)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<ChartSlice>,
}

impl PieChart {
    /// Lay out one slice per visible entry, in entry order.
    pub fn from_breakdown(breakdown: &Breakdown) -> Self {
        let mut angle = START_ANGLE;
        let slices = breakdown
            .entries()
            .iter()
            .map(|entry| {
                let sweep = entry.fraction() * 360.0;
                let slice = ChartSlice {
                    id: entry.cluster.id,
                    label: entry.cluster.hex(),
                    color: entry.cluster.color,
                    percentage: entry.percentage,
                    display_percentage: entry.display_percentage(),
                    start_angle: angle,
                    end_angle: angle + sweep,
                };
                angle += sweep;
                slice
            })
            .collect();

        Self {
            title: chart_title(breakdown.excluded()),
            slices,
        }
    }

    /// True when every color is excluded; rendered as a "no data" chart.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// "All Detected Colors" or "Filtered Colors (Excluded: 1, 3)".
pub fn chart_title(excluded: &ExclusionSet) -> String {
    if excluded.is_empty() {
        "All Detected Colors".to_string()
    } else {
        format!("Filtered Colors (Excluded: {excluded})")
    }
}

/// Turns chart geometry into PNG bytes.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, chart: &PieChart) -> Result<Vec<u8>, RenderError>;
}

/// Template context for `chart.svg`
#[derive(Debug, Serialize)]
struct ChartSvgContext {
    width: u32,
    height: u32,
    title: String,
    title_y: f64,
    title_size: f64,
    label_size: f64,
    cx: f64,
    cy: f64,
    radius: f64,
    empty: bool,
    slices: Vec<SliceShape>,
}

#[derive(Debug, Serialize)]
struct SliceShape {
    fill: String,
    label: String,
    percent_text: String,
    show_percent: bool,
    /// A single slice covering the whole pie is drawn as a circle
    full: bool,
    path: String,
    label_x: f64,
    label_y: f64,
    label_anchor: &'static str,
    pct_x: f64,
    pct_y: f64,
    pct_color: &'static str,
}

impl ChartSvgContext {
    fn new(chart: &PieChart, width: u32, height: u32) -> Self {
        let (w, h) = (width as f64, height as f64);
        let title_size = (h * 0.05).max(12.0);
        let title_y = title_size * 1.5;
        let top = title_y + title_size;
        let radius = (w.min(h - top) * 0.5 * 0.72).max(1.0);
        let cx = w / 2.0;
        let cy = top + (h - top) / 2.0;
        let label_size = (radius * 0.09).clamp(10.0, 24.0);
        let full = chart.slices.len() == 1;

        let slices = chart
            .slices
            .iter()
            .map(|slice| {
                let mid = slice.mid_angle();
                let (label_x, label_y) = polar(cx, cy, radius * 1.12, mid);
                let (pct_x, pct_y) = if full {
                    (cx, cy)
                } else {
                    polar(cx, cy, radius * 0.68, mid)
                };
                let cos = mid.to_radians().cos();
                let label_anchor = if cos > 0.1 {
                    "start"
                } else if cos < -0.1 {
                    "end"
                } else {
                    "middle"
                };

                SliceShape {
                    fill: unit_fill(slice.color),
                    label: slice.label.clone(),
                    percent_text: slice.percent_text(),
                    show_percent: slice.percentage / 100.0 >= MIN_LABELLED_FRACTION,
                    full,
                    path: arc_path(cx, cy, radius, slice.start_angle, slice.end_angle),
                    label_x,
                    label_y,
                    label_anchor,
                    pct_x,
                    pct_y,
                    pct_color: contrast_color(slice.color),
                }
            })
            .collect();

        Self {
            width,
            height,
            title: chart.title.clone(),
            title_y,
            title_size,
            label_size,
            cx,
            cy,
            radius,
            empty: chart.is_empty(),
            slices,
        }
    }
}

/// Point at `angle` degrees (counterclockwise, y axis pointing down).
fn polar(cx: f64, cy: f64, r: f64, angle: f64) -> (f64, f64) {
    let rad = angle.to_radians();
    (cx + r * rad.cos(), cy - r * rad.sin())
}

/// SVG path of a pie wedge from `start` to `end` degrees.
fn arc_path(cx: f64, cy: f64, r: f64, start: f64, end: f64) -> String {
    let (x1, y1) = polar(cx, cy, r, start);
    let (x2, y2) = polar(cx, cy, r, end);
    let large_arc = u8::from(end - start > 180.0);
    // sweep-flag 0: counterclockwise on screen
    format!(
        "M {cx:.2} {cy:.2} L {x1:.2} {y1:.2} A {r:.2} {r:.2} 0 {large_arc} 0 {x2:.2} {y2:.2} Z"
    )
}

/// SVG paint for `color` from its 0..1 channels.
fn unit_fill(color: Rgb) -> String {
    let [r, g, b] = color.to_unit();
    format!(
        "rgb({:.3}%, {:.3}%, {:.3}%)",
        r * 100.0,
        g * 100.0,
        b * 100.0
    )
}

/// Black or white, whichever reads better on `color`.
fn contrast_color(color: Rgb) -> &'static str {
    let [r, g, b] = color.to_unit();
    let luma = 0.299 * r + 0.587 * g + 0.114 * b;
    if luma < 0.5 {
        "#FFFFFF"
    } else {
        "#000000"
    }
}

/// Renders charts through the `chart.svg` template and [`SvgRasterizer`].
pub struct SvgChartRenderer {
    templates: Arc<TemplateService>,
    rasterizer: Arc<SvgRasterizer>,
    size: ChartConfig,
}

impl SvgChartRenderer {
    pub fn new(
        templates: Arc<TemplateService>,
        rasterizer: Arc<SvgRasterizer>,
        size: ChartConfig,
    ) -> Self {
        Self {
            templates,
            rasterizer,
            size,
        }
    }

    pub fn render_svg(&self, chart: &PieChart) -> Result<String, RenderError> {
        let context = ChartSvgContext::new(chart, self.size.width, self.size.height);
        self.templates
            .render(CHART_TEMPLATE, &context)
            .map_err(|e| RenderError::Template(e.to_string()))
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, chart: &PieChart) -> Result<Vec<u8>, RenderError> {
        let svg = self.render_svg(chart)?;
        self.rasterizer
            .render_png(svg.as_bytes(), self.size.width, self.size.height)
    }
}
