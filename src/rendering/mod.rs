//! Chart rendering: pie geometry, SVG templating and PNG rasterization.

pub mod pie_chart;
pub mod svg_to_png;

pub use pie_chart::{chart_title, ChartRenderer, ChartSlice, PieChart, SvgChartRenderer};
pub use svg_to_png::SvgRasterizer;
