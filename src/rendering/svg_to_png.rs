use crate::error::RenderError;
use resvg::usvg::{self, fontdb, Transform};
use std::io::Cursor;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Rasterizes SVG documents to optimized RGB PNGs.
pub struct SvgRasterizer {
    /// Font database for text rendering
    fontdb: Arc<fontdb::Database>,
}

impl SvgRasterizer {
    /// Create a rasterizer using the system fonts.
    pub fn new() -> Self {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_system_fonts();

        tracing::info!(
            font_count = fontdb.len(),
            "Loaded fonts for SVG text rendering"
        );

        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Render `svg_data` into a `width` x `height` PNG on a white background.
    ///
    /// The SVG is scaled to fit and centered.
    pub fn render_png(
        &self,
        svg_data: &[u8],
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::UnsupportedDimensions { width, height });
        }

        let pixmap = self.rasterize_svg(svg_data, width, height)?;
        let rgb = flatten_to_rgb(pixmap.data());
        let png_bytes = encode_png(width, height, &rgb)?;

        // Re-compress with oxipng; keep the fast encoding if that fails
        Ok(oxipng::optimize_from_memory(
            &png_bytes,
            &oxipng::Options {
                strip: oxipng::StripChunks::Safe,
                ..oxipng::Options::from_preset(2)
            },
        )
        .unwrap_or(png_bytes))
    }

    /// Parse and rasterize SVG to an RGBA pixmap
    fn rasterize_svg(&self, svg_data: &[u8], width: u32, height: u32) -> Result<Pixmap, RenderError> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg_data, &options)
            .map_err(|e| RenderError::SvgParse(e.to_string()))?;

        let svg_size = tree.size();
        let scale = (width as f32 / svg_size.width()).min(height as f32 / svg_size.height());
        let offset_x = (width as f32 - svg_size.width() * scale) / 2.0;
        let offset_y = (height as f32 - svg_size.height() * scale) / 2.0;

        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::PixmapAllocation)?;
        pixmap.fill(tiny_skia::Color::WHITE);

        let transform = Transform::from_scale(scale, scale).post_translate(offset_x, offset_y);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop alpha from premultiplied RGBA, compositing against white.
fn flatten_to_rgb(rgba: &[u8]) -> Vec<u8> {
    rgba.chunks_exact(4)
        .flat_map(|p| {
            let bg = 255 - p[3];
            [
                p[0].saturating_add(bg),
                p[1].saturating_add(bg),
                p[2].saturating_add(bg),
            ]
        })
        .collect()
}

fn encode_png(width: u32, height: u32, rgb: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(rgb)
            .map_err(|e| RenderError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
