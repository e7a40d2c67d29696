//! Cairo backend for the editor's [`Surface`] and [`TextMetrics`] contracts.

use gtk4::cairo;

use image::RgbaImage;

use crate::editor::tools::MAGNIFIER_BORDER;
use crate::editor::{MagnifierView, Pen, Surface, TextExtent, TextMetrics, TextStyle};
use crate::geometry::{Color, ToolBounds, ToolPoint};

const TEXT_FONT_FAMILY: &str = "Sans";

fn set_source_color(context: &cairo::Context, color: Color) {
    let (red, green, blue, alpha) = color.to_cairo_rgba();
    context.set_source_rgba(red, green, blue, alpha);
}

fn apply_pen(context: &cairo::Context, pen: Pen) {
    set_source_color(context, pen.color);
    context.set_line_width(f64::from(pen.width.max(1)));
    context.set_line_cap(cairo::LineCap::Round);
    context.set_line_join(cairo::LineJoin::Round);
}

fn select_text_font(context: &cairo::Context, style: &TextStyle) {
    let slant = if style.italic {
        cairo::FontSlant::Italic
    } else {
        cairo::FontSlant::Normal
    };
    let weight = if style.bold {
        cairo::FontWeight::Bold
    } else {
        cairo::FontWeight::Normal
    };
    context.select_font_face(TEXT_FONT_FAMILY, slant, weight);
    context.set_font_size(f64::from(style.font_size.max(1)));
}

/// Paints elements onto a borrowed cairo context.
pub struct CairoSurface<'a> {
    context: &'a cairo::Context,
}

impl<'a> CairoSurface<'a> {
    pub fn new(context: &'a cairo::Context) -> Self {
        Self { context }
    }

    fn fill_then_stroke(&mut self, pen: Pen, fill: Option<Color>) {
        if let Some(fill) = fill {
            set_source_color(self.context, fill);
            let _ = self.context.fill_preserve();
        }
        apply_pen(self.context, pen);
        let _ = self.context.stroke();
    }
}

impl Surface for CairoSurface<'_> {
    fn stroke_path(&mut self, points: &[ToolPoint], pen: Pen) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        apply_pen(self.context, pen);
        self.context.move_to(f64::from(first.x), f64::from(first.y));
        for point in rest {
            self.context.line_to(f64::from(point.x), f64::from(point.y));
        }
        let _ = self.context.stroke();
    }

    fn stroke_line(&mut self, start: ToolPoint, end: ToolPoint, pen: Pen) {
        apply_pen(self.context, pen);
        self.context.move_to(f64::from(start.x), f64::from(start.y));
        self.context.line_to(f64::from(end.x), f64::from(end.y));
        let _ = self.context.stroke();
    }

    fn draw_rectangle(&mut self, bounds: ToolBounds, pen: Pen, fill: Option<Color>) {
        self.context.new_path();
        self.context.rectangle(
            f64::from(bounds.x),
            f64::from(bounds.y),
            f64::from(bounds.width),
            f64::from(bounds.height),
        );
        self.fill_then_stroke(pen, fill);
    }

    fn draw_circle(&mut self, center: ToolPoint, radius: u32, pen: Pen, fill: Option<Color>) {
        self.context.new_path();
        self.context.arc(
            f64::from(center.x),
            f64::from(center.y),
            f64::from(radius),
            0.0,
            std::f64::consts::TAU,
        );
        self.fill_then_stroke(pen, fill);
    }

    fn draw_text(&mut self, position: ToolPoint, content: &str, style: &TextStyle) {
        if content.is_empty() {
            return;
        }
        select_text_font(self.context, style);
        set_source_color(self.context, style.color);
        self.context
            .move_to(f64::from(position.x), f64::from(position.y));
        let _ = self.context.show_text(content);
    }
}

/// Measures text with cairo's toy font API on a private 1x1 surface.
pub struct CairoTextMetrics {
    context: cairo::Context,
}

impl CairoTextMetrics {
    pub fn new() -> Option<Self> {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, 1, 1).ok()?;
        let context = cairo::Context::new(&surface).ok()?;
        Some(Self { context })
    }
}

impl TextMetrics for CairoTextMetrics {
    fn measure(&self, content: &str, style: &TextStyle) -> TextExtent {
        select_text_font(&self.context, style);
        let fallback_height = f64::from(style.font_size.max(1)) * 1.2;
        let height = self
            .context
            .font_extents()
            .map(|extents| extents.height())
            .unwrap_or(fallback_height);
        let width = if content.is_empty() {
            0.0
        } else {
            self.context
                .text_extents(content)
                .map(|extents| extents.x_advance())
                .unwrap_or_else(|_| content.chars().count() as f64 * f64::from(style.font_size) * 0.6)
        };
        TextExtent { width, height }
    }
}

/// Copies an RGBA image into a premultiplied ARGB32 cairo surface.
pub fn rgba_image_to_cairo_surface(image: &RgbaImage) -> Option<cairo::ImageSurface> {
    let width = i32::try_from(image.width()).ok()?;
    let height = i32::try_from(image.height()).ok()?;
    let mut surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height).ok()?;
    let stride = usize::try_from(surface.stride()).ok()?;
    let row_len = usize::try_from(image.width()).ok()?.checked_mul(4)?;
    {
        let mut data = surface.data().ok()?;
        for (row, source) in data
            .chunks_mut(stride)
            .zip(image.as_raw().chunks_exact(row_len.max(1)))
        {
            for (target, pixel) in row.chunks_exact_mut(4).zip(source.chunks_exact(4)) {
                let alpha = u32::from(pixel[3]);
                let premultiply = |channel: u8| (u32::from(channel) * alpha + 127) / 255;
                let argb = (alpha << 24)
                    | (premultiply(pixel[0]) << 16)
                    | (premultiply(pixel[1]) << 8)
                    | premultiply(pixel[2]);
                target.copy_from_slice(&argb.to_ne_bytes());
            }
        }
    }
    surface.mark_dirty();
    Some(surface)
}

/// Paints the magnifier lens: bordered window, zoomed frame, crosshair and zoom label.
///
/// `frame` holds the screen as it looked when the lens opened, in canvas coordinates.
pub fn draw_magnifier_lens(
    context: &cairo::Context,
    view: &MagnifierView,
    frame: Option<&cairo::ImageSurface>,
) {
    let window = view.window;
    let (x, y) = (f64::from(window.x), f64::from(window.y));
    let size = f64::from(window.width);
    let border = f64::from(MAGNIFIER_BORDER);
    let inner = (size - border * 2.0).max(1.0);

    context.save().ok();
    context.new_path();
    context.rectangle(x, y, size, size);
    context.set_source_rgba(0.12, 0.12, 0.12, 0.95);
    let _ = context.fill();

    context.rectangle(x + border, y + border, inner, inner);
    context.clip();
    match frame {
        Some(frame) => {
            context.translate(x + border, y + border);
            context.scale(view.zoom_factor, view.zoom_factor);
            if context
                .set_source_surface(
                    frame,
                    -f64::from(view.capture.x),
                    -f64::from(view.capture.y),
                )
                .is_ok()
            {
                context.source().set_filter(cairo::Filter::Nearest);
                let _ = context.paint();
            }
        }
        None => {
            context.set_source_rgb(0.2, 0.2, 0.2);
            let _ = context.paint();
        }
    }
    context.restore().ok();

    let center_x = x + size / 2.0;
    let center_y = y + size / 2.0;
    context.save().ok();
    context.set_source_rgba(1.0, 0.0, 0.0, 0.8);
    context.set_line_width(1.0);
    context.move_to(center_x - 10.0, center_y);
    context.line_to(center_x + 10.0, center_y);
    context.move_to(center_x, center_y - 10.0);
    context.line_to(center_x, center_y + 10.0);
    let _ = context.stroke();

    context.select_font_face(
        TEXT_FONT_FAMILY,
        cairo::FontSlant::Normal,
        cairo::FontWeight::Bold,
    );
    context.set_font_size(12.0);
    context.set_source_rgb(1.0, 1.0, 1.0);
    context.move_to(x + border + 4.0, y + size - border - 4.0);
    let _ = context.show_text(&format!("{:.1}x", view.zoom_factor));
    context.restore().ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style(font_size: u32) -> TextStyle {
        TextStyle {
            color: Color::RED,
            font_size,
            bold: false,
            italic: false,
        }
    }

    #[test]
    fn cairo_metrics_grow_with_content_and_size() {
        let metrics = CairoTextMetrics::new().expect("cairo image surface");
        let short = metrics.measure("ab", &style(24));
        let long = metrics.measure("abcdef", &style(24));
        let large = metrics.measure("ab", &style(48));

        assert!(long.width > short.width);
        assert!(large.height > short.height);
        assert_eq!(metrics.measure("", &style(24)).width, 0.0);
    }

    #[test]
    fn cairo_surface_paints_opaque_pixels_for_a_stroke() {
        let mut image =
            cairo::ImageSurface::create(cairo::Format::ARgb32, 20, 20).expect("image surface");
        {
            let context = cairo::Context::new(&image).expect("context");
            let mut surface = CairoSurface::new(&context);
            surface.stroke_line(
                ToolPoint::new(0, 10),
                ToolPoint::new(20, 10),
                Pen::new(Color::RED, 4),
            );
        }
        image.flush();
        let stride = usize::try_from(image.stride()).expect("stride");
        let data = image.data().expect("surface data");
        let pixel = &data[10 * stride + 10 * 4..10 * stride + 10 * 4 + 4];
        assert_eq!(pixel[3], 255);
        assert_eq!(pixel[2], 255);
    }

    #[test]
    fn rgba_image_converts_to_premultiplied_surface() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        image.put_pixel(1, 0, image::Rgba([0, 0, 255, 128]));

        let mut surface = rgba_image_to_cairo_surface(&image).expect("surface");
        assert_eq!((surface.width(), surface.height()), (2, 1));
        let data = surface.data().expect("surface data");
        let opaque = u32::from_ne_bytes([data[0], data[1], data[2], data[3]]);
        let half = u32::from_ne_bytes([data[4], data[5], data[6], data[7]]);
        assert_eq!(opaque, 0xFFFF_0000);
        assert_eq!(half >> 24, 128);
        assert_eq!(half & 0xFF, 128);
        assert_eq!((half >> 16) & 0xFF, 0);
    }

    #[test]
    fn magnifier_lens_paints_zoomed_frame_pixels() {
        let frame_image = RgbaImage::from_pixel(100, 100, image::Rgba([0, 255, 0, 255]));
        let frame = rgba_image_to_cairo_surface(&frame_image).expect("frame");
        let view = crate::editor::MagnifierSettings::new(2.0, 100)
            .view_at(ToolPoint::new(20, 20), ToolBounds::new(0, 0, 400, 400));

        let mut target =
            cairo::ImageSurface::create(cairo::Format::ARgb32, 400, 400).expect("target");
        {
            let context = cairo::Context::new(&target).expect("context");
            draw_magnifier_lens(&context, &view, Some(&frame));
        }
        target.flush();
        let stride = usize::try_from(target.stride()).expect("stride");
        let data = target.data().expect("target data");
        let probe_x = usize::try_from(view.window.x).expect("x") + 40;
        let probe_y = usize::try_from(view.window.y).expect("y") + 40;
        let offset = probe_y * stride + probe_x * 4;
        let argb = u32::from_ne_bytes([
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ]);
        assert_eq!(argb, 0xFF00_FF00);
    }
}
