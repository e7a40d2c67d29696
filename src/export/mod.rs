//! PNG export of the annotation layer.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use gtk4::cairo;
use image::RgbaImage;
use thiserror::Error;

use crate::editor::Canvas;
use crate::render::CairoSurface;

pub type ExportResult<T> = std::result::Result<T, ExportError>;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid export size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("failed to create screenshot directory: {path}")]
    CreateDirectory { path: PathBuf, source: io::Error },
    #[error("cairo surface error: {0}")]
    Surface(#[from] cairo::Error),
    #[error("failed to read back rendered pixels")]
    ReadPixels,
    #[error("failed to write png: {path}")]
    Encode {
        path: PathBuf,
        source: image::ImageError,
    },
}

pub fn screenshot_file_name(now: DateTime<Local>) -> String {
    format!("screenshot_{}.png", now.format("%Y%m%d_%H%M%S"))
}

#[derive(Debug, Clone)]
pub struct ScreenshotExporter {
    directory: PathBuf,
}

impl ScreenshotExporter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Writes the canvas's committed elements to a timestamped PNG and returns its path.
    pub fn export(&self, canvas: &Canvas, width: u32, height: u32) -> ExportResult<PathBuf> {
        self.export_named(canvas, width, height, &screenshot_file_name(Local::now()))
    }

    pub fn export_named(
        &self,
        canvas: &Canvas,
        width: u32,
        height: u32,
        file_name: &str,
    ) -> ExportResult<PathBuf> {
        fs::create_dir_all(&self.directory).map_err(|source| ExportError::CreateDirectory {
            path: self.directory.clone(),
            source,
        })?;
        let image = render_canvas_image(canvas, width, height)?;
        let path = self.directory.join(file_name);
        image
            .save_with_format(&path, image::ImageFormat::Png)
            .map_err(|source| ExportError::Encode {
                path: path.clone(),
                source,
            })?;
        tracing::info!(?path, width, height, "screenshot saved");
        Ok(path)
    }
}

pub fn render_canvas_image(canvas: &Canvas, width: u32, height: u32) -> ExportResult<RgbaImage> {
    let invalid = || ExportError::InvalidSize { width, height };
    let surface_width = i32::try_from(width).map_err(|_| invalid())?;
    let surface_height = i32::try_from(height).map_err(|_| invalid())?;
    if surface_width == 0 || surface_height == 0 {
        return Err(invalid());
    }

    let mut surface =
        cairo::ImageSurface::create(cairo::Format::ARgb32, surface_width, surface_height)?;
    {
        let context = cairo::Context::new(&surface)?;
        canvas.draw_elements(&mut CairoSurface::new(&context));
    }
    surface.flush();
    cairo_surface_to_rgba_image(&mut surface).ok_or(ExportError::ReadPixels)
}

/// Converts premultiplied native-endian ARGB32 into straight RGBA.
pub fn cairo_surface_to_rgba_image(surface: &mut cairo::ImageSurface) -> Option<RgbaImage> {
    let width = u32::try_from(surface.width()).ok()?;
    let height = u32::try_from(surface.height()).ok()?;
    let stride = usize::try_from(surface.stride()).ok()?;
    let row_len = usize::try_from(width).ok()?.checked_mul(4)?;
    let data = surface.data().ok()?;

    let mut rgba = Vec::with_capacity(row_len.checked_mul(usize::try_from(height).ok()?)?);
    for row in data.chunks(stride).take(usize::try_from(height).ok()?) {
        let row = row.get(..row_len)?;
        for pixel in row.chunks_exact(4) {
            let argb = u32::from_ne_bytes([pixel[0], pixel[1], pixel[2], pixel[3]]);
            let alpha = (argb >> 24) as u8;
            let unpremultiply = |channel: u32| -> u8 {
                let channel = (channel & 0xFF) as u16;
                match alpha {
                    0 => 0,
                    255 => channel as u8,
                    _ => ((channel * 255 + u16::from(alpha) / 2) / u16::from(alpha)).min(255) as u8,
                }
            };
            rgba.extend_from_slice(&[
                unpremultiply(argb >> 16),
                unpremultiply(argb >> 8),
                unpremultiply(argb),
                alpha,
            ]);
        }
    }
    RgbaImage::from_raw(width, height, rgba)
}
