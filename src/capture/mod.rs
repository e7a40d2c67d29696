//! Screen pixel grabs for the magnifier lens.

use std::process::{Command, Stdio};

use image::RgbaImage;
use thiserror::Error;

use crate::geometry::ToolBounds;

pub type CaptureResult<T> = std::result::Result<T, CaptureError>;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("command failed: {command}: {message}")]
    CommandFailed { command: String, message: String },
    #[error("command io error: {command}")]
    CommandIo {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid capture region {0:?}")]
    InvalidRegion(ToolBounds),
    #[error("failed to decode captured image: {0}")]
    Decode(#[from] image::ImageError),
}

pub trait CaptureBackend {
    /// Encoded image bytes for `geometry` in grim's `x,y wxh` syntax.
    fn grab_region(&self, geometry: &str) -> CaptureResult<Vec<u8>>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GrimBackend;

impl CaptureBackend for GrimBackend {
    fn grab_region(&self, geometry: &str) -> CaptureResult<Vec<u8>> {
        let command = "grim";
        let output = Command::new(command)
            .args(["-t", "png", "-g", geometry, "-"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| CaptureError::CommandIo {
                command: command.to_string(),
                source,
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CaptureError::CommandFailed {
                command: command.to_string(),
                message: format!("exit status: {}; stderr: {}", output.status, stderr.trim()),
            });
        }
        if output.stdout.is_empty() {
            return Err(CaptureError::CommandFailed {
                command: command.to_string(),
                message: "command produced no image data".to_string(),
            });
        }
        Ok(output.stdout)
    }
}

pub fn grim_geometry(region: ToolBounds) -> CaptureResult<String> {
    if region.width == 0 || region.height == 0 {
        return Err(CaptureError::InvalidRegion(region));
    }
    Ok(format!(
        "{},{} {}x{}",
        region.x, region.y, region.width, region.height
    ))
}

/// Grabs `region` of the global layout and decodes it to RGBA.
pub fn capture_region_with<B: CaptureBackend>(
    backend: &B,
    region: ToolBounds,
) -> CaptureResult<RgbaImage> {
    let geometry = grim_geometry(region)?;
    let bytes = backend.grab_region(&geometry)?;
    let image = image::load_from_memory(&bytes)?.to_rgba8();
    tracing::debug!(
        geometry,
        width = image.width(),
        height = image.height(),
        "captured screen region"
    );
    Ok(image)
}

pub fn capture_region(region: ToolBounds) -> CaptureResult<RgbaImage> {
    capture_region_with(&GrimBackend, region)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Cursor;

    #[derive(Default)]
    struct FakeBackend {
        calls: RefCell<Vec<String>>,
        payload: Vec<u8>,
    }

    impl CaptureBackend for FakeBackend {
        fn grab_region(&self, geometry: &str) -> CaptureResult<Vec<u8>> {
            self.calls.borrow_mut().push(geometry.to_string());
            if self.payload.is_empty() {
                return Err(CaptureError::CommandFailed {
                    command: "grim".to_string(),
                    message: "no output".to_string(),
                });
            }
            Ok(self.payload.clone())
        }
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut bytes = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(image)
            .write_to(&mut bytes, image::ImageFormat::Png)
            .expect("encode png");
        bytes.into_inner()
    }

    #[test]
    fn grim_geometry_uses_position_and_size() {
        assert_eq!(
            grim_geometry(ToolBounds::new(-1920, 40, 300, 200)).expect("geometry"),
            "-1920,40 300x200"
        );
        assert!(matches!(
            grim_geometry(ToolBounds::new(0, 0, 0, 10)),
            Err(CaptureError::InvalidRegion(_))
        ));
    }

    #[test]
    fn capture_region_decodes_backend_png() {
        let backend = FakeBackend {
            payload: png_bytes(4, 3),
            ..FakeBackend::default()
        };
        let image = capture_region_with(&backend, ToolBounds::new(10, 20, 4, 3)).expect("capture");
        assert_eq!(image.dimensions(), (4, 3));
        assert_eq!(image.get_pixel(0, 0).0, [10, 20, 30, 255]);
        assert_eq!(*backend.calls.borrow(), vec!["10,20 4x3".to_string()]);
    }

    #[test]
    fn capture_region_propagates_backend_failure() {
        let backend = FakeBackend::default();
        assert!(matches!(
            capture_region_with(&backend, ToolBounds::new(0, 0, 4, 4)),
            Err(CaptureError::CommandFailed { .. })
        ));
    }

    #[test]
    fn capture_region_rejects_garbage_payload() {
        let backend = FakeBackend {
            payload: b"not an image".to_vec(),
            ..FakeBackend::default()
        };
        assert!(matches!(
            capture_region_with(&backend, ToolBounds::new(0, 0, 4, 4)),
            Err(CaptureError::Decode(_))
        ));
    }
}
