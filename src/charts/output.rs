//! Figure output: PNG and SVG files, in-memory PNG bytes and SVG text.

use crate::charts::renderer::{drawing_error, Figure, RenderError};
use image::{ImageFormat, RgbImage};
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(OutputFormat::Png),
            "svg" => Ok(OutputFormat::Svg),
            _ => Err(RenderError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

fn paint<DB: DrawingBackend, F: Figure>(
    root: &DrawingArea<DB, Shift>,
    figure: &F,
) -> Result<(), RenderError> {
    root.fill(&WHITE).map_err(drawing_error)?;
    figure.draw(root)?;
    root.present().map_err(drawing_error)?;
    Ok(())
}

/// Render `figure` to `path` as PNG or SVG, creating parent directories.
pub fn save<F: Figure>(figure: &F, path: &Path, size: (u32, u32)) -> Result<(), RenderError> {
    let format = OutputFormat::from_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    match format {
        OutputFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            paint(&root, figure)?;
        }
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            paint(&root, figure)?;
        }
    }

    info!("wrote {}x{} chart to {}", size.0, size.1, path.display());
    Ok(())
}

/// Render `figure` into an in-memory PNG.
pub fn render_png_bytes<F: Figure>(figure: &F, size: (u32, u32)) -> Result<Vec<u8>, RenderError> {
    let (width, height) = size;
    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
        paint(&root, figure)?;
    }

    let img = RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer(width, height))?;
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Render `figure` into SVG text.
pub fn render_svg_string<F: Figure>(figure: &F, size: (u32, u32)) -> Result<String, RenderError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        paint(&root, figure)?;
    }
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            OutputFormat::from_path(&PathBuf::from("out/triple.png")).unwrap(),
            OutputFormat::Png
        );
        assert_eq!(
            OutputFormat::from_path(&PathBuf::from("chart.SVG")).unwrap(),
            OutputFormat::Svg
        );
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        for name in ["chart.pdf", "chart"] {
            assert!(matches!(
                OutputFormat::from_path(&PathBuf::from(name)),
                Err(RenderError::UnsupportedFormat(_))
            ));
        }
    }
}
