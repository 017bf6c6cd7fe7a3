use std::fs;
use std::path::Path;

use image::{ImageFormat, ImageReader};
use resvg::{tiny_skia, usvg};
use spdlog::debug;

use crate::error::{PostError, Result};
use crate::rehost::FetchedImage;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawFormat {
    Svg,
    Raster,
}

/// The content type decides; the file extension is only used when the server sent none.
pub fn detect_format(content_type: Option<&str>, file_name: &str) -> RawFormat {
    let extension = match content_type {
        Some(content_type) => {
            let mime = content_type.split(';').next().unwrap_or("").trim();
            mime.rsplit('/').next().unwrap_or("").to_ascii_lowercase()
        }
        None => file_name.rsplit('.').next().unwrap_or("").to_ascii_lowercase(),
    };

    match extension.as_str() {
        "svg" | "svg+xml" => RawFormat::Svg,
        _ => RawFormat::Raster,
    }
}

/// Writes the download to `work_dir`, rasterizes SVGs to PNG and re-encodes everything as an RGB JPEG.
/// Intermediate files stay in `work_dir`; the caller owns its cleanup.
pub fn convert_to_jpeg(work_dir: &Path, file_name: &str, image: &FetchedImage) -> Result<Vec<u8>> {
    let conversion_err = |reason: String| PostError::ImageConversion { name: file_name.to_string(), reason };

    let downloaded = work_dir.join(file_name);
    fs::write(&downloaded, &image.bytes)?;

    let raster = match detect_format(image.content_type.as_deref(), file_name) {
        RawFormat::Svg => {
            let png = work_dir.join(format!("{}.png", file_name));
            rasterize_svg(&downloaded, &png).map_err(conversion_err)?;
            fs::remove_file(&downloaded)?;
            png
        }
        RawFormat::Raster => downloaded,
    };

    let decoded = ImageReader::open(&raster)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| conversion_err(e.to_string()))?;
    fs::remove_file(&raster)?;

    let jpeg = work_dir.join(format!("{}.jpeg", file_name));
    decoded.to_rgb8()
        .save_with_format(&jpeg, ImageFormat::Jpeg)
        .map_err(|e| conversion_err(e.to_string()))?;
    debug!("Converted {} to {}", file_name, jpeg.display());

    Ok(fs::read(&jpeg)?)
}

fn rasterize_svg(svg_path: &Path, png_path: &Path) -> std::result::Result<(), String> {
    let data = fs::read(svg_path).map_err(|e| e.to_string())?;
    let tree = usvg::Tree::from_data(&data, &usvg::Options::default())
        .map_err(|e| format!("Failed to parse SVG: {}", e))?;

    let size = tree.size().to_int_size();
    let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| format!("Invalid SVG dimensions: {}x{}", size.width(), size.height()))?;

    // JPEG has no alpha channel, so transparent areas are painted white first
    pixmap.fill(tiny_skia::Color::WHITE);
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap.save_png(png_path).map_err(|e| e.to_string())
}
