//! Diagnostic contour rendering: the page with the table geometry drawn on.
//!
//! When a run produces a skewed table, the first question is always "does
//! the configured geometry still sit on the table?". This stage rasterises
//! the page via pdfium and paints the region bounding box and every column
//! separator over it so the operator can answer that by eye.
//!
//! Strictly opt-in and strictly side-band: it is invoked only on demand
//! (`--contour` or [`crate::render_contour`]), produces no data consumed by
//! later stages, and performs no process-global setup.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use image::{Rgba, RgbaImage};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;

const CONTOUR_COLOR: Rgba<u8> = Rgba([220, 38, 38, 255]);
const LINE_WIDTH: u32 = 2;

/// Render the first selected page with every configured region outlined.
///
/// Writes a PNG next to the would-be CSV output and returns its path.
pub fn render_contour(
    pdf_path: &Path,
    config: &ExtractionConfig,
    output_path: &Path,
) -> Result<PathBuf, ExtractError> {
    let pdfium = super::bind_pdfium()?;

    let document =
        pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| ExtractError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: format!("{e:?}"),
            })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;

    let page_indices = config.pages.to_indices(total_pages);
    let Some(&idx) = page_indices.first() else {
        return Err(ExtractError::PageOutOfRange {
            page: 0,
            total: total_pages,
        });
    };

    let page = pages
        .get(idx as u16)
        .map_err(|e| ExtractError::RasterisationFailed {
            page: idx + 1,
            detail: format!("{e:?}"),
        })?;

    let page_width = page.width().value;
    let page_height = page.height().value;

    let render_config = PdfRenderConfig::new()
        .set_target_width(config.contour_width as i32)
        .set_maximum_height(config.contour_width as i32 * 2);

    let bitmap =
        page.render_with_config(&render_config)
            .map_err(|e| ExtractError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{e:?}"),
            })?;

    let mut image = bitmap.as_image().to_rgba8();
    let sx = image.width() as f32 / page_width;
    let sy = image.height() as f32 / page_height;

    for region in &config.regions {
        // PDF coordinates are bottom-up; image rows are top-down.
        let left = (region.left * sx) as u32;
        let right = (region.right * sx) as u32;
        let top = ((page_height - region.top) * sy) as u32;
        let bottom = ((page_height - region.bottom) * sy) as u32;

        draw_hline(&mut image, left, right, top);
        draw_hline(&mut image, left, right, bottom);
        draw_vline(&mut image, top, bottom, left);
        draw_vline(&mut image, top, bottom, right);

        for &sep in &region.columns {
            draw_vline(&mut image, top, bottom, (sep * sx) as u32);
        }
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ExtractError::OutputWriteFailed {
                path: output_path.to_path_buf(),
                source: e,
            })?;
        }
    }

    image
        .save(output_path)
        .map_err(|e| ExtractError::Internal(format!("contour PNG encode failed: {e}")))?;

    info!(
        "Contour for page {} written to {}",
        idx + 1,
        output_path.display()
    );
    Ok(output_path.to_path_buf())
}

fn draw_hline(img: &mut RgbaImage, x1: u32, x2: u32, y: u32) {
    let (w, h) = (img.width(), img.height());
    for x in x1.min(w - 1)..=x2.min(w.saturating_sub(1)) {
        for dy in 0..LINE_WIDTH {
            let yy = (y + dy).min(h - 1);
            img.put_pixel(x, yy, CONTOUR_COLOR);
        }
    }
}

fn draw_vline(img: &mut RgbaImage, y1: u32, y2: u32, x: u32) {
    let (w, h) = (img.width(), img.height());
    for y in y1.min(h - 1)..=y2.min(h.saturating_sub(1)) {
        for dx in 0..LINE_WIDTH {
            let xx = (x + dx).min(w - 1);
            img.put_pixel(xx, y, CONTOUR_COLOR);
        }
    }
}
