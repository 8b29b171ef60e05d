//! Table acquisition: pdfium character extraction → positional [`RawGrid`].
//!
//! The extraction is deliberately dumb. The table's position on the page and
//! its column separators are supplied as fixed geometry
//! ([`crate::config::TableRegion`]); nothing is auto-detected. Characters
//! inside the bounding box are clustered into rows by baseline Y, assigned to
//! columns by counting separators left of the character, and joined into cell
//! strings with spaces inserted at wide horizontal gaps. This reproduces a
//! "stream"-style table read: whitespace-separated text snapped onto a
//! user-supplied grid.
//!
//! One [`DetectedTable`] is produced per (page, region) pair that contains
//! any text, pages outer, regions inner. Downstream stages consume only the
//! first; the rest exist for the parsing report of multi-region setups.

use crate::config::{ExtractionConfig, TableRegion};
use crate::error::ExtractError;
use crate::output::ParsingReport;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Positional grid of text cells extracted from one table region.
///
/// Rows are ordered top to bottom, cells left to right; cells with no text
/// are empty strings. For the report template this tool targets, rows
/// alternate between a content row (header fragment plus scattered values)
/// and a secondary row carrying no usable data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGrid {
    pub rows: Vec<Vec<String>>,
}

impl RawGrid {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// One table found inside a configured region.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    /// 1-indexed page number.
    pub page: usize,
    pub grid: RawGrid,
    pub report: ParsingReport,
}

/// Result of one acquisition pass over the selected pages.
#[derive(Debug, Clone)]
pub struct Acquisition {
    /// Detected tables, pages outer, regions inner.
    pub tables: Vec<DetectedTable>,
    /// Pages actually scanned.
    pub pages_scanned: usize,
}

/// A positioned character extracted from a PDF page.
///
/// Coordinates are PDF points, bottom-up, matching the region geometry.
#[derive(Debug, Clone)]
struct Glyph {
    ch: char,
    /// Left edge.
    x: f32,
    /// Right edge.
    right: f32,
    /// Bottom edge (baseline approximation).
    y: f32,
    /// Character height, used as the font-size proxy for tolerances.
    height: f32,
}

impl Glyph {
    fn center_x(&self) -> f32 {
        (self.x + self.right) / 2.0
    }
}

/// Extract every configured table region from the selected pages.
///
/// Fails fast on a missing/corrupt document or an out-of-range page
/// selection; returns [`ExtractError::NoTableFound`] when no region contains
/// any text at all.
pub fn acquire_tables(
    pdf_path: &Path,
    config: &ExtractionConfig,
) -> Result<Acquisition, ExtractError> {
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
    info!("PDF loaded: {} pages", total_pages);

    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() {
        return Err(ExtractError::PageOutOfRange {
            page: 0,
            total: total_pages,
        });
    }

    let mut tables = Vec::new();

    for &idx in &page_indices {
        let page = pages
            .get(idx as u16)
            .map_err(|e| ExtractError::TextExtractionFailed {
                page: idx + 1,
                detail: format!("{e:?}"),
            })?;

        let glyphs = extract_glyphs(&page, idx + 1)?;
        debug!("Page {}: {} positioned glyphs", idx + 1, glyphs.len());

        for region in &config.regions {
            let inside: Vec<Glyph> = glyphs
                .iter()
                .filter(|g| region.contains(g.center_x(), g.y))
                .cloned()
                .collect();

            if inside.is_empty() {
                debug!(
                    "Page {}: region [{}, {}]–[{}, {}] contains no text, skipping",
                    idx + 1,
                    region.left,
                    region.top,
                    region.right,
                    region.bottom
                );
                continue;
            }

            let grid = build_grid(inside, region);
            let filled = grid
                .rows
                .iter()
                .flat_map(|r| r.iter())
                .filter(|c| !c.is_empty())
                .count();
            let cells = grid.row_count() * region.column_count();
            let report = ParsingReport {
                page: idx + 1,
                rows: grid.row_count(),
                columns: region.column_count(),
                filled_cells: filled,
                whitespace: if cells == 0 {
                    0.0
                } else {
                    100.0 * (cells - filled) as f32 / cells as f32
                },
            };

            info!(
                "Page {}: detected table with {} rows × {} columns ({:.1}% whitespace)",
                report.page, report.rows, report.columns, report.whitespace
            );
            tables.push(DetectedTable {
                page: idx + 1,
                grid,
                report,
            });
        }
    }

    if tables.is_empty() {
        return Err(ExtractError::NoTableFound);
    }

    Ok(Acquisition {
        tables,
        pages_scanned: page_indices.len(),
    })
}

/// Extract all non-whitespace characters with bounds from one page.
///
/// Whitespace characters are dropped here; cell text is re-spaced from
/// horizontal gaps in [`build_grid`], which is robust against PDFs that
/// encode no space glyphs at all.
#[allow(deprecated)] // PdfRect field access deprecated in pdfium-render 0.8.28
fn extract_glyphs(page: &PdfPage, page_num: usize) -> Result<Vec<Glyph>, ExtractError> {
    let text = page
        .text()
        .map_err(|e| ExtractError::TextExtractionFailed {
            page: page_num,
            detail: format!("{e:?}"),
        })?;

    let mut glyphs = Vec::new();
    for ch in text.chars().iter() {
        if let (Some(unicode_ch), Ok(rect)) = (ch.unicode_char(), ch.tight_bounds()) {
            if unicode_ch.is_whitespace() {
                continue;
            }
            glyphs.push(Glyph {
                ch: unicode_ch,
                x: rect.left.value,
                right: rect.right.value,
                y: rect.bottom.value,
                height: (rect.top.value - rect.bottom.value).abs(),
            });
        }
    }
    Ok(glyphs)
}

/// Snap positioned glyphs onto the region's fixed column grid.
fn build_grid(glyphs: Vec<Glyph>, region: &TableRegion) -> RawGrid {
    let rows = cluster_into_rows(glyphs);
    let num_cols = region.column_count();

    let grid_rows = rows
        .into_iter()
        .map(|row| {
            let mut cells: Vec<String> = vec![String::new(); num_cols];
            // Previous glyph's right edge per cell, for gap-based spacing.
            let mut prev_right: Vec<Option<f32>> = vec![None; num_cols];

            for glyph in row {
                let col = region.column_index(glyph.center_x()).min(num_cols - 1);
                if let Some(right) = prev_right[col] {
                    if glyph.x - right > glyph.height * 0.3 {
                        cells[col].push(' ');
                    }
                }
                cells[col].push(glyph.ch);
                prev_right[col] = Some(glyph.right);
            }

            // Cell text is stripped; the reshape stage relies on empty-string
            // cells meaning "no data here".
            cells.iter().map(|c| c.trim().to_string()).collect()
        })
        .collect();

    RawGrid { rows: grid_rows }
}

/// Group glyphs into rows by baseline Y, top to bottom.
///
/// The tolerance is half the median glyph height, so line detection adapts
/// to the document's font size instead of assuming one.
fn cluster_into_rows(mut glyphs: Vec<Glyph>) -> Vec<Vec<Glyph>> {
    if glyphs.is_empty() {
        return Vec::new();
    }

    let mut heights: Vec<f32> = glyphs.iter().map(|g| g.height).collect();
    heights.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let tolerance = (heights[heights.len() / 2] * 0.5).max(1.0);

    // Sort by Y descending (top to bottom), then X ascending.
    glyphs.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut rows: Vec<Vec<Glyph>> = Vec::new();
    let mut current: Vec<Glyph> = Vec::new();
    let mut current_y: Option<f32> = None;

    for glyph in glyphs {
        match current_y {
            Some(y) if (glyph.y - y).abs() <= tolerance => current.push(glyph),
            _ => {
                if !current.is_empty() {
                    rows.push(std::mem::take(&mut current));
                }
                current_y = Some(glyph.y);
                current.push(glyph);
            }
        }
    }
    if !current.is_empty() {
        rows.push(current);
    }

    // Re-sort each row by X; clustering may have interleaved columns.
    for row in &mut rows {
        row.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
    }

    rows
}
