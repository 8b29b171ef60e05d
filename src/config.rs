//! Configuration types for table extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. The geometry that locates the table on
//! the page (bounding box, column separators), the header column index, the
//! date-prefix length, and the category-label set were all literals in earlier
//! revisions of this tool; lifting them into one struct lets two runs be
//! diffed to understand why their outputs differ, without changing the
//! default behaviour for the report template this tool was written for.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field. The
//! builder lets callers set only what they care about and rely on documented
//! defaults for the rest.

use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Default table bounding box for the report template ("x1,y1,x2,y2" in PDF points).
pub const DEFAULT_TABLE_AREA: &str = "65,674,390,492";

/// Default column separator x-coordinates for the report template.
pub const DEFAULT_COLUMNS: &str = "65,138,184,232,288,338,492";

/// Default category suffixes appended to the date prefix, in output order.
pub const DEFAULT_CATEGORY_LABELS: [&str; 5] = ["(A)", "(B)", "(C)", "(D)", "(E)"];

/// Configuration for one extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or [`ExtractionConfig::default()`];
/// the defaults reproduce the geometry of the recurring report this tool
/// processes.
///
/// # Example
/// ```rust
/// use pdftab2csv::{ExtractionConfig, PageSelection};
///
/// let config = ExtractionConfig::builder()
///     .pages(PageSelection::Single(1))
///     .region("65,674,390,492", "65,138,184,232,288,338,492")
///     .unwrap()
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Directory searched for `<name>.pdf` inputs. Default: `"pdf"`.
    ///
    /// Inputs that already carry a path separator or a `.pdf` extension are
    /// used as-is and never resolved through this directory.
    pub pdf_dir: String,

    /// Directory where output CSVs (and contour PNGs) are written. Default: `"./data"`.
    pub data_path: String,

    /// Pages scanned for table regions. Default: page 1 only.
    pub pages: PageSelection,

    /// Table regions, one bounding box plus one separator list each.
    ///
    /// Geometry is never auto-detected: the regions encode the exact point
    /// coordinates of the table on the page and must match the document
    /// template for extraction to succeed.
    pub regions: Vec<TableRegion>,

    /// Grid column holding the segment headers. Default: 1.
    ///
    /// Column 0 is the sliver left of the first separator and is normally
    /// empty for this template.
    pub header_column: usize,

    /// Number of leading characters of the file name used as the date prefix.
    /// Default: 8 (e.g. `"2024_10_02"` → `"2024_10_"`).
    pub date_prefix_len: usize,

    /// Category labels cycled through the date-category column, in order.
    /// Default: `(A)` through `(E)`.
    pub category_labels: Vec<String>,

    /// Target pixel width when rasterising a page for the diagnostic contour.
    /// Default: 1200.
    pub contour_width: u32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            pdf_dir: "pdf".to_string(),
            data_path: "./data".to_string(),
            pages: PageSelection::Single(1),
            regions: vec![TableRegion::parse(DEFAULT_TABLE_AREA, DEFAULT_COLUMNS)
                .expect("default geometry is valid")],
            header_column: 1,
            date_prefix_len: 8,
            category_labels: DEFAULT_CATEGORY_LABELS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            contour_width: 1200,
        }
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
            regions_replaced: false,
        }
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
    regions_replaced: bool,
}

impl ExtractionConfigBuilder {
    pub fn pdf_dir(mut self, dir: impl Into<String>) -> Self {
        self.config.pdf_dir = dir.into();
        self
    }

    pub fn data_path(mut self, path: impl Into<String>) -> Self {
        self.config.data_path = path.into();
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    /// Add a table region from its bounding-box and separator strings.
    ///
    /// The first call replaces the default region; later calls append.
    pub fn region(mut self, area: &str, columns: &str) -> Result<Self, ExtractError> {
        let region = TableRegion::parse(area, columns)?;
        if self.regions_replaced {
            self.config.regions.push(region);
        } else {
            self.config.regions = vec![region];
            self.regions_replaced = true;
        }
        Ok(self)
    }

    pub fn header_column(mut self, col: usize) -> Self {
        self.config.header_column = col;
        self
    }

    pub fn date_prefix_len(mut self, len: usize) -> Self {
        self.config.date_prefix_len = len;
        self
    }

    pub fn category_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.category_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    pub fn contour_width(mut self, px: u32) -> Self {
        self.config.contour_width = px.max(100);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        let c = &self.config;
        if c.regions.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "at least one table region is required".into(),
            ));
        }
        if c.category_labels.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "category label set must not be empty".into(),
            ));
        }
        if c.date_prefix_len == 0 {
            return Err(ExtractError::InvalidConfig(
                "date prefix length must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Geometry ─────────────────────────────────────────────────────────────

/// One table region on a page: a bounding box plus fixed column separators.
///
/// Coordinates are PDF points (origin bottom-left, y increasing upward),
/// matching what PDF inspection tools report. The area string is
/// `"x1,y1,x2,y2"` with `(x1,y1)` the top-left and `(x2,y2)` the
/// bottom-right corner; the columns string is the x-coordinate of each
/// separator, left to right. A grid cell's column index is the number of
/// separators at or left of the text, so `n` separators produce `n + 1`
/// grid columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRegion {
    /// Left edge of the bounding box, points.
    pub left: f32,
    /// Top edge (the larger y), points.
    pub top: f32,
    /// Right edge, points.
    pub right: f32,
    /// Bottom edge (the smaller y), points.
    pub bottom: f32,
    /// Column separator x-coordinates, ascending.
    pub columns: Vec<f32>,
}

impl TableRegion {
    /// Parse a region from its `"x1,y1,x2,y2"` and `"x1,x2,…"` strings.
    pub fn parse(area: &str, columns: &str) -> Result<Self, ExtractError> {
        let coords = parse_floats(area)?;
        if coords.len() != 4 {
            return Err(ExtractError::InvalidGeometry {
                input: area.to_string(),
                detail: format!("expected 4 comma-separated numbers, got {}", coords.len()),
            });
        }

        let mut seps = parse_floats(columns)?;
        if seps.is_empty() {
            return Err(ExtractError::InvalidGeometry {
                input: columns.to_string(),
                detail: "expected at least one column separator".to_string(),
            });
        }
        seps.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        // Normalise corner order so callers may pass either diagonal.
        let (x1, y1, x2, y2) = (coords[0], coords[1], coords[2], coords[3]);
        Ok(Self {
            left: x1.min(x2),
            top: y1.max(y2),
            right: x1.max(x2),
            bottom: y1.min(y2),
            columns: seps,
        })
    }

    /// Whether a point (PDF coordinates) lies inside the bounding box.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.bottom && y <= self.top
    }

    /// Grid column index for an x-coordinate: the count of separators ≤ x.
    pub fn column_index(&self, x: f32) -> usize {
        self.columns.iter().filter(|&&sep| sep <= x).count()
    }

    /// Number of grid columns this region produces.
    pub fn column_count(&self) -> usize {
        self.columns.len() + 1
    }
}

fn parse_floats(s: &str) -> Result<Vec<f32>, ExtractError> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            f32::from_str(t).map_err(|e| ExtractError::InvalidGeometry {
                input: s.to_string(),
                detail: format!("'{t}' is not a number: {e}"),
            })
        })
        .collect()
}

// ── Page selection ───────────────────────────────────────────────────────

/// Specifies which pages of the PDF to scan for table regions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Scan all pages.
    All,
    /// Scan a single page (1-indexed). Default: page 1, where the report
    /// template places its table.
    Single(usize),
    /// Scan a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Scan specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl Default for PageSelection {
    fn default() -> Self {
        PageSelection::Single(1)
    }
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed pages.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}
