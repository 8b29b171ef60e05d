//! Pipeline stages for table extraction.
//!
//! Each submodule implements exactly one transformation step. Keeping the
//! stages separate makes each independently testable and lets the extraction
//! backend change without touching the reshape semantics.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ acquire ──▶ reshape ──▶ sink
//! (name)    (pdfium)    (long fmt)  (CSV)
//! ```
//!
//! 1. [`input`]   — resolve the report name to a validated local PDF path
//! 2. [`acquire`] — extract positioned characters with pdfium and snap them
//!    onto the configured region grid ([`acquire::RawGrid`])
//! 3. [`reshape`] — the core: turn the raw grid into the normalised
//!    (Segmentos, Valor, Data e categoria) table
//! 4. [`sink`]    — validate and write the CSV
//!
//! [`contour`] sits outside the flow: an on-demand diagnostic that draws the
//! configured geometry over a page render and feeds nothing downstream.

pub mod acquire;
pub mod contour;
pub mod input;
pub mod reshape;
pub mod sink;

use crate::error::ExtractError;
use pdfium_render::prelude::*;

/// Bind to the pdfium library, honouring `PDFIUM_LIB_PATH` when set.
///
/// Binding failures surface as a typed error with a setup hint instead of a
/// panic deep inside the engine.
pub(crate) fn bind_pdfium() -> Result<Pdfium, ExtractError> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(path) if !path.is_empty() => {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&path))
        }
        _ => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| ExtractError::PdfiumBindingFailed(format!("{e:?}")))?;

    Ok(Pdfium::new(bindings))
}
