//! CLI binary for pdftab2csv.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig` and prints results. Defaults reproduce the fixed run
//! this tool was built for: page 1 of `pdf/<name>.pdf` with the report
//! template's geometry, CSV written to `./data/<name>.csv`.

use anyhow::{Context, Result};
use clap::Parser;
use pdftab2csv::{
    extract, extract_to_csv, render_contour, ExtractionConfig, PageSelection,
};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert the filed report pdf/2024_10_02.pdf to ./data/2024_10_02.csv
  pdf2csv 2024_10_02

  # Explicit path and output directory
  pdf2csv reports/october.pdf -o ./out

  # Custom geometry (bounding box in PDF points, then column separators)
  pdf2csv 2024_10_02 --area "65,674,390,492" --columns "65,138,184,232,288,338,492"

  # Verify the geometry visually before converting
  pdf2csv 2024_10_02 --contour

  # Structured output on stdout instead of a CSV file
  pdf2csv 2024_10_02 --json

GEOMETRY:
  --area is "x1,y1,x2,y2" in PDF points, top-left then bottom-right corner
  (origin bottom-left, y increases upward — what PDF inspectors report).
  --columns is the x-coordinate of every column separator, left to right.
  There is no auto-detection: wrong geometry silently yields a skewed table,
  so check with --contour whenever the report layout may have shifted.

OUTPUT:
  UTF-8 CSV with the header row `Segmentos,Valor,Data e categoria`, one row
  per extracted value, no index column.
"#;

/// Extract a fixed-layout report table from a PDF and write it as CSV.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2csv",
    version,
    about = "Extract a fixed-layout report table from a PDF and write it as CSV",
    long_about = "Extract one table from a recurring PDF financial report using fixed \
geometry (bounding box + column separators), reshape it into long-format \
(Segmentos, Valor, Data e categoria) records, and write the result as CSV.",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Report name (resolved as pdf/<name>.pdf) or an explicit PDF path.
    input: String,

    /// Output directory for the CSV (and contour PNG).
    #[arg(short, long, env = "PDF2CSV_OUTPUT_DIR", default_value = "./data")]
    output_dir: String,

    /// Directory searched for filed reports.
    #[arg(long, env = "PDF2CSV_PDF_DIR", default_value = "pdf")]
    pdf_dir: String,

    /// Page selection: all, 1, 2-4, or 1,3.
    #[arg(long, env = "PDF2CSV_PAGES", default_value = "1")]
    pages: String,

    /// Table bounding box "x1,y1,x2,y2" in PDF points (repeatable).
    #[arg(long, default_value = pdftab2csv::config::DEFAULT_TABLE_AREA)]
    area: Vec<String>,

    /// Column separator x-coordinates "x1,x2,…" (repeatable, paired with --area).
    #[arg(long, default_value = pdftab2csv::config::DEFAULT_COLUMNS)]
    columns: Vec<String>,

    /// Grid column holding the segment headers.
    #[arg(long, default_value_t = 1)]
    header_column: usize,

    /// Leading characters of the report name used as the date prefix.
    #[arg(long, default_value_t = 8)]
    date_prefix_len: usize,

    /// Write the diagnostic contour PNG instead of extracting.
    #[arg(long)]
    contour: bool,

    /// Print extracted records as JSON on stdout instead of writing a CSV.
    #[arg(long, env = "PDF2CSV_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2CSV_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2CSV_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    // ── Contour mode ─────────────────────────────────────────────────────
    if cli.contour {
        let path = render_contour(&cli.input, &config, None)
            .context("Contour rendering failed")?;
        if !cli.quiet {
            eprintln!("Contour written to {}", path.display());
        }
        return Ok(());
    }

    // ── Extraction ───────────────────────────────────────────────────────
    if cli.json {
        let output = extract(&cli.input, &config).context("Extraction failed")?;
        let json =
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(json.as_bytes())
            .and_then(|_| handle.write_all(b"\n"))
            .context("Failed to write to stdout")?;
    } else {
        let (path, stats) = extract_to_csv(&cli.input, &config).context("Extraction failed")?;
        if !cli.quiet {
            eprintln!(
                "{} records ({} headers × {} values) → {}  [{}ms]",
                stats.records,
                stats.headers,
                stats.values,
                path.display(),
                stats.total_duration_ms,
            );
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    if cli.area.len() != cli.columns.len() {
        anyhow::bail!(
            "Each --area needs a matching --columns (got {} areas, {} column lists)",
            cli.area.len(),
            cli.columns.len()
        );
    }

    let mut builder = ExtractionConfig::builder()
        .pdf_dir(cli.pdf_dir.clone())
        .data_path(cli.output_dir.clone())
        .pages(parse_pages(&cli.pages)?)
        .header_column(cli.header_column)
        .date_prefix_len(cli.date_prefix_len);

    for (area, columns) in cli.area.iter().zip(&cli.columns) {
        builder = builder
            .region(area, columns)
            .with_context(|| format!("Invalid table geometry: --area {area}"))?;
    }

    builder.build().context("Invalid configuration")
}

/// Parse the `--pages` string into a `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "2-4"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start.trim().parse().context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;
        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {start})");
        }
        if start > end {
            anyhow::bail!("Invalid page range '{start}-{end}': start must be <= end");
        }
        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .context(format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;
        for &p in &pages {
            if p < 1 {
                anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {p})");
            }
        }
        return Ok(PageSelection::Set(pages));
    }

    // Single page: "1"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {page})");
    }
    Ok(PageSelection::Single(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pages_variants() {
        assert_eq!(parse_pages("all").unwrap(), PageSelection::All);
        assert_eq!(parse_pages("1").unwrap(), PageSelection::Single(1));
        assert_eq!(parse_pages("2-4").unwrap(), PageSelection::Range(2, 4));
        assert_eq!(
            parse_pages("1,3").unwrap(),
            PageSelection::Set(vec![1, 3])
        );
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("4-2").is_err());
        assert!(parse_pages("x").is_err());
    }
}
