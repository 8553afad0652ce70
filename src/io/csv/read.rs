//! CSV reading operations.

use std::io::Cursor;

use anyhow::{Context, Result, ensure};
use polars::{frame::DataFrame, io::SerReader, prelude::{CsvReadOptions, StringChunked}};

use crate::point::{normalize_rows, NormalizeStats, Point, RawRow};

/// Columns that must be present for a source to be readable at all.
const REQUIRED_COLUMNS: [&str; 3] = ["lon", "lat", "segregation"];

/// Read CSV bytes with a header row, keeping every column as a string.
/// Rows with more fields than the header are truncated to the header's width.
pub(crate) fn read_csv_bytes(bytes: &[u8]) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .map_parse_options(|opts| opts.with_truncate_ragged_lines(true))
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .context("[io::csv::read] Failed to read CSV from bytes")
}

fn string_column<'a>(df: &'a DataFrame, name: &str) -> Result<Option<&'a StringChunked>> {
    match df.column(name) {
        Ok(col) => Ok(Some(col.str()
            .with_context(|| format!("[io::csv::read] Column {name} is not a string column"))?)),
        Err(_) => Ok(None),
    }
}

#[inline]
fn cell(col: Option<&StringChunked>, i: usize) -> Option<&str> {
    col.and_then(|c| c.get(i))
}

/// Normalize every row of a point table, in file order. Blank lines are not rows.
pub(crate) fn read_points_frame(df: &DataFrame) -> Result<(Vec<Point>, NormalizeStats)> {
    for name in REQUIRED_COLUMNS {
        ensure!(
            df.column(name).is_ok(),
            "[io::csv::read] Missing required column {name:?}; found {:?}",
            df.get_column_names()
        );
    }

    let lon = string_column(df, "lon")?;
    let lat = string_column(df, "lat")?;
    let segregation = string_column(df, "segregation")?;
    let pcat = string_column(df, "pcat")?;
    let cat = string_column(df, "cat")?;
    let cbsa = string_column(df, "cbsa")?;
    let name = string_column(df, "name")?;
    let p1a = string_column(df, "p1a")?;
    let p2a = string_column(df, "p2a")?;
    let p3a = string_column(df, "p3a")?;
    let p4a = string_column(df, "p4a")?;

    let rows = (0..df.height()).map(|i| RawRow {
        lon: cell(lon, i),
        lat: cell(lat, i),
        segregation: cell(segregation, i),
        pcat: cell(pcat, i),
        cat: cell(cat, i),
        cbsa: cell(cbsa, i),
        name: cell(name, i),
        p1a: cell(p1a, i),
        p2a: cell(p2a, i),
        p3a: cell(p3a, i),
        p4a: cell(p4a, i),
    })
    .filter(|row| !row.is_blank());

    Ok(normalize_rows(rows))
}

/// Parse and normalize an uncompressed point CSV.
pub(crate) fn read_points_csv(bytes: &[u8]) -> Result<(Vec<Point>, NormalizeStats)> {
    let df = read_csv_bytes(bytes)?;
    read_points_frame(&df)
}
