use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, Float32Array, Float64Array};
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;

use super::model::{IsothermData, IsothermSample};
use crate::error::{BetError, Result};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load an isotherm from a file and attach the adsorbate description.
///
/// Supported formats, dispatched by extension:
/// * `.csv`     – two columns, relative pressure then amount adsorbed (mol/g)
/// * `.json`    – `{ "relp": [...], "n": [...] }`
/// * `.parquet` – Float64/Float32 columns `relp` and `n`
pub fn load_file(path: &Path, a_o: f64, info: &str) -> Result<IsothermData> {
    let sample = load_sample(path)?;
    Ok(IsothermData::new(sample, a_o, info)?.with_source(path))
}

/// Load only the experimental points from a file.
pub fn load_sample(path: &Path) -> Result<IsothermSample> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(BetError::UnsupportedFormat(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: first column relative pressure, second column amount
/// adsorbed. A leading header row is detected and skipped; extra columns
/// are ignored.
fn load_csv(path: &Path) -> Result<IsothermSample> {
    let file = std::fs::File::open(path).map_err(|e| BetError::io(path, e))?;
    read_csv(file)
}

/// Parse two-column isotherm CSV from any reader.
pub fn read_csv<R: std::io::Read>(rdr: R) -> Result<IsothermSample> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr);

    let mut relp = Vec::new();
    let mut n = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() < 2 {
            return Err(BetError::InputFormat(format!(
                "row {row_no}: expected 2 columns (relative pressure, amount adsorbed), found {}",
                record.len()
            )));
        }

        let p = record[0].parse::<f64>();
        let q = record[1].parse::<f64>();
        match (p, q) {
            (Ok(p), Ok(q)) => {
                relp.push(p);
                n.push(q);
            }
            // A non-numeric first row is the header.
            (Err(_), Err(_)) if row_no == 0 => {
                debug!("skipping header row: {:?}", record);
            }
            _ => {
                return Err(BetError::InputFormat(format!(
                    "row {row_no}: '{}', '{}' is not a pair of numbers",
                    &record[0], &record[1]
                )));
            }
        }
    }

    if relp.is_empty() {
        return Err(BetError::InputFormat("file contains no data rows".into()));
    }
    IsothermSample::new(relp, n)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema:
///
/// ```json
/// { "relp": [0.05, 0.10, ...], "n": [0.00071, 0.00083, ...] }
/// ```
#[derive(Debug, Deserialize)]
struct IsothermRecord {
    relp: Vec<f64>,
    n: Vec<f64>,
}

fn load_json(path: &Path) -> Result<IsothermSample> {
    let text = std::fs::read_to_string(path).map_err(|e| BetError::io(path, e))?;
    let record: IsothermRecord = serde_json::from_str(&text)?;
    IsothermSample::new(record.relp, record.n)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding one isotherm.
///
/// Columns named `relp` and `n` are used when present, otherwise the first
/// two columns in schema order.
fn load_parquet(path: &Path) -> Result<IsothermSample> {
    let file = std::fs::File::open(path).map_err(|e| BetError::io(path, e))?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut relp = Vec::new();
    let mut n = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();
        if schema.fields().len() < 2 {
            return Err(BetError::InputFormat(
                "parquet file needs relative pressure and amount adsorbed columns".into(),
            ));
        }

        let (p_idx, n_idx) = column_indices(schema.index_of("relp").ok(), schema.index_of("n").ok());

        relp.extend(extract_f64(batch.column(p_idx), "relp")?);
        n.extend(extract_f64(batch.column(n_idx), "n")?);
    }

    if relp.is_empty() {
        return Err(BetError::InputFormat("parquet file contains no rows".into()));
    }
    IsothermSample::new(relp, n)
}

/// Pressure and amount column indices. A named column wins; an unnamed one
/// takes the first column not already claimed by the other.
fn column_indices(named_p: Option<usize>, named_n: Option<usize>) -> (usize, usize) {
    let first_free = |taken: Option<usize>| if taken == Some(0) { 1 } else { 0 };
    match (named_p, named_n) {
        (Some(p), Some(n)) => (p, n),
        (Some(p), None) => (p, first_free(Some(p))),
        (None, Some(n)) => (first_free(Some(n)), n),
        (None, None) => (0, 1),
    }
}

/// Read a Float64 or Float32 column, rejecting nulls.
fn extract_f64(col: &Arc<dyn Array>, name: &str) -> Result<Vec<f64>> {
    if col.null_count() > 0 {
        return Err(BetError::InputFormat(format!("column '{name}' contains nulls")));
    }
    if let Some(arr) = col.as_any().downcast_ref::<Float64Array>() {
        Ok(arr.values().iter().copied().collect())
    } else if let Some(arr) = col.as_any().downcast_ref::<Float32Array>() {
        Ok(arr.values().iter().map(|&v| v as f64).collect())
    } else {
        Err(BetError::InputFormat(format!(
            "column '{name}' is {:?}, expected Float64 or Float32",
            col.data_type()
        )))
    }
}
