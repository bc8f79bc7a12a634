use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, BooleanArray, Float64Array, UInt64Array};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use log::info;
use parquet::arrow::ArrowWriter;
use serde::{Deserialize, Serialize};

use super::model::IsothermSample;
use crate::bet::{BetTrial, CandidateRange, CriteriaMask, RangeGrid, SinglePointTrial};
use crate::error::{BetError, Result};

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// One experimental point with its BET transforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub relp: f64,
    pub n: f64,
    pub bet: f64,
    pub rouquerol: f64,
}

/// BET results and criterion flags for one candidate range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedRow {
    pub start_index: usize,
    pub end_index: usize,
    pub start_relp: f64,
    pub end_relp: f64,
    pub ssa: f64,
    pub c: f64,
    pub nm: f64,
    pub slope: f64,
    pub intercept: f64,
    pub r: f64,
    pub error: f64,
    pub points: usize,
    /// Single-point BET monolayer amount over the same window, mol/g.
    pub single_point_nm: f64,
    pub single_point_ssa: f64,
    pub positive_intercept: bool,
    pub increasing: bool,
    pub monolayer_in_range: bool,
    pub pressure_consistency: bool,
    pub enough_points: bool,
    pub valid: bool,
}

impl ProcessedRow {
    /// Rebuild the BET trial this row was written from.
    pub fn trial(&self) -> BetTrial {
        BetTrial {
            range: CandidateRange::new(self.start_index, self.end_index),
            slope: self.slope,
            intercept: self.intercept,
            r: self.r,
            c: self.c,
            nm: self.nm,
            ssa: self.ssa,
            error: self.error,
            points: self.points,
        }
    }
}

pub fn raw_rows(sample: &IsothermSample) -> Vec<RawRow> {
    (0..sample.len())
        .map(|k| RawRow {
            relp: sample.relp()[k],
            n: sample.n()[k],
            bet: sample.bet()[k],
            rouquerol: sample.rouquerol()[k],
        })
        .collect()
}

/// Flatten trials, single-point estimates and criterion flags into one row
/// per candidate range.
pub fn processed_rows(
    sample: &IsothermSample,
    trials: &RangeGrid<BetTrial>,
    single_point: &RangeGrid<SinglePointTrial>,
    mask: &CriteriaMask,
) -> Vec<ProcessedRow> {
    let relp = sample.relp();
    trials
        .iter()
        .map(|(range, t)| ProcessedRow {
            start_index: range.start,
            end_index: range.end,
            start_relp: relp[range.start],
            end_relp: relp[range.end],
            ssa: t.ssa,
            c: t.c,
            nm: t.nm,
            slope: t.slope,
            intercept: t.intercept,
            r: t.r,
            error: t.error,
            points: t.points,
            single_point_nm: single_point[range].nm,
            single_point_ssa: single_point[range].ssa,
            positive_intercept: mask.positive_intercept[range],
            increasing: mask.increasing[range],
            monolayer_in_range: mask.monolayer_in_range[range],
            pressure_consistency: mask.pressure_consistency[range],
            enough_points: mask.enough_points[range],
            valid: mask.valid[range],
        })
        .collect()
}

/// `<prefix>_<info>.<ext>` with characters unsafe in file names replaced.
pub fn export_file_name(prefix: &str, info: &str, ext: &str) -> String {
    let stem: String = info
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '.' { c } else { '_' })
        .collect();
    if stem.is_empty() {
        format!("{prefix}.{ext}")
    } else {
        format!("{prefix}_{stem}.{ext}")
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn write_csv_rows<W: Write, T: Serialize>(wtr: W, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(wtr);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn write_raw_csv<W: Write>(wtr: W, sample: &IsothermSample) -> Result<()> {
    write_csv_rows(wtr, &raw_rows(sample))
}

pub fn write_processed_csv<W: Write>(wtr: W, rows: &[ProcessedRow]) -> Result<()> {
    write_csv_rows(wtr, rows)
}

/// Read a processed table written by [`write_processed_csv`].
pub fn read_processed_csv<R: Read>(rdr: R) -> Result<Vec<ProcessedRow>> {
    let mut reader = csv::Reader::from_reader(rdr);
    let rows = reader.deserialize().collect::<std::result::Result<Vec<ProcessedRow>, _>>()?;
    for row in &rows {
        if row.start_index >= row.end_index {
            return Err(BetError::InputFormat(format!(
                "processed row with start {} not before end {}",
                row.start_index, row.end_index
            )));
        }
    }
    Ok(rows)
}

pub fn export_raw_csv(path: &Path, sample: &IsothermSample) -> Result<()> {
    let file = File::create(path).map_err(|e| BetError::io(path, e))?;
    write_raw_csv(file, sample)?;
    info!("raw data saved as {}", path.display());
    Ok(())
}

pub fn export_processed_csv(path: &Path, rows: &[ProcessedRow]) -> Result<()> {
    let file = File::create(path).map_err(|e| BetError::io(path, e))?;
    write_processed_csv(file, rows)?;
    info!("processed data saved as {}", path.display());
    Ok(())
}

pub fn import_processed_csv(path: &Path) -> Result<Vec<ProcessedRow>> {
    let file = File::open(path).map_err(|e| BetError::io(path, e))?;
    read_processed_csv(file)
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

/// Arrow record batch holding the processed table.
pub fn processed_batch(rows: &[ProcessedRow]) -> Result<RecordBatch> {
    let f64_col = |f: fn(&ProcessedRow) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let u64_col = |f: fn(&ProcessedRow) -> usize| -> ArrayRef {
        Arc::new(UInt64Array::from(rows.iter().map(|r| f(r) as u64).collect::<Vec<_>>()))
    };
    let bool_col = |f: fn(&ProcessedRow) -> bool| -> ArrayRef {
        Arc::new(BooleanArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("start_index", u64_col(|r| r.start_index)),
        ("end_index", u64_col(|r| r.end_index)),
        ("start_relp", f64_col(|r| r.start_relp)),
        ("end_relp", f64_col(|r| r.end_relp)),
        ("ssa", f64_col(|r| r.ssa)),
        ("c", f64_col(|r| r.c)),
        ("nm", f64_col(|r| r.nm)),
        ("slope", f64_col(|r| r.slope)),
        ("intercept", f64_col(|r| r.intercept)),
        ("r", f64_col(|r| r.r)),
        ("error", f64_col(|r| r.error)),
        ("points", u64_col(|r| r.points)),
        ("single_point_nm", f64_col(|r| r.single_point_nm)),
        ("single_point_ssa", f64_col(|r| r.single_point_ssa)),
        ("positive_intercept", bool_col(|r| r.positive_intercept)),
        ("increasing", bool_col(|r| r.increasing)),
        ("monolayer_in_range", bool_col(|r| r.monolayer_in_range)),
        ("pressure_consistency", bool_col(|r| r.pressure_consistency)),
        ("enough_points", bool_col(|r| r.enough_points)),
        ("valid", bool_col(|r| r.valid)),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, array)| Field::new(*name, array.data_type().clone(), false))
            .collect::<Vec<_>>(),
    ));
    let arrays = columns.into_iter().map(|(_, array)| array).collect();
    Ok(RecordBatch::try_new(schema, arrays)?)
}

pub fn export_processed_parquet(path: &Path, rows: &[ProcessedRow]) -> Result<()> {
    let batch = processed_batch(rows)?;
    let file = File::create(path).map_err(|e| BetError::io(path, e))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;
    info!("processed data saved as {}", path.display());
    Ok(())
}

/// Write the raw and processed tables for one analysis into `dir`, named
/// after the isotherm's info string. Returns the written paths.
pub fn export_all(
    dir: &Path,
    info: &str,
    sample: &IsothermSample,
    rows: &[ProcessedRow],
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).map_err(|e| BetError::io(dir, e))?;
    let raw = dir.join(export_file_name("raw_data_export", info, "csv"));
    let processed = dir.join(export_file_name("processed_data_export", info, "csv"));
    let columnar = dir.join(export_file_name("processed_data_export", info, "parquet"));

    export_raw_csv(&raw, sample)?;
    export_processed_csv(&processed, rows)?;
    export_processed_parquet(&columnar, rows)?;
    Ok(vec![raw, processed, columnar])
}
