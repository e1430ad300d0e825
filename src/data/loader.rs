use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, Float32Array, Float64Array, Int32Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{
    derive_hour, Class, TransactionDataset, TransactionRecord, AMOUNT_COLUMN, CLASS_COLUMN,
    FEATURE_PREFIX, TIME_COLUMN,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a transaction dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with `Time`, `Class`, `Amount` and `V*` columns
/// * `.parquet` – flat numeric columns with the same names (recommended)
/// * `.json`    – `[{ "Time": 0.0, "V1": -1.36, ..., "Class": 0 }, ...]`
pub fn load_file(path: &Path) -> Result<TransactionDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// `V*` columns from a header, in header order.
fn discover_features(headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .filter(|h| h.starts_with(FEATURE_PREFIX))
        .cloned()
        .collect()
}

/// Assemble one record, deriving the hour bucket from the timestamp.
fn build_record(time: f64, features: Vec<f64>, amount: f64, class: Class) -> TransactionRecord {
    TransactionRecord {
        time,
        features,
        amount,
        class,
        hour: derive_hour(time),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one transaction per row.
/// `Time` and `Class` must parse in every row; an empty `Amount` or
/// feature cell is kept as a missing value.
fn load_csv(path: &Path) -> Result<TransactionDataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let time_idx = headers
        .iter()
        .position(|h| h == TIME_COLUMN)
        .with_context(|| format!("CSV missing '{TIME_COLUMN}' column"))?;
    let class_idx = headers
        .iter()
        .position(|h| h == CLASS_COLUMN)
        .with_context(|| format!("CSV missing '{CLASS_COLUMN}' column"))?;
    let amount_idx = headers
        .iter()
        .position(|h| h == AMOUNT_COLUMN)
        .with_context(|| format!("CSV missing '{AMOUNT_COLUMN}' column"))?;

    // (column index, name) for every V* column, in header order.
    let feature_cols: Vec<(usize, &String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.starts_with(FEATURE_PREFIX))
        .collect();
    let feature_names: Vec<String> = feature_cols.iter().map(|(_, h)| (*h).clone()).collect();

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        let time = parse_required_f64(record.get(time_idx), row_no, TIME_COLUMN)?;
        let class = parse_class(record.get(class_idx), row_no)?;
        let amount = parse_optional_f64(record.get(amount_idx), row_no, AMOUNT_COLUMN)?;

        let features = feature_cols
            .iter()
            .map(|&(idx, name)| parse_optional_f64(record.get(idx), row_no, name))
            .collect::<Result<Vec<f64>>>()?;

        records.push(build_record(time, features, amount, class));
    }

    Ok(TransactionDataset::new(records, feature_names))
}

fn parse_required_f64(cell: Option<&str>, row: usize, col: &str) -> Result<f64> {
    let s = cell.unwrap_or("").trim();
    s.parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))
}

/// Empty cell → missing value; anything else must parse as a number.
fn parse_optional_f64(cell: Option<&str>, row: usize, col: &str) -> Result<f64> {
    let s = cell.unwrap_or("").trim();
    if s.is_empty() {
        return Ok(f64::NAN);
    }
    s.parse::<f64>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))
}

fn parse_class(cell: Option<&str>, row: usize) -> Result<Class> {
    let s = cell.unwrap_or("").trim();
    let label = s
        .parse::<i64>()
        .with_context(|| format!("Row {row}, {CLASS_COLUMN}: '{s}' is not an integer label"))?;
    Class::from_label(label)
        .with_context(|| format!("Row {row}, {CLASS_COLUMN}: label {label} is not 0 or 1"))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Time": 0.0, "V1": -1.3598, "V2": -0.0727, "Amount": 149.62, "Class": 0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<TransactionDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    // Feature names come from the first row; later rows may omit cells.
    let feature_names: Vec<String> = rows
        .first()
        .and_then(|r| r.as_object())
        .map(|obj| {
            obj.keys()
                .filter(|k| k.starts_with(FEATURE_PREFIX))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let time = obj
            .get(TIME_COLUMN)
            .and_then(JsonValue::as_f64)
            .with_context(|| format!("Row {i}: missing or non-numeric '{TIME_COLUMN}'"))?;

        let label = obj
            .get(CLASS_COLUMN)
            .and_then(JsonValue::as_i64)
            .with_context(|| format!("Row {i}: missing or non-integer '{CLASS_COLUMN}'"))?;
        let class = Class::from_label(label)
            .with_context(|| format!("Row {i}: label {label} is not 0 or 1"))?;

        let amount = obj
            .get(AMOUNT_COLUMN)
            .and_then(JsonValue::as_f64)
            .unwrap_or(f64::NAN);

        let features = feature_names
            .iter()
            .map(|name| obj.get(name).and_then(JsonValue::as_f64).unwrap_or(f64::NAN))
            .collect();

        records.push(build_record(time, features, amount, class));
    }

    Ok(TransactionDataset::new(records, feature_names))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat transaction columns.
///
/// Expected schema: numeric `Time`, `Amount` and `V*` columns plus an
/// integer `Class` column.  Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<TransactionDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut feature_names: Vec<String> = Vec::new();
    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let time_idx = schema
            .index_of(TIME_COLUMN)
            .map_err(|_| anyhow::anyhow!("Parquet file missing '{TIME_COLUMN}' column"))?;
        let class_idx = schema
            .index_of(CLASS_COLUMN)
            .map_err(|_| anyhow::anyhow!("Parquet file missing '{CLASS_COLUMN}' column"))?;
        let amount_idx = schema
            .index_of(AMOUNT_COLUMN)
            .map_err(|_| anyhow::anyhow!("Parquet file missing '{AMOUNT_COLUMN}' column"))?;

        let headers: Vec<String> = schema.fields().iter().map(|f| f.name().clone()).collect();
        if feature_names.is_empty() {
            feature_names = discover_features(&headers);
        }

        let feature_cols: Vec<usize> = feature_names
            .iter()
            .map(|name| {
                schema
                    .index_of(name)
                    .map_err(|_| anyhow::anyhow!("Parquet batch missing '{name}' column"))
            })
            .collect::<Result<Vec<usize>>>()?;

        for row in 0..batch.num_rows() {
            let time = scalar_f64(batch.column(time_idx), row)
                .with_context(|| format!("Row {row}: missing or non-numeric '{TIME_COLUMN}'"))?;

            let label = scalar_i64(batch.column(class_idx), row)
                .with_context(|| format!("Row {row}: missing or non-integer '{CLASS_COLUMN}'"))?;
            let class = Class::from_label(label)
                .with_context(|| format!("Row {row}: label {label} is not 0 or 1"))?;

            let amount = scalar_f64(batch.column(amount_idx), row).unwrap_or(f64::NAN);

            let features = feature_cols
                .iter()
                .map(|&idx| scalar_f64(batch.column(idx), row).unwrap_or(f64::NAN))
                .collect();

            records.push(build_record(time, features, amount, class));
        }
    }

    Ok(TransactionDataset::new(records, feature_names))
}

// -- Parquet / Arrow helpers --

/// Read one numeric cell from an Arrow column, whatever its numeric type.
fn scalar_f64(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|arr| arr.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|arr| f64::from(arr.value(row))),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|arr| arr.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|arr| f64::from(arr.value(row))),
        _ => None,
    }
}

/// Read one integer cell; string columns holding digit labels also pass.
fn scalar_i64(col: &Arc<dyn Array>, row: usize) -> Option<i64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|arr| arr.value(row)),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|arr| i64::from(arr.value(row))),
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .and_then(|arr| arr.value(row).trim().parse().ok()),
        _ => None,
    }
}
