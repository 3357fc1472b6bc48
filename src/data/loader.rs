use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Catalog, DatasetRecord, SizeValue};

/// Catalog fields handled specially; everything else becomes a facet.
const RESERVED_FIELDS: [&str; 4] = ["title", "name", "datePublished", "size"];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset catalog from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – flat scalar columns, one record per row
/// * `.json`    – `[{ "title": ..., "datePublished": ..., "size": ..., ...facets }, ...]`
/// * `.csv`     – header row with the same column names
pub fn load_file(path: &Path) -> Result<Catalog> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   {
///     "title": "Coastal Water Quality",
///     "datePublished": "2023-06-15",
///     "size": "2.5GB",
///     "publisher": "NOAA"
///   },
///   ...
/// ]
/// ```
///
/// `size` may be a number (bytes) or a string; unknown scalar fields become
/// facets. Missing fields are simply absent — a sparse record never fails
/// the load.
fn load_json(path: &Path) -> Result<Catalog> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json_catalog(&text)
}

fn parse_json_catalog(text: &str) -> Result<Catalog> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records_json = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(records_json.len());

    for (i, entry) in records_json.iter().enumerate() {
        let obj = entry
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let mut rec = DatasetRecord::default();
        for (key, val) in obj {
            match key.as_str() {
                "title" => rec.title = val.as_str().map(String::from),
                "name" => rec.name = val.as_str().map(String::from),
                "datePublished" => rec.date_published = val.as_str().map(String::from),
                "size" => rec.size = json_to_size(val),
                _ => {
                    if let Some(s) = json_to_facet(val) {
                        rec.facets.insert(key.clone(), s);
                    }
                }
            }
        }
        records.push(rec);
    }

    Ok(Catalog::from_records(records))
}

fn json_to_size(val: &JsonValue) -> Option<SizeValue> {
    match val {
        JsonValue::Number(n) => n.as_f64().map(SizeValue::Bytes),
        JsonValue::String(s) => Some(SizeValue::Text(s.clone())),
        _ => None,
    }
}

/// Scalars become facet values; nulls and nested structures are dropped.
fn json_to_facet(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names; `title`, `name`,
/// `datePublished` and `size` are recognized, all other columns are treated
/// as facets. Empty cells mean the field is absent.
fn load_csv(path: &Path) -> Result<Catalog> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv_catalog(reader)
}

fn read_csv_catalog<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Catalog> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;

        let mut rec = DatasetRecord::default();
        for (col_idx, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            let Some(header) = headers.get(col_idx) else {
                continue;
            };
            match header.as_str() {
                "title" => rec.title = Some(cell.to_string()),
                "name" => rec.name = Some(cell.to_string()),
                "datePublished" => rec.date_published = Some(cell.to_string()),
                "size" => rec.size = Some(SizeValue::Text(cell.to_string())),
                _ => {
                    rec.facets.insert(header.clone(), cell.to_string());
                }
            }
        }
        records.push(rec);
    }

    Ok(Catalog::from_records(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet catalog with flat scalar columns.
///
/// Expected schema: one row per dataset, `title` / `name` / `datePublished`
/// as Utf8, `size` as Utf8 or a numeric type, any other scalar column a
/// facet. Works with files written by Pandas, Polars, or the bundled
/// `generate_sample` binary.
fn load_parquet(path: &Path) -> Result<Catalog> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        records.append(&mut records_from_batch(&batch));
    }

    Ok(Catalog::from_records(records))
}

/// Convert one Arrow record batch into dataset records.
fn records_from_batch(batch: &RecordBatch) -> Vec<DatasetRecord> {
    let schema = batch.schema();
    let mut records = vec![DatasetRecord::default(); batch.num_rows()];

    for (col_idx, field) in schema.fields().iter().enumerate() {
        let col = batch.column(col_idx);
        let field_name = field.name().as_str();

        for (row, rec) in records.iter_mut().enumerate() {
            if col.is_null(row) {
                continue;
            }
            match field_name {
                "title" => rec.title = scalar_to_string(col, row),
                "name" => rec.name = scalar_to_string(col, row),
                "datePublished" => rec.date_published = scalar_to_string(col, row),
                "size" => rec.size = scalar_to_size(col, row),
                _ => {
                    if let Some(s) = scalar_to_string(col, row) {
                        rec.facets.insert(field_name.to_string(), s);
                    }
                }
            }
        }
    }

    records
}

// -- Arrow helpers --

/// Extract a scalar cell as a string; unsupported column types are skipped.
fn scalar_to_string(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(row).to_string()),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map(|a| a.value(row).to_string()),
        other => {
            log::debug!("skipping unsupported parquet column type {other:?}");
            None
        }
    }
}

fn scalar_to_size(col: &Arc<dyn Array>, row: usize) -> Option<SizeValue> {
    match col.data_type() {
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| SizeValue::Bytes(a.value(row) as f64)),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| SizeValue::Bytes(a.value(row))),
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| SizeValue::Text(a.value(row).to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::{Field, Schema};

    #[test]
    fn json_catalog_round_trip() {
        let text = r#"[
            {"title": "Coastal Water Quality", "datePublished": "2023-06-15",
             "size": "2.5GB", "publisher": "NOAA", "downloads": 1200},
            {"name": "seismic-events", "size": 500},
            {}
        ]"#;
        let cat = parse_json_catalog(text).unwrap();
        assert_eq!(cat.len(), 3);
        assert_eq!(cat.records[0].display_name(), "Coastal Water Quality");
        assert_eq!(
            cat.records[0].size,
            Some(SizeValue::Text("2.5GB".into()))
        );
        assert_eq!(cat.records[0].facets["publisher"], "NOAA");
        assert_eq!(cat.records[0].facets["downloads"], "1200");
        assert_eq!(cat.records[1].size, Some(SizeValue::Bytes(500.0)));
        assert!(cat.records[2].display_name().is_empty());
        assert!(cat.facet_names.contains(&"publisher".to_string()));
    }

    #[test]
    fn json_rejects_non_array() {
        assert!(parse_json_catalog(r#"{"title": "x"}"#).is_err());
    }

    #[test]
    fn csv_catalog_with_sparse_cells() {
        let data = "title,datePublished,size,publisher\n\
                    Ocean Temps,2022-01-01,10mb,NOAA\n\
                    Quake Feed,,,USGS\n";
        let reader = csv::Reader::from_reader(data.as_bytes());
        let cat = read_csv_catalog(reader).unwrap();
        assert_eq!(cat.len(), 2);
        assert_eq!(cat.records[0].size, Some(SizeValue::Text("10mb".into())));
        assert!(cat.records[1].date_published.is_none());
        assert!(cat.records[1].size.is_none());
        assert_eq!(cat.records[1].facets["publisher"], "USGS");
    }

    #[test]
    fn batch_conversion_maps_columns() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("title", DataType::Utf8, true),
            Field::new("size", DataType::Int64, true),
            Field::new("publisher", DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec![Some("A"), None])),
                Arc::new(Int64Array::from(vec![Some(1024), None])),
                Arc::new(StringArray::from(vec![Some("NOAA"), Some("USGS")])),
            ],
        )
        .unwrap();

        let records = records_from_batch(&batch);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title.as_deref(), Some("A"));
        assert_eq!(records[0].size, Some(SizeValue::Bytes(1024.0)));
        assert!(records[1].title.is_none());
        assert_eq!(records[1].facets["publisher"], "USGS");
    }
}
