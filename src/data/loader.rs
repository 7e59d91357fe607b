use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{new_null_array, Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, RawRecord, RawTable};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the raw games table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with column names (the `games.csv` layout)
/// * `.json`    – `[{ "Platform": "PS2", "Year_of_Release": 2004, ... }, ...]`
/// * `.parquet` – one column per field, nullable
pub fn load_file(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let table = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV")?;
            load_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            load_json(&text)
        }
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "Loaded {} raw rows with columns {:?} from {}",
        table.len(),
        table.columns,
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one game per row.
/// Empty cells are missing values; everything else is typed by guessing.
pub fn load_csv<R: Read>(input: R) -> Result<RawTable> {
    let mut reader = csv::Reader::from_reader(input);
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: RawRecord = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), guess_cell_type(value)))
            .collect();
        rows.push(row);
    }

    Ok(RawTable::new(headers, rows))
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Platform": "PS2", "Year_of_Release": 2004.0, "User_Score": "tbd", ... },
///   ...
/// ]
/// ```
pub fn load_json(text: &str) -> Result<RawTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        let row: RawRecord = obj
            .iter()
            .map(|(key, val)| (key.clone(), json_to_cell(val)))
            .collect();
        rows.push(row);
    }

    Ok(RawTable::from_rows(rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) if s.is_empty() => CellValue::Null,
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one nullable column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`), and by the `generate_sample` binary.
fn load_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        let columns: Vec<ArrayRef> = schema
            .fields()
            .iter()
            .zip(batch.columns())
            .map(|(field, col)| normalize_column(field.name(), col))
            .collect();

        for row in 0..batch.num_rows() {
            let record: RawRecord = schema
                .fields()
                .iter()
                .zip(&columns)
                .map(|(field, col)| (field.name().clone(), extract_cell(col, row)))
                .collect();
            rows.push(record);
        }
    }

    Ok(RawTable::new(columns, rows))
}

/// Cast a column to one of the types [`extract_cell`] reads: other integers
/// to `Int64`, other numerics to `Float64`, anything else (dictionary /
/// categorical, view and temporal types) to `Utf8`. A column that cannot be
/// cast becomes all-null.
fn normalize_column(name: &str, col: &ArrayRef) -> ArrayRef {
    let target = match col.data_type() {
        DataType::Utf8
        | DataType::LargeUtf8
        | DataType::Int32
        | DataType::Int64
        | DataType::Float32
        | DataType::Float64
        | DataType::Boolean => return col.clone(),
        t if t.is_integer() => DataType::Int64,
        t if t.is_numeric() => DataType::Float64,
        _ => DataType::Utf8,
    };
    match cast(col, &target) {
        Ok(casted) => casted,
        Err(e) => {
            log::warn!(
                "Column '{name}' of type {:?} cannot be read as {target:?}: {e}; treated as missing",
                col.data_type()
            );
            new_null_array(&target, col.len())
        }
    }
}

/// Extract a single cell from a normalized Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let cell = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|s| CellValue::String(s.value(row).to_string())),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|s| CellValue::String(s.value(row).to_string())),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| CellValue::Integer(a.value(row) as i64)),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| CellValue::Float(a.value(row) as f64)),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| CellValue::Float(a.value(row))),
        DataType::Boolean => col.as_boolean_opt().map(|a| CellValue::Bool(a.value(row))),
        _ => None,
    };
    cell.unwrap_or(CellValue::Null)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{
        DictionaryArray, Float64Array, Int16Array, Int64Array, StringArray, UInt16Array,
    };
    use arrow::datatypes::Int32Type;

    use super::*;

    const GAMES_CSV: &str = "\
Name,Platform,Year_of_Release,Genre,Critic_Score,User_Score,Rating
Halo 3,X360,2007,Shooter,94.0,7.8,M
Pitfall!,2600,1981.0,Platform,,,
Spore,PC,2008,Strategy,84,tbd,E10+
Unknown,PS2,,Sports,70,6,E
";

    #[test]
    fn csv_cells_are_typed_and_blanks_are_missing() {
        let table = load_csv(GAMES_CSV.as_bytes()).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.columns[2], "Year_of_Release");

        let halo = &table.rows[0];
        assert_eq!(halo["Year_of_Release"], CellValue::Integer(2007));
        assert_eq!(halo["User_Score"], CellValue::Float(7.8));

        let pitfall = &table.rows[1];
        assert_eq!(pitfall["Platform"], CellValue::Integer(2600));
        assert_eq!(pitfall["Year_of_Release"], CellValue::Float(1981.0));
        assert!(pitfall["Critic_Score"].is_null());

        assert_eq!(table.rows[2]["User_Score"], CellValue::String("tbd".into()));
        assert!(table.rows[3]["Year_of_Release"].is_null());
    }

    #[test]
    fn csv_feeds_the_cleaner() {
        let table = load_csv(GAMES_CSV.as_bytes()).unwrap();
        let cleaned = crate::data::clean::clean_dataset(&table, 2000).unwrap();
        assert_eq!(cleaned.len(), 1);
        assert_eq!(cleaned.games()[0].platform, "X360");
    }

    #[test]
    fn json_records_with_missing_keys() {
        let text = r#"[
            {"Platform": "PS2", "Year_of_Release": 2004.0, "User_Score": "tbd"},
            {"Platform": "Wii", "Genre": "Sports", "Rating": null}
        ]"#;
        let table = load_json(text).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.has_column("Genre"));
        assert_eq!(table.rows[0]["Year_of_Release"], CellValue::Float(2004.0));
        assert!(table.rows[1]["Rating"].is_null());
        assert!(RawTable::cell(&table.rows[1], "User_Score").is_null());
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(load_json(r#"{"Platform": "PS2"}"#).is_err());
        assert!(load_json("[1, 2]").is_err());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("games.xlsx")).unwrap_err();
        assert!(format!("{err:#}").contains("Unsupported file extension"));
    }

    #[test]
    fn arrow_cells_map_to_cell_values() {
        let years: ArrayRef = Arc::new(Float64Array::from(vec![Some(2004.0), None]));
        let platforms: ArrayRef = Arc::new(StringArray::from(vec![Some("PS2"), None]));
        let critic: ArrayRef = Arc::new(Int64Array::from(vec![Some(81), Some(70)]));

        assert_eq!(extract_cell(&years, 0), CellValue::Float(2004.0));
        assert!(extract_cell(&years, 1).is_null());
        assert_eq!(extract_cell(&platforms, 0), CellValue::String("PS2".into()));
        assert!(extract_cell(&platforms, 1).is_null());
        assert_eq!(extract_cell(&critic, 1), CellValue::Integer(70));

        let small_years: ArrayRef = Arc::new(UInt16Array::from(vec![2005u16]));
        let small_critic: ArrayRef = Arc::new(Int16Array::from(vec![80i16]));
        let genres: ArrayRef = Arc::new(
            vec!["Action", "RPG"]
                .into_iter()
                .collect::<DictionaryArray<Int32Type>>(),
        );

        // Unlisted types are never read as their type name.
        assert!(extract_cell(&small_years, 0).is_null());

        let small_years = normalize_column("Year_of_Release", &small_years);
        let small_critic = normalize_column("Critic_Score", &small_critic);
        let genres = normalize_column("Genre", &genres);
        assert_eq!(extract_cell(&small_years, 0), CellValue::Integer(2005));
        assert_eq!(extract_cell(&small_critic, 0), CellValue::Integer(80));
        assert_eq!(extract_cell(&genres, 0), CellValue::String("Action".into()));
        assert_eq!(extract_cell(&genres, 1), CellValue::String("RPG".into()));
    }

    #[test]
    fn normalized_columns_feed_the_cleaner() {
        use crate::data::model::*;

        fn dictionary(values: Vec<&str>) -> ArrayRef {
            Arc::new(values.into_iter().collect::<DictionaryArray<Int32Type>>())
        }
        let years: ArrayRef = Arc::new(UInt16Array::from(vec![1999u16, 2005]));
        let ratings: ArrayRef = Arc::new(StringArray::from(vec!["E", "M"]));
        let critic: ArrayRef = Arc::new(Int16Array::from(vec![80i16, 70]));
        let user: ArrayRef = Arc::new(StringArray::from(vec!["8.5", "7"]));
        let columns = [
            (YEAR_COLUMN, years),
            (GENRE_COLUMN, dictionary(vec!["Action", "RPG"])),
            (RATING_COLUMN, ratings),
            (PLATFORM_COLUMN, dictionary(vec!["PS2", "PS3"])),
            (CRITIC_SCORE_COLUMN, critic),
            (USER_SCORE_COLUMN, user),
        ];
        let normalized: Vec<(&str, ArrayRef)> = columns
            .iter()
            .map(|(name, col)| (*name, normalize_column(name, col)))
            .collect();
        let rows: Vec<RawRecord> = (0..2)
            .map(|row| {
                normalized
                    .iter()
                    .map(|(name, col)| (name.to_string(), extract_cell(col, row)))
                    .collect()
            })
            .collect();

        let cleaned =
            crate::data::clean::clean_dataset(&RawTable::from_rows(rows), 2000).unwrap();
        assert_eq!(cleaned.len(), 1);
        let game = &cleaned.games()[0];
        assert_eq!((game.year, game.genre.as_str()), (2005, "RPG"));
        assert_eq!(game.platform, "PS3");
        assert_eq!(game.critic_score, 70.0);
    }
}
