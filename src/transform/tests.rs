//! Tests for the transform module

use super::*;
use crate::error::Error;
use crate::types::CompressionCodec;
use arrow::datatypes::DataType;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

fn weather_document() -> Value {
    json!({
        "location": {
            "name": "Healesville",
            "region": "Victoria",
            "lat": -37.5,
            "lon": 145.74,
            "localtime_epoch": 1_709_762_400,
            "localtime": "2024-03-07 9:00"
        },
        "current": {
            "temp_c": 21.5,
            "is_day": 1,
            "condition": {
                "text": "Sunny",
                "code": 1000
            },
            "wind_dir": "NNW",
            "gust_kph": null
        }
    })
}

// ============================================================================
// Flatten Tests
// ============================================================================

#[test]
fn test_flatten_reference_example() {
    let doc = json!({"current": {"temp_c": 21.5, "condition": {"text": "Sunny"}}});
    let record = flatten(&doc).unwrap();

    assert_eq!(
        record.entries(),
        &[
            ("temp_c".to_string(), json!(21.5)),
            ("text".to_string(), json!("Sunny")),
        ]
    );
}

#[test]
fn test_flatten_preserves_document_order() {
    let record = flatten(&weather_document()).unwrap();

    assert_eq!(
        record.names(),
        vec![
            "name",
            "region",
            "lat",
            "lon",
            "localtime_epoch",
            "localtime",
            "temp_c",
            "is_day",
            "text",
            "code",
            "wind_dir",
            "gust_kph",
        ]
    );
}

#[test]
fn test_flatten_length_equals_leaf_count() {
    let doc = weather_document();
    let leaves: usize = doc
        .as_object()
        .unwrap()
        .values()
        .flat_map(|inner| inner.as_object().unwrap().values())
        .map(|v| v.as_object().map_or(1, serde_json::Map::len))
        .sum();

    assert_eq!(flatten(&doc).unwrap().len(), leaves);
}

#[test]
fn test_flatten_keeps_duplicate_names() {
    let doc = json!({
        "location": {"name": "Healesville"},
        "current": {"condition": {"name": "clear"}}
    });
    let record = flatten(&doc).unwrap();

    assert_eq!(record.names(), vec!["name", "name"]);
    assert_eq!(record.values(), vec![json!("Healesville"), json!("clear")]);
}

#[test]
fn test_flatten_rejects_third_level() {
    let doc = json!({"current": {"condition": {"detail": {"text": "Sunny"}}}});
    let err = flatten(&doc).unwrap_err();

    match err {
        Error::UnsupportedNesting { path } => assert_eq!(path, "current.condition.detail"),
        other => panic!("expected UnsupportedNesting, got {other:?}"),
    }
}

#[test_case(json!([1, 2]) ; "array document")]
#[test_case(json!("text") ; "string document")]
#[test_case(json!({"current": 5}) ; "scalar outer value")]
#[test_case(json!({"current": [1]}) ; "array outer value")]
fn test_flatten_rejects_unexpected_shape(doc: Value) {
    assert!(matches!(
        flatten(&doc),
        Err(Error::UnexpectedShape { .. })
    ));
}

#[test]
fn test_flatten_empty_groups() {
    let record = flatten(&json!({"location": {}, "current": {"condition": {}}})).unwrap();
    assert!(record.is_empty());
}

// ============================================================================
// Inference Tests
// ============================================================================

#[test_case(json!(null), ColumnType::Null ; "null")]
#[test_case(json!(1000), ColumnType::Int ; "positive integer")]
#[test_case(json!(-7), ColumnType::Int ; "negative integer")]
#[test_case(json!(u64::MAX), ColumnType::Int ; "large unsigned integer")]
#[test_case(json!(21.5), ColumnType::Float ; "float")]
#[test_case(json!(1.0), ColumnType::Float ; "integral float")]
#[test_case(json!("Sunny"), ColumnType::String ; "string")]
#[test_case(json!("42"), ColumnType::String ; "numeric string")]
#[test_case(json!("2024-03-07 9:00"), ColumnType::String ; "date string")]
#[test_case(json!(true), ColumnType::String ; "boolean")]
#[test_case(json!([1, 2]), ColumnType::String ; "array")]
fn test_classify(value: Value, expected: ColumnType) {
    assert_eq!(classify(&value), expected);
}

#[test]
fn test_infer_reference_example() {
    let doc = json!({"current": {"temp_c": 21.5, "condition": {"text": "Sunny"}}});
    let schema = infer_schema(&flatten(&doc).unwrap());

    assert_eq!(
        schema.columns(),
        &[
            ColumnDef::new("temp_c", ColumnType::Float),
            ColumnDef::new("text", ColumnType::String),
        ]
    );
}

#[test]
fn test_infer_never_types_integers_as_string() {
    let record = flatten(&weather_document()).unwrap();
    let schema = infer_schema(&record);

    assert_eq!(schema.len(), record.len());
    for ((_, value), def) in record.entries().iter().zip(schema.columns()) {
        if value.is_i64() || value.is_u64() {
            assert_eq!(def.column_type, ColumnType::Int, "column {}", def.name);
        }
        if value.is_null() {
            assert_eq!(def.column_type, ColumnType::Null, "column {}", def.name);
        }
    }
}

// ============================================================================
// Encode Tests
// ============================================================================

#[test]
fn test_encode_reference_example() {
    let doc = json!({"current": {"temp_c": 21.5, "condition": {"text": "Sunny"}}});
    let table = curate_document(&doc).unwrap();

    assert_eq!(table.num_rows(), 1);
    assert_eq!(table.num_columns(), 2);

    let schema = table.schema();
    assert_eq!(schema.field(0).name(), "temp_c");
    assert_eq!(schema.field(0).data_type(), &DataType::Float32);
    assert_eq!(schema.field(1).name(), "text");
    assert_eq!(schema.field(1).data_type(), &DataType::Utf8);
}

#[test]
fn test_encode_renders_booleans_and_arrays_as_text() {
    let schema = ColumnSchema::new(vec![
        ColumnDef::new("is_day", ColumnType::String),
        ColumnDef::new("alerts", ColumnType::String),
    ]);
    let table = encode(&schema, &[json!(true), json!(["wind", "rain"])]).unwrap();

    let columns = table.columns().unwrap();
    assert_eq!(columns[0].2, json!("true"));
    assert_eq!(columns[1].2, json!("[\"wind\",\"rain\"]"));
}

#[test_case(ColumnType::Null, json!(1) ; "null column with number")]
#[test_case(ColumnType::Int, json!("7") ; "int column with string")]
#[test_case(ColumnType::Int, json!(2.5) ; "int column with float")]
#[test_case(ColumnType::Int, json!(3_000_000_000_i64) ; "int column overflow")]
#[test_case(ColumnType::Float, json!(null) ; "float column with null")]
#[test_case(ColumnType::Float, json!(1e300) ; "float column overflow")]
#[test_case(ColumnType::Float, json!(-1e300) ; "float column negative overflow")]
#[test_case(ColumnType::String, json!(5) ; "string column with number")]
#[test_case(ColumnType::String, json!({"a": 1}) ; "string column with object")]
fn test_encode_rejects_incompatible_value(column_type: ColumnType, value: Value) {
    let schema = ColumnSchema::new(vec![ColumnDef::new("col", column_type)]);
    let err = encode(&schema, &[value]).unwrap_err();

    match err {
        Error::TypeMismatch { column, .. } => assert_eq!(column, "col"),
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
}

#[test]
fn test_encode_rejects_length_mismatch() {
    let schema = ColumnSchema::new(vec![ColumnDef::new("a", ColumnType::Int)]);
    assert!(matches!(
        encode(&schema, &[json!(1), json!(2)]),
        Err(Error::TypeMismatch { .. })
    ));
}

// ============================================================================
// Parquet Tests
// ============================================================================

#[test]
fn test_parquet_round_trip_preserves_triples() {
    let doc = json!({
        "location": {"name": "Healesville", "localtime_epoch": 1_709_762_400},
        "current": {
            "temp_c": 21.5,
            "gust_kph": null,
            "condition": {"name": "Sunny", "code": 1000}
        }
    });
    let table = curate_document(&doc).unwrap();
    let expected = table.columns().unwrap();

    let bytes = table.to_parquet(&ParquetWriterConfig::default()).unwrap();
    let decoded = CuratedTable::from_parquet(bytes).unwrap();

    assert_eq!(decoded.num_rows(), 1);
    assert_eq!(decoded.columns().unwrap(), expected);
    assert_eq!(
        expected,
        vec![
            ("name".to_string(), ColumnType::String, json!("Healesville")),
            ("localtime_epoch".to_string(), ColumnType::Int, json!(1_709_762_400)),
            ("temp_c".to_string(), ColumnType::Float, json!(21.5)),
            ("gust_kph".to_string(), ColumnType::Null, json!(null)),
            ("name".to_string(), ColumnType::String, json!("Sunny")),
            ("code".to_string(), ColumnType::Int, json!(1000)),
        ]
    );
}

#[test]
fn test_parquet_output_has_magic_bytes() {
    let table = curate_document(&weather_document()).unwrap();
    let bytes = table.to_parquet(&ParquetWriterConfig::default()).unwrap();

    assert_eq!(&bytes[..4], b"PAR1");
    assert_eq!(&bytes[bytes.len() - 4..], b"PAR1");
}

#[test_case(CompressionCodec::Uncompressed)]
#[test_case(CompressionCodec::Snappy)]
#[test_case(CompressionCodec::Zstd)]
#[test_case(CompressionCodec::Gzip)]
fn test_parquet_codecs_are_readable(codec: CompressionCodec) {
    let config = ParquetWriterConfig::from_codec(codec);
    let expected: parquet::basic::Compression = codec.into();
    assert_eq!(config.compression(), expected);

    let table = curate_document(&weather_document()).unwrap();
    let decoded = CuratedTable::from_parquet(table.to_parquet(&config).unwrap()).unwrap();
    assert_eq!(decoded.num_columns(), 12);
}

#[test]
fn test_configured_codec_reaches_file_metadata() {
    use parquet::file::reader::{FileReader, SerializedFileReader};

    let config = crate::config::PipelineConfig::from_yaml_str("parquet:\n  compression: zstd\n").unwrap();
    let writer = ParquetWriterConfig::from_codec(config.parquet.compression);

    let table = curate_document(&weather_document()).unwrap();
    let reader = SerializedFileReader::new(table.to_parquet(&writer).unwrap()).unwrap();
    let metadata = reader.metadata();

    assert_eq!(metadata.file_metadata().num_rows(), 1);
    for column in metadata.row_group(0).columns() {
        assert_eq!(column.compression(), writer.compression());
    }
}

#[test]
fn test_from_parquet_rejects_garbage() {
    let result = CuratedTable::from_parquet(bytes::Bytes::from_static(b"not parquet"));
    assert!(matches!(result, Err(Error::Parquet(_))));
}
