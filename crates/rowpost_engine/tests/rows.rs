mod common;

use pretty_assertions::assert_eq;
use rowpost_engine::{parse_separator, ConfigError, InputError, Row, RowSource};
use tempfile::TempDir;

use common::write_input;

#[test]
fn separator_defaults_to_comma_and_rejects_long_values() {
    assert_eq!(parse_separator(""), Ok(b','));
    assert_eq!(parse_separator(";"), Ok(b';'));
    assert_eq!(parse_separator("\t"), Ok(b'\t'));
    assert_eq!(
        parse_separator(";;"),
        Err(ConfigError::InvalidSeparator(";;".to_string()))
    );
}

#[test]
fn rows_are_projected_onto_configured_fields() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "in.csv", "id,v,extra\n1,a,x\n2,b,y\n");
    let fields = vec!["id".to_string(), "v".to_string()];

    let source = RowSource::open(&path, b',', &fields).unwrap();
    assert_eq!(source.headers(), &["id", "v", "extra"]);
    let rows: Vec<Row> = source.map(Result::unwrap).collect();

    assert_eq!(
        rows,
        vec![
            Row::from_pairs(2, [("id", "1"), ("v", "a")]),
            Row::from_pairs(3, [("id", "2"), ("v", "b")]),
        ]
    );
}

#[test]
fn empty_field_list_keeps_every_column() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "in.tsv", "a\tb\n1\t2");

    let rows: Vec<Row> = RowSource::open(&path, b'\t', &[])
        .unwrap()
        .map(Result::unwrap)
        .collect();

    assert_eq!(rows, vec![Row::from_pairs(2, [("a", "1"), ("b", "2")])]);
}

#[test]
fn quoted_cells_follow_csv_conventions() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "in.csv", "id,text\n1,\"hello, \"\"world\"\"\"\n");

    let mut source = RowSource::open(&path, b',', &[]).unwrap();
    let row = source.next_row().unwrap().unwrap();
    assert_eq!(row.get("text"), Some("hello, \"world\""));
    assert!(source.next_row().is_none());
    assert!(source.next_row().is_none());
}

#[test]
fn malformed_record_is_reported_and_skipped() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "in.csv", "a,b\n1,2\n3\n4,5\n");

    let results: Vec<_> = RowSource::open(&path, b',', &[]).unwrap().collect();

    assert_eq!(results.len(), 3);
    assert_eq!(
        results[0].as_ref().unwrap(),
        &Row::from_pairs(2, [("a", "1"), ("b", "2")])
    );
    let err = results[1].as_ref().unwrap_err();
    assert_eq!(err.line, 3);
    assert_eq!(
        results[2].as_ref().unwrap(),
        &Row::from_pairs(4, [("a", "4"), ("b", "5")])
    );
}

#[test]
fn empty_file_is_a_distinct_error() {
    let dir = TempDir::new().unwrap();
    let path = write_input(&dir, "empty.csv", "");

    let err = RowSource::open(&path, b',', &[]).unwrap_err();
    assert!(matches!(err, InputError::Empty { .. }), "{err:?}");
}

#[test]
fn missing_file_fails_to_open() {
    let dir = TempDir::new().unwrap();
    let err = RowSource::open(&dir.path().join("nope.csv"), b',', &[]).unwrap_err();
    assert!(matches!(err, InputError::Open { .. }), "{err:?}");
    assert!(err.to_string().contains("nope.csv"));
}

#[test]
fn unreadable_header_is_an_input_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.csv");
    std::fs::write(&path, b"a\xff,b\n1,2\n").unwrap();

    let err = RowSource::open(&path, b',', &[]).unwrap_err();
    assert!(matches!(err, InputError::Header { .. }), "{err:?}");
    assert!(err.to_string().contains("bad.csv"));
}

#[test]
fn row_display_lists_fields() {
    let row = Row::from_pairs(5, [("b", "2"), ("a", "1")]);
    assert_eq!(row.to_string(), "a=1, b=2");
    assert_eq!(row.line(), 5);
}
