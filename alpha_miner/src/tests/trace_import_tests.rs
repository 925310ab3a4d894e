use crate::{
    event_log::{
        export_traces::export_traces,
        import_traces::{import_traces_slice, TraceImportError, TraceImportOptions},
    },
    export_traces_to_file_path, import_traces_file, import_traces_str, TraceLog,
};

use super::order_process_log;

#[test]
fn test_gz_import() {
    let x = include_bytes!("test_data/order_process.txt.gz");
    let log = import_traces_slice(x, true, &TraceImportOptions::default()).unwrap();
    assert_eq!(log, order_process_log());
    assert_eq!(log.len(), 5);
    assert_eq!(log.variants().len(), 4);
}

#[test]
fn test_file_import_detects_gz() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("order_process.txt.gz");
    std::fs::write(&path, include_bytes!("test_data/order_process.txt.gz")).unwrap();
    let log = import_traces_file(&path, &TraceImportOptions::default()).unwrap();
    assert_eq!(log, order_process_log());
}

#[test]
fn test_missing_file() {
    let res = import_traces_file(
        "/this/path/does/not/exist.txt",
        &TraceImportOptions::default(),
    );
    assert!(matches!(res, Err(TraceImportError::Io(_))));
}

#[test]
fn test_invalid_gz_data() {
    let x = include_bytes!("test_data/order_process.txt");
    let res = import_traces_slice(x, true, &TraceImportOptions::default());
    assert!(matches!(res, Err(TraceImportError::Io(_))));
}

#[test]
fn test_export_with_separator_and_reimport() {
    let log = order_process_log();
    let mut out = Vec::new();
    export_traces(&log, &mut out, ';').unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.lines().next(), Some("Register;Check;Pay;Ship;Archive"));
    let options = TraceImportOptions {
        separator: ';',
        ..Default::default()
    };
    assert_eq!(import_traces_str(&text, &options).unwrap(), log);
}

#[test]
fn test_export_to_gz_path() {
    let log = order_process_log();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("exported.txt.gz");
    export_traces_to_file_path(&log, &path, ',').unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(
        import_traces_slice(&bytes, true, &TraceImportOptions::default()).unwrap(),
        log
    );
}

#[test]
fn test_export_rejects_labels_containing_separator() {
    let log = TraceLog::from_label_sequences(vec![vec!["Pay, Ship", "End"]]).unwrap();
    let mut out = Vec::new();
    let err = export_traces(&log, &mut out, ',').unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    assert!(out.is_empty());

    // Same log is fine with a separator that does not occur in any label
    let mut out = Vec::new();
    export_traces(&log, &mut out, ';').unwrap();
    let options = TraceImportOptions {
        separator: ';',
        ..Default::default()
    };
    let text = String::from_utf8(out).unwrap();
    assert_eq!(import_traces_str(&text, &options).unwrap(), log);
}

#[test]
fn test_export_rejects_line_breaks_and_surrounding_whitespace() {
    for label in ["Pay\nShip", "Pay\r", " Pay", "Ship "] {
        let log = TraceLog::from_label_sequences(vec![vec!["Register", label]]).unwrap();
        let err = export_traces(&log, Vec::new(), ',').unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput, "{label:?}");
    }
}

#[test]
fn test_export_to_path_rejects_invalid_label_without_creating_file() {
    let log = TraceLog::from_label_sequences(vec![vec!["System Error, Retry"]]).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("generated.txt");
    let err = export_traces_to_file_path(&log, &path, ',').unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    assert!(!path.exists());
}
