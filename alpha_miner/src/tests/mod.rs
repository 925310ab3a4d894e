use crate::{import_traces_slice, TraceImportOptions, TraceLog};

mod trace_import_tests;

fn textbook_log() -> TraceLog {
    let x = include_bytes!("./test_data/textbook.txt");
    import_traces_slice(x, false, &TraceImportOptions::default()).unwrap()
}

fn order_process_log() -> TraceLog {
    let x = include_bytes!("./test_data/order_process.txt");
    import_traces_slice(x, false, &TraceImportOptions::default()).unwrap()
}

fn noisy_order_process_log() -> TraceLog {
    let x = include_bytes!("./test_data/order_process_noisy.txt");
    import_traces_slice(x, false, &TraceImportOptions::default()).unwrap()
}

#[test]
fn test_variants_of_textbook_log() {
    let log = textbook_log();
    assert_eq!(log.len(), 4);
    let variants: Vec<(String, u64)> = log
        .variants()
        .into_iter()
        .map(|(t, n)| (t.to_string(), n))
        .collect();
    assert_eq!(
        variants,
        vec![
            ("<a, b, c, d>".to_string(), 2),
            ("<a, c, b, d>".to_string(), 1),
            ("<a, e, d>".to_string(), 1),
        ]
    );
}
