use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use flate2::bufread::GzDecoder;
use serde::{Deserialize, Serialize};

use super::trace_log_struct::{Trace, TraceLog, TraceLogError};

///
/// Options for parsing plain-text trace files
///
/// Every (non-blank) line is one trace; activity labels are separated by [`TraceImportOptions::separator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceImportOptions {
    /// Character separating the activities of a trace (default: `,`)
    pub separator: char,
    /// Trim leading and trailing whitespace from every activity label (default: `true`)
    pub trim_activities: bool,
}

impl Default for TraceImportOptions {
    fn default() -> Self {
        Self {
            separator: ',',
            trim_activities: true,
        }
    }
}

///
/// Error while importing a trace file
///
#[derive(Debug)]
pub enum TraceImportError {
    /// IO Error
    Io(std::io::Error),
    /// Invalid trace in the given (1-based) line
    InvalidLine {
        /// Line number (1-based)
        line: usize,
        /// Underlying error
        error: TraceLogError,
    },
}

impl std::fmt::Display for TraceImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TraceImportError::Io(e) => write!(f, "IO Error: {}", e),
            TraceImportError::InvalidLine { line, error } => {
                write!(f, "Invalid trace in line {}: {}", line, error)
            }
        }
    }
}

impl std::error::Error for TraceImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraceImportError::Io(e) => Some(e),
            TraceImportError::InvalidLine { error, .. } => Some(error),
        }
    }
}

impl From<std::io::Error> for TraceImportError {
    fn from(e: std::io::Error) -> Self {
        TraceImportError::Io(e)
    }
}

///
/// Import a [`TraceLog`] from a reader of the plain-text trace format
///
/// Blank lines are skipped.
pub fn import_traces<R: BufRead>(
    reader: R,
    options: &TraceImportOptions,
) -> Result<TraceLog, TraceImportError> {
    let mut log = TraceLog::new();
    for (line_index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }
        let labels = line.split(options.separator).map(|label| {
            if options.trim_activities {
                label.trim()
            } else {
                label
            }
        });
        let trace = Trace::from_labels(labels).map_err(|error| TraceImportError::InvalidLine {
            line: line_index + 1,
            error,
        })?;
        log.push(trace);
    }
    log::info!(
        "Imported trace log with {} traces and {} activities",
        log.len(),
        log.alphabet().len()
    );
    Ok(log)
}

///
/// Import a [`TraceLog`] directly from a string
///
pub fn import_traces_str(
    traces: &str,
    options: &TraceImportOptions,
) -> Result<TraceLog, TraceImportError> {
    import_traces(BufReader::new(traces.as_bytes()), options)
}

///
/// Import a [`TraceLog`] from a byte slice (&\[u8\])
///
/// * `is_compressed_gz`: Parse the passed `data` as a compressed .gz archive
///
pub fn import_traces_slice(
    data: &[u8],
    is_compressed_gz: bool,
    options: &TraceImportOptions,
) -> Result<TraceLog, TraceImportError> {
    if is_compressed_gz {
        let gz: GzDecoder<&[u8]> = GzDecoder::new(data);
        return import_traces(BufReader::new(gz), options);
    }
    import_traces(BufReader::new(data), options)
}

///
/// Import a [`TraceLog`] from a file path
///
/// Files ending in `.gz` are decompressed automatically.
pub fn import_traces_file<P: AsRef<Path>>(
    path: P,
    options: &TraceImportOptions,
) -> Result<TraceLog, TraceImportError> {
    let is_gz = path
        .as_ref()
        .as_os_str()
        .to_str()
        .is_some_and(|p| p.ends_with(".gz"));
    let file = File::open(path)?;
    if is_gz {
        let dec = GzDecoder::new(BufReader::new(file));
        import_traces(BufReader::new(dec), options)
    } else {
        import_traces(BufReader::new(file), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lines_and_skips_blank_ones() {
        let log = import_traces_str(
            "Receive Order, Pay ,Ship\r\n\n   \nReceive Order,Cancel\n",
            &TraceImportOptions::default(),
        )
        .unwrap();
        assert_eq!(log.len(), 2);
        let labels: Vec<&str> = log.traces[0].activities().iter().map(|a| a.as_str()).collect();
        assert_eq!(labels, vec!["Receive Order", "Pay", "Ship"]);
    }

    #[test]
    fn custom_separator_without_trimming() {
        let options = TraceImportOptions {
            separator: ';',
            trim_activities: false,
        };
        let log = import_traces_str("a; b;c", &options).unwrap();
        let labels: Vec<&str> = log.traces[0].activities().iter().map(|a| a.as_str()).collect();
        assert_eq!(labels, vec!["a", " b", "c"]);
    }

    #[test]
    fn empty_label_reports_line() {
        let err = import_traces_str("a,b\na,,b\n", &TraceImportOptions::default()).unwrap_err();
        match err {
            TraceImportError::InvalidLine { line, error } => {
                assert_eq!(line, 2);
                assert_eq!(error, TraceLogError::EmptyLabel);
            }
            e => panic!("Unexpected error {e}"),
        }
    }
}
