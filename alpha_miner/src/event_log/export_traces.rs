use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use flate2::{write::GzEncoder, Compression};
use itertools::Itertools;

use super::trace_log_struct::{Activity, TraceLog};

/// Check that `act` is written and read back as the same label
///
/// Import splits lines at `separator` and trims labels by default, so labels containing the
/// separator, a line break or surrounding whitespace are rejected.
fn check_exportable(act: &Activity, separator: char) -> Result<(), std::io::Error> {
    let label = act.as_str();
    if label.contains([separator, '\n', '\r']) || label.trim() != label {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!(
                "Activity label {:?} cannot be written with separator {:?}",
                label, separator
            ),
        ));
    }
    Ok(())
}

///
/// Write a [`TraceLog`] in the plain-text trace format (one trace per line)
///
/// Fails with [`std::io::ErrorKind::InvalidInput`] before writing anything if an activity label
/// contains the separator, a line break or leading/trailing whitespace.
pub fn export_traces<W: Write>(
    log: &TraceLog,
    mut writer: W,
    separator: char,
) -> Result<(), std::io::Error> {
    for act in log.alphabet() {
        check_exportable(act, separator)?;
    }
    let sep = separator.to_string();
    for trace in &log.traces {
        writeln!(writer, "{}", trace.activities().iter().join(&sep))?;
    }
    writer.flush()
}

/// Export a [`TraceLog`] to a filepath
///
/// Automatically selects gz-compression if filepath ends with `.gz`
pub fn export_traces_to_file_path<P: AsRef<Path>>(
    log: &TraceLog,
    path: P,
    separator: char,
) -> Result<(), std::io::Error> {
    let is_gz = path
        .as_ref()
        .as_os_str()
        .to_str()
        .is_some_and(|p| p.ends_with(".gz"));
    for act in log.alphabet() {
        check_exportable(act, separator)?;
    }
    let file = File::create(path)?;
    if is_gz {
        let encoder = GzEncoder::new(BufWriter::new(file), Compression::fast());
        let mut writer = BufWriter::new(encoder);
        export_traces(log, &mut writer, separator)?;
        writer
            .into_inner()
            .map_err(|e| e.into_error())?
            .finish()?
            .flush()?;
        return Ok(());
    }
    export_traces(log, BufWriter::new(file), separator)
}
