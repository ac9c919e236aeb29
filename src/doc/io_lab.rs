//! Lab-file import and export.
//!
//! Lab files are the tab-separated rows produced by common annotation
//! tools: either `time<TAB>label` for instantaneous events, or
//! `start<TAB>end<TAB>label` for intervals. Lines starting with `#` and
//! blank lines are skipped. Numeric labels are parsed to JSON numbers;
//! everything else becomes a string, and an empty label becomes null.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use serde_json::Value;

use super::model::Annotation;
use crate::error::MirdocError;

/// Reads a lab file into an annotation of the given namespace.
///
/// # Errors
/// Returns an error if the file cannot be read, or a row has an
/// unexpected column count or an unparseable time.
pub fn read_lab(path: &Path, namespace: &str) -> Result<Annotation, MirdocError> {
    let file = File::open(path).map_err(MirdocError::Io)?;
    parse_records(lab_reader(BufReader::new(file)), path, namespace)
}

/// Reads lab-formatted text into an annotation of the given namespace.
///
/// Useful for testing without file I/O.
pub fn from_lab_str(text: &str, namespace: &str) -> Result<Annotation, MirdocError> {
    parse_records(lab_reader(text.as_bytes()), Path::new("<input>"), namespace)
}

/// Writes an annotation's observations as `start<TAB>end<TAB>label` rows.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_lab(path: &Path, annotation: &Annotation) -> Result<(), MirdocError> {
    let mut file = File::create(path).map_err(MirdocError::Io)?;
    file.write_all(to_lab_string(annotation).as_bytes())
        .map_err(MirdocError::Io)
}

/// Renders an annotation's observations as lab-formatted text.
pub fn to_lab_string(annotation: &Annotation) -> String {
    let mut out = String::new();
    for obs in &annotation.data {
        out.push_str(&format!(
            "{}\t{}\t{}\n",
            obs.time,
            obs.end(),
            render_label(&obs.value)
        ));
    }
    out
}

fn lab_reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(input)
}

fn parse_records<R: Read>(
    mut reader: csv::Reader<R>,
    path: &Path,
    namespace: &str,
) -> Result<Annotation, MirdocError> {
    let parse_failure = |line: u64, message: String| MirdocError::LabParse {
        path: path.to_path_buf(),
        line,
        message,
    };

    let mut annotation = Annotation::new(namespace);
    for result in reader.records() {
        let record = result.map_err(|e| {
            parse_failure(e.position().map_or(0, csv::Position::line), e.to_string())
        })?;
        let line = record.position().map_or(0, csv::Position::line);

        let time_of = |raw: &str| {
            raw.parse::<f64>()
                .map_err(|_| parse_failure(line, format!("invalid time '{}'", raw)))
        };

        match record.len() {
            2 => {
                annotation.append(time_of(&record[0])?, 0.0, parse_label(&record[1]), None);
            }
            3 => {
                let start = time_of(&record[0])?;
                let end = time_of(&record[1])?;
                if end < start {
                    return Err(parse_failure(
                        line,
                        format!("interval end {} is before start {}", end, start),
                    ));
                }
                annotation.append(start, end - start, parse_label(&record[2]), None);
            }
            n => {
                return Err(parse_failure(line, format!("expected 2 or 3 columns, got {}", n)));
            }
        }
    }

    Ok(annotation)
}

fn parse_label(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if let Ok(int) = raw.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(float) = raw.parse::<f64>() {
        if float.is_finite() {
            return Value::from(float);
        }
    }
    Value::from(raw)
}

fn render_label(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
