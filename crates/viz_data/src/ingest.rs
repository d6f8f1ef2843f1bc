use crate::dataset::{Cell, Dataset, Field, FieldKind};
use crate::error::{DataError, Result};

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn infer_kind(raw: &[String]) -> FieldKind {
    let numeric = raw
        .iter()
        .filter(|s| !s.is_empty())
        .all(|s| parse_number(s).is_some());
    if numeric {
        FieldKind::Number
    } else {
        FieldKind::Text
    }
}

fn to_cell(raw: String, kind: FieldKind) -> Cell {
    if raw.is_empty() {
        return Cell::Null;
    }
    match kind {
        FieldKind::Number => parse_number(&raw).map(Cell::Number).unwrap_or(Cell::Text(raw)),
        FieldKind::Text => Cell::Text(raw),
    }
}

impl Dataset {
    /// Parse CSV text (header row first) into a dataset.
    ///
    /// Cells are trimmed; empty cells become [`Cell::Null`]. A column is
    /// numeric when every non-empty cell parses as a finite float.
    pub fn from_csv(name: impl Into<String>, text: &str) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(DataError::MissingHeader);
        }
        for (i, h) in headers.iter().enumerate() {
            if headers[..i].contains(h) {
                return Err(DataError::DuplicateColumn(h.clone()));
            }
        }

        let mut columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in reader.records() {
            let record = record?;
            for (col, value) in columns.iter_mut().zip(record.iter()) {
                col.push(value.to_string());
            }
        }

        let fields = headers
            .into_iter()
            .zip(columns)
            .map(|(name, raw)| {
                let kind = infer_kind(&raw);
                let values = raw.into_iter().map(|r| to_cell(r, kind)).collect();
                Field::new(name, kind, values)
            })
            .collect();

        Ok(Dataset::new(name, fields))
    }
}
