use serde::{Deserialize, Serialize};
use std::fmt;

/// Column type, inferred at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Number,
    Text,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Number => f.write_str("number"),
            FieldKind::Text => f.write_str("text"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Number(n) => write!(f, "{n}"),
            Cell::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub kind: FieldKind,
    pub values: Vec<Cell>,
}

impl Field {
    pub fn new(name: impl Into<String>, kind: FieldKind, values: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            kind,
            values,
        }
    }

    /// Smallest and largest numeric value, ignoring nulls.
    pub fn numeric_range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .filter_map(Cell::as_f64)
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Distinct non-null values in first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for cell in self.values.iter().filter(|c| !c.is_null()) {
            let s = cell.to_string();
            if !out.contains(&s) {
                out.push(s);
            }
        }
        out
    }
}

/// A named set of typed columns. All columns have the same length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub name: String,
    pub fields: Vec<Field>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn row_count(&self) -> usize {
        self.fields.first().map(|f| f.values.len()).unwrap_or(0)
    }

    /// Rows as JSON objects keyed by field name, nulls omitted.
    pub fn rows_json(&self) -> Vec<serde_json::Value> {
        (0..self.row_count())
            .map(|i| {
                let mut obj = serde_json::Map::new();
                for field in &self.fields {
                    match &field.values[i] {
                        Cell::Null => {}
                        Cell::Number(n) => {
                            obj.insert(field.name.clone(), serde_json::json!(n));
                        }
                        Cell::Text(s) => {
                            obj.insert(field.name.clone(), serde_json::Value::String(s.clone()));
                        }
                    }
                }
                serde_json::Value::Object(obj)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(
            "sample",
            vec![
                Field::new(
                    "city",
                    FieldKind::Text,
                    vec![Cell::Text("Oslo".into()), Cell::Null, Cell::Text("Oslo".into())],
                ),
                Field::new(
                    "temp",
                    FieldKind::Number,
                    vec![Cell::Number(3.5), Cell::Number(-2.0), Cell::Null],
                ),
            ],
        )
    }

    #[test]
    fn numeric_range_skips_nulls() {
        let ds = sample();
        assert_eq!(ds.field("temp").unwrap().numeric_range(), Some((-2.0, 3.5)));
        assert_eq!(ds.field("city").unwrap().numeric_range(), None);
    }

    #[test]
    fn categories_are_distinct_in_order() {
        let ds = sample();
        assert_eq!(ds.field("city").unwrap().categories(), vec!["Oslo".to_string()]);
    }

    #[test]
    fn rows_json_omits_nulls() {
        let rows = sample().rows_json();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["city"], "Oslo");
        assert_eq!(rows[0]["temp"], 3.5);
        assert!(rows[1].get("city").is_none());
        assert!(rows[2].get("temp").is_none());
    }

    #[test]
    fn missing_field_lookup() {
        assert!(sample().field("nope").is_none());
    }
}
