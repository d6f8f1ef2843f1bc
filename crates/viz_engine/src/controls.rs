use crate::error::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Range,
    Category,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterControl {
    pub field: String,
    pub label: String,
    pub kind: FilterKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
}

/// Interactive controls a built visualization needs from its host page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    pub vis_id: String,
    pub filters: Vec<FilterControl>,
}

impl Controls {
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

/// Emits the JS that hands [`Controls`] to a control factory on the page.
pub struct ControlWriter {
    target_id: String,
    factory: String,
}

impl ControlWriter {
    pub fn new(target_id: impl Into<String>, factory: impl Into<String>) -> Self {
        Self {
            target_id: target_id.into(),
            factory: factory.into(),
        }
    }

    /// Empty when there is nothing to wire.
    pub fn write(&self, controls: &Controls) -> Result<String> {
        if controls.is_empty() {
            return Ok(String::new());
        }
        let json = serde_json::to_string(controls)?;
        let target = serde_json::to_string(&self.target_id)?;
        Ok(format!(
            "\n(function () {{\n  var controls = {json};\n  {factory}.makeFilters({target}, controls);\n}})();\n",
            factory = self.factory,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> FilterControl {
        FilterControl {
            field: "mpg".into(),
            label: "mpg".into(),
            kind: FilterKind::Range,
            min: Some(10.0),
            max: Some(40.0),
            categories: vec![],
        }
    }

    #[test]
    fn writer_is_silent_without_filters() {
        let w = ControlWriter::new("controls", "VizControlFactory");
        assert_eq!(w.write(&Controls::default()).unwrap(), "");
    }

    #[test]
    fn writer_emits_factory_call() {
        let controls = Controls {
            vis_id: "vis".into(),
            filters: vec![range()],
        };
        let js = ControlWriter::new("controls", "VizControlFactory").write(&controls).unwrap();
        assert!(js.contains("VizControlFactory.makeFilters(\"controls\", controls);"));
        assert!(js.contains("\"kind\":\"range\""));
    }

    #[test]
    fn control_json_omits_unused_fields() {
        let json = serde_json::to_value(range()).unwrap();
        assert_eq!(json["min"], 10.0);
        assert!(json.get("categories").is_none());
    }
}
