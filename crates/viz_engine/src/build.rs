//! d3 target: turns a [`VisItem`] into script, style overrides and controls.
//!
//! The emitted script only binds data and the chart description; drawing is
//! done by `VizD3.render` from the support library served under the page's
//! asset base.

use crate::action::{is_synthetic, Element, Role};
use crate::controls::{Controls, FilterControl, FilterKind};
use crate::error::{EngineError, Result};
use crate::item::VisItem;
use serde::Serialize;
use serde_json::{json, Map, Value};
use viz_data::FieldKind;

#[derive(Debug, Clone, Serialize)]
pub struct BuildOutput {
    pub js: String,
    pub css: String,
    pub controls: Controls,
}

pub struct D3Builder {
    vis_id: String,
}

impl D3Builder {
    pub fn new(vis_id: impl Into<String>) -> Self {
        Self { vis_id: vis_id.into() }
    }

    pub fn build(&self, item: &VisItem, width: i32, height: i32) -> Result<BuildOutput> {
        check_element(item)?;
        Ok(BuildOutput {
            js: self.script(item, width, height)?,
            css: self.style(item),
            controls: self.controls(item)?,
        })
    }

    fn script(&self, item: &VisItem, width: i32, height: i32) -> Result<String> {
        let mut encodings = Map::new();
        for (role, fields) in &item.encodings {
            encodings
                .entry(role.name())
                .or_insert_with(|| json!(fields));
        }
        let chart = json!({
            "element": item.element.name(),
            "encodings": encodings,
            "filters": item.filters,
            "title": item.title,
        });
        let selector = serde_json::to_string(&format!("#{}", self.vis_id))?;
        let data = serde_json::to_string(&Value::Array(item.dataset.rows_json()))?;
        Ok(format!(
            "(function () {{
  var width = {width}, height = {height};
  var svg = d3.select({selector}).attr('width', width).attr('height', height);
  var chart = {chart};
  var data = {data};
  return VizD3.render(svg, chart, data, {{ width: width, height: height }});
}})();
"
        ))
    }

    fn style(&self, item: &VisItem) -> String {
        match &item.style {
            Some(decls) => format!("#{} .element {{ {} }}\n", self.vis_id, decls.trim()),
            None => String::new(),
        }
    }

    fn controls(&self, item: &VisItem) -> Result<Controls> {
        let mut filters = Vec::new();
        for name in &item.filters {
            let field = item
                .dataset
                .field(name)
                .filter(|_| !is_synthetic(name))
                .ok_or_else(|| EngineError::Build(format!("cannot filter on '{name}'")))?;
            let control = match field.kind {
                FieldKind::Number => {
                    let range = field.numeric_range();
                    FilterControl {
                        field: name.clone(),
                        label: name.clone(),
                        kind: FilterKind::Range,
                        min: range.map(|(lo, _)| lo),
                        max: range.map(|(_, hi)| hi),
                        categories: Vec::new(),
                    }
                }
                FieldKind::Text => FilterControl {
                    field: name.clone(),
                    label: name.clone(),
                    kind: FilterKind::Category,
                    min: None,
                    max: None,
                    categories: field.categories(),
                },
            };
            filters.push(control);
        }
        Ok(Controls {
            vis_id: self.vis_id.clone(),
            filters,
        })
    }
}

fn check_element(item: &VisItem) -> Result<()> {
    let needs: &[Role] = match item.element {
        Element::Bar | Element::Line | Element::Area => &[Role::X, Role::Y],
        Element::Text => &[Role::Label],
        Element::Point => &[],
    };
    for role in needs {
        if item.encoding(*role).is_none() {
            return Err(EngineError::Build(format!(
                "{} needs {}(...)",
                item.element.name(),
                role.name()
            )));
        }
    }
    Ok(())
}
