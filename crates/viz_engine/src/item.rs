use crate::action::{is_synthetic, Action, Command, Element, Role};
use crate::error::{EngineError, Result};
use viz_data::Dataset;

/// An action applied to a dataset, ready for a builder.
#[derive(Debug, Clone, PartialEq)]
pub struct VisItem {
    pub element: Element,
    pub encodings: Vec<(Role, Vec<String>)>,
    pub filters: Vec<String>,
    pub title: Option<String>,
    pub style: Option<String>,
    pub dataset: Dataset,
}

impl VisItem {
    /// Fields bound to `role` by the first matching command.
    pub fn encoding(&self, role: Role) -> Option<&[String]> {
        self.encodings
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, fields)| fields.as_slice())
    }
}

impl Action {
    /// Bind this action to `dataset`. Every referenced field must exist.
    pub fn apply(&self, dataset: &Dataset) -> Result<VisItem> {
        for field in self.fields() {
            if !is_synthetic(field) && dataset.field(field).is_none() {
                return Err(EngineError::UnknownField {
                    field: field.to_string(),
                    dataset: dataset.name.clone(),
                });
            }
        }

        let mut item = VisItem {
            element: self.element().unwrap_or(Element::Point),
            encodings: Vec::new(),
            filters: Vec::new(),
            title: None,
            style: None,
            dataset: dataset.clone(),
        };
        for cmd in self.commands() {
            match cmd {
                Command::Encode { role, fields } => item.encodings.push((*role, fields.clone())),
                Command::Filter(fields) => {
                    for f in fields {
                        if !item.filters.contains(f) {
                            item.filters.push(f.clone());
                        }
                    }
                }
                Command::Title(t) => item.title = Some(t.clone()),
                Command::Style(s) => item.style = Some(s.clone()),
                Command::Element(_) | Command::Data(_) => {}
            }
        }
        Ok(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cars() -> Dataset {
        Dataset::from_csv("cars", "make,mpg,origin\nvw,31.5,eu\nford,22,us\n").unwrap()
    }

    #[test]
    fn apply_collects_encodings() {
        let item = Action::parse("bar x(origin) y(mpg) filter(origin, origin) title(Cars)")
            .unwrap()
            .apply(&cars())
            .unwrap();
        assert_eq!(item.element, Element::Bar);
        assert_eq!(item.encoding(Role::X), Some(&["origin".to_string()][..]));
        assert_eq!(item.encoding(Role::Color), None);
        assert_eq!(item.filters, vec!["origin".to_string()]);
        assert_eq!(item.title.as_deref(), Some("Cars"));
    }

    #[test]
    fn element_defaults_to_point() {
        let item = Action::parse("x(make)").unwrap().apply(&cars()).unwrap();
        assert_eq!(item.element, Element::Point);
    }

    #[test]
    fn synthetic_fields_are_always_present() {
        assert!(Action::parse("bar x(make) y(#count)").unwrap().apply(&cars()).is_ok());
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = Action::parse("x(weight)").unwrap().apply(&cars()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnknownField { field, dataset } if field == "weight" && dataset == "cars"
        ));
    }
}
