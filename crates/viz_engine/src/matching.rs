//! Retarget a spec written for one dataset onto another.
//!
//! Each field the spec uses is mapped onto a field of the new dataset:
//! the same name if present, else the first unclaimed field of the same
//! kind, else the first unclaimed field. Same-name matches are claimed
//! before any substitutes are picked.

use crate::action::{is_synthetic, Action};
use crate::error::{EngineError, Result};
use std::collections::HashMap;
use viz_data::{Dataset, Field};

pub fn match_datasets(original: &Dataset, new: &Dataset, action: &Action) -> Result<Action> {
    let wanted: Vec<&str> = action
        .fields()
        .into_iter()
        .filter(|f| !is_synthetic(f))
        .collect();

    let mut claimed: Vec<&str> = wanted
        .iter()
        .copied()
        .filter(|f| new.field(f).is_some())
        .collect();

    let mut renames = HashMap::new();
    for name in wanted {
        if new.field(name).is_some() {
            continue;
        }
        let kind = original.field(name).map(|f| f.kind);
        let unclaimed = |f: &&Field| !claimed.contains(&f.name.as_str());
        let pick = new
            .fields
            .iter()
            .filter(unclaimed)
            .find(|f| Some(f.kind) == kind)
            .or_else(|| new.fields.iter().find(unclaimed))
            .ok_or_else(|| EngineError::NoMatch {
                field: name.to_string(),
            })?;
        claimed.push(&pick.name);
        renames.insert(name.to_string(), pick.name.clone());
    }

    let mut out = action.rename_fields(&renames);
    if action.data_ref().is_some() {
        out = out.with_data(&new.name);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ds(name: &str, csv: &str) -> Dataset {
        Dataset::from_csv(name, csv).unwrap()
    }

    #[test]
    fn identical_datasets_keep_the_spec() {
        let cars = ds("cars.csv", "make,mpg\nvw,31\n");
        let action = Action::parse("data('cars.csv') bar x(make) y(mpg) y(#count)").unwrap();
        let out = match_datasets(&cars, &cars, &action).unwrap();
        assert_eq!(out, action);
    }

    #[test]
    fn substitutes_by_kind_then_position() {
        let cars = ds("cars.csv", "make,mpg,origin\nvw,31,eu\n");
        let bikes = ds("bikes.csv", "weight,brand,country\n9.5,trek,us\n");
        let action = Action::parse("data(cars.csv) point x(mpg) color(make) label(origin)").unwrap();
        let out = match_datasets(&cars, &bikes, &action).unwrap();
        assert_eq!(
            out.to_string(),
            "data(bikes.csv) point x(weight) color(brand) label(country)"
        );
    }

    #[test]
    fn retargeted_spec_reparses_with_awkward_names() {
        use viz_data::{Cell, FieldKind};
        let old = ds("old", "a\nx\n");
        let name = "it's \"b\"";
        let new = Dataset::new(
            "new",
            vec![Field::new(name, FieldKind::Text, vec![Cell::Text("y".into())])],
        );
        let out = match_datasets(&old, &new, &Action::parse("x(a)").unwrap()).unwrap();
        let again = Action::parse(&out.to_string()).unwrap();
        assert_eq!(again, out);
        assert_eq!(again.fields(), vec![name]);
        assert!(again.apply(&new).is_ok());
    }

    #[test]
    fn same_name_is_claimed_before_substitutes() {
        let old = ds("old", "a,b\nx,y\n");
        let new = ds("new", "b,c\nx,y\n");
        // 'a' must not take 'b', which 'b' itself keeps
        let action = Action::parse("x(a) y(b)").unwrap();
        let out = match_datasets(&old, &new, &action).unwrap();
        assert_eq!(out.to_string(), "x(c) y(b)");
    }

    #[test]
    fn falls_back_to_any_kind() {
        let old = ds("old", "n\n1\n");
        let new = ds("new", "t\nx\n");
        let out = match_datasets(&old, &new, &Action::parse("x(n)").unwrap()).unwrap();
        assert_eq!(out.to_string(), "x(t)");
    }

    #[test]
    fn too_few_fields_is_an_error() {
        let old = ds("old", "a,b\n1,2\n");
        let new = ds("new", "c\n1\n");
        let err = match_datasets(&old, &new, &Action::parse("x(a) y(b)").unwrap()).unwrap_err();
        assert!(matches!(err, EngineError::NoMatch { field } if field == "b"));
    }
}
