//! The generic ingredient line item. The same shape lives inside recipes,
//! the pantry and the shopping list; two line items are "the same
//! ingredient" when name and form match case-insensitively, with the unit
//! joining in for duplicate detection.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::FieldError;
use crate::validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct IngredientRow {
    pub id: Uuid,
    pub name: String,
    pub form: Option<String>,
    pub quantity: f64,
    pub unit: String,
}

fn identity_key(name: &str, form: Option<&str>) -> (String, String) {
    (
        name.trim().to_lowercase(),
        form.map(|f| f.trim().to_lowercase()).unwrap_or_default(),
    )
}

impl IngredientRow {
    /// Identity match on (name, form), used for pantry matching.
    pub fn matches(&self, name: &str, form: Option<&str>) -> bool {
        identity_key(&self.name, self.form.as_deref()) == identity_key(name, form)
    }

    pub fn same_unit(&self, unit: &str) -> bool {
        self.unit.trim().eq_ignore_ascii_case(unit.trim())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IngredientInput {
    pub name: String,
    #[serde(default)]
    pub form: Option<String>,
    pub quantity: f64,
    pub unit: String,
}

impl IngredientInput {
    /// Trim the text fields and check the quantity. Empty `form` collapses
    /// to `None`.
    pub fn validate(self) -> Result<IngredientInput, Vec<FieldError>> {
        let mut errors = Vec::new();
        let name = validate::accumulate(&mut errors, validate::non_empty("name", &self.name));
        let unit = validate::accumulate(&mut errors, validate::non_empty("unit", &self.unit));
        let quantity = validate::accumulate(&mut errors, validate::quantity(self.quantity));
        let form = self
            .form
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string);

        match (name, unit, quantity, errors.is_empty()) {
            (Some(name), Some(unit), Some(quantity), true) => Ok(IngredientInput {
                name,
                form,
                quantity,
                unit,
            }),
            _ => Err(errors),
        }
    }

    pub fn identity(&self) -> (String, String) {
        identity_key(&self.name, self.form.as_deref())
    }

    pub fn same_unit(&self, unit: &str) -> bool {
        self.unit.trim().eq_ignore_ascii_case(unit.trim())
    }
}

/// Collapse duplicate line items in a single submitted list. Items matching
/// on (name, form, unit) merge their quantities; a (name, form) match with
/// a different unit is an ambiguous duplicate and is rejected with the
/// offending name.
pub fn dedup(items: Vec<IngredientInput>) -> Result<Vec<IngredientInput>, String> {
    let mut merged: Vec<IngredientInput> = Vec::with_capacity(items.len());
    for item in items {
        match merged.iter().position(|m| m.identity() == item.identity()) {
            Some(index) => {
                let existing = &mut merged[index];
                if !existing.same_unit(&item.unit) {
                    return Err(format!(
                        "duplicate ingredient {} with conflicting units",
                        existing.name
                    ));
                }
                existing.quantity += item.quantity;
            }
            None => merged.push(item),
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, form: Option<&str>, quantity: f64, unit: &str) -> IngredientInput {
        IngredientInput {
            name: name.into(),
            form: form.map(Into::into),
            quantity,
            unit: unit.into(),
        }
    }

    #[test]
    fn validate_trims_and_collapses_empty_form() {
        let cleaned = input(" Flour ", Some("  "), 2.0, " cup ").validate().unwrap();
        assert_eq!(cleaned.name, "Flour");
        assert_eq!(cleaned.form, None);
        assert_eq!(cleaned.unit, "cup");
    }

    #[test]
    fn validate_reports_every_bad_field() {
        let errors = input("", None, 0.0, "").validate().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["name", "unit", "quantity"]);
    }

    #[test]
    fn identity_is_case_insensitive_on_name_and_form() {
        let a = input("Flour", Some("Sifted"), 1.0, "cup");
        let b = input("flour ", Some(" sifted"), 2.0, "gram");
        assert_eq!(a.identity(), b.identity());
        let c = input("flour", None, 2.0, "gram");
        assert_ne!(a.identity(), c.identity());
    }

    #[test]
    fn dedup_merges_same_unit_duplicates() {
        let merged = dedup(vec![
            input("flour", None, 1.0, "cup"),
            input("sugar", None, 0.5, "cup"),
            input("Flour", None, 2.0, "Cup"),
        ])
        .unwrap();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].quantity, 3.0);
    }

    #[test]
    fn dedup_rejects_conflicting_units() {
        let err = dedup(vec![
            input("flour", None, 1.0, "cup"),
            input("flour", None, 100.0, "gram"),
        ])
        .unwrap_err();
        assert!(err.contains("flour"));
    }

    #[test]
    fn row_matching_aligns_with_input_identity() {
        let row = IngredientRow {
            id: Uuid::new_v4(),
            name: "Tomato".into(),
            form: Some("Diced".into()),
            quantity: 3.0,
            unit: "cup".into(),
        };
        assert!(row.matches("tomato", Some("diced ")));
        assert!(!row.matches("tomato", None));
        assert!(row.same_unit(" CUP"));
    }
}
