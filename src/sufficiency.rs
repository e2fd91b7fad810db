//! Classifies a recipe ingredient against the matching pantry line item:
//! is there enough on hand, once units are normalized?

use serde::Serialize;

use crate::units::conversion_factor;

/// A quantity with its unit, detached from where the ingredient lives.
#[derive(Debug, Clone, Copy)]
pub struct Amount<'a> {
    pub quantity: f64,
    pub unit: &'a str,
}

/// Outcome of comparing a recipe ingredient with the pantry. Variants are
/// ordered by the priority in which they are detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SufficiencyStatus {
    /// No pantry line item matches the ingredient at all.
    Missing,
    /// Same unit on both sides, but the recipe needs more than is on hand.
    InsufficientSameUnit,
    /// Units differ and at least one of them is not in the conversion
    /// table, so the quantities cannot be compared.
    Unconvertible,
    /// Units differ and, after conversion to the common base, the recipe
    /// needs more than is on hand.
    InsufficientConverted,
    Sufficient,
}

/// Display severity used when annotating an ingredient list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Success,
}

impl SufficiencyStatus {
    pub fn severity(self) -> Severity {
        match self {
            SufficiencyStatus::Missing => Severity::Error,
            SufficiencyStatus::InsufficientSameUnit | SufficiencyStatus::InsufficientConverted => {
                Severity::Warning
            }
            SufficiencyStatus::Unconvertible => Severity::Info,
            SufficiencyStatus::Sufficient => Severity::Success,
        }
    }
}

/// Compare a recipe ingredient against the pantry line item that matched it
/// by name and form, if any.
///
/// The presence check comes first, then the same-unit comparison (exact
/// quantities, no float conversion error), then convertibility of both
/// units, and only then the converted comparison. Anything that survives
/// all four checks is sufficient.
pub fn classify(recipe: Amount<'_>, pantry: Option<Amount<'_>>) -> SufficiencyStatus {
    let Some(pantry) = pantry else {
        return SufficiencyStatus::Missing;
    };

    let recipe_unit = recipe.unit.trim();
    let pantry_unit = pantry.unit.trim();

    if recipe_unit.eq_ignore_ascii_case(pantry_unit) {
        return if recipe.quantity > pantry.quantity {
            SufficiencyStatus::InsufficientSameUnit
        } else {
            SufficiencyStatus::Sufficient
        };
    }

    let (Some(recipe_factor), Some(pantry_factor)) = (
        conversion_factor(recipe_unit),
        conversion_factor(pantry_unit),
    ) else {
        return SufficiencyStatus::Unconvertible;
    };

    if recipe.quantity * recipe_factor > pantry.quantity * pantry_factor {
        SufficiencyStatus::InsufficientConverted
    } else {
        SufficiencyStatus::Sufficient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(quantity: f64, unit: &str) -> Amount<'_> {
        Amount { quantity, unit }
    }

    #[test]
    fn no_pantry_match_is_missing_regardless_of_quantities() {
        assert_eq!(
            classify(amount(0.001, "gram"), None),
            SufficiencyStatus::Missing
        );
        assert_eq!(
            classify(amount(9999.0, "bogus"), None),
            SufficiencyStatus::Missing
        );
    }

    #[test]
    fn same_unit_compares_quantities_directly() {
        assert_eq!(
            classify(amount(3.0, "cup"), Some(amount(2.0, "cup"))),
            SufficiencyStatus::InsufficientSameUnit
        );
        assert_eq!(
            classify(amount(2.0, "cup"), Some(amount(2.0, "cup"))),
            SufficiencyStatus::Sufficient
        );
        assert_eq!(
            classify(amount(1.0, "cup"), Some(amount(2.0, "cup"))),
            SufficiencyStatus::Sufficient
        );
    }

    #[test]
    fn same_unit_match_ignores_case_and_whitespace() {
        assert_eq!(
            classify(amount(1.0, "Cup "), Some(amount(2.0, "cup"))),
            SufficiencyStatus::Sufficient
        );
        // Even units outside the table compare fine when spelled the same.
        assert_eq!(
            classify(amount(3.0, "handful"), Some(amount(1.0, "handful"))),
            SufficiencyStatus::InsufficientSameUnit
        );
    }

    #[test]
    fn unknown_recipe_unit_is_unconvertible() {
        assert_eq!(
            classify(amount(1.0, "handful"), Some(amount(500.0, "gram"))),
            SufficiencyStatus::Unconvertible
        );
    }

    #[test]
    fn unknown_pantry_unit_is_unconvertible() {
        assert_eq!(
            classify(amount(1.0, "gram"), Some(amount(500.0, "handful"))),
            SufficiencyStatus::Unconvertible
        );
    }

    #[test]
    fn converted_comparison_uses_both_factors() {
        // 2 liter = 2000 ml > 1500 ml on hand.
        assert_eq!(
            classify(amount(2.0, "liter"), Some(amount(1500.0, "milliliter"))),
            SufficiencyStatus::InsufficientConverted
        );
        // 1 liter = 1000 ml <= 1500 ml on hand.
        assert_eq!(
            classify(amount(1.0, "liter"), Some(amount(1500.0, "milliliter"))),
            SufficiencyStatus::Sufficient
        );
        // 2 gram = 2000 mg <= 0.003 kilogram = 3000 mg.
        assert_eq!(
            classify(amount(2.0, "gram"), Some(amount(0.003, "kilogram"))),
            SufficiencyStatus::Sufficient
        );
    }

    #[test]
    fn severity_mapping() {
        assert_eq!(SufficiencyStatus::Missing.severity(), Severity::Error);
        assert_eq!(
            SufficiencyStatus::InsufficientSameUnit.severity(),
            Severity::Warning
        );
        assert_eq!(
            SufficiencyStatus::InsufficientConverted.severity(),
            Severity::Warning
        );
        assert_eq!(SufficiencyStatus::Unconvertible.severity(), Severity::Info);
        assert_eq!(SufficiencyStatus::Sufficient.severity(), Severity::Success);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&SufficiencyStatus::InsufficientSameUnit).unwrap();
        assert_eq!(json, "\"insufficient_same_unit\"");
    }
}
