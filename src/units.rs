//! Fixed table mapping a unit name to its factor in the common base
//! quantity (milligrams for weight, milliliters for volume; both bases are
//! 1, so cross-kind comparisons only happen for units spelled differently
//! in the same kind). Units missing from the table are unconvertible.

/// Factor expressing `unit` in the common base quantity, or `None` when the
/// unit is unknown. Lookup is case-insensitive and ignores surrounding
/// whitespace.
pub fn conversion_factor(unit: &str) -> Option<f64> {
    let factor = match unit.trim().to_ascii_lowercase().as_str() {
        "milligram" => 1.0,
        "gram" => 1_000.0,
        "kilogram" => 1_000_000.0,
        "ounce" => 28_349.52,
        "pound" => 453_592.4,
        "milliliter" => 1.0,
        "liter" => 1_000.0,
        "teaspoon" => 4.928_921_59,
        "tablespoon" => 14.786_764_8,
        "cup" => 236.588_236,
        "pinch" => 355.625,
        "dash" => 0.616,
        _ => return None,
    };
    Some(factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_units() {
        assert_eq!(conversion_factor("milligram"), Some(1.0));
        assert_eq!(conversion_factor("gram"), Some(1_000.0));
        assert_eq!(conversion_factor("milliliter"), Some(1.0));
        assert_eq!(conversion_factor("liter"), Some(1_000.0));
        assert_eq!(conversion_factor("pinch"), Some(355.625));
    }

    #[test]
    fn lookup_ignores_case_and_whitespace() {
        assert_eq!(conversion_factor(" Liter "), Some(1_000.0));
        assert_eq!(conversion_factor("TABLESPOON"), conversion_factor("tablespoon"));
    }

    #[test]
    fn unknown_units_are_unconvertible() {
        assert_eq!(conversion_factor("handful"), None);
        assert_eq!(conversion_factor(""), None);
        assert_eq!(conversion_factor("liters"), None);
    }

    #[test]
    fn kilogram_is_a_million_milligrams() {
        let kg = conversion_factor("kilogram").unwrap();
        let mg = conversion_factor("milligram").unwrap();
        assert_eq!(kg / mg, 1_000_000.0);
    }
}
