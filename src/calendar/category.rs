//! Known calendar categories and their display colors.

pub const DEFAULT_CATEGORY: &str = "Other";

/// Color used for categories outside the known palette.
pub const NEUTRAL_COLOR: &str = "#6b7280";

const PALETTE: [(&str, &str); 7] = [
    ("Salary", "#16a34a"),
    ("Rent/Mortgage", "#dc2626"),
    ("Utilities", "#f59e0b"),
    ("Subscriptions", "#8b5cf6"),
    ("Insurance", "#0ea5e9"),
    ("Loan Payment", "#ef4444"),
    (DEFAULT_CATEGORY, NEUTRAL_COLOR),
];

/// Category names offered by default, in presentation order.
pub fn known_categories() -> impl Iterator<Item = &'static str> {
    PALETTE.iter().map(|(name, _)| *name)
}

pub fn category_color(category: &str) -> &'static str {
    PALETTE
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, color)| *color)
        .unwrap_or(NEUTRAL_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_category_maps_to_palette_color() {
        assert_eq!(category_color("Salary"), "#16a34a");
        assert_eq!(category_color("Insurance"), "#0ea5e9");
    }

    #[test]
    fn unknown_category_falls_back_to_gray() {
        assert_eq!(category_color("Gym"), NEUTRAL_COLOR);
        assert_eq!(category_color("salary"), NEUTRAL_COLOR);
    }

    #[test]
    fn palette_lists_default_category_last() {
        let names: Vec<_> = known_categories().collect();
        assert_eq!(names.len(), 7);
        assert_eq!(names.last(), Some(&DEFAULT_CATEGORY));
    }
}
