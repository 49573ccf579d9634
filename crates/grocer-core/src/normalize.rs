// SPDX-FileCopyrightText: 2026 Grocer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Item name canonicalization.
//!
//! [`normalize`] produces the key every list item and stats row is stored
//! under. [`split_multi`] breaks one chat message into several item names,
//! and [`simplify_ingredient`] strips a leading quantity and unit from a
//! recipe ingredient line. The last one is a heuristic: ranges, multi-word
//! quantities and parenthesized units are left alone.

use std::sync::LazyLock;

use regex::Regex;

/// Separators accepted between items in a single message.
static SPLIT_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[,\n;，、،]+").unwrap());

/// Integer, decimal, or `N/M` fraction.
static QUANTITY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+([./]\d+)?$").unwrap());

/// Units recognized directly after a leading quantity.
const UNITS: &[&str] = &[
    "teaspoon",
    "teaspoons",
    "tsp",
    "tablespoon",
    "tablespoons",
    "tbsp",
    "cup",
    "cups",
    "ounce",
    "ounces",
    "oz",
    "pound",
    "pounds",
    "lb",
    "lbs",
    "gram",
    "grams",
    "g",
    "kilogram",
    "kilograms",
    "kg",
    "milliliter",
    "milliliters",
    "ml",
    "liter",
    "liters",
    "l",
    "clove",
    "cloves",
    "slice",
    "slices",
    "can",
    "cans",
    "package",
    "packages",
    "pkg",
    "pinch",
    "pinches",
    "dash",
    "dashes",
];

/// Collapses whitespace runs, trims, and lowercases.
pub fn normalize(display_name: &str) -> String {
    collapse_whitespace(display_name).to_lowercase()
}

/// Splits a message into trimmed item names.
///
/// Empty parts and parts that look like a command (`/...`) are dropped.
/// Order is preserved and duplicates are kept.
pub fn split_multi(text: &str) -> Vec<String> {
    SPLIT_PATTERN
        .split(text)
        .map(str::trim)
        .filter(|part| !part.is_empty() && !part.starts_with('/'))
        .map(str::to_string)
        .collect()
}

/// Strips one leading quantity token and an optional unit after it.
///
/// Returns the whitespace-collapsed input when there is no leading quantity
/// or nothing would be left.
pub fn simplify_ingredient(raw: &str) -> String {
    let collapsed = collapse_whitespace(raw);
    let tokens: Vec<&str> = collapsed.split(' ').collect();

    let Some(first) = tokens.first() else {
        return collapsed;
    };
    if !QUANTITY_PATTERN.is_match(first) {
        return collapsed;
    }

    let mut rest = &tokens[1..];
    if let Some(unit) = rest.first() {
        let unit = unit.trim_end_matches('.').to_lowercase();
        if UNITS.contains(&unit.as_str()) {
            rest = &rest[1..];
        }
    }

    let simplified = rest.join(" ");
    if simplified.is_empty() {
        collapsed
    } else {
        simplified
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalize_folds_case_and_whitespace() {
        assert_eq!(normalize("  Milk  "), "milk");
        assert_eq!(normalize("Greek   Yogurt\t"), "greek yogurt");
        assert_eq!(normalize("  Milk  "), normalize("milk"));
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn split_multi_handles_separators() {
        assert_eq!(split_multi("eggs, milk;bread"), vec!["eggs", "milk", "bread"]);
        assert_eq!(split_multi("eggs\nmilk，rice、tea،salt"), vec![
            "eggs", "milk", "rice", "tea", "salt"
        ]);
        assert!(split_multi("").is_empty());
        assert!(split_multi(" , ;; ").is_empty());
    }

    #[test]
    fn split_multi_drops_command_fragments() {
        assert_eq!(split_multi("milk, /list, eggs"), vec!["milk", "eggs"]);
    }

    #[test]
    fn split_multi_keeps_duplicates_in_order() {
        assert_eq!(split_multi("milk, eggs, milk"), vec!["milk", "eggs", "milk"]);
    }

    #[test]
    fn simplify_strips_quantity_and_unit() {
        assert_eq!(simplify_ingredient("2 cups flour"), "flour");
        assert_eq!(simplify_ingredient("1/2 tsp salt"), "salt");
        assert_eq!(simplify_ingredient("1.5 Tbsp. olive oil"), "olive oil");
        assert_eq!(simplify_ingredient("3 eggs"), "eggs");
        assert_eq!(simplify_ingredient("2  cloves   garlic"), "garlic");
    }

    #[test]
    fn simplify_leaves_unquantified_text() {
        assert_eq!(simplify_ingredient("fresh basil"), "fresh basil");
        assert_eq!(simplify_ingredient("1-2 limes"), "1-2 limes");
        assert_eq!(simplify_ingredient("a pinch of salt"), "a pinch of salt");
    }

    #[test]
    fn simplify_falls_back_when_nothing_remains() {
        assert_eq!(simplify_ingredient("2"), "2");
        assert_eq!(simplify_ingredient("2 cups"), "2 cups");
        assert_eq!(simplify_ingredient(""), "");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(s in "\\PC{0,40}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn normalize_ignores_padding(s in "[a-zA-Z ]{0,30}", pad in " {0,5}") {
            let padded = format!("{pad}{s}{pad}");
            prop_assert_eq!(normalize(&padded), normalize(&s));
        }

        #[test]
        fn split_parts_are_trimmed_and_non_empty(s in "[a-z ,;/\n]{0,60}") {
            for part in split_multi(&s) {
                prop_assert!(!part.is_empty());
                prop_assert_eq!(part.trim(), part.as_str());
                prop_assert!(!part.starts_with('/'));
            }
        }

        #[test]
        fn simplify_never_returns_empty_for_non_blank(s in "[0-9a-z/. ]{1,30}") {
            prop_assume!(!s.trim().is_empty());
            prop_assert!(!simplify_ingredient(&s).is_empty());
        }
    }
}
