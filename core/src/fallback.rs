use crate::models::FoodMatch;

/// A compiled-in food used when the remote lookup has nothing to offer.
#[derive(Debug, Clone, Copy)]
pub struct FallbackFood {
    pub keyword: &'static str,
    pub label: &'static str,
    pub calories: u32,
}

impl FallbackFood {
    #[must_use]
    pub fn to_match(self) -> FoodMatch {
        FoodMatch {
            name: self.label.to_string(),
            calories: self.calories,
        }
    }
}

/// Searched in order; the first keyword that matches wins.
pub const FALLBACK_FOODS: &[FallbackFood] = &[
    FallbackFood {
        keyword: "apple",
        label: "Apple",
        calories: 52,
    },
    FallbackFood {
        keyword: "banana",
        label: "Banana",
        calories: 89,
    },
    FallbackFood {
        keyword: "orange",
        label: "Orange",
        calories: 47,
    },
    FallbackFood {
        keyword: "chicken",
        label: "Chicken breast",
        calories: 165,
    },
    FallbackFood {
        keyword: "rice",
        label: "White Rice",
        calories: 130,
    },
    FallbackFood {
        keyword: "bread",
        label: "Whole Wheat Bread",
        calories: 69,
    },
    FallbackFood {
        keyword: "egg",
        label: "Egg",
        calories: 72,
    },
    FallbackFood {
        keyword: "milk",
        label: "Whole Milk",
        calories: 61,
    },
];

/// Case-insensitive substring match in either direction: the query contains
/// the keyword, or the keyword contains the query.
#[must_use]
pub fn find_fallback(query: &str) -> Option<FoodMatch> {
    let term = query.trim().to_lowercase();
    if term.is_empty() {
        return None;
    }
    FALLBACK_FOODS
        .iter()
        .find(|f| term.contains(f.keyword) || f.keyword.contains(term.as_str()))
        .map(|f| f.to_match())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_keyword() {
        let food = find_fallback("apple").unwrap();
        assert_eq!(food.name, "Apple");
        assert_eq!(food.calories, 52);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(find_fallback("BANANA").unwrap().name, "Banana");
        assert_eq!(find_fallback("  Milk ").unwrap().name, "Whole Milk");
    }

    #[test]
    fn test_query_contains_keyword() {
        let food = find_fallback("grilled chicken thighs").unwrap();
        assert_eq!(food.name, "Chicken breast");
        assert_eq!(food.calories, 165);
    }

    #[test]
    fn test_keyword_contains_query() {
        assert_eq!(find_fallback("bre").unwrap().name, "Whole Wheat Bread");
    }

    #[test]
    fn test_first_match_in_table_order() {
        // "an" is inside both "banana" and "orange"; banana comes first
        assert_eq!(find_fallback("an").unwrap().name, "Banana");
        // "egg fried rice" contains both "rice" and "egg"; rice comes first
        assert_eq!(find_fallback("egg fried rice").unwrap().name, "White Rice");
    }

    #[test]
    fn test_no_match() {
        assert!(find_fallback("zzzznotfood").is_none());
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        assert!(find_fallback("").is_none());
        assert!(find_fallback("   ").is_none());
    }
}
