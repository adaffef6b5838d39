//! Word sets used by the labeling functions.

use std::sync::LazyLock;

use hashbrown::HashSet;

pub type WordSet = HashSet<String>;

const FAMILY_BASE: [&str; 15] = [
    "father",
    "mother",
    "sister",
    "brother",
    "son",
    "daughter",
    "grandfather",
    "grandmother",
    "uncle",
    "aunt",
    "cousin",
    "papa",
    "baba",
    "mama",
    "mom",
];

/// Words denoting a spouse.
pub static SPOUSES: LazyLock<WordSet> = LazyLock::new(|| {
    ["spouse", "wife", "husband", "ex-wife", "ex-husband"]
        .into_iter()
        .map(String::from)
        .collect()
});

/// Words denoting a family member, each also with its `-in-law` form.
pub static FAMILY: LazyLock<WordSet> = LazyLock::new(|| {
    FAMILY_BASE
        .into_iter()
        .map(String::from)
        .chain(FAMILY_BASE.into_iter().map(|f| format!("{f}-in-law")))
        .collect()
});

/// Words denoting a non-family relationship.
pub static OTHER: LazyLock<WordSet> = LazyLock::new(|| {
    [
        "boyfriend",
        "girlfriend",
        "boss",
        "employee",
        "secretary",
        "co-worker",
        "supervisor",
        "mentor",
        "leader",
    ]
    .into_iter()
    .map(String::from)
    .collect()
});

/// Checks whether any of `tokens` is in `words`.
pub fn intersects(words: &WordSet, tokens: &[String]) -> bool {
    tokens.iter().any(|t| words.contains(t.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_in_law() {
        assert_eq!(30, FAMILY.len());
        for f in FAMILY_BASE {
            assert!(FAMILY.contains(f));
            assert!(FAMILY.contains(format!("{f}-in-law").as_str()));
        }
    }

    #[test]
    fn test_word_sets() {
        assert_eq!(5, SPOUSES.len());
        assert!(SPOUSES.contains("ex-husband"));
        assert_eq!(9, OTHER.len());
        assert!(OTHER.contains("co-worker"));
        assert!(!OTHER.contains("wife"));
    }

    #[test]
    fn test_intersects() {
        let tokens = vec!["his".to_string(), "wife".to_string()];

        assert!(intersects(&SPOUSES, &tokens));
        assert!(!intersects(&FAMILY, &tokens));
        assert!(!intersects(&SPOUSES, &[]));
    }
}
