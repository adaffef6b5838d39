//! Labeling functions for the spouse relation.

use conjugal::{Candidate, Label, LabelingFunction, Lf};

use crate::preprocessors::{GetLeftTokens, GetPersonLastNames, GetTextBetween};
use crate::resources::{intersects, WordSet, FAMILY, OTHER, SPOUSES};

/// Names of the labeling functions used by default, in column order.
pub const DEFAULT_LF_NAMES: [&str; 5] = [
    "lf_husband_wife",
    "lf_husband_wife_left_window",
    "lf_married",
    "lf_familial_relationship",
    "lf_other_relationship",
];

/// Names of every labeling function in this crate.
pub const ALL_LF_NAMES: [&str; 7] = [
    "lf_husband_wife",
    "lf_husband_wife_left_window",
    "lf_married",
    "lf_familial_relationship",
    "lf_other_relationship",
    "lf_family_left_window",
    "lf_same_last_name",
];

/// Positive if "married" appears between the mentions.
pub fn lf_married() -> Lf<()> {
    Lf::new("lf_married", (), |x, _| {
        if x.between_tokens().iter().any(|t| t == "married") {
            Label::Positive
        } else {
            Label::Abstain
        }
    })
    .pre(GetTextBetween)
}

/// Positive if a spouse word appears between the mentions.
pub fn lf_husband_wife() -> Lf<&'static WordSet> {
    Lf::new("lf_husband_wife", &*SPOUSES, |x, spouses| {
        if intersects(spouses, x.between_tokens()) {
            Label::Positive
        } else {
            Label::Abstain
        }
    })
    .pre(GetTextBetween)
}

/// Negative if a family word appears between the mentions.
pub fn lf_familial_relationship() -> Lf<&'static WordSet> {
    Lf::new("lf_familial_relationship", &*FAMILY, |x, family| {
        if intersects(family, x.between_tokens()) {
            Label::Negative
        } else {
            Label::Abstain
        }
    })
    .pre(GetTextBetween)
}

/// Negative if a non-family relationship word appears between the mentions.
pub fn lf_other_relationship() -> Lf<&'static WordSet> {
    Lf::new("lf_other_relationship", &*OTHER, |x, other| {
        if intersects(other, x.between_tokens()) {
            Label::Negative
        } else {
            Label::Abstain
        }
    })
    .pre(GetTextBetween)
}

fn in_left_window(x: &Candidate, words: &WordSet) -> bool {
    intersects(words, x.person1_left_tokens()) || intersects(words, x.person2_left_tokens())
}

/// Positive if a spouse word appears to the left of either mention.
pub fn lf_husband_wife_left_window() -> Lf<&'static WordSet> {
    Lf::new("lf_husband_wife_left_window", &*SPOUSES, |x, spouses| {
        if in_left_window(x, spouses) {
            Label::Positive
        } else {
            Label::Abstain
        }
    })
    .pre(GetLeftTokens::default())
}

/// Negative if a family word appears to the left of either mention.
pub fn lf_family_left_window() -> Lf<&'static WordSet> {
    Lf::new("lf_family_left_window", &*FAMILY, |x, family| {
        if in_left_window(x, family) {
            Label::Negative
        } else {
            Label::Abstain
        }
    })
    .pre(GetLeftTokens::default())
}

/// Positive if two different multi-token names share a last name.
pub fn lf_same_last_name() -> Lf<()> {
    Lf::new("lf_same_last_name", (), |x, _| {
        match (&x.person_names, &x.person_lastnames) {
            (Some([name1, name2]), Some([Some(last1), Some(last2)]))
                if last1 == last2 && name1 != name2 =>
            {
                Label::Positive
            }
            _ => Label::Abstain,
        }
    })
    .pre(GetPersonLastNames)
}

/// Looks up a labeling function by name.
///
/// # Returns
///
/// `None` if no labeling function has the name.
pub fn lf_by_name(name: &str) -> Option<Box<dyn LabelingFunction>> {
    let lf: Box<dyn LabelingFunction> = match name {
        "lf_married" => Box::new(lf_married()),
        "lf_husband_wife" => Box::new(lf_husband_wife()),
        "lf_familial_relationship" => Box::new(lf_familial_relationship()),
        "lf_other_relationship" => Box::new(lf_other_relationship()),
        "lf_husband_wife_left_window" => Box::new(lf_husband_wife_left_window()),
        "lf_family_left_window" => Box::new(lf_family_left_window()),
        "lf_same_last_name" => Box::new(lf_same_last_name()),
        _ => return None,
    };
    Some(lf)
}

/// The five labeling functions of the spouse task.
pub fn default_lfs() -> Vec<Box<dyn LabelingFunction>> {
    DEFAULT_LF_NAMES
        .iter()
        .filter_map(|name| lf_by_name(name))
        .collect()
}

/// Every labeling function in this crate.
pub fn all_lfs() -> Vec<Box<dyn LabelingFunction>> {
    ALL_LF_NAMES
        .iter()
        .filter_map(|name| lf_by_name(name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use conjugal::Span;

    fn candidate(text: &str, person1: (usize, usize), person2: (usize, usize)) -> Candidate {
        Candidate::from_tokenized(
            text,
            Span::new(person1.0, person1.1),
            Span::new(person2.0, person2.1),
        )
        .unwrap()
    }

    #[test]
    fn test_lf_married() {
        let lf = lf_married();

        assert_eq!(
            Label::Positive,
            lf.label(&candidate("Alice married Bob", (0, 0), (2, 2)))
        );
        assert_eq!(
            Label::Abstain,
            lf.label(&candidate("Alice and Bob married", (0, 0), (2, 2)))
        );
        assert_eq!(
            Label::Abstain,
            lf.label(&candidate("Alice unmarried Bob", (0, 0), (2, 2)))
        );
    }

    #[test]
    fn test_lf_husband_wife() {
        let lf = lf_husband_wife();

        assert_eq!(
            Label::Positive,
            lf.label(&candidate("Alice , ex-wife of Bob", (0, 0), (4, 4)))
        );
        assert_eq!(
            Label::Abstain,
            lf.label(&candidate("Alice , sister of Bob", (0, 0), (4, 4)))
        );
        assert_eq!(
            Label::Abstain,
            lf.label(&candidate("his wife Alice and Bob", (2, 2), (4, 4)))
        );
    }

    #[test]
    fn test_lf_familial_relationship() {
        let lf = lf_familial_relationship();

        assert_eq!(
            Label::Negative,
            lf.label(&candidate("Alice , sister of Bob", (0, 0), (4, 4)))
        );
        assert_eq!(
            Label::Negative,
            lf.label(&candidate("Alice , mother-in-law of Bob", (0, 0), (4, 4)))
        );
        assert_eq!(
            Label::Abstain,
            lf.label(&candidate("Alice , wife of Bob", (0, 0), (4, 4)))
        );
    }

    #[test]
    fn test_lf_other_relationship() {
        let lf = lf_other_relationship();

        assert_eq!(
            Label::Negative,
            lf.label(&candidate("Alice , the boss of Bob", (0, 0), (5, 5)))
        );
        assert_eq!(
            Label::Abstain,
            lf.label(&candidate("Alice , the wife of Bob", (0, 0), (5, 5)))
        );
    }

    #[test]
    fn test_lf_husband_wife_left_window() {
        let lf = lf_husband_wife_left_window();

        assert_eq!(
            Label::Positive,
            lf.label(&candidate("his wife Alice met Bob", (2, 2), (4, 4)))
        );
        assert_eq!(
            Label::Positive,
            lf.label(&candidate("Alice and her husband Bob", (0, 0), (4, 4)))
        );
        assert_eq!(
            Label::Abstain,
            lf.label(&candidate("a wife is here , then Alice met Bob", (6, 6), (8, 8)))
        );
    }

    #[test]
    fn test_lf_family_left_window() {
        let lf = lf_family_left_window();

        assert_eq!(
            Label::Negative,
            lf.label(&candidate("her brother-in-law Bob met Alice", (2, 2), (4, 4)))
        );
        assert_eq!(
            Label::Abstain,
            lf.label(&candidate("Bob met Alice", (0, 0), (2, 2)))
        );
    }

    #[test]
    fn test_lf_same_last_name() {
        let lf = lf_same_last_name();

        assert_eq!(
            Label::Positive,
            lf.label(&candidate("Carol Smith and Dan Smith", (0, 1), (3, 4)))
        );
        assert_eq!(
            Label::Abstain,
            lf.label(&candidate("Carol Smith and Carol Smith", (0, 1), (3, 4)))
        );
        assert_eq!(
            Label::Abstain,
            lf.label(&candidate("Carol Smith and Smith", (0, 1), (3, 3)))
        );
        assert_eq!(
            Label::Abstain,
            lf.label(&candidate("Carol Smith and Dan Jones", (0, 1), (3, 4)))
        );
    }

    #[test]
    fn test_votes_are_valid() {
        let candidates = [
            candidate("Alice married Bob", (0, 0), (2, 2)),
            candidate("Bob and Alice", (2, 2), (0, 0)),
            candidate("Alice Bob", (0, 0), (1, 1)),
            candidate("Alice", (0, 0), (0, 0)),
        ];
        for lf in all_lfs() {
            for c in &candidates {
                assert!(matches!(lf.label(c).as_i8(), -1..=1));
            }
        }
    }

    #[test]
    fn test_default_lfs_order() {
        let names: Vec<_> = default_lfs().iter().map(|lf| lf.name().to_string()).collect();

        assert_eq!(DEFAULT_LF_NAMES.to_vec(), names);
        assert_eq!(7, all_lfs().len());
        assert!(lf_by_name("lf_unknown").is_none());
    }
}
