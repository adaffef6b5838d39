use conjugal::{Candidate, Preprocessor};

/// Extracts the text strictly between the end of person 1 and the start of person 2.
///
/// Fills `text_between` and `between_tokens`. When person 2 does not start after person 1
/// ends, both are empty.
pub struct GetTextBetween;

impl Preprocessor for GetTextBetween {
    fn preprocess(&self, candidate: &mut Candidate) {
        let start = candidate.person1().end + 1;
        let end = candidate.person2().start;
        let between = if start < end {
            candidate.tokens()[start..end].to_vec()
        } else {
            vec![]
        };
        candidate.text_between = Some(between.join(" "));
        candidate.between_tokens = Some(between);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use conjugal::Span;

    #[test]
    fn test_text_between() {
        let mut c = Candidate::from_tokenized(
            "Alice and Bob married last year",
            Span::new(0, 0),
            Span::new(2, 2),
        )
        .unwrap();
        GetTextBetween.preprocess(&mut c);

        assert_eq!(Some("and"), c.text_between.as_deref());
        assert_eq!(["and".to_string()], c.between_tokens());
    }

    #[test]
    fn test_text_between_multi_token() {
        let mut c = Candidate::from_tokenized(
            "Carol Smith , wife of Dan Jones",
            Span::new(0, 1),
            Span::new(5, 6),
        )
        .unwrap();
        GetTextBetween.preprocess(&mut c);

        assert_eq!(Some(", wife of"), c.text_between.as_deref());
        assert_eq!(3, c.between_tokens().len());
    }

    #[test]
    fn test_text_between_adjacent() {
        let mut c =
            Candidate::from_tokenized("Alice Bob met", Span::new(0, 0), Span::new(1, 1)).unwrap();
        GetTextBetween.preprocess(&mut c);

        assert_eq!(Some(""), c.text_between.as_deref());
        assert!(c.between_tokens().is_empty());
    }

    #[test]
    fn test_text_between_reversed_mentions() {
        let mut c = Candidate::from_tokenized(
            "Bob and Alice married",
            Span::new(2, 2),
            Span::new(0, 0),
        )
        .unwrap();
        GetTextBetween.preprocess(&mut c);

        assert_eq!(Some(""), c.text_between.as_deref());
    }

    #[test]
    fn test_text_between_overlapping_mentions() {
        let mut c = Candidate::from_tokenized(
            "Mary Ann Lee spoke",
            Span::new(0, 2),
            Span::new(1, 2),
        )
        .unwrap();
        GetTextBetween.preprocess(&mut c);

        assert!(c.between_tokens().is_empty());
    }
}
