use crate::errors::{ConjugalError, Result};

/// Token span of a mention. Both ends are inclusive word indices.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of tokens covered by the span.
    pub const fn n_tokens(&self) -> usize {
        self.end - self.start + 1
    }
}

/// A sentence paired with two person mentions.
///
/// The fields after the mention spans are filled by preprocessors. A loaded candidate is never
/// mutated while labeling; each labeling function works on its own copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub(crate) sentence: String,
    pub(crate) tokens: Vec<String>,
    pub(crate) person1: Span,
    pub(crate) person2: Span,

    /// Text strictly between the two mentions, joined by spaces.
    pub text_between: Option<String>,

    /// Tokens strictly between the two mentions.
    pub between_tokens: Option<Vec<String>>,

    /// Tokens in the window to the left of person 1.
    pub person1_left_tokens: Option<Vec<String>>,

    /// Tokens in the window to the left of person 2.
    pub person2_left_tokens: Option<Vec<String>>,

    /// Surface strings of both mentions.
    pub person_names: Option<[String; 2]>,

    /// Last names of both mentions. `None` for single-token mentions.
    pub person_lastnames: Option<[Option<String>; 2]>,
}

impl Candidate {
    /// Creates a new [`Candidate`].
    ///
    /// # Arguments
    ///
    /// * `sentence` - The raw sentence.
    /// * `tokens` - The tokenized sentence.
    /// * `person1` - Span of the first mention.
    /// * `person2` - Span of the second mention.
    ///
    /// # Errors
    ///
    /// If `tokens` is empty or a span is reversed or outside the token sequence, an error variant
    /// will be returned.
    pub fn new<S>(sentence: S, tokens: Vec<String>, person1: Span, person2: Span) -> Result<Self>
    where
        S: Into<String>,
    {
        if tokens.is_empty() {
            return Err(ConjugalError::invalid_argument("tokens", "is empty"));
        }
        for (arg, span) in [("person1", person1), ("person2", person2)] {
            if span.start > span.end {
                return Err(ConjugalError::invalid_argument(
                    arg,
                    format!("span ({}, {}) is reversed", span.start, span.end),
                ));
            }
            if span.end >= tokens.len() {
                return Err(ConjugalError::invalid_argument(
                    arg,
                    format!(
                        "span ({}, {}) exceeds {} tokens",
                        span.start,
                        span.end,
                        tokens.len()
                    ),
                ));
            }
        }
        Ok(Self {
            sentence: sentence.into(),
            tokens,
            person1,
            person2,
            text_between: None,
            between_tokens: None,
            person1_left_tokens: None,
            person2_left_tokens: None,
            person_names: None,
            person_lastnames: None,
        })
    }

    /// Creates a candidate from a space separated token string.
    ///
    /// The raw sentence is the token string itself.
    ///
    /// # Errors
    ///
    /// See [`Candidate::new`].
    pub fn from_tokenized<S>(tokenized: S, person1: Span, person2: Span) -> Result<Self>
    where
        S: AsRef<str>,
    {
        let tokenized = tokenized.as_ref();
        let tokens = tokenized.split_whitespace().map(String::from).collect();
        Self::new(tokenized, tokens, person1, person2)
    }

    pub fn sentence(&self) -> &str {
        &self.sentence
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub const fn person1(&self) -> Span {
        self.person1
    }

    pub const fn person2(&self) -> Span {
        self.person2
    }

    /// Tokens of the first mention.
    pub fn person1_tokens(&self) -> &[String] {
        &self.tokens[self.person1.start..=self.person1.end]
    }

    /// Tokens of the second mention.
    pub fn person2_tokens(&self) -> &[String] {
        &self.tokens[self.person2.start..=self.person2.end]
    }

    /// Derived between-mention tokens, empty until a preprocessor fills them.
    pub fn between_tokens(&self) -> &[String] {
        self.between_tokens.as_deref().unwrap_or(&[])
    }

    /// Derived left window of person 1, empty until a preprocessor fills it.
    pub fn person1_left_tokens(&self) -> &[String] {
        self.person1_left_tokens.as_deref().unwrap_or(&[])
    }

    /// Derived left window of person 2, empty until a preprocessor fills it.
    pub fn person2_left_tokens(&self) -> &[String] {
        self.person2_left_tokens.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_from_tokenized() {
        let c = Candidate::from_tokenized(
            "Alice and Bob married last year",
            Span::new(0, 0),
            Span::new(2, 2),
        )
        .unwrap();

        assert_eq!(6, c.tokens().len());
        assert_eq!(["Alice".to_string()], c.person1_tokens());
        assert_eq!(["Bob".to_string()], c.person2_tokens());
        assert!(c.between_tokens().is_empty());
        assert_eq!(None, c.text_between);
    }

    #[test]
    fn test_candidate_empty_tokens() {
        let c = Candidate::new("", vec![], Span::new(0, 0), Span::new(0, 0));

        assert_eq!("InvalidArgumentError: tokens: is empty", &c.unwrap_err().to_string());
    }

    #[test]
    fn test_candidate_reversed_span() {
        let c = Candidate::from_tokenized("a b c", Span::new(2, 1), Span::new(0, 0));

        assert_eq!(
            "InvalidArgumentError: person1: span (2, 1) is reversed",
            &c.unwrap_err().to_string()
        );
    }

    #[test]
    fn test_candidate_span_out_of_range() {
        let c = Candidate::from_tokenized("a b c", Span::new(0, 0), Span::new(2, 3));

        assert_eq!(
            "InvalidArgumentError: person2: span (2, 3) exceeds 3 tokens",
            &c.unwrap_err().to_string()
        );
    }

    #[test]
    fn test_span_n_tokens() {
        assert_eq!(1, Span::new(4, 4).n_tokens());
        assert_eq!(3, Span::new(2, 4).n_tokens());
    }
}
