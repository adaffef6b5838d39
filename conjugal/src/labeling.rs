//! Labeling function registration.

use crate::candidate::Candidate;
use crate::label::Label;

/// Derives auxiliary fields of a candidate before a labeling function reads it.
pub trait Preprocessor {
    /// Fills derived fields of `candidate`.
    ///
    /// # Arguments:
    ///
    /// * `candidate` - A candidate to be updated in place.
    fn preprocess(&self, candidate: &mut Candidate);
}

/// Heuristic that votes on a candidate.
pub trait LabelingFunction {
    /// Name used in summaries and stored in trained models.
    fn name(&self) -> &str;

    /// Votes on a candidate.
    ///
    /// # Arguments:
    ///
    /// * `candidate` - A candidate.
    ///
    /// # Returns
    ///
    /// A vote. Implementations must not panic on candidates accepted by [`Candidate::new`].
    fn label(&self, candidate: &Candidate) -> Label;
}

/// Labeling function built from a plain function, its static resources, and a chain of
/// preprocessors.
///
/// # Examples
///
/// ```
/// use conjugal::{Candidate, Label, LabelingFunction, Lf, Span};
///
/// fn long_sentence(x: &Candidate, min_len: &usize) -> Label {
///     if x.tokens().len() >= *min_len {
///         Label::Negative
///     } else {
///         Label::Abstain
///     }
/// }
///
/// let lf = Lf::new("lf_long_sentence", 5, long_sentence);
/// let c = Candidate::from_tokenized("Alice met Bob", Span::new(0, 0), Span::new(2, 2)).unwrap();
/// assert_eq!(Label::Abstain, lf.label(&c));
/// ```
pub struct Lf<R> {
    name: String,
    resources: R,
    pre: Vec<Box<dyn Preprocessor>>,
    body: fn(&Candidate, &R) -> Label,
}

impl<R> Lf<R> {
    /// Creates a new labeling function without preprocessors.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the labeling function.
    /// * `resources` - Static data passed to every call of `body`.
    /// * `body` - The heuristic.
    pub fn new<S>(name: S, resources: R, body: fn(&Candidate, &R) -> Label) -> Self
    where
        S: Into<String>,
    {
        Self {
            name: name.into(),
            resources,
            pre: vec![],
            body,
        }
    }

    /// Appends a preprocessor. Preprocessors run in insertion order.
    pub fn pre<P>(mut self, preprocessor: P) -> Self
    where
        P: Preprocessor + 'static,
    {
        self.pre.push(Box::new(preprocessor));
        self
    }

    pub fn resources(&self) -> &R {
        &self.resources
    }
}

impl<R> LabelingFunction for Lf<R> {
    fn name(&self) -> &str {
        &self.name
    }

    fn label(&self, candidate: &Candidate) -> Label {
        if self.pre.is_empty() {
            return (self.body)(candidate, &self.resources);
        }
        let mut x = candidate.clone();
        for p in &self.pre {
            p.preprocess(&mut x);
        }
        (self.body)(&x, &self.resources)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::candidate::Span;

    struct FirstToken;

    impl Preprocessor for FirstToken {
        fn preprocess(&self, candidate: &mut Candidate) {
            candidate.between_tokens = Some(candidate.tokens()[..1].to_vec());
        }
    }

    fn first_is(x: &Candidate, word: &&'static str) -> Label {
        if x.between_tokens().iter().any(|t| t == word) {
            Label::Positive
        } else {
            Label::Abstain
        }
    }

    #[test]
    fn test_lf_runs_preprocessors_on_copy() {
        let lf = Lf::new("lf_first", "Alice", first_is).pre(FirstToken);
        let c = Candidate::from_tokenized("Alice met Bob", Span::new(0, 0), Span::new(2, 2))
            .unwrap();

        assert_eq!(Label::Positive, lf.label(&c));
        assert_eq!(None, c.between_tokens);
        assert_eq!("lf_first", lf.name());
        assert_eq!(&"Alice", lf.resources());
    }

    #[test]
    fn test_lf_without_preprocessors() {
        let lf = Lf::new("lf_first", "Alice", first_is);
        let c = Candidate::from_tokenized("Alice met Bob", Span::new(0, 0), Span::new(2, 2))
            .unwrap();

        assert_eq!(Label::Abstain, lf.label(&c));
    }
}
