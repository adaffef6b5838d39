use conjugal::{Candidate, Preprocessor};

/// Extracts the tokens immediately preceding each mention.
///
/// Fills `person1_left_tokens` and `person2_left_tokens`. Windows are truncated at the start of
/// the sentence.
pub struct GetLeftTokens {
    window: usize,
}

impl GetLeftTokens {
    /// Creates a new GetLeftTokens.
    ///
    /// # Arguments
    ///
    /// * `window` - The number of tokens to take.
    pub const fn new(window: usize) -> Self {
        Self { window }
    }
}

impl Default for GetLeftTokens {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Preprocessor for GetLeftTokens {
    fn preprocess(&self, candidate: &mut Candidate) {
        let left = |start: usize| {
            candidate.tokens()[start.saturating_sub(self.window)..start].to_vec()
        };
        let person1_left = left(candidate.person1().start);
        let person2_left = left(candidate.person2().start);
        candidate.person1_left_tokens = Some(person1_left);
        candidate.person2_left_tokens = Some(person2_left);
    }
}
