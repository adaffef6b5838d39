use conjugal::{Candidate, Preprocessor};

/// Extracts the surface text of both mentions into `person_names`.
pub struct GetPersonText;

impl Preprocessor for GetPersonText {
    fn preprocess(&self, candidate: &mut Candidate) {
        candidate.person_names = Some([
            candidate.person1_tokens().join(" "),
            candidate.person2_tokens().join(" "),
        ]);
    }
}
