use conjugal::{Candidate, Preprocessor};

use crate::preprocessors::GetPersonText;

/// Extracts the last names of both mentions into `person_lastnames`, and their surface text
/// into `person_names`.
///
/// A single-token mention has no last name.
pub struct GetPersonLastNames;

impl Preprocessor for GetPersonLastNames {
    fn preprocess(&self, candidate: &mut Candidate) {
        GetPersonText.preprocess(candidate);
        let last_name = |tokens: &[String]| {
            if tokens.len() > 1 {
                tokens.last().cloned()
            } else {
                None
            }
        };
        candidate.person_lastnames = Some([
            last_name(candidate.person1_tokens()),
            last_name(candidate.person2_tokens()),
        ]);
    }
}
