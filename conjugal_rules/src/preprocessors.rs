//! Preprocessors filling derived fields of [`conjugal::Candidate`].

mod left_tokens;
mod person_last_names;
mod person_text;
mod text_between;

pub use left_tokens::GetLeftTokens;
pub use person_last_names::GetPersonLastNames;
pub use person_text::GetPersonText;
pub use text_between::GetTextBetween;
