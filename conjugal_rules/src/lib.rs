//! Labeling functions and preprocessors for spouse relation extraction.
//!
//! ## Examples
//!
//! ```
//! use conjugal::{Candidate, LfApplier, Span};
//! use conjugal_rules::default_lfs;
//!
//! let c = Candidate::from_tokenized(
//!     "Alice and her husband Bob married in 2001",
//!     Span::new(0, 0),
//!     Span::new(4, 4),
//! )
//! .unwrap();
//! let applier = LfApplier::new(default_lfs()).unwrap();
//! let l = applier.apply(&[c]);
//! assert_eq!(vec![1, 1, -1, -1, -1], l.row(0).to_vec());
//! ```

pub mod labeling_functions;
pub mod preprocessors;
pub mod resources;

pub use labeling_functions::{
    all_lfs, default_lfs, lf_by_name, ALL_LF_NAMES, DEFAULT_LF_NAMES,
};
