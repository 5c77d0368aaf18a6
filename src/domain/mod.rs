//! Domain types for adloop
//!
//! - ProductInput: the product an ad is written for, fixed for a run
//! - Candidate: one generated ad plus metadata
//! - Verdict: accept/reject decision with feedback

pub mod candidate;
pub mod product;
pub mod verdict;

pub use candidate::{Candidate, ContentMetadata, char_length};
pub use product::ProductInput;
pub use verdict::{Verdict, VerdictSource};
