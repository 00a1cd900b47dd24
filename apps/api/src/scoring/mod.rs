//! ATS scoring: lexical overlap between a job description and resume text.

pub mod ats;

pub use ats::ScoreComparison;
