//! Turning solver answers into displayable results

pub mod outcome;
pub mod session;

pub use outcome::{interpret, Interpretation, Kind, Outcome, NO_ANSWER};
pub use session::{Resolved, SubmissionId, SubmissionTracker};
