//! QA check suite
//!
//! Smoke and API checks run against either backend, concurrently, and are
//! summarized into a report and an exit status.

pub mod assertions;
pub mod checks;
pub mod data;
pub mod report;
pub mod runner;

pub use assertions::{Assertion, AssertionResult};
pub use checks::{run_check, CheckContext, CheckId, Project, ProjectFilter, Verdict};
pub use report::SuiteReport;
pub use runner::{CheckOutcome, CheckState, SuiteRunner};
