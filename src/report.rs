use std::fmt;

/// Outcome of one workflow run, reported back in the Lambda response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub workflow: &'static str,
    /// Games (or teams) the run acted on successfully.
    pub done: usize,
    /// Candidates skipped without an error (e.g. no live snapshot).
    pub skipped: usize,
    /// Candidates whose remote call failed; left for the next run.
    pub failed: usize,
    pub ledger_written: bool,
    /// Set when the final ledger write failed.
    pub ledger_error: Option<String>,
}

impl RunSummary {
    pub fn new(workflow: &'static str) -> Self {
        Self { workflow, ..Self::default() }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} done, {} skipped, {} failed",
            self.workflow, self.done, self.skipped, self.failed
        )?;
        match (&self.ledger_error, self.ledger_written) {
            (Some(e), _) => write!(f, ", ledger write failed ({})", e),
            (None, true) => write!(f, ", ledger updated"),
            (None, false) => Ok(()),
        }
    }
}
