use crate::error::{SetupError, TransferError};

/// Terminal state of one request.
#[derive(Debug)]
pub enum RequestOutcome {
    Completed { bytes: u64 },
    SetupFailed(SetupError),
    TransferFailed(TransferError),
}

impl RequestOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RequestOutcome::Completed { .. })
    }
}

/// Per-request outcomes of one `drain_all`, in processing order.
#[derive(Debug, Default)]
pub struct DrainReport {
    pub entries: Vec<(String, RequestOutcome)>,
}

impl DrainReport {
    pub(super) fn push(&mut self, filename: &str, outcome: RequestOutcome) {
        self.entries.push((filename.to_owned(), outcome));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn completed(&self) -> usize {
        self.count(|o| o.is_completed())
    }

    pub fn setup_failed(&self) -> usize {
        self.count(|o| matches!(o, RequestOutcome::SetupFailed(_)))
    }

    pub fn transfer_failed(&self) -> usize {
        self.count(|o| matches!(o, RequestOutcome::TransferFailed(_)))
    }

    /// True if nothing failed (an empty drain counts as success).
    pub fn all_completed(&self) -> bool {
        self.completed() == self.entries.len()
    }

    fn count(&self, f: impl Fn(&RequestOutcome) -> bool) -> usize {
        self.entries.iter().filter(|(_, o)| f(o)).count()
    }
}
