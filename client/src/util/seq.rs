//! Monotonic request tagging for stale-response suppression.
//!
//! Network calls are never aborted once issued. Each call is tagged with the
//! value returned by [`RequestSeq::issue`]; when it resolves, the owner applies
//! the response only if [`RequestSeq::is_latest`] still holds.

#[cfg(test)]
#[path = "seq_test.rs"]
mod seq_test;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestSeq {
    latest: u64,
}

impl RequestSeq {
    /// Tag a new request. Every previously issued tag becomes stale.
    pub fn issue(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// Mark all in-flight requests stale without issuing a new one.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    #[must_use]
    pub fn is_latest(&self, seq: u64) -> bool {
        seq == self.latest
    }

    #[must_use]
    pub fn latest(&self) -> u64 {
        self.latest
    }
}
