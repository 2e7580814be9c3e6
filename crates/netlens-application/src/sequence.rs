//! Request tagging for out-of-order suppression.

/// Monotonic request counter of one fetch site.
///
/// Every request gets the next number. A response is applied only if its
/// number is above the highest one applied so far; `invalidate` makes every
/// request still in flight stale.
#[derive(Debug, Default)]
pub(crate) struct RequestSequence {
    issued: u64,
    applied: u64,
}

impl RequestSequence {
    pub(crate) fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    /// Returns whether the response tagged `seq` may be applied, and records
    /// it as applied if so.
    pub(crate) fn accept(&mut self, seq: u64) -> bool {
        if seq <= self.applied {
            return false;
        }
        self.applied = seq;
        true
    }

    /// Whether a request newer than `seq` is still outstanding.
    pub(crate) fn has_newer(&self, seq: u64) -> bool {
        seq < self.issued
    }

    pub(crate) fn invalidate(&mut self) {
        self.applied = self.issued;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_older_response_after_newer_is_rejected() {
        let mut seq = RequestSequence::default();
        let a = seq.issue();
        let b = seq.issue();
        assert!(seq.accept(b));
        assert!(!seq.accept(a));
    }

    #[test]
    fn test_in_order_responses_are_accepted() {
        let mut seq = RequestSequence::default();
        let a = seq.issue();
        let b = seq.issue();
        assert!(seq.accept(a));
        assert!(seq.has_newer(a));
        assert!(seq.accept(b));
        assert!(!seq.has_newer(b));
    }

    #[test]
    fn test_invalidate_drops_in_flight() {
        let mut seq = RequestSequence::default();
        let a = seq.issue();
        seq.invalidate();
        assert!(!seq.accept(a));
        let b = seq.issue();
        assert!(seq.accept(b));
    }
}
