//! Lookup metrics.
//!
//! Counters collected while rules are evaluated, useful for checking why a
//! fold did or did not fire. They live in the [`LookupContext`] and are cheap
//! enough to be collected unconditionally.
//!
//! The intended usage is:
//!
//! - `FoldingDictionary::get` for normal operation.
//! - `FoldingDictionary::get_verbose` for debugging: returns the counters for
//!   one lookup together with the elapsed time.
//!
//! [`LookupContext`]: crate::LookupContext

use std::time::Duration;

/// Counters accumulated over the rule evaluations of a lookup.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LookupStats {
    /// Rule invocations, including nested additional/alternative rules.
    pub rule_attempts: usize,
    /// `(defolded, folds)` pairs pulled from prerequisites.
    pub candidates: usize,
    /// Candidates skipped because their folds overlap an enclosing claim.
    pub overlaps_skipped: usize,
    /// Rule invocations short-circuited by the unmatched-rule memo.
    pub memo_hits: usize,
    /// Rule invocations denied because the same `(outline, rule)` was in flight.
    pub reentries_denied: usize,
    /// Lookup strategies evaluated.
    pub strategy_calls: usize,
    /// Rule invocations suppressed because a shorter outline already matched.
    pub shorter_outline_suppressions: usize,
}

impl LookupStats {
    /// Counters accumulated since `earlier` was captured.
    pub fn since(&self, earlier: &LookupStats) -> LookupStats {
        LookupStats {
            rule_attempts: self.rule_attempts.saturating_sub(earlier.rule_attempts),
            candidates: self.candidates.saturating_sub(earlier.candidates),
            overlaps_skipped: self.overlaps_skipped.saturating_sub(earlier.overlaps_skipped),
            memo_hits: self.memo_hits.saturating_sub(earlier.memo_hits),
            reentries_denied: self.reentries_denied.saturating_sub(earlier.reentries_denied),
            strategy_calls: self.strategy_calls.saturating_sub(earlier.strategy_calls),
            shorter_outline_suppressions: self.shorter_outline_suppressions.saturating_sub(earlier.shorter_outline_suppressions),
        }
    }
}

/// A folding-dictionary lookup bundled with its counters and timing.
#[derive(Debug, Clone)]
pub struct LookupReport {
    /// Translation produced by the first matching rule, if any.
    pub translation: Option<String>,
    /// Name of the rule that produced the translation.
    pub rule: Option<String>,
    /// Whether a strictly shorter outline already had a host translation.
    pub shorter_outline_found: bool,
    /// Counters for this lookup only.
    pub stats: LookupStats,
    /// Total elapsed time.
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_counts_the_difference_and_never_underflows() {
        let earlier = LookupStats { rule_attempts: 2, memo_hits: 1, ..LookupStats::default() };
        let later = LookupStats { rule_attempts: 5, memo_hits: 1, candidates: 3, ..LookupStats::default() };

        let delta = later.since(&earlier);
        assert_eq!(delta.rule_attempts, 3);
        assert_eq!(delta.candidates, 3);
        assert_eq!(delta.memo_hits, 0);

        assert_eq!(earlier.since(&later), LookupStats::default());
    }
}
