//! Lookup-scoped state.
//!
//! Every rule invocation receives a `&mut LookupContext`. It owns the only
//! mutable state of the engine:
//!
//! ```text
//! claims       per-chord keys already claimed as folds by enclosing rules
//! unmatched    outline -> rules known not to match it (memo)
//! in_flight    (outline, rule) pairs currently being evaluated
//! shorter      outline -> "a shorter suffix already translates" (cache)
//! ```
//!
//! `claims` and `in_flight` are acquired through guards ([`ClaimScope`],
//! [`InFlight`]) that restore the previous state when dropped, so every exit
//! path of a nested rule (match, exhaustion or unwinding) leaves the context
//! as it found it. The memo and the shorter-outline cache survive between
//! lookups and are cleared by [`LookupContext::on_stroke`].

use super::metrics::LookupStats;
use super::rule::RuleId;
use crate::chord::{Chord, Outline};
use std::collections::{HashMap, HashSet};
use std::ops::{Deref, DerefMut};

/// Mutable state threaded through one lookup (and the lookups it triggers).
///
/// Two concurrent lookups must use two contexts.
#[derive(Debug, Default)]
pub struct LookupContext {
    claims: Vec<Chord>,
    unmatched: HashMap<Outline, HashSet<RuleId>>,
    in_flight: HashSet<(Outline, RuleId)>,
    shorter_outlines: HashMap<Outline, bool>,
    checking_shorter_outlines: bool,
    stats: LookupStats,
}

impl LookupContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Per-entry reset hook: call once per committed chord.
    ///
    /// Clears the unmatched-rule memo and the shorter-outline cache. Fold
    /// claims and in-flight markers are scoped and already empty here.
    pub fn on_stroke(&mut self) {
        tracing::trace!(memo = self.unmatched.len(), shorter = self.shorter_outlines.len(), "clearing lookup memo");
        self.unmatched.clear();
        self.shorter_outlines.clear();
    }

    /// Keys currently claimed as folds, per chord position.
    pub fn claims(&self) -> &[Chord] {
        &self.claims
    }

    pub fn stats(&self) -> &LookupStats {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut LookupStats {
        &mut self.stats
    }

    /// Claim `folds` for the lifetime of the returned scope.
    ///
    /// Returns `None` (and counts the skip) when any fold overlaps a key already
    /// claimed at the same chord position. Positions beyond either table are
    /// unclaimed.
    pub fn try_claim(&mut self, folds: &Outline) -> Option<ClaimScope<'_>> {
        let overlap = self.claims.iter().zip(folds.iter()).any(|(claimed, fold)| claimed.overlaps(fold));
        if overlap {
            self.stats.overlaps_skipped += 1;
            return None;
        }

        let previous = self.claims.clone();
        let len = previous.len().max(folds.len());
        self.claims = (0..len)
            .map(|i| previous.get(i).copied().unwrap_or_default() + folds.get(i).unwrap_or_default())
            .collect();

        Some(ClaimScope { context: self, previous })
    }

    /// Re-index the claim table for a nested lookup of a derived outline.
    ///
    /// Chord `i` of the nested outline takes the claims held at
    /// `positions[i]`; `None` marks a chord with no folded counterpart and
    /// starts unclaimed. The previous table is restored when the scope drops.
    pub fn realign_claims(&mut self, positions: &[Option<usize>]) -> ClaimScope<'_> {
        let previous = std::mem::take(&mut self.claims);
        self.claims = positions
            .iter()
            .map(|position| position.and_then(|i| previous.get(i).copied()).unwrap_or_default())
            .collect();

        ClaimScope { context: self, previous }
    }

    /// Mark `(outline, rule)` as in flight for the lifetime of the guard.
    ///
    /// Returns `None` if the pair is already being evaluated further up the
    /// call tree.
    pub fn enter(&mut self, outline: &Outline, rule: RuleId) -> Option<InFlight<'_>> {
        let key = (outline.clone(), rule);
        if !self.in_flight.insert(key.clone()) {
            self.stats.reentries_denied += 1;
            return None;
        }
        Some(InFlight { context: self, key })
    }

    pub fn is_unmatched(&self, outline: &Outline, rule: RuleId) -> bool {
        self.unmatched.get(outline).is_some_and(|rules| rules.contains(&rule))
    }

    pub fn mark_unmatched(&mut self, outline: &Outline, rule: RuleId) {
        self.unmatched.entry(outline.clone()).or_default().insert(rule);
    }

    /// Copy the rules known not to match `from` onto `to`.
    ///
    /// Removing folds never makes a rule that already failed start matching.
    pub fn propagate_unmatched(&mut self, from: &Outline, to: &Outline) {
        let Some(known) = self.unmatched.get(from).cloned() else {
            return;
        };
        self.unmatched.entry(to.clone()).or_default().extend(known);
    }

    pub(crate) fn shorter_outline_found(&self, outline: &Outline) -> Option<bool> {
        self.shorter_outlines.get(outline).copied()
    }

    pub(crate) fn record_shorter_outline(&mut self, outline: &Outline, found: bool) {
        self.shorter_outlines.insert(outline.clone(), found);
    }

    pub(crate) fn checking_shorter_outlines(&self) -> bool {
        self.checking_shorter_outlines
    }

    /// Flag the context as running the shorter-outline check until the guard drops.
    pub(crate) fn begin_shorter_check(&mut self) -> ShorterCheck<'_> {
        self.checking_shorter_outlines = true;
        ShorterCheck { context: self }
    }
}

/// Fold claims held by an enclosing rule; restores the prior table on drop.
#[derive(Debug)]
pub struct ClaimScope<'a> {
    context: &'a mut LookupContext,
    previous: Vec<Chord>,
}

impl Deref for ClaimScope<'_> {
    type Target = LookupContext;

    fn deref(&self) -> &LookupContext {
        self.context
    }
}

impl DerefMut for ClaimScope<'_> {
    fn deref_mut(&mut self) -> &mut LookupContext {
        self.context
    }
}

impl Drop for ClaimScope<'_> {
    fn drop(&mut self) {
        self.context.claims = std::mem::take(&mut self.previous);
    }
}

/// An `(outline, rule)` pair under evaluation; unmarked on drop.
#[derive(Debug)]
pub struct InFlight<'a> {
    context: &'a mut LookupContext,
    key: (Outline, RuleId),
}

impl Deref for InFlight<'_> {
    type Target = LookupContext;

    fn deref(&self) -> &LookupContext {
        self.context
    }
}

impl DerefMut for InFlight<'_> {
    fn deref_mut(&mut self) -> &mut LookupContext {
        self.context
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.context.in_flight.remove(&self.key);
    }
}

/// Shorter-outline check in progress; clears the flag on drop.
#[derive(Debug)]
pub(crate) struct ShorterCheck<'a> {
    context: &'a mut LookupContext,
}

impl Deref for ShorterCheck<'_> {
    type Target = LookupContext;

    fn deref(&self) -> &LookupContext {
        self.context
    }
}

impl DerefMut for ShorterCheck<'_> {
    fn deref_mut(&mut self) -> &mut LookupContext {
        self.context
    }
}

impl Drop for ShorterCheck<'_> {
    fn drop(&mut self) {
        self.context.checking_shorter_outlines = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline(steno: &str) -> Outline {
        Outline::from_steno(steno).unwrap()
    }

    #[test]
    fn claims_merge_and_restore() {
        let mut context = LookupContext::new();
        {
            let mut outer = context.try_claim(&outline("-Z/-D")).unwrap();
            assert_eq!(outer.claims(), outline("-Z/-D").chords());

            assert!(outer.try_claim(&outline("/-D")).is_none());
            {
                let inner = outer.try_claim(&outline("*/-G")).unwrap();
                assert_eq!(inner.claims(), outline("*Z/-GD").chords());
            }
            assert_eq!(outer.claims(), outline("-Z/-D").chords());
        }
        assert!(context.claims().is_empty());
    }

    #[test]
    fn claims_compare_over_common_positions() {
        let mut context = LookupContext::new();
        let outer = context.try_claim(&outline("-Z")).unwrap();
        drop(outer);

        let mut outer = context.try_claim(&outline("-Z")).unwrap();
        let inner = outer.try_claim(&outline("-D/-Z")).unwrap();
        assert_eq!(inner.claims(), outline("-DZ/-Z").chords());
    }

    #[test]
    fn realigned_claims_follow_kept_positions() {
        let mut context = LookupContext::new();
        let mut outer = context.try_claim(&outline("S/*")).unwrap();
        {
            let nested = outer.realign_claims(&[Some(1)]);
            assert_eq!(nested.claims(), outline("*").chords());
        }
        {
            let nested = outer.realign_claims(&[None, Some(0), Some(4)]);
            assert_eq!(nested.claims(), outline("/S/").chords());
        }
        assert_eq!(outer.claims(), outline("S/*").chords());
    }

    #[test]
    fn in_flight_denies_reentry_until_dropped() {
        let mut context = LookupContext::new();
        let o = outline("KAT");
        let rule = RuleId::fresh();
        {
            let mut flight = context.enter(&o, rule).unwrap();
            assert!(flight.enter(&o, rule).is_none());
            assert!(flight.enter(&o, RuleId::fresh()).is_some());
        }
        assert!(context.enter(&o, rule).is_some());
    }

    #[test]
    fn memo_propagates_and_clears_on_stroke() {
        let mut context = LookupContext::new();
        let rule = RuleId::fresh();
        context.mark_unmatched(&outline("KATZ"), rule);
        context.propagate_unmatched(&outline("KATZ"), &outline("KAT"));
        assert!(context.is_unmatched(&outline("KAT"), rule));

        context.record_shorter_outline(&outline("KAT"), true);
        context.on_stroke();
        assert!(!context.is_unmatched(&outline("KATZ"), rule));
        assert_eq!(context.shorter_outline_found(&outline("KAT")), None);
    }
}
