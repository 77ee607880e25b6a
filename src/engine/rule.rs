//! Rule dispatch.
//!
//! A [`Rule`] ties a [`Prerequisite`] to the ways a translation can be
//! produced once folds are removed:
//!
//! ```text
//! apply(outline)
//!   ├─ first chord empty?                   -> None
//!   ├─ shorter outline matched, no prefer?  -> None
//!   ├─ (outline, rule) known unmatched?     -> None
//!   ├─ (outline, rule) already in flight?   -> None
//!   └─ for (defolded, folds) in prerequisite:
//!        ├─ folds overlap enclosing claims? -> next pair
//!        ├─ additional rules  (defolded)    -> first Some wins
//!        ├─ lookup strategies (defolded)    -> first Some wins
//!        ├─ alternative rules (defolded)    -> first Some wins
//!        └─ remember (defolded, rule) as unmatched
//!      remember (outline, rule) as unmatched -> None
//! ```
//!
//! Rules are immutable and cheap to clone. `unless_also`, `or_also`,
//! `preferring_folds` and `named` return new rules with fresh identities.

use super::context::LookupContext;
use super::lookup::Lookup;
use super::statement::Prerequisite;
use super::strategy::LookupStrategy;
use crate::chord::{Chord, Outline};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_RULE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a rule value, used by the memo and the reentry guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u64);

impl RuleId {
    pub(crate) fn fresh() -> Self {
        RuleId(NEXT_RULE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug)]
struct RuleInner {
    id: RuleId,
    name: String,
    prerequisite: Prerequisite,
    strategies: Vec<LookupStrategy>,
    additional: Vec<Rule>,
    alternatives: Vec<Rule>,
    prefer_folds: bool,
}

/// A folding rule. See the module documentation for the dispatch order.
#[derive(Clone)]
pub struct Rule(Arc<RuleInner>);

impl Rule {
    pub fn new(prerequisite: Prerequisite, strategies: Vec<LookupStrategy>) -> Self {
        let id = RuleId::fresh();
        Rule(Arc::new(RuleInner {
            id,
            name: format!("rule{id}"),
            prerequisite,
            strategies,
            additional: Vec::new(),
            alternatives: Vec::new(),
            prefer_folds: false,
        }))
    }

    fn rebuild(&self, edit: impl FnOnce(&mut RuleInner)) -> Rule {
        let mut inner = RuleInner {
            id: RuleId::fresh(),
            name: self.0.name.clone(),
            prerequisite: self.0.prerequisite.clone(),
            strategies: self.0.strategies.clone(),
            additional: self.0.additional.clone(),
            alternatives: self.0.alternatives.clone(),
            prefer_folds: self.0.prefer_folds,
        };
        edit(&mut inner);
        Rule(Arc::new(inner))
    }

    /// A copy of this rule that first tries `rules` on the defolded outline.
    ///
    /// A translation from an additional rule replaces this rule's own result.
    pub fn unless_also(&self, rules: impl IntoIterator<Item = Rule>) -> Rule {
        self.rebuild(|inner| inner.additional.extend(rules))
    }

    /// A copy of this rule that falls back to `rules` when its strategies fail.
    pub fn or_also(&self, rules: impl IntoIterator<Item = Rule>) -> Rule {
        self.rebuild(|inner| inner.alternatives.extend(rules))
    }

    /// A copy of this rule that still applies when a shorter outline matches.
    pub fn preferring_folds(&self) -> Rule {
        self.rebuild(|inner| inner.prefer_folds = true)
    }

    /// A copy of this rule with a name used in logs and reports.
    pub fn named(&self, name: impl Into<String>) -> Rule {
        let name = name.into();
        self.rebuild(|inner| inner.name = name)
    }

    pub fn id(&self) -> RuleId {
        self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn prefers_folds(&self) -> bool {
        self.0.prefer_folds
    }

    pub fn prerequisite(&self) -> &Prerequisite {
        &self.0.prerequisite
    }

    pub fn strategies(&self) -> &[LookupStrategy] {
        &self.0.strategies
    }

    pub fn additional_rules(&self) -> &[Rule] {
        &self.0.additional
    }

    pub fn alternative_rules(&self) -> &[Rule] {
        &self.0.alternatives
    }

    /// Try to translate `outline` by removing folds.
    ///
    /// `shorter_outline_found` tells the rule that a strictly shorter suffix of
    /// the outline already has a host translation; only rules built with
    /// [`preferring_folds`](Self::preferring_folds) still apply then.
    pub fn apply(
        &self,
        outline: &Outline,
        lookup: &dyn Lookup,
        context: &mut LookupContext,
        shorter_outline_found: bool,
    ) -> Option<String> {
        let rule = &*self.0;
        context.stats_mut().rule_attempts += 1;

        if outline.first().is_none_or(Chord::is_empty) {
            return None;
        }

        if shorter_outline_found && !rule.prefer_folds {
            context.stats_mut().shorter_outline_suppressions += 1;
            tracing::trace!(rule = %rule.name, %outline, "suppressed by shorter outline");
            return None;
        }

        if context.is_unmatched(outline, rule.id) {
            context.stats_mut().memo_hits += 1;
            tracing::trace!(rule = %rule.name, %outline, "known unmatched");
            return None;
        }

        let Some(mut flight) = context.enter(outline, rule.id) else {
            tracing::trace!(rule = %rule.name, %outline, "reentry denied");
            return None;
        };

        for (defolded, folds) in rule.prerequisite.satisfied_folds(outline) {
            flight.stats_mut().candidates += 1;

            let Some(mut scope) = flight.try_claim(&folds) else {
                tracing::trace!(rule = %rule.name, %outline, %folds, "folds overlap an enclosing claim");
                continue;
            };

            // Additional and alternative rules see `defolded`; strategies look up its compact form.
            let compact = defolded.compact();
            let keys = if compact == defolded { vec![&defolded] } else { vec![&defolded, &compact] };
            for key in &keys {
                scope.propagate_unmatched(outline, key);
            }

            if let Some(translation) = self.resolve(&defolded, &folds, outline, lookup, &mut scope, shorter_outline_found)
            {
                tracing::debug!(rule = %rule.name, %outline, %defolded, %folds, %translation, "fold matched");
                return Some(translation);
            }

            for key in keys {
                scope.mark_unmatched(key, rule.id);
            }
        }

        flight.mark_unmatched(outline, rule.id);
        None
    }

    /// Additional rules, then strategies, then alternatives, for one pair.
    fn resolve(
        &self,
        defolded: &Outline,
        folds: &Outline,
        original: &Outline,
        lookup: &dyn Lookup,
        context: &mut LookupContext,
        shorter_outline_found: bool,
    ) -> Option<String> {
        for rule in &self.0.additional {
            if let Some(translation) = rule.apply(defolded, lookup, context, shorter_outline_found) {
                return Some(translation);
            }
        }

        for strategy in &self.0.strategies {
            if let Some(translation) = strategy.apply(defolded, folds, original, lookup, context) {
                tracing::trace!(rule = %self.0.name, strategy = strategy.name(), "strategy produced a translation");
                return Some(translation);
            }
        }

        for rule in &self.0.alternatives {
            if let Some(translation) = rule.apply(defolded, lookup, context, shorter_outline_found) {
                return Some(translation);
            }
        }

        None
    }
}

impl PartialEq for Rule {
    fn eq(&self, other: &Rule) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Rule {}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.0.id)
            .field("name", &self.0.name)
            .field("prerequisite", &self.0.prerequisite)
            .field("strategies", &self.0.strategies)
            .field("additional", &self.0.additional.len())
            .field("alternatives", &self.0.alternatives.len())
            .field("prefer_folds", &self.0.prefer_folds)
            .finish()
    }
}
