use crate::chord::Outline;
use crate::engine::{Lookup, LookupContext, LookupReport, Rule};
use crate::error::{FoldError, FoldResult};
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Instant;

static ENGLISH_RULES: Lazy<FoldResult<Vec<Rule>>> = Lazy::new(crate::rules::english::rules);

/// Options that affect how a [`FoldingDictionary`] answers lookups.
#[derive(Debug, Clone)]
pub struct Options {
    /// Outlines longer than this are never folded.
    pub longest_key: usize,
    /// Suppress folds when a strictly shorter suffix of the outline already
    /// has a translation (unless the rule prefers folds).
    pub check_shorter_outlines: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options { longest_key: 8, check_shorter_outlines: true }
    }
}

/// A dictionary whose entries are folding rules instead of stored outlines.
///
/// Rules are tried in load order and the first translation wins. Lookups go
/// through a host [`Lookup`] (usually the [`Translator`](crate::Translator)
/// holding this dictionary) and a caller-owned [`LookupContext`].
#[derive(Debug, Clone)]
pub struct FoldingDictionary {
    options: Options,
    rules: Option<Arc<[Rule]>>,
}

struct Outcome<'r> {
    matched: Option<(String, &'r Rule)>,
    shorter_outline_found: bool,
}

impl FoldingDictionary {
    /// An empty dictionary; call [`load`](Self::load) before querying it.
    pub fn new(options: Options) -> Self {
        FoldingDictionary { options, rules: None }
    }

    pub fn with_rules(options: Options, rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut dictionary = FoldingDictionary::new(options);
        dictionary.load(rules);
        dictionary
    }

    /// A dictionary loaded with the built-in English rules.
    pub fn english(options: Options) -> FoldResult<Self> {
        let rules = ENGLISH_RULES.as_ref().map_err(FoldError::clone)?;
        Ok(FoldingDictionary::with_rules(options, rules.iter().cloned()))
    }

    /// Replace the rule set.
    pub fn load(&mut self, rules: impl IntoIterator<Item = Rule>) {
        let rules: Arc<[Rule]> = rules.into_iter().collect();
        tracing::debug!(rules = rules.len(), longest_key = self.options.longest_key, "folding rules loaded");
        self.rules = Some(rules);
    }

    pub fn is_loaded(&self) -> bool {
        self.rules.is_some()
    }

    pub fn rules(&self) -> &[Rule] {
        self.rules.as_deref().unwrap_or(&[])
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn longest_key(&self) -> usize {
        self.options.longest_key
    }

    /// Translate `outline` with the first rule that matches.
    ///
    /// Returns `Ok(None)` for outlines longer than `longest_key` and while the
    /// shorter-outline check of an enclosing lookup is running.
    pub fn get(&self, outline: &Outline, lookup: &dyn Lookup, context: &mut LookupContext) -> FoldResult<Option<String>> {
        let outcome = self.run(outline, lookup, context)?;
        Ok(outcome.matched.map(|(translation, _)| translation))
    }

    /// Like [`get`](Self::get), with the matching rule, counters and timing.
    pub fn get_verbose(
        &self,
        outline: &Outline,
        lookup: &dyn Lookup,
        context: &mut LookupContext,
    ) -> FoldResult<LookupReport> {
        let before = *context.stats();
        let start = Instant::now();

        let outcome = self.run(outline, lookup, context)?;
        let elapsed = start.elapsed();
        let (translation, rule) = match outcome.matched {
            Some((translation, rule)) => (Some(translation), Some(rule.name().to_string())),
            None => (None, None),
        };

        Ok(LookupReport {
            translation,
            rule,
            shorter_outline_found: outcome.shorter_outline_found,
            stats: context.stats().since(&before),
            elapsed,
        })
    }

    fn run(&self, outline: &Outline, lookup: &dyn Lookup, context: &mut LookupContext) -> FoldResult<Outcome<'_>> {
        let rules = self.rules.as_deref().ok_or(FoldError::NotLoaded)?;
        let declined = Outcome { matched: None, shorter_outline_found: false };

        if outline.is_empty() || outline.len() > self.options.longest_key {
            return Ok(declined);
        }
        if context.checking_shorter_outlines() {
            return Ok(declined);
        }

        let shorter_outline_found = self.shorter_outline_found(outline, lookup, context);

        for rule in rules.iter() {
            if let Some(translation) = rule.apply(outline, lookup, context, shorter_outline_found) {
                tracing::debug!(%outline, rule = rule.name(), %translation, "folding dictionary matched");
                return Ok(Outcome { matched: Some((translation, rule)), shorter_outline_found });
            }
        }

        tracing::trace!(%outline, shorter_outline_found, "no folding rule matched");
        Ok(Outcome { matched: None, shorter_outline_found })
    }

    /// Whether a strictly shorter suffix of `outline` has a host translation.
    ///
    /// Cached per outline until the next [`LookupContext::on_stroke`]. While
    /// the check runs, this dictionary answers nothing, so the host sees only
    /// its other dictionaries.
    fn shorter_outline_found(&self, outline: &Outline, lookup: &dyn Lookup, context: &mut LookupContext) -> bool {
        if !self.options.check_shorter_outlines {
            return false;
        }
        if let Some(found) = context.shorter_outline_found(outline) {
            return found;
        }

        let found = {
            let mut check = context.begin_shorter_check();
            (1..outline.len()).rev().any(|start| lookup.lookup(&outline.suffix(start), &mut check).is_some())
        };

        context.record_shorter_outline(outline, found);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::*;
    use crate::dictionary::{StenoDictionary, Translator};

    fn outline(steno: &str) -> Outline {
        Outline::from_steno(steno).unwrap()
    }

    fn plural() -> Rule {
        when(last_chord().folds("-Z")).then([unfold_suffix()]).unwrap().named("plural")
    }

    #[test]
    fn unloaded_dictionary_reports_not_loaded() {
        let folding = FoldingDictionary::new(Options::default());
        let host = StenoDictionary::new();
        let err = folding.get(&outline("KATZ"), &host, &mut LookupContext::new()).unwrap_err();
        assert_eq!(err, FoldError::NotLoaded);
        assert!(!folding.is_loaded());
    }

    #[test]
    fn outlines_longer_than_longest_key_are_declined() {
        let host = StenoDictionary::from_entries([("KAT", "cat"), ("-Z", "{^s}")]).unwrap();
        let folding = FoldingDictionary::with_rules(Options { longest_key: 1, ..Options::default() }, [plural()]);
        let mut context = LookupContext::new();

        assert_eq!(folding.get(&outline("KATZ"), &host, &mut context), Ok(Some("cat {^s}".into())));
        assert_eq!(folding.get(&outline("KAT/KATZ"), &host, &mut context), Ok(None));
        assert_eq!(context.stats().rule_attempts, 1);
    }

    #[test]
    fn verbose_lookup_reports_rule_and_counters() {
        let host = StenoDictionary::from_entries([("KAT", "cat"), ("-Z", "{^s}")]).unwrap();
        let folding = FoldingDictionary::with_rules(Options::default(), [plural()]);
        let mut context = LookupContext::new();

        let report = folding.get_verbose(&outline("KATZ"), &host, &mut context).unwrap();
        assert_eq!(report.translation.as_deref(), Some("cat {^s}"));
        assert_eq!(report.rule.as_deref(), Some("plural"));
        assert!(!report.shorter_outline_found);
        assert_eq!(report.stats.rule_attempts, 1);
        assert_eq!(report.stats.candidates, 1);
        assert_eq!(report.stats.strategy_calls, 1);

        let again = folding.get_verbose(&outline("TKOGZ"), &host, &mut context).unwrap();
        assert_eq!(again.translation, None);
        assert_eq!(again.rule, None);
        assert_eq!(again.stats.rule_attempts, 1);
    }

    #[test]
    fn shorter_outline_check_is_cached_until_next_stroke() {
        let host = StenoDictionary::from_entries([("TEFT", "test"), ("-D", "{^ed}")]).unwrap();
        let folding = FoldingDictionary::with_rules(Options::default(), [plural()]);
        let translator = Translator::new().with(host).with(folding.clone());
        let mut context = LookupContext::new();

        let report = folding.get_verbose(&outline("TEFT/-D"), &translator, &mut context).unwrap();
        assert!(report.shorter_outline_found);
        assert_eq!(context.shorter_outline_found(&outline("TEFT/-D")), Some(true));

        context.on_stroke();
        assert_eq!(context.shorter_outline_found(&outline("TEFT/-D")), None);
    }

    #[test]
    fn english_rules_load() {
        let folding = FoldingDictionary::english(Options::default()).unwrap();
        assert!(folding.is_loaded());
        assert!(!folding.rules().is_empty());
    }
}
