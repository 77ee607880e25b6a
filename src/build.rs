//! Rule-authoring helpers.
//!
//! Rules read close to how they are described:
//!
//! ```
//! use chordfold::build::*;
//!
//! # fn main() -> chordfold::FoldResult<()> {
//! // "KAT" + folded -Z  ->  "cat {^s}"
//! let plural = when(last_chord().folds("-Z")).then([unfold_suffix()])?.named("plural");
//!
//! // "#" on the first chord capitalises the rest.
//! let capital = when(first_chord().folds("#"))
//!     .then([prefix_translation("{-|}")])?
//!     .unless_also([plural.clone()]);
//! # Ok(())
//! # }
//! ```
//!
//! Steno notation is parsed while building. The first error is kept and
//! reported by [`RuleBuilder::then`], so a rule set either builds completely
//! or not at all.

use crate::chord::{Chord, Outline};
use crate::engine::{
    Case, ChordFilter, Clause, Condition, Element, LookupStrategy, OutlineTransform, Prerequisite, Rule, Statement,
    TextTransform,
};
use crate::error::{FoldError, FoldResult};
use std::sync::Arc;

/// A clause under construction. Each `folds*`/`toggles` call adds a condition.
#[derive(Debug, Clone)]
pub struct ClauseBuilder {
    filter: ChordFilter,
    conditions: Vec<Condition>,
    error: Option<FoldError>,
}

pub fn first_chord() -> ClauseBuilder {
    ClauseBuilder::new(ChordFilter::First)
}

pub fn last_chord() -> ClauseBuilder {
    ClauseBuilder::new(ChordFilter::Last)
}

/// The chord at `index`; negative indices count from the end.
pub fn nth_chord(index: isize) -> ClauseBuilder {
    ClauseBuilder::new(ChordFilter::Nth(index))
}

pub fn all_chords() -> ClauseBuilder {
    ClauseBuilder::new(ChordFilter::All)
}

/// Chords for which `predicate(index, chord, outline)` holds.
pub fn filtered_chords<F>(predicate: F) -> ClauseBuilder
where
    F: Fn(usize, Chord, &Outline) -> bool + Send + Sync + 'static,
{
    ClauseBuilder::new(ChordFilter::Filtered(Arc::new(predicate)))
}

impl ClauseBuilder {
    fn new(filter: ChordFilter) -> Self {
        ClauseBuilder { filter, conditions: Vec::new(), error: None }
    }

    fn push(mut self, condition: FoldResult<Condition>) -> Self {
        match condition {
            Ok(condition) => self.conditions.push(condition),
            Err(err) => {
                self.error.get_or_insert(err);
            }
        }
        self
    }

    /// Every selected chord must contain `steno`; those keys are the fold.
    pub fn folds(self, steno: &str) -> Self {
        let case = Chord::from_steno(steno).map(Case::contained);
        self.push(case.map(Condition::from))
    }

    /// Like [`folds`](Self::folds) with alternatives, tried in the given order.
    pub fn folds_any(self, stenos: &[&str]) -> Self {
        let cases: FoldResult<Vec<Case>> =
            stenos.iter().map(|steno| Chord::from_steno(steno).map(Case::contained)).collect();
        self.push(cases.map(Condition::new))
    }

    /// Flip `steno` on the selected chords; always satisfied.
    pub fn toggles(self, steno: &str) -> Self {
        let case = Chord::from_steno(steno).map(Case::toggled);
        self.push(case.map(Condition::from))
    }

    /// Require and remove `contained` while flipping `toggled`.
    pub fn folds_toggling(self, contained: &str, toggled: &str) -> Self {
        let case = Chord::from_steno(contained)
            .and_then(|contained| Chord::from_steno(toggled).map(|toggled| (contained, toggled)))
            .and_then(|(contained, toggled)| Case::new(contained, toggled));
        self.push(case.map(Condition::from))
    }

    /// Add a prebuilt condition.
    pub fn satisfies(self, condition: Condition) -> Self {
        self.push(Ok(condition))
    }

    pub fn build(self) -> FoldResult<Clause> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(Clause::new(self.filter, self.conditions)),
        }
    }
}

/// A prerequisite element under construction, carrying any authoring error.
#[derive(Debug, Clone)]
pub struct Fragment(FoldResult<Element>);

impl Fragment {
    pub fn build(self) -> FoldResult<Element> {
        self.0
    }
}

impl From<ClauseBuilder> for Fragment {
    fn from(builder: ClauseBuilder) -> Self {
        Fragment(builder.build().map(Element::from))
    }
}

impl From<Clause> for Fragment {
    fn from(clause: Clause) -> Self {
        Fragment(Ok(clause.into()))
    }
}

impl From<Statement> for Fragment {
    fn from(statement: Statement) -> Self {
        Fragment(Ok(statement.into()))
    }
}

fn collect_children<I, T>(children: I) -> FoldResult<Vec<Element>>
where
    I: IntoIterator<Item = T>,
    T: Into<Fragment>,
{
    children.into_iter().map(|child| child.into().build()).collect()
}

/// Conjunctive statement: every child must be satisfied.
pub fn all<I, T>(children: I) -> Fragment
where
    I: IntoIterator<Item = T>,
    T: Into<Fragment>,
{
    Fragment(collect_children(children).map(|children| Statement::All(children).into()))
}

/// Disjunctive statement: the first child that is satisfied at all.
pub fn any_single<I, T>(children: I) -> Fragment
where
    I: IntoIterator<Item = T>,
    T: Into<Fragment>,
{
    Fragment(collect_children(children).map(|children| Statement::AnySingle(children).into()))
}

/// Start a rule; see [`RuleBuilder`].
pub fn when(element: impl Into<Fragment>) -> RuleBuilder {
    RuleBuilder { elements: vec![element.into()] }
}

/// Prerequisite elements gathered by [`when`] and [`or_when`](Self::or_when).
#[derive(Debug, Clone)]
pub struct RuleBuilder {
    elements: Vec<Fragment>,
}

impl RuleBuilder {
    /// Another independent way for the rule to apply, tried after the earlier ones.
    pub fn or_when(mut self, element: impl Into<Fragment>) -> Self {
        self.elements.push(element.into());
        self
    }

    /// Finish the rule with strategies tried in order.
    pub fn then(self, strategies: impl IntoIterator<Item = LookupStrategy>) -> FoldResult<Rule> {
        let elements = self.elements.into_iter().map(Fragment::build).collect::<FoldResult<Vec<_>>>()?;
        Ok(Rule::new(Prerequisite::new(elements), strategies.into_iter().collect()))
    }
}

pub fn unfold_suffix() -> LookupStrategy {
    LookupStrategy::UnfoldSuffix
}

pub fn unfold_prefix() -> LookupStrategy {
    LookupStrategy::UnfoldPrefix
}

pub fn use_defolded_translation() -> LookupStrategy {
    LookupStrategy::UseDefolded
}

pub fn modify_translation<F>(modify: F) -> LookupStrategy
where
    F: Fn(&str) -> String + Send + Sync + 'static,
{
    LookupStrategy::ModifyTranslation(TextTransform::Map(Arc::new(modify)))
}

pub fn prefix_translation(prefix: impl Into<String>) -> LookupStrategy {
    LookupStrategy::ModifyTranslation(TextTransform::Prefix(prefix.into()))
}

pub fn suffix_translation(suffix: impl Into<String>) -> LookupStrategy {
    LookupStrategy::ModifyTranslation(TextTransform::Suffix(suffix.into()))
}

/// Look up `modify(defolded, folds)` instead of the defolded outline.
pub fn modify_outline<F>(modify: F) -> LookupStrategy
where
    F: Fn(&Outline, &Outline) -> Outline + Send + Sync + 'static,
{
    LookupStrategy::ModifyOutline(OutlineTransform::Map(Arc::new(modify)))
}

pub fn prefix_outline(chords: Outline) -> LookupStrategy {
    LookupStrategy::ModifyOutline(OutlineTransform::Prefix(chords))
}

pub fn suffix_outline(chords: Outline) -> LookupStrategy {
    LookupStrategy::ModifyOutline(OutlineTransform::Suffix(chords))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline(steno: &str) -> Outline {
        Outline::from_steno(steno).unwrap()
    }

    fn folds_of(rule: &Rule, steno: &str) -> Vec<(String, String)> {
        let outline = outline(steno);
        rule.prerequisite().satisfied_folds(&outline).map(|(d, f)| (d.to_string(), f.to_string())).collect()
    }

    #[test]
    fn clause_builders_select_chords_and_fold_keys() {
        let rule = when(last_chord().folds("-Z")).then([unfold_suffix()]).unwrap();
        assert_eq!(folds_of(&rule, "KAT/TPHOZ"), vec![("KAT/TPHO".to_string(), "/-Z".to_string())]);

        let rule = when(nth_chord(-2).folds("-Z")).then([unfold_suffix()]).unwrap();
        assert_eq!(folds_of(&rule, "KATZ/TPHOZ"), vec![("KAT/TPHOZ".to_string(), "-Z/".to_string())]);

        let rule = when(all_chords().toggles("*")).then([use_defolded_translation()]).unwrap();
        assert_eq!(folds_of(&rule, "KAT/TPHO"), vec![("KA*T/TPHO*".to_string(), "*/*".to_string())]);
    }

    #[test]
    fn folds_any_and_or_when_enumerate_in_order() {
        let rule = when(last_chord().folds_any(&["-Z", "-D"]))
            .or_when(first_chord().folds("S"))
            .then([unfold_suffix()])
            .unwrap();
        assert_eq!(
            folds_of(&rule, "SKWRAOEFDZ"),
            vec![
                ("SKWRAOEFD".to_string(), "-Z".to_string()),
                ("SKWRAOEFZ".to_string(), "-D".to_string()),
                ("KWRAOEFDZ".to_string(), "S".to_string()),
            ]
        );
    }

    #[test]
    fn statements_compose() {
        let rule = when(all([first_chord().folds("#"), last_chord().folds("-Z")])).then([unfold_suffix()]).unwrap();
        assert_eq!(folds_of(&rule, "#KAT/TPHOZ"), vec![("KAT/TPHO".to_string(), "#/-Z".to_string())]);
        assert!(folds_of(&rule, "KAT/TPHOZ").is_empty());

        let rule = when(any_single([last_chord().folds("-D"), last_chord().folds("-Z")])).then([]).unwrap();
        assert_eq!(folds_of(&rule, "KATZ"), vec![("KAT".to_string(), "-Z".to_string())]);

        let nested = when(all([Fragment::from(first_chord().folds("#")), any_single([last_chord().folds("-Z")])]))
            .then([])
            .unwrap();
        assert_eq!(folds_of(&nested, "#KATZ"), vec![("KAT".to_string(), "#-Z".to_string())]);
    }

    #[test]
    fn filtered_chords_receive_index_chord_and_outline() {
        let rule = when(filtered_chords(|index, _, outline: &Outline| index + 1 < outline.len()).folds("-Z"))
            .then([unfold_suffix()])
            .unwrap();
        assert_eq!(folds_of(&rule, "KATZ/-Z"), vec![("KAT/-Z".to_string(), "-Z/".to_string())]);
    }

    #[test]
    fn first_authoring_error_is_reported_by_then() {
        let err = when(last_chord().folds("ZZ").folds("-Q")).then([unfold_suffix()]).unwrap_err();
        assert_eq!(err, FoldError::InvalidChord { notation: "ZZ".into() });

        let err = when(all([last_chord().folds("-Z"), last_chord().folds_toggling("*Z", "*")]))
            .then([unfold_suffix()])
            .unwrap_err();
        assert!(matches!(err, FoldError::OverlappingCase { .. }));
    }
}
