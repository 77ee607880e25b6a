//! Lookup strategies.
//!
//! Once a rule has stripped the folds from an outline, a strategy decides how
//! to turn the reduced outline (and the removed keys) into a translation.
//! Strategies are a closed set of tagged variants so rules stay inspectable:
//!
//! ```text
//! UnfoldSuffix        base(defolded) + " " + lookup(last fold chord)
//! UnfoldPrefix        lookup(first fold chord) + " " + base(defolded)
//! UseDefolded         base(defolded)
//! ModifyTranslation   transform(base(defolded))
//! ModifyOutline       base(transform(defolded, folds))
//! ```
//!
//! `base` looks the outline up with empty chords removed: a chord made only
//! of fold keys leaves nothing behind to translate. Nested lookups see the
//! fold claims of the chords they were derived from, re-indexed to the
//! looked-up outline (see [`LookupContext::realign_claims`]).

use super::context::LookupContext;
use super::lookup::Lookup;
use crate::chord::{Chord, Outline};
use std::fmt;
use std::sync::Arc;

/// String-to-string function used by [`TextTransform::Map`].
pub type TextFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Outline builder used by [`OutlineTransform::Map`]: `(defolded, folds)`.
pub type OutlineFn = Arc<dyn Fn(&Outline, &Outline) -> Outline + Send + Sync>;

/// Rewrites a base translation.
#[derive(Clone)]
pub enum TextTransform {
    Prefix(String),
    Suffix(String),
    Map(TextFn),
}

impl TextTransform {
    pub fn apply(&self, translation: &str) -> String {
        match self {
            TextTransform::Prefix(prefix) => format!("{prefix}{translation}"),
            TextTransform::Suffix(suffix) => format!("{translation}{suffix}"),
            TextTransform::Map(map) => map(translation),
        }
    }
}

impl fmt::Debug for TextTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextTransform::Prefix(prefix) => f.debug_tuple("Prefix").field(prefix).finish(),
            TextTransform::Suffix(suffix) => f.debug_tuple("Suffix").field(suffix).finish(),
            TextTransform::Map(_) => f.write_str("Map(<function>)"),
        }
    }
}

/// Builds the outline to look up from the defolded outline.
#[derive(Clone)]
pub enum OutlineTransform {
    /// Prepend chords.
    Prefix(Outline),
    /// Append chords.
    Suffix(Outline),
    Map(OutlineFn),
}

impl OutlineTransform {
    pub fn apply(&self, defolded: &Outline, folds: &Outline) -> Outline {
        match self {
            OutlineTransform::Prefix(prefix) => prefix.concat(defolded),
            OutlineTransform::Suffix(suffix) => defolded.concat(suffix),
            OutlineTransform::Map(map) => map(defolded, folds),
        }
    }

    /// Position in the folded outline of each chord of `built`, `None` for
    /// chords the transform added. `Map` outlines are taken as aligned with
    /// the defolded outline.
    fn positions(&self, defolded: &Outline, built: &Outline) -> Vec<Option<usize>> {
        match self {
            OutlineTransform::Prefix(prefix) => {
                std::iter::repeat_n(None, prefix.len()).chain((0..defolded.len()).map(Some)).collect()
            }
            OutlineTransform::Suffix(_) => (0..defolded.len()).map(Some).collect(),
            OutlineTransform::Map(_) => (0..built.len().min(defolded.len())).map(Some).collect(),
        }
    }
}

impl fmt::Debug for OutlineTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutlineTransform::Prefix(prefix) => f.debug_tuple("Prefix").field(prefix).finish(),
            OutlineTransform::Suffix(suffix) => f.debug_tuple("Suffix").field(suffix).finish(),
            OutlineTransform::Map(_) => f.write_str("Map(<function>)"),
        }
    }
}

/// How a rule produces a translation from a defolded outline.
#[derive(Debug, Clone)]
pub enum LookupStrategy {
    /// `"<base> <fold-word>"`, the fold word being the last fold chord's translation.
    UnfoldSuffix,
    /// `"<fold-word> <base>"`, the fold word being the first fold chord's translation.
    UnfoldPrefix,
    /// The base translation, unchanged.
    UseDefolded,
    ModifyTranslation(TextTransform),
    ModifyOutline(OutlineTransform),
}

impl LookupStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            LookupStrategy::UnfoldSuffix => "unfold_suffix",
            LookupStrategy::UnfoldPrefix => "unfold_prefix",
            LookupStrategy::UseDefolded => "use_defolded_translation",
            LookupStrategy::ModifyTranslation(_) => "modify_translation",
            LookupStrategy::ModifyOutline(_) => "modify_outline",
        }
    }

    /// Produce a translation, or `None` to let the rule try its next strategy.
    ///
    /// `defolded` and `folds` are aligned chord by chord; `_original` is the
    /// outline before any fold was removed.
    pub fn apply(
        &self,
        defolded: &Outline,
        folds: &Outline,
        _original: &Outline,
        lookup: &dyn Lookup,
        context: &mut LookupContext,
    ) -> Option<String> {
        context.stats_mut().strategy_calls += 1;

        match self {
            LookupStrategy::UnfoldSuffix => {
                let base = lookup_base(defolded, aligned(defolded), lookup, context)?;
                let (index, fold) = folds.iter().enumerate().rev().find(|(_, chord)| !chord.is_empty())?;
                let word = lookup_base(&Outline::from(fold), vec![Some(index)], lookup, context)?;
                Some(format!("{base} {word}"))
            }
            LookupStrategy::UnfoldPrefix => {
                let base = lookup_base(defolded, aligned(defolded), lookup, context)?;
                let (index, fold) = folds.iter().enumerate().find(|(_, chord)| !chord.is_empty())?;
                let word = lookup_base(&Outline::from(fold), vec![Some(index)], lookup, context)?;
                Some(format!("{word} {base}"))
            }
            LookupStrategy::UseDefolded => lookup_base(defolded, aligned(defolded), lookup, context),
            LookupStrategy::ModifyTranslation(transform) => {
                lookup_base(defolded, aligned(defolded), lookup, context).map(|base| transform.apply(&base))
            }
            LookupStrategy::ModifyOutline(transform) => {
                let outline = transform.apply(defolded, folds);
                let positions = transform.positions(defolded, &outline);
                lookup_base(&outline, positions, lookup, context)
            }
        }
    }
}

fn aligned(outline: &Outline) -> Vec<Option<usize>> {
    (0..outline.len()).map(Some).collect()
}

/// Look `outline` up with empty chords removed, under the claims of the
/// folded positions the kept chords came from.
fn lookup_base(
    outline: &Outline,
    positions: Vec<Option<usize>>,
    lookup: &dyn Lookup,
    context: &mut LookupContext,
) -> Option<String> {
    let (kept, positions): (Vec<Chord>, Vec<Option<usize>>) = outline
        .iter()
        .zip(positions.into_iter().chain(std::iter::repeat(None)))
        .filter(|(chord, _)| !chord.is_empty())
        .unzip();
    if kept.is_empty() {
        return None;
    }

    let compact = Outline::new(kept);
    let mut scope = context.realign_claims(&positions);
    let translation = lookup.lookup(&compact, &mut scope);
    tracing::trace!(outline = %compact, found = translation.is_some(), "nested lookup");
    translation
}
