//! Clauses, case groups and the combination enumerator.
//!
//! A [`Clause`] picks which chords of an outline to examine (a [`ChordFilter`])
//! and tests one or more [`Condition`]s against them. Each condition may be
//! satisfied by several cases, so a clause yields the cross product of the
//! satisfied cases as [`CaseGroup`]s.
//!
//! ## Enumeration order
//!
//! Combinations are produced like an odometer: the **last** option list varies
//! fastest. For conditions with satisfied cases `[a1, a2]` and `[b1, b2, b3]`:
//!
//! ```text
//! (a1,b1) (a1,b2) (a1,b3) (a2,b1) (a2,b2) (a2,b3)
//! ```
//!
//! Rules stop at the first combination that produces a translation, so this
//! order decides which fold wins when several are possible.

use super::case::{Case, Condition};
use crate::chord::{Chord, Outline};
use std::fmt;
use std::sync::Arc;

/// Predicate used by [`ChordFilter::Filtered`]: `(index, chord, outline)`.
pub type ChordPredicate = Arc<dyn Fn(usize, Chord, &Outline) -> bool + Send + Sync>;

/// Selects which chords of an outline a clause examines.
#[derive(Clone)]
pub enum ChordFilter {
    First,
    Last,
    /// Chord at an index; negative indices count from the end (`-1` is last).
    Nth(isize),
    All,
    Filtered(ChordPredicate),
}

impl ChordFilter {
    /// Indices of the selected chords, in outline order.
    pub fn select(&self, outline: &Outline) -> Vec<usize> {
        let len = outline.len();
        if len == 0 {
            return Vec::new();
        }
        match self {
            ChordFilter::First => vec![0],
            ChordFilter::Last => vec![len - 1],
            ChordFilter::Nth(n) => {
                let index = if *n < 0 { len.checked_sub(n.unsigned_abs()) } else { Some(*n as usize) };
                index.filter(|&i| i < len).into_iter().collect()
            }
            ChordFilter::All => (0..len).collect(),
            ChordFilter::Filtered(predicate) => {
                outline.iter().enumerate().filter(|(i, chord)| predicate(*i, *chord, outline)).map(|(i, _)| i).collect()
            }
        }
    }
}

impl fmt::Debug for ChordFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChordFilter::First => f.write_str("First"),
            ChordFilter::Last => f.write_str("Last"),
            ChordFilter::Nth(n) => write!(f, "Nth({n})"),
            ChordFilter::All => f.write_str("All"),
            ChordFilter::Filtered(_) => f.write_str("Filtered(<predicate>)"),
        }
    }
}

/// A consistent combination of cases, each bound to the chords it targets.
///
/// Targets are resolved to chord indices when the group is created, so the
/// group is tied to the outline it was enumerated from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseGroup {
    entries: Vec<(Case, Arc<[usize]>)>,
}

impl CaseGroup {
    pub fn new(entries: Vec<(Case, Arc<[usize]>)>) -> Self {
        CaseGroup { entries }
    }

    pub fn cases(&self) -> impl Iterator<Item = Case> + '_ {
        self.entries.iter().map(|(case, _)| *case)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every case's `remove_fold` to the chords it targets.
    pub fn remove_folds(&self, outline: &Outline) -> Outline {
        let mut chords = outline.chords().to_vec();
        for (case, targets) in &self.entries {
            for &i in targets.iter() {
                if let Some(chord) = chords.get_mut(i) {
                    *chord = case.remove_fold(*chord);
                }
            }
        }
        Outline::new(chords)
    }

    /// Accumulate each case's fold keys per chord position.
    pub fn get_folds(&self, outline: &Outline) -> Outline {
        let mut folds = vec![Chord::EMPTY; outline.len()];
        for (case, targets) in &self.entries {
            for &i in targets.iter() {
                if let Some(fold) = folds.get_mut(i) {
                    *fold = *fold + case.fold_substroke();
                }
            }
        }
        Outline::new(folds)
    }

    /// Concatenate two groups (AND composition).
    pub fn merge(&self, other: &CaseGroup) -> CaseGroup {
        let mut entries = self.entries.clone();
        entries.extend(other.entries.iter().cloned());
        CaseGroup { entries }
    }
}

/// Selects chords with a [`ChordFilter`] and tests [`Condition`]s on them.
#[derive(Debug, Clone)]
pub struct Clause {
    filter: ChordFilter,
    conditions: Vec<Condition>,
}

impl Clause {
    pub fn new(filter: ChordFilter, conditions: Vec<Condition>) -> Self {
        Clause { filter, conditions }
    }

    pub fn filter(&self) -> &ChordFilter {
        &self.filter
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// Every combination of satisfied cases, last condition varying fastest.
    ///
    /// Yields nothing when the filter selects no chords or when any condition
    /// has no satisfied case.
    pub fn satisfied_case_groups(&self, outline: &Outline) -> impl Iterator<Item = CaseGroup> {
        let targets: Arc<[usize]> = self.filter.select(outline).into();
        let chords: Vec<Chord> = targets.iter().filter_map(|&i| outline.get(i)).collect();

        let options: Vec<Vec<Case>> = if targets.is_empty() {
            Vec::new()
        } else {
            self.conditions.iter().map(|condition| condition.satisfied_cases(&chords).collect()).collect()
        };

        let exhausted = targets.is_empty();
        Combinations::new(options)
            .filter(move |_| !exhausted)
            .map(move |cases| CaseGroup::new(cases.into_iter().map(|case| (case, Arc::clone(&targets))).collect()))
    }
}

/// Odometer over the cross product of `options`, last list varying fastest.
///
/// An empty `options` yields a single empty combination; any empty list
/// yields nothing.
#[derive(Debug, Clone)]
pub struct Combinations<T> {
    options: Vec<Vec<T>>,
    indices: Vec<usize>,
    done: bool,
}

impl<T: Clone> Combinations<T> {
    pub fn new(options: Vec<Vec<T>>) -> Self {
        let done = options.iter().any(|list| list.is_empty());
        let indices = vec![0; options.len()];
        Combinations { options, indices, done }
    }
}

impl<T: Clone> Iterator for Combinations<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Vec<T>> {
        if self.done {
            return None;
        }

        let current: Vec<T> = self.indices.iter().zip(&self.options).map(|(&i, list)| list[i].clone()).collect();

        // Advance from the last position, carrying leftwards.
        let mut position = self.indices.len();
        loop {
            if position == 0 {
                self.done = true;
                break;
            }
            position -= 1;
            self.indices[position] += 1;
            if self.indices[position] < self.options[position].len() {
                break;
            }
            self.indices[position] = 0;
        }

        Some(current)
    }
}
