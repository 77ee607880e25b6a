//! Boolean composition of clauses and the top-level prerequisite.
//!
//! ```text
//! Prerequisite ── OR over elements, every case group considered
//!   ├─ Clause
//!   └─ Statement::All        cross product of children, one merged group each
//!        ├─ Clause
//!        └─ Statement::AnySingle   first child that yields anything wins
//!             ├─ Clause
//!             └─ Clause
//! ```
//!
//! Everything here is lazy: a [`Rule`](crate::Rule) pulls `(defolded, folds)`
//! pairs one at a time and stops as soon as a translation is found.

use super::clause::{CaseGroup, Clause, Combinations};
use crate::chord::Outline;

/// Boxed case-group stream returned by [`Element::satisfied_case_groups`].
pub type CaseGroups<'a> = Box<dyn Iterator<Item = CaseGroup> + 'a>;

/// A node of the prerequisite tree: a clause or a nested statement.
#[derive(Debug, Clone)]
pub enum Element {
    Clause(Clause),
    Statement(Statement),
}

impl Element {
    pub fn satisfied_case_groups<'a>(&'a self, outline: &'a Outline) -> CaseGroups<'a> {
        match self {
            Element::Clause(clause) => Box::new(clause.satisfied_case_groups(outline)),
            Element::Statement(statement) => statement.satisfied_case_groups(outline),
        }
    }
}

impl From<Clause> for Element {
    fn from(clause: Clause) -> Self {
        Element::Clause(clause)
    }
}

impl From<Statement> for Element {
    fn from(statement: Statement) -> Self {
        Element::Statement(statement)
    }
}

/// Conjunctive or disjunctive composition of [`Element`]s.
#[derive(Debug, Clone)]
pub enum Statement {
    /// Every child must be satisfied; yields one merged group per combination.
    All(Vec<Element>),
    /// Yields every group of the first child that yields anything.
    AnySingle(Vec<Element>),
}

impl Statement {
    pub fn satisfied_case_groups<'a>(&'a self, outline: &'a Outline) -> CaseGroups<'a> {
        match self {
            Statement::All(children) => {
                // The cross product needs every child's full list up front.
                let options: Vec<Vec<CaseGroup>> =
                    children.iter().map(|child| child.satisfied_case_groups(outline).collect()).collect();
                tracing::trace!(
                    children = children.len(),
                    options = ?options.iter().map(Vec::len).collect::<Vec<_>>(),
                    "conjunctive statement"
                );
                Box::new(
                    Combinations::new(options)
                        .map(|groups| groups.iter().fold(CaseGroup::default(), |merged, group| merged.merge(group))),
                )
            }
            Statement::AnySingle(children) => {
                for (index, child) in children.iter().enumerate() {
                    let mut groups = child.satisfied_case_groups(outline).peekable();
                    if groups.peek().is_some() {
                        tracing::trace!(child = index, "disjunctive statement matched");
                        return Box::new(groups);
                    }
                }
                Box::new(std::iter::empty())
            }
        }
    }
}

/// Top-level bundle of elements; each one is tried in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Prerequisite {
    elements: Vec<Element>,
}

impl Prerequisite {
    pub fn new(elements: Vec<Element>) -> Self {
        Prerequisite { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Lazily yield `(defolded, folds)` for every satisfied case group.
    ///
    /// `folds` has the same length as `outline` and holds, per chord, the keys
    /// that were claimed as the fold. Calling this again restarts the sequence.
    pub fn satisfied_folds<'a>(&'a self, outline: &'a Outline) -> impl Iterator<Item = (Outline, Outline)> + 'a {
        self.elements
            .iter()
            .flat_map(move |element| element.satisfied_case_groups(outline))
            .map(move |group| (group.remove_folds(outline), group.get_folds(outline)))
    }
}
