//! Folding engine.
//!
//! The engine decides whether an outline is "some known outline plus folded
//! keys", and if so how to translate it. It is split into focused submodules
//! under `src/engine/`, re-exported from here.
//!
//! ## How the parts work together
//!
//! A lookup is a pipeline over one outline:
//!
//! ```text
//! outline ── Prerequisite::satisfied_folds          (statement.rs)
//!              - Clause: filter chords, cross product of
//!                satisfied Cases per Condition      (clause.rs, case.rs)
//!              - Statement::All / AnySingle
//!                         │
//!                         v   (defolded, folds) pairs, lazily
//!            Rule::apply                             (rule.rs)
//!              - memo + in-flight guard              (context.rs)
//!              - claim folds (overlap check)
//!              - additional rules / strategies / alternatives
//!                         │
//!                         v
//!            LookupStrategy::apply                   (strategy.rs)
//!              - query the host through `Lookup`     (lookup.rs)
//!                         │
//!                         v
//!                  Option<String>
//! ```
//!
//! ## Responsibilities by module
//!
//! - `case.rs`: `Case` (one fold hypothesis) and `Condition` (alternatives).
//! - `clause.rs`: chord filters, case groups, and the odometer used for every
//!   cross product.
//! - `statement.rs`: conjunctive/disjunctive composition and `Prerequisite`.
//! - `strategy.rs`: the closed set of lookup strategies.
//! - `rule.rs`: rule dispatch and the `unless_also` / `or_also` /
//!   `preferring_folds` builders.
//! - `context.rs`: lookup-scoped state (claims, memo, in-flight set).
//! - `metrics.rs`: counters and the verbose lookup report.
//!
//! ## Debugging
//!
//! The engine emits `tracing` events: `debug` when a fold matches, `trace` for
//! enumeration, overlap skips and memo hits.

#[path = "engine/case.rs"]
mod case;
#[path = "engine/clause.rs"]
mod clause;
#[path = "engine/context.rs"]
mod context;
#[path = "engine/lookup.rs"]
mod lookup;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/rule.rs"]
mod rule;
#[path = "engine/statement.rs"]
mod statement;
#[path = "engine/strategy.rs"]
mod strategy;

pub use case::{Case, Condition};
pub use clause::{CaseGroup, ChordFilter, ChordPredicate, Clause};
pub use context::{ClaimScope, InFlight, LookupContext};
pub use lookup::Lookup;
pub use metrics::{LookupReport, LookupStats};
pub use rule::{Rule, RuleId};
pub use statement::{CaseGroups, Element, Prerequisite, Statement};
pub use strategy::{LookupStrategy, OutlineFn, OutlineTransform, TextFn, TextTransform};
