//! Folding for steno dictionaries.
//!
//! A fold is a set of extra keys merged into an otherwise known chord, such as
//! a plural `-Z` pressed together with `TPHO` ("no"). Rules describe where a
//! fold may appear and how to translate the outline once it is removed:
//!
//! ```
//! use chordfold::build::*;
//! use chordfold::{FoldingDictionary, Lookup, LookupContext, Options, Outline, StenoDictionary, Translator};
//!
//! # fn main() -> chordfold::FoldResult<()> {
//! let plural = when(last_chord().folds("-Z")).then([unfold_suffix()])?;
//!
//! let host = StenoDictionary::from_entries([("TPHO", "no"), ("-Z", "{plural}")])?;
//! let translator = Translator::new()
//!     .with(host)
//!     .with(FoldingDictionary::with_rules(Options::default(), [plural]));
//!
//! let mut context = LookupContext::new();
//! let outline: Outline = "TPHOZ".parse()?;
//! assert_eq!(translator.lookup(&outline, &mut context).as_deref(), Some("no {plural}"));
//! # Ok(())
//! # }
//! ```
//!
//! Lookups thread a [`LookupContext`] through every nested query; call
//! [`LookupContext::on_stroke`] once per committed chord.

#[macro_use]
mod macros;
mod api;
pub mod build;
mod chord;
mod dictionary;
mod engine;
mod error;
pub mod rules;

pub use api::{FoldingDictionary, Options};
pub use chord::{Chord, Keys, Outline};
pub use dictionary::{Dictionary, FunctionDictionary, StenoDictionary, TranslateFn, Translator};
pub use engine::{
    Case, CaseGroup, CaseGroups, ChordFilter, ChordPredicate, ClaimScope, Clause, Condition, Element, InFlight, Lookup,
    LookupContext, LookupReport, LookupStats, LookupStrategy, OutlineFn, OutlineTransform, Prerequisite, Rule, RuleId,
    Statement, TextFn, TextTransform,
};
pub use error::{FoldError, FoldResult};
