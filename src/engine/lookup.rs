//! The host dictionary seam.
//!
//! Strategies and the shorter-outline guard query the host through
//! [`Lookup`]. The host may route the query back into a
//! [`FoldingDictionary`](crate::FoldingDictionary), which is why the
//! [`LookupContext`] travels with every call.

use super::context::LookupContext;
use crate::chord::Outline;

/// A synchronous, side-effect-free dictionary query.
pub trait Lookup {
    /// Translation for `outline`, or `None` if nothing matches.
    fn lookup(&self, outline: &Outline, context: &mut LookupContext) -> Option<String>;
}

impl<F> Lookup for F
where
    F: Fn(&Outline, &mut LookupContext) -> Option<String>,
{
    fn lookup(&self, outline: &Outline, context: &mut LookupContext) -> Option<String> {
        self(outline, context)
    }
}
