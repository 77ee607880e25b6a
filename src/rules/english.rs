//! English inflection folds.
//!
//! Suffix keys folded into the last chord of a word are unfolded into the
//! host's own suffix entries, so `KATZ` translates as `KAT` + `-Z`:
//!
//! ```text
//! -G   progressive   TEFGT   -> "test {^ing}"
//!      unless -Z too TEFGTZ  -> "test {^ings}"
//! -D   past          TEFTD   -> "test {^ed}"   (or "test{^ed}" without a -D entry)
//! -Z   plural        KATZ    -> "cat {^s}"     (even when "-Z" alone translates)
//! #    capitalised   #KAT    -> "{-|}cat"
//! ```
//!
//! Rules are tried in this order. The suffix fold word comes from the host
//! dictionary (`-Z`, `-D`, `-G` entries), so a host can restyle the output
//! without touching the rules.

use crate::build::*;
use crate::engine::Rule;
use crate::error::FoldResult;

pub fn rules() -> FoldResult<Vec<Rule>> {
    let progressive_plural =
        when(last_chord().folds("-Z")).then([suffix_translation(" {^ings}")])?.named("progressive plural");
    let progressive = when(last_chord().folds("-G"))
        .then([unfold_suffix()])?
        .unless_also([progressive_plural])
        .named("progressive");

    // The host may lack a "-D" entry; fall back to a literal suffix.
    let past_fallback = when(last_chord()).then([suffix_translation("{^ed}")])?.named("past fallback");
    let past = when(last_chord().folds("-D")).then([unfold_suffix()])?.or_also([past_fallback]).named("past");

    let plural = when(last_chord().folds("-Z")).then([unfold_suffix()])?.preferring_folds().named("plural");

    let capitalised = when(first_chord().folds("#")).then([prefix_translation("{-|}")])?.named("capitalised");

    Ok(vec![progressive, past, plural, capitalised])
}
