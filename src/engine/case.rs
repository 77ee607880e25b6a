//! Fold hypotheses.
//!
//! A [`Case`] describes one way a fold may have been merged into a chord:
//!
//! ```text
//! contained: keys that must be present, and are removed   (e.g. -Z for a plural)
//! toggled:   keys whose membership is flipped             (e.g. * for a variant)
//!
//! remove_fold(chord) = toggle(chord - contained, toggled)
//! fold_substroke     = contained + toggled
//! ```
//!
//! A [`Condition`] lists alternative cases for the same positional test, in
//! priority order ("folded either -Z or -D").

use crate::chord::Chord;
use crate::error::{FoldError, FoldResult};

/// A single fold hypothesis. `contained` and `toggled` never share keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Case {
    contained: Chord,
    toggled: Chord,
}

impl Case {
    /// Build a case, rejecting overlapping `contained`/`toggled` key sets.
    pub fn new(contained: Chord, toggled: Chord) -> FoldResult<Self> {
        if contained.overlaps(toggled) {
            return Err(FoldError::OverlappingCase { contained: contained.to_string(), toggled: toggled.to_string() });
        }
        Ok(Case { contained, toggled })
    }

    /// A case whose fold keys must all be present in the chord.
    pub fn contained(keys: Chord) -> Self {
        Case { contained: keys, toggled: Chord::EMPTY }
    }

    /// A case whose fold keys are toggled regardless of the chord.
    pub fn toggled(keys: Chord) -> Self {
        Case { contained: Chord::EMPTY, toggled: keys }
    }

    pub fn contained_keys(&self) -> Chord {
        self.contained
    }

    pub fn toggled_keys(&self) -> Chord {
        self.toggled
    }

    /// True when every chord in `chords` contains the `contained` keys.
    pub fn satisfied_by<I>(&self, chords: I) -> bool
    where
        I: IntoIterator<Item = Chord>,
    {
        chords.into_iter().all(|chord| chord.contains(self.contained))
    }

    pub fn remove_fold(&self, chord: Chord) -> Chord {
        (chord - self.contained).toggle(self.toggled)
    }

    /// Inverse of [`remove_fold`](Self::remove_fold) for chords that do not
    /// already contain the `contained` keys.
    pub fn apply_fold(&self, chord: Chord) -> Chord {
        (chord + self.contained).toggle(self.toggled)
    }

    /// Every key this case claims as part of the fold.
    pub fn fold_substroke(&self) -> Chord {
        self.contained + self.toggled
    }
}

/// Ordered alternative cases for one positional test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    cases: Vec<Case>,
}

impl Condition {
    pub fn new(cases: Vec<Case>) -> Self {
        Condition { cases }
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    /// Every case satisfied by `chords`, in declaration order.
    pub fn satisfied_cases<'a>(&'a self, chords: &'a [Chord]) -> impl Iterator<Item = Case> + 'a {
        self.cases.iter().filter(move |case| case.satisfied_by(chords.iter().copied())).copied()
    }
}

impl From<Case> for Condition {
    fn from(case: Case) -> Self {
        Condition::new(vec![case])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::Keys;
    use proptest::prelude::*;

    fn chord(steno: &str) -> Chord {
        Chord::from_steno(steno).unwrap()
    }

    #[test]
    fn overlapping_case_fails_at_construction() {
        let err = Case::new(chord("-Z"), chord("*-Z")).unwrap_err();
        assert!(matches!(err, FoldError::OverlappingCase { .. }));
        assert!(Case::new(chord("-Z"), chord("*")).is_ok());
    }

    #[test]
    fn remove_fold_strips_contained_and_flips_toggled() {
        let case = Case::new(chord("-Z"), chord("*")).unwrap();
        assert_eq!(case.remove_fold(chord("KAT")), chord("KA*T"));
        assert_eq!(case.remove_fold(chord("KA*TZ")), chord("KAT"));
        assert_eq!(case.fold_substroke(), chord("*Z"));
    }

    #[test]
    fn satisfied_by_requires_every_chord() {
        let case = Case::contained(chord("-Z"));
        assert!(case.satisfied_by([chord("TPHOZ"), chord("-FZ")]));
        assert!(!case.satisfied_by([chord("TPHOZ"), chord("-F")]));
        assert!(Case::toggled(chord("*")).satisfied_by([chord("TPHO")]));
    }

    #[test]
    fn condition_preserves_declaration_order() {
        let condition = Condition::new(vec![
            Case::contained(chord("-D")),
            Case::contained(chord("-Z")),
            Case::contained(chord("-G")),
        ]);
        let chords = [chord("-SDZ")];
        let satisfied: Vec<Case> = condition.satisfied_cases(&chords).collect();
        assert_eq!(satisfied, vec![Case::contained(chord("-D")), Case::contained(chord("-Z"))]);
    }

    fn arb_keys() -> impl Strategy<Value = Chord> {
        any::<u32>().prop_map(|bits| Chord::from_keys(Keys::from_bits_truncate(bits)))
    }

    proptest! {
        #[test]
        fn removing_an_applied_fold_restores_the_chord(
            base in arb_keys(),
            contained in arb_keys(),
            toggled in arb_keys(),
        ) {
            let toggled = toggled - contained;
            let base = base - contained;
            let case = Case::new(contained, toggled).unwrap();
            prop_assert_eq!(case.remove_fold(case.apply_fold(base)), base);
        }
    }
}
