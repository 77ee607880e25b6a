//! Chords and outlines.
//!
//! A [`Chord`] is one simultaneous key press on a steno keyboard: an immutable
//! set of keys drawn from the English steno layout. An [`Outline`] is an
//! ordered sequence of chords and is the key used for every dictionary lookup.
//!
//! ```text
//!  #  S- T- K- P- W- H- R-  A- O-  *  -E -U  -F -R -P -B -L -G -T -S -D -Z
//!  └──────── left bank ───┘  └─ vowels / star ─┘  └────── right bank ──────┘
//! ```
//!
//! Notation follows the usual steno convention: keys are written in layout
//! order, and a `-` separates the banks when no vowel or `*` does it already
//! (`"-Z"`, `"TPH-PB"`, `"TPHO"`).

use crate::error::{FoldError, FoldResult};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;
use std::sync::Arc;

bitflags::bitflags! {
    /// The physical keys of the English steno layout, in steno order.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Keys: u32 {
        const NUMBER   = 1 << 0;
        const S_LEFT   = 1 << 1;
        const T_LEFT   = 1 << 2;
        const K_LEFT   = 1 << 3;
        const P_LEFT   = 1 << 4;
        const W_LEFT   = 1 << 5;
        const H_LEFT   = 1 << 6;
        const R_LEFT   = 1 << 7;
        const A        = 1 << 8;
        const O        = 1 << 9;
        const STAR     = 1 << 10;
        const E        = 1 << 11;
        const U        = 1 << 12;
        const F_RIGHT  = 1 << 13;
        const R_RIGHT  = 1 << 14;
        const P_RIGHT  = 1 << 15;
        const B_RIGHT  = 1 << 16;
        const L_RIGHT  = 1 << 17;
        const G_RIGHT  = 1 << 18;
        const T_RIGHT  = 1 << 19;
        const S_RIGHT  = 1 << 20;
        const D_RIGHT  = 1 << 21;
        const Z_RIGHT  = 1 << 22;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bank {
    Left,
    Middle,
    Right,
}

/// Layout table in steno order. The position of each entry matches the
/// capture group order of the notation regex (minus the hyphen group).
const LAYOUT: [(Keys, char, Bank); 23] = [
    (Keys::NUMBER, '#', Bank::Left),
    (Keys::S_LEFT, 'S', Bank::Left),
    (Keys::T_LEFT, 'T', Bank::Left),
    (Keys::K_LEFT, 'K', Bank::Left),
    (Keys::P_LEFT, 'P', Bank::Left),
    (Keys::W_LEFT, 'W', Bank::Left),
    (Keys::H_LEFT, 'H', Bank::Left),
    (Keys::R_LEFT, 'R', Bank::Left),
    (Keys::A, 'A', Bank::Middle),
    (Keys::O, 'O', Bank::Middle),
    (Keys::STAR, '*', Bank::Middle),
    (Keys::E, 'E', Bank::Middle),
    (Keys::U, 'U', Bank::Middle),
    (Keys::F_RIGHT, 'F', Bank::Right),
    (Keys::R_RIGHT, 'R', Bank::Right),
    (Keys::P_RIGHT, 'P', Bank::Right),
    (Keys::B_RIGHT, 'B', Bank::Right),
    (Keys::L_RIGHT, 'L', Bank::Right),
    (Keys::G_RIGHT, 'G', Bank::Right),
    (Keys::T_RIGHT, 'T', Bank::Right),
    (Keys::S_RIGHT, 'S', Bank::Right),
    (Keys::D_RIGHT, 'D', Bank::Right),
    (Keys::Z_RIGHT, 'Z', Bank::Right),
];

/// Capture group of the explicit bank separator in the notation regex.
const HYPHEN_GROUP: usize = 12;

/// An immutable set of steno keys pressed together.
///
/// Set algebra is exposed both as methods and as operators: `a + b` is the
/// union and `a - b` the difference.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Chord(Keys);

impl Chord {
    /// The chord with no keys.
    pub const EMPTY: Chord = Chord(Keys::empty());

    pub const fn from_keys(keys: Keys) -> Self {
        Chord(keys)
    }

    /// Parse steno notation such as `"TPHO"`, `"-Z"` or `"KA*T"`.
    pub fn from_steno(notation: &str) -> FoldResult<Self> {
        let re = regex!(
            r"^(#)?(S)?(T)?(K)?(P)?(W)?(H)?(R)?(A)?(O)?(\*)?(-)?(E)?(U)?(F)?(R)?(P)?(B)?(L)?(G)?(T)?(S)?(D)?(Z)?$"
        );
        let caps = re.captures(notation).ok_or_else(|| FoldError::InvalidChord { notation: notation.to_string() })?;

        let mut keys = Keys::empty();
        let groups = (1..caps.len()).filter(|&group| group != HYPHEN_GROUP);
        for ((key, _, _), group) in LAYOUT.iter().zip(groups) {
            if caps.get(group).is_some() {
                keys |= *key;
            }
        }
        Ok(Chord(keys))
    }

    pub const fn keys(self) -> Keys {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0.is_empty()
    }

    /// Number of keys in the chord.
    pub fn len(self) -> usize {
        self.0.bits().count_ones() as usize
    }

    pub fn union(self, other: Chord) -> Chord {
        Chord(self.0 | other.0)
    }

    pub fn difference(self, other: Chord) -> Chord {
        Chord(self.0 - other.0)
    }

    pub fn intersection(self, other: Chord) -> Chord {
        Chord(self.0 & other.0)
    }

    /// True if every key of `other` is in `self` (`other in self`).
    pub fn contains(self, other: Chord) -> bool {
        self.0.contains(other.0)
    }

    /// True if the two chords share at least one key.
    pub fn overlaps(self, other: Chord) -> bool {
        self.0.intersects(other.0)
    }

    /// Flip the membership of every key in `keys`.
    pub fn toggle(self, keys: Chord) -> Chord {
        Chord(self.0 ^ keys.0)
    }
}

impl Add for Chord {
    type Output = Chord;

    fn add(self, rhs: Chord) -> Chord {
        self.union(rhs)
    }
}

impl Sub for Chord {
    type Output = Chord;

    fn sub(self, rhs: Chord) -> Chord {
        self.difference(rhs)
    }
}

impl FromStr for Chord {
    type Err = FoldError;

    fn from_str(s: &str) -> FoldResult<Self> {
        Chord::from_steno(s)
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let has_middle = LAYOUT.iter().any(|(key, _, bank)| *bank == Bank::Middle && self.0.contains(*key));
        let mut hyphen_written = false;

        for (key, letter, bank) in LAYOUT.iter() {
            if !self.0.contains(*key) {
                continue;
            }
            if *bank == Bank::Right && !has_middle && !hyphen_written {
                f.write_str("-")?;
                hyphen_written = true;
            }
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Chord({self})")
    }
}

// --- Outline -----------------------------------------------------------------

/// An immutable, ordered sequence of chords: one dictionary lookup key.
///
/// Cloning is cheap (the chords are shared), and outlines hash by value so
/// they can key the memo tables in [`LookupContext`](crate::LookupContext).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Outline(Arc<[Chord]>);

impl Outline {
    pub fn new(chords: impl Into<Arc<[Chord]>>) -> Self {
        Outline(chords.into())
    }

    /// Parse `/`-separated steno notation, e.g. `"TPHO/-Z"`.
    pub fn from_steno(notation: &str) -> FoldResult<Self> {
        notation
            .split('/')
            .enumerate()
            .map(|(index, chord)| {
                Chord::from_steno(chord)
                    .map_err(|_| FoldError::InvalidOutline { notation: notation.to_string(), index })
            })
            .collect()
    }

    pub fn chords(&self) -> &[Chord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<Chord> {
        self.0.first().copied()
    }

    pub fn last(&self) -> Option<Chord> {
        self.0.last().copied()
    }

    pub fn get(&self, index: usize) -> Option<Chord> {
        self.0.get(index).copied()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = Chord> + ExactSizeIterator + '_ {
        self.0.iter().copied()
    }

    /// The outline starting at chord `start` (empty if out of range).
    pub fn suffix(&self, start: usize) -> Outline {
        Outline::new(self.0.get(start..).unwrap_or(&[]))
    }

    /// The outline with every empty chord removed.
    pub fn compact(&self) -> Outline {
        self.iter().filter(|chord| !chord.is_empty()).collect()
    }

    /// A new outline made of `self` followed by `other`.
    pub fn concat(&self, other: &Outline) -> Outline {
        self.iter().chain(other.iter()).collect()
    }
}

impl FromIterator<Chord> for Outline {
    fn from_iter<I: IntoIterator<Item = Chord>>(iter: I) -> Self {
        Outline(iter.into_iter().collect())
    }
}

impl From<Chord> for Outline {
    fn from(chord: Chord) -> Self {
        Outline::new([chord])
    }
}

impl FromStr for Outline {
    type Err = FoldError;

    fn from_str(s: &str) -> FoldResult<Self> {
        Outline::from_steno(s)
    }
}

impl fmt::Display for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, chord) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{chord}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Outline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Outline({self})")
    }
}
