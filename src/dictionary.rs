//! Host-side dictionaries.
//!
//! The folding engine never stores translations itself; it asks a host
//! dictionary through [`Lookup`]. This module provides a small host:
//!
//! ```text
//! Translator (highest priority first)
//!   ├─ Dictionary::Steno(StenoDictionary)      plain outline -> text
//!   ├─ Dictionary::Function(FunctionDictionary) computed outline -> text
//!   ├─ Dictionary::Folding(FoldingDictionary)  rules, querying the Translator
//!   └─ ...
//! ```
//!
//! The folding dictionary receives the whole translator as its `Lookup`, so a
//! rule can find the defolded outline in any layer, including another folding
//! layer.

use crate::api::FoldingDictionary;
use crate::chord::Outline;
use crate::engine::{Lookup, LookupContext};
use crate::error::FoldResult;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An in-memory outline-to-translation map.
#[derive(Debug, Clone, Default)]
pub struct StenoDictionary {
    entries: HashMap<Outline, String>,
    longest_key: usize,
}

impl StenoDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from steno notation pairs such as `("TPHO", "no")`.
    pub fn from_entries<'a, I>(entries: I) -> FoldResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut dictionary = StenoDictionary::new();
        for (steno, translation) in entries {
            dictionary.insert(Outline::from_steno(steno)?, translation);
        }
        Ok(dictionary)
    }

    pub fn insert(&mut self, outline: Outline, translation: impl Into<String>) {
        self.longest_key = self.longest_key.max(outline.len());
        self.entries.insert(outline, translation.into());
    }

    pub fn remove(&mut self, outline: &Outline) -> Option<String> {
        let removed = self.entries.remove(outline);
        if removed.is_some() && outline.len() == self.longest_key {
            self.longest_key = self.entries.keys().map(Outline::len).max().unwrap_or(0);
        }
        removed
    }

    pub fn get(&self, outline: &Outline) -> Option<&str> {
        if outline.len() > self.longest_key {
            return None;
        }
        self.entries.get(outline).map(String::as_str)
    }

    /// Length of the longest outline in the dictionary.
    pub fn longest_key(&self) -> usize {
        self.longest_key
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Outline, String)> for StenoDictionary {
    fn from_iter<I: IntoIterator<Item = (Outline, String)>>(iter: I) -> Self {
        let mut dictionary = StenoDictionary::new();
        for (outline, translation) in iter {
            dictionary.insert(outline, translation);
        }
        dictionary
    }
}

impl Lookup for StenoDictionary {
    fn lookup(&self, outline: &Outline, _context: &mut LookupContext) -> Option<String> {
        self.get(outline).map(str::to_owned)
    }
}

/// Translation function behind a [`FunctionDictionary`].
pub type TranslateFn = Arc<dyn Fn(&Outline) -> Option<String> + Send + Sync>;

/// A read-only dictionary whose entries are computed by a function.
///
/// Outlines longer than `longest_key` are never passed to the function.
#[derive(Clone)]
pub struct FunctionDictionary {
    translate: TranslateFn,
    longest_key: usize,
}

impl FunctionDictionary {
    pub fn new<F>(longest_key: usize, translate: F) -> Self
    where
        F: Fn(&Outline) -> Option<String> + Send + Sync + 'static,
    {
        FunctionDictionary { translate: Arc::new(translate), longest_key }
    }

    pub fn get(&self, outline: &Outline) -> Option<String> {
        if outline.is_empty() || outline.len() > self.longest_key {
            return None;
        }
        (self.translate)(outline)
    }

    pub fn longest_key(&self) -> usize {
        self.longest_key
    }
}

impl fmt::Debug for FunctionDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDictionary").field("longest_key", &self.longest_key).finish_non_exhaustive()
    }
}

impl Lookup for FunctionDictionary {
    fn lookup(&self, outline: &Outline, _context: &mut LookupContext) -> Option<String> {
        self.get(outline)
    }
}

/// One layer of a [`Translator`].
#[derive(Debug, Clone)]
pub enum Dictionary {
    Steno(StenoDictionary),
    Function(FunctionDictionary),
    Folding(FoldingDictionary),
}

impl Dictionary {
    pub fn longest_key(&self) -> usize {
        match self {
            Dictionary::Steno(dictionary) => dictionary.longest_key(),
            Dictionary::Function(dictionary) => dictionary.longest_key(),
            Dictionary::Folding(dictionary) => dictionary.longest_key(),
        }
    }
}

impl From<StenoDictionary> for Dictionary {
    fn from(dictionary: StenoDictionary) -> Self {
        Dictionary::Steno(dictionary)
    }
}

impl From<FunctionDictionary> for Dictionary {
    fn from(dictionary: FunctionDictionary) -> Self {
        Dictionary::Function(dictionary)
    }
}

impl From<FoldingDictionary> for Dictionary {
    fn from(dictionary: FoldingDictionary) -> Self {
        Dictionary::Folding(dictionary)
    }
}

/// An ordered dictionary stack; earlier layers take precedence.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    dictionaries: Vec<Dictionary>,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer below every existing one.
    pub fn with(mut self, dictionary: impl Into<Dictionary>) -> Self {
        self.push(dictionary);
        self
    }

    pub fn push(&mut self, dictionary: impl Into<Dictionary>) {
        self.dictionaries.push(dictionary.into());
    }

    pub fn dictionaries(&self) -> &[Dictionary] {
        &self.dictionaries
    }

    pub fn longest_key(&self) -> usize {
        self.dictionaries.iter().map(Dictionary::longest_key).max().unwrap_or(0)
    }

    /// Like [`Lookup::lookup`], but a misconfigured folding layer is an error.
    pub fn try_lookup(&self, outline: &Outline, context: &mut LookupContext) -> FoldResult<Option<String>> {
        for dictionary in &self.dictionaries {
            let translation = match dictionary {
                Dictionary::Steno(steno) => steno.get(outline).map(str::to_owned),
                Dictionary::Function(function) => function.get(outline),
                Dictionary::Folding(folding) => folding.get(outline, self, context)?,
            };
            if translation.is_some() {
                return Ok(translation);
            }
        }
        Ok(None)
    }
}

impl Lookup for Translator {
    fn lookup(&self, outline: &Outline, context: &mut LookupContext) -> Option<String> {
        for dictionary in &self.dictionaries {
            let translation = match dictionary {
                Dictionary::Steno(steno) => steno.get(outline).map(str::to_owned),
                Dictionary::Function(function) => function.get(outline),
                Dictionary::Folding(folding) => match folding.get(outline, self, context) {
                    Ok(translation) => translation,
                    Err(err) => {
                        tracing::error!(%outline, error = %err, "folding dictionary lookup failed");
                        None
                    }
                },
            };
            if translation.is_some() {
                return translation;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline(steno: &str) -> Outline {
        Outline::from_steno(steno).unwrap()
    }

    #[test]
    fn steno_dictionary_tracks_longest_key() {
        let mut dictionary = StenoDictionary::from_entries([("KAT", "cat"), ("KAT/-Z", "cats")]).unwrap();
        assert_eq!(dictionary.longest_key(), 2);
        assert_eq!(dictionary.get(&outline("KAT/-Z")), Some("cats"));

        dictionary.remove(&outline("KAT/-Z"));
        assert_eq!(dictionary.longest_key(), 1);
        assert_eq!(dictionary.len(), 1);
    }

    #[test]
    fn bad_notation_is_rejected() {
        assert!(StenoDictionary::from_entries([("KAT/ZZ", "cats")]).is_err());
    }

    #[test]
    fn earlier_layers_win() {
        let user = StenoDictionary::from_entries([("KAT", "Cat")]).unwrap();
        let main = StenoDictionary::from_entries([("KAT", "cat"), ("TKOG", "dog")]).unwrap();
        let translator = Translator::new().with(user).with(main);

        let mut context = LookupContext::new();
        assert_eq!(translator.lookup(&outline("KAT"), &mut context), Some("Cat".into()));
        assert_eq!(translator.lookup(&outline("TKOG"), &mut context), Some("dog".into()));
        assert_eq!(translator.lookup(&outline("PWEUFRD"), &mut context), None);
        assert_eq!(translator.longest_key(), 1);
    }

    #[test]
    fn function_dictionary_respects_its_longest_key() {
        let numbers = FunctionDictionary::new(2, |outline: &Outline| {
            outline.iter().all(|chord| chord.to_string().starts_with('#')).then(|| format!("{} numbers", outline.len()))
        });
        let translator = Translator::new().with(numbers).with(StenoDictionary::from_entries([("KAT", "cat")]).unwrap());

        let mut context = LookupContext::new();
        assert_eq!(translator.lookup(&outline("#S/#T"), &mut context), Some("2 numbers".into()));
        assert_eq!(translator.lookup(&outline("#S/#T/#K"), &mut context), None);
        assert_eq!(translator.lookup(&outline("KAT"), &mut context), Some("cat".into()));
        assert_eq!(translator.try_lookup(&outline("#S"), &mut context), Ok(Some("1 numbers".into())));
        assert_eq!(translator.longest_key(), 2);
    }
}
