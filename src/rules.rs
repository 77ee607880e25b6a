//! Built-in rule sets.

#[path = "rules/english.rs"]
pub mod english;

#[cfg(test)]
#[path = "rules/tests.rs"]
mod tests;
