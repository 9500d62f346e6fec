//! Rule document loading.
//!
//! Reads the JSON rule array produced by the authoring tooling into an
//! in-memory [`RuleSet`] and scopes it to a screening scenario.

mod core;

#[cfg(test)]
mod tests;

pub use self::core::RuleSet;
