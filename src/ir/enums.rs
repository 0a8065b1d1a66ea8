//! Enum deduplication
//!
//! Enumerations with the same set of values collapse to one named type,
//! no matter which composite declared them or in which order the values were
//! listed. Distinct value sets that want the same name are qualified with the
//! owner's name, and numbered if the qualified name is taken too.

use std::collections::{BTreeSet, HashMap};

use crate::generation::utils::to_proper_case;
use crate::ir::{EnumValue, TypeId};

/// Set-equality key for an enum's values
pub type EnumKey = BTreeSet<EnumValue>;

/// Tracks registered enum value sets
#[derive(Debug, Default, Clone)]
pub struct EnumRegistry {
    by_values: HashMap<EnumKey, TypeId>,
}

impl EnumRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(values: &[EnumValue]) -> EnumKey {
        values.iter().cloned().collect()
    }

    /// Previously registered enum carrying exactly these values
    pub fn find(&self, values: &[EnumValue]) -> Option<TypeId> {
        self.by_values.get(&Self::key(values)).copied()
    }

    pub fn record(&mut self, values: &[EnumValue], id: TypeId) {
        self.by_values.entry(Self::key(values)).or_insert(id);
    }

    /// Distinct value sets recorded so far
    pub(crate) fn distinct(&self) -> usize {
        self.by_values.len()
    }

    /// Picks a free name for a new enum.
    ///
    /// Tries the natural name, then `Owner` + natural name, then numbered
    /// variants of the qualified name.
    pub fn resolve_name(natural: &str, owner: &str, is_taken: impl Fn(&str) -> bool) -> String {
        let natural = to_proper_case(natural);
        if !is_taken(&natural) {
            return natural;
        }
        let qualified = to_proper_case(&format!("{owner}_{natural}"));
        if !is_taken(&qualified) {
            return qualified;
        }
        (1..)
            .map(|n| format!("{qualified}{n}"))
            .find(|candidate| !is_taken(candidate))
            .unwrap_or(qualified)
    }
}
