//! Named exceptions to the per-name merge policy.
//!
//! Some upstream declarations are known to be inconsistent in a way the
//! structural merge would (correctly) reject. Each such name gets an entry
//! here with the reason it exists. Entries are looked up by the cleaned name
//! of the first operand. Do not add a name without having checked the
//! declarations it covers.

use rustc_hash::FxHashMap;

/// What to do when an overridden name is merged.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OverrideRule {
    /// Skip structural merging and keep the first-seen type.
    KeepFirst,
}

/// One documented exception.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MergeOverride {
    pub name: String,
    pub rule: OverrideRule,
    pub reason: String,
}

/// `OSStatus` is declared as `long` in some headers and as `long`/`int`
/// (32-bit/64-bit) in others, so the 64-bit shapes disagree across sites.
const OS_STATUS: (&str, &str) = (
    "OSStatus",
    "declared as `long` in some headers and `long`/`int` in others",
);

/// The override table consulted by [`crate::TypeMerger`].
#[derive(Clone, Debug, Default)]
pub struct MergeOverrides {
    entries: FxHashMap<String, MergeOverride>,
}

impl MergeOverrides {
    /// An empty table: every name goes through the structural merge.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The shipped table.
    pub fn builtin() -> Self {
        let mut table = Self::empty();
        let (name, reason) = OS_STATUS;
        table.insert(MergeOverride {
            name: name.to_owned(),
            rule: OverrideRule::KeepFirst,
            reason: reason.to_owned(),
        });
        table
    }

    /// Add or replace an entry. Returns the entry it replaced.
    pub fn insert(&mut self, entry: MergeOverride) -> Option<MergeOverride> {
        self.entries.insert(entry.name.clone(), entry)
    }

    pub fn get(&self, name: &str) -> Option<&MergeOverride> {
        self.entries.get(name)
    }

    /// The rule for `name`, if it has one. Anonymous types never do.
    pub fn rule_for(&self, name: Option<&str>) -> Option<OverrideRule> {
        name.and_then(|n| self.entries.get(n)).map(|entry| entry.rule)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_only_os_status() {
        let table = MergeOverrides::builtin();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rule_for(Some("OSStatus")), Some(OverrideRule::KeepFirst));
        assert_eq!(table.rule_for(Some("OSErr")), None);
        assert_eq!(table.rule_for(None), None);
    }

    #[test]
    fn insert_replaces() {
        let mut table = MergeOverrides::empty();
        assert!(table.is_empty());
        let entry = MergeOverride {
            name: "CFIndex".to_owned(),
            rule: OverrideRule::KeepFirst,
            reason: "test".to_owned(),
        };
        assert_eq!(table.insert(entry.clone()), None);
        assert_eq!(table.insert(entry.clone()), Some(entry));
        assert_eq!(table.get("CFIndex").map(|e| e.rule), Some(OverrideRule::KeepFirst));
    }
}
