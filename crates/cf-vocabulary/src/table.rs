//! In-memory standard-name vocabulary.

use std::collections::HashMap;

/// One entry of the standard-name table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardNameEntry {
    pub name: String,
    pub canonical_units: Option<String>,
    pub description: Option<String>,
}

impl StandardNameEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            canonical_units: None,
            description: None,
        }
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.canonical_units = Some(units.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Canonical name → entry lookup, loaded once per run and shared read-only.
///
/// Lookups are exact; alias ids resolve to the entry they point to.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    version: Option<String>,
    entries: HashMap<String, StandardNameEntry>,
    aliases: HashMap<String, String>,
}

impl Vocabulary {
    /// A vocabulary with no entries. Every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: impl IntoIterator<Item = StandardNameEntry>) -> Self {
        Self {
            version: None,
            entries: entries.into_iter().map(|e| (e.name.clone(), e)).collect(),
            aliases: HashMap::new(),
        }
    }

    pub(crate) fn from_parts(
        version: Option<String>,
        entries: HashMap<String, StandardNameEntry>,
        aliases: HashMap<String, String>,
    ) -> Self {
        Self {
            version,
            entries,
            aliases,
        }
    }

    /// Table version number, when the document declared one.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn lookup(&self, name: &str) -> Option<&StandardNameEntry> {
        self.entries.get(name).or_else(|| {
            self.aliases
                .get(name)
                .and_then(|target| self.entries.get(target))
        })
    }

    pub fn canonical_units(&self, name: &str) -> Option<&str> {
        self.lookup(name)?.canonical_units.as_deref()
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.lookup(name)?.description.as_deref()
    }

    /// Number of entries, not counting aliases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}
