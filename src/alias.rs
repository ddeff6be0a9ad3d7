//! The alias table: named textual substitutions applied to the first token
//! of a command line.

/// Upper bound on stored aliases; definitions past it are dropped silently.
pub const MAX_ALIASES: usize = 32;

/// A single alias definition.
#[derive(Debug, Clone)]
pub struct Alias {
    pub name: String,
    pub expansion: String,
}

/// Bounded, append-only table of aliases.
///
/// Redefining a name appends a second entry instead of replacing the first;
/// [`lookup`](AliasTable::lookup) returns the earliest match, so the first
/// definition wins for the lifetime of the session.
#[derive(Debug, Default)]
pub struct AliasTable {
    entries: Vec<Alias>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a definition. Returns `false` when the table is full and the
    /// definition was dropped.
    pub fn define(&mut self, name: impl Into<String>, expansion: impl Into<String>) -> bool {
        if self.entries.len() >= MAX_ALIASES {
            return false;
        }
        self.entries.push(Alias {
            name: name.into(),
            expansion: expansion.into(),
        });
        true
    }

    /// Expansion for `name`, earliest definition first.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|alias| alias.name == name)
            .map(|alias| alias.expansion.as_str())
    }

    /// Entries in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Alias> {
        self.entries.iter()
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
    fn test_define_and_lookup() {
        let mut table = AliasTable::new();
        assert!(table.define("ll", "ls -la"));
        assert_eq!(table.lookup("ll"), Some("ls -la"));
        assert_eq!(table.lookup("lll"), None);
    }

    #[test]
    fn test_duplicate_definitions_keep_first_match() {
        let mut table = AliasTable::new();
        table.define("g", "git");
        table.define("g", "grep");

        // Both entries exist, the earliest wins at lookup time.
        assert_eq!(table.len(), 2);
        assert_eq!(table.lookup("g"), Some("git"));
    }

    #[test]
    fn test_capacity_drops_silently() {
        let mut table = AliasTable::new();
        for i in 0..MAX_ALIASES {
            assert!(table.define(format!("a{i}"), "x"));
        }
        assert!(!table.define("overflow", "y"));
        assert_eq!(table.len(), MAX_ALIASES);
        assert_eq!(table.lookup("overflow"), None);
    }

    #[test]
    fn test_iter_preserves_definition_order() {
        let mut table = AliasTable::new();
        table.define("one", "1");
        table.define("two", "2");
        let names: Vec<&str> = table.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["one", "two"]);
    }
}
