//! Symbol index for cross-linking code
//!
//! Maps bare names appearing in code (page ids and titles, member names,
//! language keywords, operators) to the anchor that documents them.
//! Collisions resolve to the last registration; ambiguous names silently
//! point at whichever page registered them last.

use std::collections::HashMap;

use crate::anchor::Anchor;
use crate::registry::Registry;

/// Member names must be longer than this to be indexed
pub const MIN_MEMBER_NAME_LEN: usize = 2;

/// Landing page for keywords, literals and basic types
pub const SYNTAX_PAGE: &str = "syntax_basics";

/// Landing page for operators and punctuation
pub const SYMBOLS_PAGE: &str = "syntax_symbols";

/// Hand-curated aliases for enum-like and abbreviated names
const CURATED_ALIASES: &[(&str, &str)] = &[
    ("Key", "game"),
    ("Color", "math"),
    ("Vector3", "math"),
    ("Vector2", "math"),
    ("sys", "system"),
    ("fs", "data"),
];

const KEYWORDS: &[&str] = &[
    "func", "fn", "var", "let", "const", "mut", "if", "else", "for", "while", "loop", "break",
    "continue", "return", "class", "struct", "enum", "import", "from", "pub", "mod", "switch",
    "case", "default", "as", "in", "is", "try", "catch", "throw", "async", "await",
];

const TYPES: &[&str] = &[
    "int",
    "float",
    "string",
    "bool",
    "void",
    "Any",
    "List",
    "Dictionary",
    "Result",
    "Option",
];

const LITERALS: &[&str] = &["true", "false", "null"];

const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "=", "+=", "-=", "*=", "/=", "==", "!=", "<", ">", "<=", ">=", "&&",
    "||", "!", ";", ":", ".", ",", "->", "=>", "?", "::", "..", "(", ")", "[", "]", "{", "}",
];

/// Name to anchor mapping used by the highlighter
#[derive(Debug, Clone, Default)]
pub struct SymbolIndex {
    symbols: HashMap<String, Anchor>,
}

impl SymbolIndex {
    /// An index with no entries at all
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every page of the registry, then seed the fixed aliases
    ///
    /// Pages are folded in registration order, so a later page wins any
    /// name it shares with an earlier one. The fixed aliases are applied
    /// last and win over page names.
    pub fn build(registry: &Registry) -> Self {
        let mut index = Self::new();

        for (id, page) in registry.iter() {
            index.insert(page.title.clone(), Anchor::page(id));
            index.insert(id, Anchor::page(id));

            for member in page.members() {
                let name = member.name();
                if name.chars().count() > MIN_MEMBER_NAME_LEN {
                    index.insert(name, Anchor::member(id, name));
                }
            }
        }

        index.seed_aliases();
        tracing::debug!(symbols = index.len(), pages = registry.len(), "built symbol index");
        index
    }

    fn seed_aliases(&mut self) {
        for (name, page) in CURATED_ALIASES {
            self.insert(*name, Anchor::page(*page));
        }
        for name in KEYWORDS.iter().chain(TYPES).chain(LITERALS) {
            self.insert(*name, Anchor::page(SYNTAX_PAGE));
        }
        for symbol in OPERATORS {
            self.insert(*symbol, Anchor::page(SYMBOLS_PAGE));
        }
    }

    /// Point `name` at `anchor`, replacing any earlier target
    pub fn insert(&mut self, name: impl Into<String>, anchor: Anchor) -> Option<Anchor> {
        let name = name.into();
        let previous = self.symbols.insert(name.clone(), anchor);
        if let Some(previous) = &previous {
            tracing::trace!(symbol = %name, replaced = %previous, "symbol collision, last registration wins");
        }
        previous
    }

    pub fn resolve(&self, name: &str) -> Option<&Anchor> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}
