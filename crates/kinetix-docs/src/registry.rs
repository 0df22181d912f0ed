//! Content registry
//!
//! Stores page records keyed by identifier and derives the canonical page
//! order used by every consumer. The registry remembers registration order
//! only so that "last registration wins" is well defined for consumers that
//! fold over it (see [`crate::symbols::SymbolIndex`]).

use std::cmp::Ordering;

use indexmap::IndexMap;

use crate::anchor::{slugify, Anchor};
use crate::content::PageRecord;

/// Category roots that sort ahead of all others, in this order
pub const ROOT_PRIORITY: [&str; 3] = ["Manual", "Libraries", "OS Specific"];

/// Rank used for pages without an explicit `order`
pub const RANK_SENTINEL: u32 = u32::MAX;

/// Position of a category root in [`ROOT_PRIORITY`]
pub fn root_rank(root: &str) -> Option<usize> {
    ROOT_PRIORITY.iter().position(|r| *r == root)
}

/// Order two category roots: prioritized roots first, the rest alphabetically
pub fn compare_roots(a: &str, b: &str) -> Ordering {
    match (root_rank(a), root_rank(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

/// Order two pages that share a category level: rank, then title
pub fn compare_rank_title(a: &PageRecord, b: &PageRecord) -> Ordering {
    rank(a)
        .cmp(&rank(b))
        .then_with(|| a.title.cmp(&b.title))
}

fn rank(page: &PageRecord) -> u32 {
    page.order.unwrap_or(RANK_SENTINEL)
}

/// Canonical page order: root priority, category path, rank, title
pub fn compare_pages(a: &PageRecord, b: &PageRecord) -> Ordering {
    compare_roots(a.category.root(), b.category.root())
        .then_with(|| a.category.cmp(&b.category))
        .then_with(|| compare_rank_title(a, b))
}

/// In-memory store of all documentation pages
#[derive(Debug, Clone, Default)]
pub struct Registry {
    pages: IndexMap<String, PageRecord>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the page at `id`
    ///
    /// Overwriting is tolerated: the new record replaces the old one and
    /// counts as the most recent registration. The replaced record is
    /// returned.
    pub fn register(&mut self, id: impl Into<String>, record: PageRecord) -> Option<PageRecord> {
        let id = id.into();
        let previous = self.pages.shift_remove(&id);
        if previous.is_some() {
            tracing::warn!(id = %id, "page registered twice, keeping the last registration");
        }
        self.pages.insert(id, record);
        previous
    }

    pub fn get(&self, id: &str) -> Option<&PageRecord> {
        self.pages.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pages.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Pages in registration order, oldest first
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PageRecord)> {
        self.pages.iter().map(|(id, page)| (id.as_str(), page))
    }

    /// Every id in canonical order
    ///
    /// Ties on (category, rank, title) fall back to the id, so the result is
    /// a pure function of the registry contents.
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut entries: Vec<(&String, &PageRecord)> = self.pages.iter().collect();
        entries.sort_by(|(id_a, a), (id_b, b)| compare_pages(a, b).then_with(|| id_a.cmp(id_b)));
        entries.into_iter().map(|(id, _)| id.as_str()).collect()
    }

    /// Whether the rendered documentation contains an element for `anchor`
    pub fn has_anchor(&self, anchor: &Anchor) -> bool {
        let Some(page) = self.get(anchor.page_id()) else {
            return false;
        };
        let Some(section) = anchor.section_slug() else {
            return true;
        };

        match section {
            "methods" if !page.methods.is_empty() => true,
            "properties" if !page.properties.is_empty() => true,
            "signals" if !page.signals.is_empty() => true,
            "constants" if !page.constants.is_empty() => true,
            _ => {
                page.groups.iter().any(|g| slugify(&g.title) == section)
                    || page.members().any(|m| m.name() == section)
                    || page.constants.iter().any(|c| c.name == section)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{GroupRecord, MethodRecord};

    fn page(title: &str, category: &str) -> PageRecord {
        PageRecord::new(title, category)
    }

    #[test]
    fn test_root_priority_order() {
        let mut registry = Registry::new();
        registry.register("zeta", page("Zeta", "Tooling"));
        registry.register("os", page("OS", "OS Specific"));
        registry.register("math", page("Math", "Libraries/Core"));
        registry.register("intro", page("Introduction", "Manual"));
        registry.register("alpha", page("Alpha", "Appendix"));

        assert_eq!(
            registry.sorted_keys(),
            vec!["intro", "math", "os", "alpha", "zeta"]
        );
    }

    #[test]
    fn test_category_then_rank_then_title() {
        let mut registry = Registry::new();
        registry.register("net", page("Net", "Libraries/Network"));
        registry.register("system", page("System", "Libraries/Core"));
        registry.register("math", page("Math", "Libraries/Core"));
        registry.register("basics", page("Syntax Basics", "Manual/Syntax").with_order(1));
        registry.register("symbols", page("Aaa Symbols", "Manual/Syntax"));
        registry.register("vectors", page("Vectors", "Manual/Syntax").with_order(2));

        assert_eq!(
            registry.sorted_keys(),
            vec!["basics", "vectors", "symbols", "math", "system", "net"]
        );
    }

    #[test]
    fn test_sorted_keys_deterministic() {
        let mut forward = Registry::new();
        forward.register("a", page("Same", "Manual"));
        forward.register("b", page("Same", "Manual"));

        let mut backward = Registry::new();
        backward.register("b", page("Same", "Manual"));
        backward.register("a", page("Same", "Manual"));

        assert_eq!(forward.sorted_keys(), backward.sorted_keys());
        assert_eq!(forward.sorted_keys(), forward.sorted_keys());
    }

    #[test]
    fn test_register_overwrites() {
        let mut registry = Registry::new();
        assert!(registry.register("math", page("Math", "Libraries")).is_none());
        registry.register("net", page("Net", "Libraries"));
        let previous = registry.register("math", page("Math v2", "Libraries"));

        assert_eq!(previous.map(|p| p.title), Some("Math".to_string()));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("math").unwrap().title, "Math v2");
        // Re-registration counts as the newest
        let order: Vec<_> = registry.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec!["net", "math"]);
    }

    #[test]
    fn test_has_anchor() {
        let mut registry = Registry::new();
        registry.register(
            "os",
            page("OS", "Libraries")
                .with_group(GroupRecord::new("File System").with_method(MethodRecord::new(
                    "chmod", "void", "()",
                ))),
        );

        assert!(registry.has_anchor(&Anchor::page("os")));
        assert!(registry.has_anchor(&Anchor::member("os", "file_system")));
        assert!(registry.has_anchor(&Anchor::member("os", "chmod")));
        assert!(!registry.has_anchor(&Anchor::member("os", "methods")));
        assert!(!registry.has_anchor(&Anchor::page("missing")));
    }
}
