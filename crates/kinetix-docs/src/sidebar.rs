//! Sidebar navigation tree
//!
//! Built once from the registry. Afterwards only the presentation flags
//! change: visibility and expansion (search, navigation) and the active
//! link (navigation, scroll-spy).

use std::cmp::Ordering;

use crate::anchor::Anchor;
use crate::content::PageRecord;
use crate::registry::{compare_rank_title, compare_roots, Registry};

/// Label of the flat method list section
pub const METHODS_LABEL: &str = "Methods";
/// Label of the property list section
pub const PROPERTIES_LABEL: &str = "Properties";

/// Presentation flags of a collapsible node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeState {
    pub visible: bool,
    pub expanded: bool,
}

impl NodeState {
    /// Default for category nodes: shown and open
    pub const CATEGORY: NodeState = NodeState {
        visible: true,
        expanded: true,
    };

    /// Default for page entries: shown and closed
    pub const PAGE: NodeState = NodeState {
        visible: true,
        expanded: false,
    };
}

/// Secondary navigation target under a page entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLink {
    pub label: String,
    pub anchor: Anchor,
    pub active: bool,
}

impl SectionLink {
    fn new(label: impl Into<String>, anchor: Anchor) -> Self {
        Self {
            label: label.into(),
            anchor,
            active: false,
        }
    }
}

/// A page in the sidebar, collapsible to its sections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    pub id: String,
    pub title: String,
    pub sections: Vec<SectionLink>,
    pub state: NodeState,
    /// The page header link itself is active
    pub active: bool,
}

impl PageEntry {
    fn from_record(id: &str, page: &PageRecord) -> Self {
        let mut sections: Vec<SectionLink> = page
            .groups
            .iter()
            .map(|group| SectionLink::new(group.title.clone(), Anchor::section(id, &group.title)))
            .collect();
        if !page.methods.is_empty() {
            sections.push(SectionLink::new(METHODS_LABEL, Anchor::section(id, METHODS_LABEL)));
        }
        if !page.properties.is_empty() {
            sections.push(SectionLink::new(
                PROPERTIES_LABEL,
                Anchor::section(id, PROPERTIES_LABEL),
            ));
        }

        Self {
            id: id.to_string(),
            title: page.title.clone(),
            sections,
            state: NodeState::PAGE,
            active: false,
        }
    }

    pub fn anchor(&self) -> Anchor {
        Anchor::page(self.id.clone())
    }

    fn clear_active(&mut self) {
        self.active = false;
        for section in &mut self.sections {
            section.active = false;
        }
    }

    /// Mark the link for `anchor` active; false if this entry has none
    fn mark_active(&mut self, anchor: &Anchor) -> bool {
        if anchor.page_id() != self.id {
            return false;
        }
        if anchor.is_page() {
            self.active = true;
            return true;
        }
        match self.sections.iter_mut().find(|s| s.anchor == *anchor) {
            Some(section) => {
                section.active = true;
                true
            }
            None => false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active || self.sections.iter().any(|s| s.active)
    }
}

/// One level of the category hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode {
    pub name: String,
    /// Child categories, sorted
    pub children: Vec<CategoryNode>,
    /// Pages at this level, sorted by rank then title
    pub pages: Vec<PageEntry>,
    pub state: NodeState,
}

impl CategoryNode {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            pages: Vec::new(),
            state: NodeState::CATEGORY,
        }
    }

    pub fn child(&self, name: &str) -> Option<&CategoryNode> {
        self.children.iter().find(|c| c.name == name)
    }

    fn child_or_insert(&mut self, name: &str) -> &mut CategoryNode {
        child_or_insert(&mut self.children, name)
    }

    pub fn page(&self, id: &str) -> Option<&PageEntry> {
        self.pages.iter().find(|p| p.id == id)
    }

    /// Pages of this node and all descendants, depth first
    pub fn all_pages(&self) -> Box<dyn Iterator<Item = &PageEntry> + '_> {
        Box::new(
            self.pages
                .iter()
                .chain(self.children.iter().flat_map(CategoryNode::all_pages)),
        )
    }

    /// This node and every nested category, depth first
    pub fn categories(&self) -> Box<dyn Iterator<Item = &CategoryNode> + '_> {
        Box::new(std::iter::once(self).chain(self.children.iter().flat_map(CategoryNode::categories)))
    }

    fn sort(&mut self, registry: &Registry) {
        self.pages.sort_by(|a, b| compare_entries(registry, a, b));
        self.children.sort_by(|a, b| a.name.cmp(&b.name));
        for child in &mut self.children {
            child.sort(registry);
        }
    }

    fn for_each_page_mut(&mut self, f: &mut dyn FnMut(&mut PageEntry)) {
        for page in &mut self.pages {
            f(page);
        }
        for child in &mut self.children {
            child.for_each_page_mut(f);
        }
    }

    fn reset(&mut self) {
        self.state = NodeState::CATEGORY;
        for page in &mut self.pages {
            page.state = NodeState::PAGE;
        }
        for child in &mut self.children {
            child.reset();
        }
    }

    /// Activate the link for `anchor` below this node, expanding its ancestors
    fn activate(&mut self, anchor: &Anchor) -> bool {
        let mut found = false;
        for page in &mut self.pages {
            if page.mark_active(anchor) {
                page.state.expanded = true;
                found = true;
            }
        }
        for child in &mut self.children {
            found |= child.activate(anchor);
        }
        if found {
            self.state.expanded = true;
        }
        found
    }
}

fn child_or_insert<'a>(nodes: &'a mut Vec<CategoryNode>, name: &str) -> &'a mut CategoryNode {
    let index = match nodes.iter().position(|n| n.name == name) {
        Some(index) => index,
        None => {
            nodes.push(CategoryNode::new(name));
            nodes.len() - 1
        }
    };
    &mut nodes[index]
}

fn compare_entries(registry: &Registry, a: &PageEntry, b: &PageEntry) -> Ordering {
    let by_rank = match (registry.get(&a.id), registry.get(&b.id)) {
        (Some(x), Some(y)) => compare_rank_title(x, y),
        _ => Ordering::Equal,
    };
    by_rank.then_with(|| a.id.cmp(&b.id))
}

/// The whole sidebar: category roots plus the changelog link
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SidebarTree {
    pub roots: Vec<CategoryNode>,
    pub changelog_active: bool,
}

impl SidebarTree {
    /// Group every registered page under its category path
    pub fn build(registry: &Registry) -> Self {
        let mut roots: Vec<CategoryNode> = Vec::new();

        for (id, page) in registry.iter() {
            let mut segments = page.category.segments().iter();
            let Some(root) = segments.next() else {
                continue;
            };
            let mut node = child_or_insert(&mut roots, root);
            for segment in segments {
                node = node.child_or_insert(segment);
            }
            node.pages.push(PageEntry::from_record(id, page));
        }

        roots.sort_by(|a, b| compare_roots(&a.name, &b.name));
        for root in &mut roots {
            root.sort(registry);
        }

        Self {
            roots,
            changelog_active: false,
        }
    }

    pub fn root(&self, name: &str) -> Option<&CategoryNode> {
        self.roots.iter().find(|r| r.name == name)
    }

    /// Follow a chain of category names from the top level
    pub fn node(&self, path: &[&str]) -> Option<&CategoryNode> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.root(first)?, |node, name| node.child(name))
    }

    /// Every category node at any depth, in sidebar order
    pub fn categories(&self) -> impl Iterator<Item = &CategoryNode> {
        self.roots.iter().flat_map(CategoryNode::categories)
    }

    /// Every page entry, in sidebar order
    pub fn pages(&self) -> impl Iterator<Item = &PageEntry> {
        self.roots.iter().flat_map(CategoryNode::all_pages)
    }

    pub fn page(&self, id: &str) -> Option<&PageEntry> {
        self.pages().find(|p| p.id == id)
    }

    /// Restore default visibility and expansion everywhere
    pub fn reset(&mut self) {
        for root in &mut self.roots {
            root.reset();
        }
    }

    /// Remove every active flag
    pub fn clear_active(&mut self) {
        self.changelog_active = false;
        for root in &mut self.roots {
            root.for_each_page_mut(&mut PageEntry::clear_active);
        }
    }

    /// The link currently marked active, if any
    pub fn active_anchor(&self) -> Option<Anchor> {
        self.pages().find_map(|page| {
            if page.active {
                return Some(page.anchor());
            }
            page.sections
                .iter()
                .find(|s| s.active)
                .map(|s| s.anchor.clone())
        })
    }

    /// Mark the link targeting `anchor` active with accordion semantics
    ///
    /// Clears all active flags, then marks the matching link, expands every
    /// ancestor and collapses every page entry that is not an ancestor.
    /// Returns false, with all flags cleared, when no link targets `anchor`.
    pub fn activate(&mut self, anchor: &Anchor) -> bool {
        self.clear_active();

        let mut found = false;
        for root in &mut self.roots {
            found |= root.activate(anchor);
        }
        if found {
            for root in &mut self.roots {
                root.for_each_page_mut(&mut |page: &mut PageEntry| {
                    if !page.is_active() {
                        page.state.expanded = false;
                    }
                });
            }
        }
        found
    }

    /// Mark the changelog link as the only active link
    pub fn activate_changelog(&mut self) {
        self.clear_active();
        self.changelog_active = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{GroupRecord, MethodRecord, PropertyRecord};
    use crate::testutil;

    #[test]
    fn test_math_path_and_methods_section() {
        let tree = SidebarTree::build(&testutil::math_registry());

        let core = tree.node(&["Libraries", "Core"]).unwrap();
        let math = core.page("math").unwrap();
        assert_eq!(math.title, "Math");
        assert_eq!(math.sections.len(), 1);
        assert_eq!(math.sections[0].label, "Methods");
        assert_eq!(math.sections[0].anchor.to_string(), "math:methods");
    }

    #[test]
    fn test_section_order() {
        let mut registry = Registry::new();
        registry.register(
            "os",
            PageRecord::new("OS", "Libraries")
                .with_group(GroupRecord::new("File System"))
                .with_group(GroupRecord::new("Windows"))
                .with_method(MethodRecord::new("exit", "void", "(code: int)"))
                .with_property(PropertyRecord::new("name", "string", "\"\"")),
        );
        let tree = SidebarTree::build(&registry);
        let labels: Vec<_> = tree
            .page("os")
            .unwrap()
            .sections
            .iter()
            .map(|s| s.anchor.to_string())
            .collect();

        assert_eq!(
            labels,
            vec!["os:file_system", "os:windows", "os:methods", "os:properties"]
        );
    }

    #[test]
    fn test_root_priority_then_nested_alphabetical() {
        let mut registry = Registry::new();
        registry.register("zed", PageRecord::new("Zed", "Tools"));
        registry.register("net", PageRecord::new("Net", "Libraries/Network"));
        registry.register("math", PageRecord::new("Math", "Libraries/Core"));
        registry.register("intro", PageRecord::new("Introduction", "Manual"));
        registry.register("apple", PageRecord::new("Apple", "Appendix"));

        let tree = SidebarTree::build(&registry);
        let roots: Vec<_> = tree.roots.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(roots, vec!["Manual", "Libraries", "Appendix", "Tools"]);

        let libraries = tree.root("Libraries").unwrap();
        let nested: Vec<_> = libraries.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(nested, vec!["Core", "Network"]);
    }

    #[test]
    fn test_pages_by_rank_then_title() {
        let mut registry = Registry::new();
        registry.register("c", PageRecord::new("Charlie", "Manual"));
        registry.register("b", PageRecord::new("Bravo", "Manual").with_order(2));
        registry.register("a", PageRecord::new("Alpha", "Manual"));
        registry.register("z", PageRecord::new("Zulu", "Manual").with_order(0));

        let tree = SidebarTree::build(&registry);
        let manual = tree.root("Manual").unwrap();
        let ids: Vec<_> = manual.pages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["z", "b", "a", "c"]);
    }

    #[test]
    fn test_default_states() {
        let tree = SidebarTree::build(&testutil::sample_registry());
        for root in &tree.roots {
            assert_eq!(root.state, NodeState::CATEGORY);
        }
        assert!(tree.pages().all(|p| p.state == NodeState::PAGE));
    }

    #[test]
    fn test_activate_accordion() {
        let mut tree = SidebarTree::build(&testutil::sample_registry());
        assert!(tree.activate(&Anchor::page("math")));
        assert!(tree.page("math").unwrap().state.expanded);

        assert!(tree.activate(&Anchor::member("game", "methods")));
        assert!(tree.page("game").unwrap().state.expanded);
        assert!(!tree.page("math").unwrap().state.expanded);
        assert_eq!(tree.active_anchor(), Some(Anchor::member("game", "methods")));
        assert!(!tree.page("math").unwrap().is_active());
    }

    #[test]
    fn test_activate_missing_link_clears() {
        let mut tree = SidebarTree::build(&testutil::sample_registry());
        tree.activate(&Anchor::page("math"));
        assert!(!tree.activate(&Anchor::member("math", "sqrt")));
        assert_eq!(tree.active_anchor(), None);
    }
}
