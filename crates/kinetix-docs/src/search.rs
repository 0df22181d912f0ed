//! Sidebar filtering
//!
//! Recomputed from scratch on every query. The tree is never rebuilt, only
//! its visibility and expansion flags are rewritten.

use crate::content::PageRecord;
use crate::registry::Registry;
use crate::sidebar::{CategoryNode, PageEntry, SidebarTree};

/// Counts of what a filter pass left visible
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSummary {
    pub visible_pages: usize,
    pub visible_categories: usize,
}

/// Apply `query` to the sidebar
///
/// A blank query restores the default state. Otherwise a page is shown
/// (and opened) iff it matches, and a category is shown (and opened) iff
/// one of its descendant pages is shown.
pub fn filter(tree: &mut SidebarTree, registry: &Registry, query: &str) -> FilterSummary {
    let query = query.trim();
    if query.is_empty() {
        tree.reset();
        return FilterSummary {
            visible_pages: tree.pages().count(),
            visible_categories: tree.categories().count(),
        };
    }

    let needle = query.to_lowercase();
    let mut summary = FilterSummary::default();
    for root in &mut tree.roots {
        filter_node(root, registry, &needle, &mut summary);
    }
    tracing::debug!(
        query,
        pages = summary.visible_pages,
        categories = summary.visible_categories,
        "filtered sidebar"
    );
    summary
}

fn filter_node(
    node: &mut CategoryNode,
    registry: &Registry,
    needle: &str,
    summary: &mut FilterSummary,
) -> bool {
    let mut any_visible = false;

    for entry in &mut node.pages {
        let record = registry.get(&entry.id);
        let matched = page_matches(entry, record, needle);
        entry.state.visible = matched;
        if matched {
            entry.state.expanded = true;
            summary.visible_pages += 1;
            any_visible = true;
        }
    }

    for child in &mut node.children {
        any_visible |= filter_node(child, registry, needle, summary);
    }

    node.state.visible = any_visible;
    node.state.expanded = any_visible;
    if any_visible {
        summary.visible_categories += 1;
    }
    any_visible
}

/// Cheap checks first; member text only when they all miss
fn page_matches(entry: &PageEntry, record: Option<&PageRecord>, needle: &str) -> bool {
    let contains = |text: &str| text.to_lowercase().contains(needle);

    if contains(&entry.title) || contains(&entry.id) {
        return true;
    }
    if entry.sections.iter().any(|s| contains(&s.label)) {
        return true;
    }
    record.is_some_and(|page| {
        page.members()
            .any(|member| contains(member.name()) || contains(member.desc()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sidebar::NodeState;
    use crate::testutil;

    #[test]
    fn test_member_name_match_shows_page() {
        let registry = testutil::sample_registry();
        let mut tree = SidebarTree::build(&registry);

        let summary = filter(&mut tree, &registry, "sin");
        let math = tree.page("math").unwrap();
        assert!(math.state.visible);
        assert!(math.state.expanded);
        assert!(summary.visible_pages >= 1);

        let libraries = tree.root("Libraries").unwrap();
        assert_eq!(libraries.state, NodeState::CATEGORY);
        assert!(tree.node(&["Libraries", "Core"]).unwrap().state.expanded);
    }

    #[test]
    fn test_non_matching_hidden() {
        let registry = testutil::sample_registry();
        let mut tree = SidebarTree::build(&registry);

        filter(&mut tree, &registry, "collision");
        assert!(tree.page("game").unwrap().state.visible);
        assert!(!tree.page("math").unwrap().state.visible);
        assert!(!tree.root("Manual").unwrap().state.visible);
    }

    #[test]
    fn test_case_insensitive_and_section_labels() {
        let registry = testutil::sample_registry();
        let mut tree = SidebarTree::build(&registry);

        filter(&mut tree, &registry, "MATH");
        assert!(tree.page("math").unwrap().state.visible);

        filter(&mut tree, &registry, "propert");
        assert!(tree.page("game").unwrap().state.visible);
    }

    #[test]
    fn test_blank_query_resets() {
        let registry = testutil::sample_registry();
        let mut tree = SidebarTree::build(&registry);

        filter(&mut tree, &registry, "sin");
        let summary = filter(&mut tree, &registry, "   ");

        assert_eq!(summary.visible_pages, registry.len());
        // Manual, Manual/Syntax, Libraries, Libraries/Core, Libraries/Multimedia, OS Specific
        assert_eq!(summary.visible_categories, 6);
        assert!(tree.node(&["Libraries", "Core"]).is_some());
        assert!(tree.categories().all(|c| c.state == NodeState::CATEGORY));
        assert!(tree.pages().all(|p| p.state == NodeState::PAGE));
    }

    #[test]
    fn test_no_match_hides_everything() {
        let registry = testutil::sample_registry();
        let mut tree = SidebarTree::build(&registry);

        let summary = filter(&mut tree, &registry, "zzz-nothing");
        assert_eq!(summary, FilterSummary::default());
        assert!(tree.roots.iter().all(|r| !r.state.visible));
    }
}
