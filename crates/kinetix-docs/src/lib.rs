//! Kinetix Docs - rendering and indexing engine for the Kinetix language reference
//!
//! This crate provides the core of the documentation browser:
//! - Registry: page records and their canonical order
//! - Symbols: name to anchor index used for cross-linking code
//! - Highlight: lexical highlighter with links and rainbow brackets
//! - Sidebar: category tree built from the registry
//! - Search: incremental sidebar filtering
//! - Sync: scroll-spy and fragment routing
//! - Render: display tree and HTML output

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Page, member and changelog records
pub mod content;

/// Navigable anchors and fragment parsing
pub mod anchor;

/// Content registry and canonical page ordering
pub mod registry;

/// Symbol index for cross-linking
pub mod symbols;

/// Syntax highlighting with cross-links
pub mod highlight;

/// Sidebar navigation tree
pub mod sidebar;

/// Sidebar filtering
pub mod search;

/// Scroll-spy and navigation state
pub mod sync;

/// Display tree and HTML output
pub mod render;

/// Release history
pub mod changelog;

/// Content files on disk
pub mod loader;

/// Site configuration
pub mod config;

/// Browser facade
pub mod browser;

/// Errors of the fallible outer surfaces
pub mod error;

/// Test fixtures shared by tests and benchmarks
pub mod testutil;

pub use anchor::Anchor;
pub use browser::DocBrowser;
pub use changelog::{Changelog, ChangelogEntry};
pub use config::SiteConfig;
pub use content::{
    CategoryPath, GroupRecord, MethodRecord, PageRecord, PropertyRecord, SignalRecord, Status,
};
pub use error::{DocsError, DocsResult};
pub use highlight::Highlighter;
pub use loader::Corpus;
pub use registry::Registry;
pub use search::FilterSummary;
pub use sidebar::SidebarTree;
pub use symbols::SymbolIndex;
pub use sync::{ViewCommand, ViewSynchronizer};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_end_to_end_math_page() {
        let registry = testutil::math_registry();
        assert_eq!(registry.sorted_keys(), vec!["math"]);

        let tree = SidebarTree::build(&registry);
        let core = tree.node(&["Libraries", "Core"]).unwrap();
        assert_eq!(core.pages[0].sections[0].label, "Methods");

        let index = SymbolIndex::build(&registry);
        assert_eq!(index.resolve("sqrt"), Some(&Anchor::member("math", "sqrt")));
    }
}
