//! The documentation browser
//!
//! Owns the registry and everything derived from it at startup (symbol
//! index, sidebar tree) plus the mutable presentation state. Platform
//! adapters drive it through the `on_*` callbacks.

use std::fs;
use std::path::PathBuf;

use crate::anchor::{Anchor, CHANGELOG_FRAGMENT};
use crate::changelog::Changelog;
use crate::config::SiteConfig;
use crate::error::{DocsError, DocsResult};
use crate::highlight::Highlighter;
use crate::loader::Corpus;
use crate::registry::Registry;
use crate::render::{HtmlRenderer, PageRenderer, PageView, SidebarLinks};
use crate::search::{self, FilterSummary};
use crate::sidebar::SidebarTree;
use crate::symbols::SymbolIndex;
use crate::sync::{ActiveTarget, IntersectionEntry, ViewCommand, ViewMode, ViewSynchronizer};

/// File name of the documentation page in a built site
pub const INDEX_FILE: &str = "index.html";
/// File name of the changelog page in a built site
pub const CHANGELOG_FILE: &str = "changelog.html";

#[derive(Debug, Clone)]
pub struct DocBrowser {
    registry: Registry,
    symbols: SymbolIndex,
    sidebar: SidebarTree,
    changelog: Changelog,
    sync: ViewSynchronizer,
}

impl DocBrowser {
    /// Build the index and sidebar for a fixed corpus
    pub fn new(registry: Registry, changelog: Changelog) -> Self {
        let symbols = SymbolIndex::build(&registry);
        let sidebar = SidebarTree::build(&registry);
        Self {
            registry,
            symbols,
            sidebar,
            changelog,
            sync: ViewSynchronizer::new(),
        }
    }

    pub fn from_corpus(corpus: Corpus) -> Self {
        Self::new(corpus.registry, corpus.changelog)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn symbols(&self) -> &SymbolIndex {
        &self.symbols
    }

    pub fn sidebar(&self) -> &SidebarTree {
        &self.sidebar
    }

    pub fn changelog(&self) -> &Changelog {
        &self.changelog
    }

    pub fn mode(&self) -> ViewMode {
        self.sync.mode()
    }

    pub fn active(&self) -> Option<&ActiveTarget> {
        self.sync.active()
    }

    pub fn highlighter(&self) -> Highlighter<'_> {
        Highlighter::new(&self.symbols)
    }

    /// Page ids in canonical order
    pub fn sorted_keys(&self) -> Vec<&str> {
        self.registry.sorted_keys()
    }

    pub fn highlight(&self, code: &str) -> String {
        self.highlighter().highlight(code)
    }

    pub fn activate_anchor(&mut self, anchor: &Anchor) -> Vec<ViewCommand> {
        self.sync.activate_anchor(&mut self.sidebar, anchor)
    }

    pub fn on_scroll_anchor_entered(&mut self, id: &str) -> Vec<ViewCommand> {
        self.sync.on_scroll_anchor_entered(&mut self.sidebar, id)
    }

    pub fn on_intersection(&mut self, entries: &[IntersectionEntry]) -> Vec<ViewCommand> {
        self.sync.on_intersection(&mut self.sidebar, entries)
    }

    pub fn on_fragment_changed(&mut self, fragment: &str) -> Vec<ViewCommand> {
        self.sync
            .on_fragment_changed(&mut self.sidebar, &self.registry, fragment)
    }

    pub fn on_initial_load(
        &mut self,
        fragment: Option<&str>,
        landing_page: Option<&str>,
    ) -> Vec<ViewCommand> {
        self.sync
            .on_initial_load(&mut self.sidebar, &self.registry, fragment, landing_page)
    }

    pub fn on_search_query_changed(&mut self, text: &str) -> FilterSummary {
        search::filter(&mut self.sidebar, &self.registry, text)
    }

    /// Display trees of every page, in canonical order
    pub fn render_pages(&self) -> Vec<PageView> {
        PageRenderer::new(self.highlighter()).render_all(&self.registry)
    }

    /// Markup of whatever the content area currently shows
    pub fn render_content(&self) -> String {
        match self.mode() {
            ViewMode::Documentation => HtmlRenderer::pages(&self.render_pages()),
            ViewMode::Changelog => HtmlRenderer::changelog(&self.changelog),
        }
    }

    pub fn render_sidebar(&self) -> String {
        HtmlRenderer::sidebar(&self.sidebar)
    }

    /// The current view as a standalone HTML document
    pub fn render_document(&self, title: &str) -> String {
        HtmlRenderer::document(title, &self.render_sidebar(), &self.render_content())
    }

    /// The current view as one file of a multi-file site
    fn render_site_page(&self, title: &str, links: SidebarLinks<'_>) -> String {
        HtmlRenderer::document(
            title,
            &HtmlRenderer::sidebar_with_links(&self.sidebar, links),
            &self.render_content(),
        )
    }

    /// Write `index.html` and `changelog.html` into the configured output
    ///
    /// Both pages are rendered from the initial state, independent of the
    /// current presentation flags. The index opens on the landing page when
    /// one is configured.
    ///
    /// # Errors
    /// Returns an error if the directory or a file cannot be written.
    pub fn write_site(&self, config: &SiteConfig) -> DocsResult<Vec<PathBuf>> {
        let output = config.output.as_path();
        fs::create_dir_all(output).map_err(|e| DocsError::io(output, e))?;

        let mut docs = Self::new(self.registry.clone(), self.changelog.clone());
        docs.on_initial_load(None, config.landing_page.as_deref());
        let index = docs.render_site_page(
            &config.title,
            SidebarLinks {
                page_base: "",
                changelog_href: CHANGELOG_FILE,
            },
        );

        docs.on_fragment_changed(CHANGELOG_FRAGMENT);
        let changelog = docs.render_site_page(
            &config.title,
            SidebarLinks {
                page_base: INDEX_FILE,
                changelog_href: CHANGELOG_FILE,
            },
        );

        let mut written = Vec::new();
        for (name, html) in [(INDEX_FILE, index), (CHANGELOG_FILE, changelog)] {
            let path = output.join(name);
            fs::write(&path, html).map_err(|e| DocsError::io(&path, e))?;
            tracing::info!(path = %path.display(), "wrote page");
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil;
    use tempfile::TempDir;

    #[test]
    fn test_callbacks_drive_state() {
        let mut browser = DocBrowser::new(testutil::sample_registry(), testutil::sample_changelog());

        browser.on_scroll_anchor_entered("math:methods");
        assert_eq!(
            browser.sidebar().active_anchor(),
            Some(Anchor::member("math", "methods"))
        );

        let summary = browser.on_search_query_changed("sin");
        assert!(summary.visible_pages >= 1);
        assert!(browser.sidebar().page("math").unwrap().state.visible);

        browser.on_fragment_changed("#changelog");
        assert_eq!(browser.mode(), ViewMode::Changelog);
        assert!(browser.render_content().starts_with("<h1>Changelog</h1>"));
    }

    #[test]
    fn test_render_document_contains_all_pages() {
        let browser = DocBrowser::new(testutil::sample_registry(), Changelog::new());
        let html = browser.render_document("Kinetix");
        for id in browser.sorted_keys() {
            assert!(html.contains(&format!("class=\"page-header\" id=\"{id}\"")));
        }
    }

    #[test]
    fn test_write_site() {
        let dir = TempDir::new().unwrap();
        let browser = DocBrowser::new(testutil::sample_registry(), testutil::sample_changelog());
        let config = SiteConfig {
            output: dir.path().join("site"),
            landing_page: Some("game".to_string()),
            ..SiteConfig::default()
        };
        let written = browser.write_site(&config).unwrap();

        assert_eq!(written.len(), 2);
        let changelog = fs::read_to_string(dir.path().join("site").join(CHANGELOG_FILE)).unwrap();
        assert!(changelog.contains("sidebar-link-changelog active"));
        let index = fs::read_to_string(dir.path().join("site").join(INDEX_FILE)).unwrap();
        assert!(index.contains("id=\"math\""));
        assert!(index.contains("<a href=\"#game\" class=\"nav-page-link active\">Game</a>"));
    }

    #[test]
    fn test_write_site_pages_link_each_other() {
        let dir = TempDir::new().unwrap();
        let browser = DocBrowser::new(testutil::sample_registry(), testutil::sample_changelog());
        let config = SiteConfig {
            output: dir.path().join("site"),
            ..SiteConfig::default()
        };
        browser.write_site(&config).unwrap();

        let index = fs::read_to_string(config.output.join(INDEX_FILE)).unwrap();
        assert!(index.contains("<a href=\"changelog.html\" class=\"sidebar-link-changelog\">"));
        assert!(index.contains("<a href=\"#math\" class=\"nav-page-link\">Math</a>"));
        assert!(!index.contains("href=\"#changelog\""));

        let changelog = fs::read_to_string(config.output.join(CHANGELOG_FILE)).unwrap();
        assert!(changelog.contains("<a href=\"index.html#math\" class=\"nav-page-link\">Math</a>"));
        assert!(changelog.contains("href=\"index.html#game:properties\""));
        assert!(!changelog.contains("href=\"#math\""));
        assert!(changelog.contains("<a href=\"changelog.html\" class=\"sidebar-link-changelog active\">"));
    }
}
